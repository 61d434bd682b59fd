/// Bearer-token authentication
///
/// [`authenticate_headers`] reads `Authorization: Bearer <token>`, validates
/// it as an access token, and returns the caller's [`AuthContext`]. The API
/// server runs it in a middleware layer and stores the context in the request
/// extensions, where handlers pick it up with `Extension<AuthContext>`.
///
/// The context only says who the token was issued to. Whether that user
/// still exists is checked by the handler inside its own transaction.

use axum::http::{header, HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};

/// Identity of the caller, taken from a validated access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    /// The header is present but not a Bearer credential
    #[error("{0}")]
    InvalidFormat(String),

    #[error("{0}")]
    InvalidToken(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

/// Extracts the bearer token from request headers
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("Authorization header is not valid text".to_string()))?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Bearer token is empty".to_string()));
    }

    Ok(token)
}

/// Validates the bearer token in `headers` and returns the caller's identity
pub fn authenticate_headers(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = bearer_token(headers)?;
    let claims = validate_access_token(token, secret)?;

    Ok(AuthContext { user_id: claims.sub })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, Claims, TokenType};
    use axum::http::HeaderValue;

    const SECRET: &str = "middleware-test-secret-32-bytes-long";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert!(matches!(bearer_token(&HeaderMap::new()), Err(AuthError::MissingCredentials)));
        assert!(matches!(
            bearer_token(&headers_with("Basic dXNlcjpwYXNz")),
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(bearer_token(&headers_with("Bearer   ")), Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_authenticate_headers_access_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id, TokenType::Access), SECRET).unwrap();

        let context = authenticate_headers(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(context, AuthContext { user_id });
    }

    #[test]
    fn test_authenticate_headers_rejects_refresh_token() {
        let token = create_token(&Claims::new(Uuid::new_v4(), TokenType::Refresh), SECRET).unwrap();

        let err = authenticate_headers(&headers_with(&format!("Bearer {}", token)), SECRET).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_auth_error_status_codes() {
        assert_eq!(AuthError::MissingCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidFormat("x".to_string()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::InvalidToken("x".to_string()).status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_expired_jwt_maps_to_invalid_token() {
        let err: AuthError = JwtError::Expired.into();
        assert!(matches!(err, AuthError::InvalidToken(ref msg) if msg == "Token expired"));
    }
}
