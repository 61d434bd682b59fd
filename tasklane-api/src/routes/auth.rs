/// Authentication endpoints
///
/// - `POST /v1/auth/register` - Create an account and get tokens
/// - `POST /v1/auth/login` - Exchange email and password for tokens
/// - `POST /v1/auth/refresh` - Exchange a refresh token for a new access token

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tasklane_shared::{
    auth::{
        jwt::{self, Claims, TokenPair, TokenType},
        password,
    },
    models::user::{CreateUser, User},
    services::user,
};
use tracing::info;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

/// Registers a user
///
/// ```text
/// POST /v1/auth/register
/// {"email": "user@example.com", "password": "at least 8 chars"}
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Bad email or password
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;
    password::check_password_policy(&req.password)
        .map_err(|message| ApiError::validation("password", message))?;

    let password_hash = password::hash_password(&req.password)?;

    let mut tx = state.db.begin().await?;
    let created = user::create_user(
        &mut tx,
        CreateUser {
            email: req.email,
            password_hash,
        },
    )
    .await?;
    tx.commit().await?;

    let tokens = jwt::issue_token_pair(created.id, state.jwt_secret())?;
    info!(user_id = %created.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: created,
            tokens,
        }),
    ))
}

/// Logs a user in
///
/// An unknown email and a wrong password both return 401 with the same
/// message.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate().map_err(|_| invalid_credentials())?;

    let mut conn = state.db.acquire().await?;
    let authenticated = user::authenticate(&mut conn, &req.email, &req.password)
        .await?
        .ok_or_else(invalid_credentials)?;

    let tokens = jwt::issue_token_pair(authenticated.id, state.jwt_secret())?;
    info!(user_id = %authenticated.id, "User logged in");

    Ok(Json(AuthResponse {
        user: authenticated,
        tokens,
    }))
}

/// Issues a new access token
///
/// Fails with 401 when the refresh token is invalid or its user has been
/// deleted.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let mut conn = state.db.acquire().await?;
    if user::get_user_by_id(&mut conn, claims.sub).await?.is_none() {
        return Err(ApiError::Unauthorized("User no longer exists".to_string()));
    }

    let access_token = jwt::create_token(&Claims::new(claims.sub, TokenType::Access), state.jwt_secret())?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer",
        expires_in: TokenType::Access.default_expiration().num_seconds(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            email: "user@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "long enough".to_string(),
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_auth_response_flattens_tokens() {
        let now = chrono::Utc::now();
        let response = AuthResponse {
            user: User {
                id: uuid::Uuid::new_v4(),
                email: "user@example.com".to_string(),
                password_hash: "secret-hash".to_string(),
                created_at: now,
                updated_at: now,
            },
            tokens: TokenPair {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
                token_type: "Bearer",
                expires_in: 86400,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "a");
        assert_eq!(json["refresh_token"], "r");
        assert_eq!(json["user"]["email"], "user@example.com");
        assert!(json["user"].get("password_hash").is_none());
    }
}
