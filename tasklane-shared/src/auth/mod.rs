/// Authentication and authorization
///
/// - [`password`]: Argon2id hashing and the plaintext password policy
/// - [`jwt`]: Access and refresh tokens
/// - [`middleware`]: Bearer token parsing into an [`middleware::AuthContext`]
/// - [`authorization`]: Todo ownership checks
///
/// # Example
///
/// ```
/// use tasklane_shared::auth::jwt::{issue_token_pair, validate_access_token};
/// use tasklane_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("open sesame please")?;
/// assert!(verify_password("open sesame please", &hash)?);
///
/// let user_id = Uuid::new_v4();
/// let tokens = issue_token_pair(user_id, "a-secret-of-at-least-32-bytes!!")?;
/// assert_eq!(validate_access_token(&tokens.access_token, "a-secret-of-at-least-32-bytes!!")?.sub, user_id);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
