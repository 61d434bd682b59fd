/// User entity
///
/// A user is the owning principal for todos. Passwords are only ever stored as
/// Argon2id hashes produced by [`crate::auth::password::hash_password`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL CHECK (char_length(password_hash) >= 60),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Deleting a user removes every todo it owns (`ON DELETE CASCADE` on
/// `todo.user_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Column list shared by every `users` query
pub(crate) const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique and compared exactly as stored
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never serialized into responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Carries the already-hashed credential, never the plaintext password.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(
        email(message = "Invalid email format"),
        length(min = 3, max = 255, message = "Email must be between 3 and 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 60, message = "Password hash is too short"))]
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "someone@example.com");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_create_user_rejects_short_hash() {
        let data = CreateUser {
            email: "someone@example.com".to_string(),
            password_hash: "bcrypt-ish".to_string(),
        };

        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_hash"));
    }

    #[test]
    fn test_create_user_rejects_malformed_email() {
        let hash = format!("$argon2id$v=19$m=19456,t=2,p=1${}", "a".repeat(60));
        let valid = CreateUser {
            email: "someone@example.com".to_string(),
            password_hash: hash.clone(),
        };
        assert!(valid.validate().is_ok());

        let data = CreateUser {
            email: "not an email".to_string(),
            password_hash: hash,
        };
        let errors = data.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}
