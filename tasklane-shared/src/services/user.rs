/// User account operations
///
/// Like the todo operations, these run on a caller-supplied connection or
/// transaction and never commit on their own. Email comparisons are exact:
/// `Someone@Example.com` and `someone@example.com` are different accounts.

use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::password::{verify_password, PasswordError};
use crate::models::user::{CreateUser, User, USER_COLUMNS};

/// Error returned by [`authenticate`]
#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Creates a user
///
/// # Errors
///
/// A duplicate email fails with a unique-violation `sqlx::Error::Database`.
pub async fn create_user(conn: &mut PgConnection, data: CreateUser) -> Result<User, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        RETURNING {USER_COLUMNS}
        "#
    );

    let user = sqlx::query_as::<_, User>(&query)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(conn)
        .await?;

    info!(user_id = %user.id, "Created user");
    Ok(user)
}

/// Finds a user by ID
pub async fn get_user_by_id(conn: &mut PgConnection, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Finds a user by exact email
pub async fn get_user_by_email(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

    sqlx::query_as::<_, User>(&query)
        .bind(email)
        .fetch_optional(conn)
        .await
}

/// Returns the user with this email, creating it if missing
///
/// When the account already exists its stored hash is left untouched and
/// `password_hash` is ignored.
pub async fn get_or_create_user(
    conn: &mut PgConnection,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let query = format!(
        r#"
        INSERT INTO users (email, password_hash)
        VALUES ($1, $2)
        ON CONFLICT (email) DO NOTHING
        RETURNING {USER_COLUMNS}
        "#
    );

    let inserted = sqlx::query_as::<_, User>(&query)
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&mut *conn)
        .await?;

    if let Some(user) = inserted {
        info!(user_id = %user.id, "Created user on first sight");
        return Ok(user);
    }

    get_user_by_email(conn, email)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

/// Looks up a user by email and checks the password
///
/// Returns `None` for an unknown email or a wrong password so callers cannot
/// tell the two apart.
pub async fn authenticate(
    conn: &mut PgConnection,
    email: &str,
    password: &str,
) -> Result<Option<User>, CredentialsError> {
    let Some(user) = get_user_by_email(conn, email).await? else {
        debug!("Authentication failed: unknown email");
        return Ok(None);
    };

    if !verify_password(password, &user.password_hash)? {
        debug!(user_id = %user.id, "Authentication failed: wrong password");
        return Ok(None);
    }

    Ok(Some(user))
}

/// Deletes a user and, through the foreign key cascade, all of its todos
pub async fn delete_user(conn: &mut PgConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        info!(user_id = %id, "Deleted user");
    }

    Ok(deleted)
}
