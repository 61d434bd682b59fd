/// API route handlers
///
/// - `health`: Liveness and database status
/// - `auth`: Registration, login, token refresh
/// - `todos`: The caller's todos

pub mod auth;
pub mod health;
pub mod todos;
