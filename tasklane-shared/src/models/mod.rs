/// Entity layer for Tasklane
///
/// Record types, their constraints, and the ownership relationship between
/// users and todos. Database access lives in [`crate::services`].
///
/// # Models
///
/// - `user`: User accounts and credentials
/// - `todo`: Todos owned by a user, with priority and reminder metadata
/// - `patch`: Tri-state field updates for nullable columns

pub mod patch;
pub mod todo;
pub mod user;
