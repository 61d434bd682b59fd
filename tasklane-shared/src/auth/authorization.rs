/// Ownership checks for todos
///
/// A todo may only be read or changed on behalf of the user who owns it.
/// These helpers turn [`verify_ownership`] into a `Result` so handlers can
/// bail out with `?` before calling a mutating service function.

use uuid::Uuid;

use crate::models::todo::Todo;
use crate::models::user::User;
use crate::services::todo::verify_ownership;

#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The acting user does not own the todo
    #[error("Not authorized to access todo {todo_id}")]
    NotOwner { todo_id: Uuid },
}

/// Fails with [`AuthzError::NotOwner`] unless `user` owns `todo`
pub fn require_owner(todo: &Todo, user: &User) -> Result<(), AuthzError> {
    if verify_ownership(todo, user) {
        Ok(())
    } else {
        Err(AuthzError::NotOwner { todo_id: todo.id })
    }
}

/// Returns the todo when `user` owns it
pub fn owned_by(todo: Todo, user: &User) -> Result<Todo, AuthzError> {
    require_owner(&todo, user)?;
    Ok(todo)
}
