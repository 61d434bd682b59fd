/// Service layer for Tasklane
///
/// Stateless async functions over a caller-owned unit of work
/// (`&mut sqlx::PgConnection`, usually `&mut *tx` for an open transaction).
/// Services never commit or roll back; grouping several calls atomically is
/// the caller's job.
///
/// - `todo`: todo lookup, creation, update, toggle, deletion, ownership check
/// - `user`: account creation, lookup, and credential checks

pub mod todo;
pub mod user;
