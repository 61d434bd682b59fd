/// Todo lifecycle operations
///
/// Stateless functions that read and write todos through a caller-supplied
/// unit of work. Pass `&mut *tx` for an open transaction; nothing here begins,
/// commits, or rolls back. Writes become durable only when the caller commits,
/// and later calls on the same transaction see them immediately.
///
/// None of the lookups or mutations check ownership. Callers must resolve the
/// acting user and call [`verify_ownership`] before exposing, updating,
/// toggling, or deleting a todo.
///
/// Missing rows are reported as `None` (or `false` for [`delete`]), never as
/// errors. Storage failures, including constraint violations, are returned
/// unchanged as `sqlx::Error`.
///
/// # Example
///
/// ```no_run
/// use tasklane_shared::models::todo::{CreateTodo, UpdateTodo};
/// use tasklane_shared::services::todo;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
///
/// let created = todo::create(&mut *tx, user_id, CreateTodo::titled("Buy milk")).await?;
/// let toggled = todo::toggle_complete(&mut *tx, created.id).await?;
/// assert!(toggled.map(|t| t.is_complete).unwrap_or(false));
///
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::todo::{completion_timestamp, CreateTodo, Todo, UpdateTodo, TODO_COLUMNS};
use crate::models::user::User;

/// Lists a user's todos, newest first
///
/// `completed` filters on completion status; `None` returns everything.
/// An unknown user yields an empty list.
pub async fn list_by_user(
    conn: &mut PgConnection,
    user_id: Uuid,
    completed: Option<bool>,
) -> Result<Vec<Todo>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {TODO_COLUMNS}
        FROM todo
        WHERE user_id = $1
          AND ($2::BOOLEAN IS NULL OR is_complete = $2)
        ORDER BY created_at DESC
        "#
    );

    let todos = sqlx::query_as::<_, Todo>(&query)
        .bind(user_id)
        .bind(completed)
        .fetch_all(conn)
        .await?;

    debug!(%user_id, ?completed, count = todos.len(), "Listed todos");
    Ok(todos)
}

/// Fetches a todo by ID
///
/// Performs no ownership check.
pub async fn get_by_id(conn: &mut PgConnection, todo_id: Uuid) -> Result<Option<Todo>, sqlx::Error> {
    let query = format!("SELECT {TODO_COLUMNS} FROM todo WHERE id = $1");

    sqlx::query_as::<_, Todo>(&query)
        .bind(todo_id)
        .fetch_optional(conn)
        .await
}

/// Finds a user's todos whose title contains `fragment`, ignoring case
///
/// `%`, `_` and `\` in the fragment match literally.
pub async fn find_by_title(
    conn: &mut PgConnection,
    user_id: Uuid,
    fragment: &str,
) -> Result<Vec<Todo>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {TODO_COLUMNS}
        FROM todo
        WHERE user_id = $1
          AND title ILIKE '%' || $2::TEXT || '%'
        ORDER BY created_at DESC
        "#
    );

    let todos = sqlx::query_as::<_, Todo>(&query)
        .bind(user_id)
        .bind(escape_like(fragment))
        .fetch_all(conn)
        .await?;

    debug!(%user_id, fragment, count = todos.len(), "Searched todos by title");
    Ok(todos)
}

/// Finds a user's todo with exactly this title
///
/// The comparison is case-sensitive. When several todos share the title,
/// the most recently created one is returned.
pub async fn find_exact_by_title(
    conn: &mut PgConnection,
    user_id: Uuid,
    title: &str,
) -> Result<Option<Todo>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {TODO_COLUMNS}
        FROM todo
        WHERE user_id = $1 AND title = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#
    );

    sqlx::query_as::<_, Todo>(&query)
        .bind(user_id)
        .bind(title)
        .fetch_optional(conn)
        .await
}

/// Creates a todo owned by `user_id`
///
/// The new todo starts incomplete with `created_at == updated_at`. Field
/// lengths are not re-checked here; a violation comes back as a
/// `sqlx::Error::Database` with a check-violation kind.
pub async fn create(
    conn: &mut PgConnection,
    user_id: Uuid,
    data: CreateTodo,
) -> Result<Todo, sqlx::Error> {
    let now = Utc::now();
    let query = format!(
        r#"
        INSERT INTO todo (user_id, title, description, is_complete, created_at, updated_at,
                          completed_at, priority, due_date, reminder_enabled, reminder_time)
        VALUES ($1, $2, $3, FALSE, $4, $4, NULL, $5, $6, $7, $8)
        RETURNING {TODO_COLUMNS}
        "#
    );

    let todo = sqlx::query_as::<_, Todo>(&query)
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(now)
        .bind(data.priority.as_str())
        .bind(data.due_date)
        .bind(data.reminder_enabled)
        .bind(data.reminder_time)
        .fetch_one(conn)
        .await?;

    info!(todo_id = %todo.id, %user_id, priority = %todo.priority, "Created todo");
    Ok(todo)
}

/// Applies a partial update
///
/// Only supplied fields are written. Supplying `is_complete` also sets
/// `completed_at` to now (true) or NULL (false) in the same statement.
/// `updated_at` is refreshed even when nothing else changes. Returns `None`
/// when the todo does not exist. Performs no ownership check.
pub async fn update(
    conn: &mut PgConnection,
    todo_id: Uuid,
    changes: UpdateTodo,
) -> Result<Option<Todo>, sqlx::Error> {
    let now = Utc::now();

    // Build the SET list for the supplied fields only
    let mut query = String::from("UPDATE todo SET updated_at = $2");
    let mut bind_count = 2;

    let mut push_column = |query: &mut String, column: &str| {
        bind_count += 1;
        query.push_str(&format!(", {} = ${}", column, bind_count));
    };

    if changes.title.is_some() {
        push_column(&mut query, "title");
    }
    if !changes.description.is_keep() {
        push_column(&mut query, "description");
    }
    if changes.is_complete.is_some() {
        push_column(&mut query, "is_complete");
        push_column(&mut query, "completed_at");
    }
    if changes.priority.is_some() {
        push_column(&mut query, "priority");
    }
    if !changes.due_date.is_keep() {
        push_column(&mut query, "due_date");
    }
    if changes.reminder_enabled.is_some() {
        push_column(&mut query, "reminder_enabled");
    }
    if !changes.reminder_time.is_keep() {
        push_column(&mut query, "reminder_time");
    }

    query.push_str(&format!(" WHERE id = $1 RETURNING {TODO_COLUMNS}"));

    // Bind in the same order the columns were pushed
    let mut q = sqlx::query_as::<_, Todo>(&query).bind(todo_id).bind(now);

    if let Some(title) = changes.title {
        q = q.bind(title);
    }
    if let Some(description) = changes.description.into_write() {
        q = q.bind(description);
    }
    if let Some(is_complete) = changes.is_complete {
        q = q.bind(is_complete).bind(completion_timestamp(is_complete, now));
    }
    if let Some(priority) = changes.priority {
        q = q.bind(priority.as_str());
    }
    if let Some(due_date) = changes.due_date.into_write() {
        q = q.bind(due_date);
    }
    if let Some(reminder_enabled) = changes.reminder_enabled {
        q = q.bind(reminder_enabled);
    }
    if let Some(reminder_time) = changes.reminder_time.into_write() {
        q = q.bind(reminder_time);
    }

    let todo = q.fetch_optional(conn).await?;

    match &todo {
        Some(todo) => debug!(todo_id = %todo.id, is_complete = todo.is_complete, "Updated todo"),
        None => debug!(%todo_id, "Update skipped, todo not found"),
    }

    Ok(todo)
}

/// Flips the completion flag
///
/// Sets `completed_at` to now when the todo becomes complete and clears it
/// when it becomes incomplete. Returns `None` when the todo does not exist.
pub async fn toggle_complete(
    conn: &mut PgConnection,
    todo_id: Uuid,
) -> Result<Option<Todo>, sqlx::Error> {
    // Right-hand sides of SET read the pre-update row
    let query = format!(
        r#"
        UPDATE todo
        SET is_complete = NOT is_complete,
            completed_at = CASE WHEN is_complete THEN NULL ELSE $2 END,
            updated_at = $2
        WHERE id = $1
        RETURNING {TODO_COLUMNS}
        "#
    );

    let todo = sqlx::query_as::<_, Todo>(&query)
        .bind(todo_id)
        .bind(Utc::now())
        .fetch_optional(conn)
        .await?;

    if let Some(todo) = &todo {
        debug!(todo_id = %todo.id, is_complete = todo.is_complete, "Toggled todo");
    }

    Ok(todo)
}

/// Deletes a todo
///
/// Returns `false` when there was nothing to delete. Performs no ownership
/// check.
pub async fn delete(conn: &mut PgConnection, todo_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todo WHERE id = $1")
        .bind(todo_id)
        .execute(conn)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        info!(%todo_id, "Deleted todo");
    }

    Ok(deleted)
}

/// Returns true when `user` owns `todo`
///
/// Pure check with no storage access. Must be called before any update,
/// toggle, or delete on behalf of `user`.
pub fn verify_ownership(todo: &Todo, user: &User) -> bool {
    todo.user_id == user.id
}

/// Escapes LIKE metacharacters so user input matches literally
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
