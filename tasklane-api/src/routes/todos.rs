/// Todo endpoints (all require a bearer access token)
///
/// - `GET    /v1/todos?completed=true|false` - List the caller's todos, newest first
/// - `GET    /v1/todos/search?title=...&exact=true` - Search the caller's todos by title
/// - `POST   /v1/todos` - Create a todo
/// - `GET    /v1/todos/:id` - Fetch one todo
/// - `PATCH  /v1/todos/:id` - Partially update a todo
/// - `POST   /v1/todos/:id/toggle` - Flip completion
/// - `DELETE /v1/todos/:id` - Delete a todo
///
/// Every handler runs in one transaction: it resolves the caller, checks
/// ownership of the addressed todo, performs the operation, and commits.
/// A todo that exists but belongs to someone else is 403; one that does not
/// exist is 404.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::PgConnection;
use tasklane_shared::{
    auth::{authorization, middleware::AuthContext},
    models::{
        todo::{CreateTodo, Todo, UpdateTodo},
        user::User,
    },
    services::{todo, user},
};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub title: String,
    /// Case-sensitive whole-title match instead of substring search
    #[serde(default)]
    pub exact: bool,
}

/// Loads the caller; a token for a deleted user is no longer valid
async fn acting_user(conn: &mut PgConnection, auth: &AuthContext) -> ApiResult<User> {
    user::get_user_by_id(conn, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))
}

async fn owned_todo(conn: &mut PgConnection, todo_id: Uuid, owner: &User) -> ApiResult<Todo> {
    let found = todo::get_by_id(conn, todo_id)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    Ok(authorization::owned_by(found, owner)?)
}

pub async fn list_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Todo>>> {
    let mut tx = state.db.begin().await?;
    let caller = acting_user(&mut tx, &auth).await?;

    let todos = todo::list_by_user(&mut tx, caller.id, params.completed).await?;
    tx.commit().await?;

    Ok(Json(todos))
}

pub async fn search_todos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Todo>>> {
    if params.title.trim().is_empty() {
        return Err(ApiError::validation("title", "Search title must not be empty"));
    }

    let mut tx = state.db.begin().await?;
    let caller = acting_user(&mut tx, &auth).await?;

    let todos = if params.exact {
        todo::find_exact_by_title(&mut tx, caller.id, &params.title)
            .await?
            .into_iter()
            .collect()
    } else {
        todo::find_by_title(&mut tx, caller.id, &params.title).await?
    };
    tx.commit().await?;

    debug!(user_id = %caller.id, exact = params.exact, count = todos.len(), "Todo search");
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTodo>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    req.validate()?;

    let mut tx = state.db.begin().await?;
    let caller = acting_user(&mut tx, &auth).await?;

    let created = todo::create(&mut tx, caller.id, req).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(todo_id): Path<Uuid>,
) -> ApiResult<Json<Todo>> {
    let mut tx = state.db.begin().await?;
    let caller = acting_user(&mut tx, &auth).await?;

    let found = owned_todo(&mut tx, todo_id, &caller).await?;
    tx.commit().await?;

    Ok(Json(found))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(todo_id): Path<Uuid>,
    Json(req): Json<UpdateTodo>,
) -> ApiResult<Json<Todo>> {
    req.validate()?;

    let mut tx = state.db.begin().await?;
    let caller = acting_user(&mut tx, &auth).await?;
    owned_todo(&mut tx, todo_id, &caller).await?;

    let updated = todo::update(&mut tx, todo_id, req)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;
    tx.commit().await?;

    Ok(Json(updated))
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(todo_id): Path<Uuid>,
) -> ApiResult<Json<Todo>> {
    let mut tx = state.db.begin().await?;
    let caller = acting_user(&mut tx, &auth).await?;
    owned_todo(&mut tx, todo_id, &caller).await?;

    let toggled = todo::toggle_complete(&mut tx, todo_id)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;
    tx.commit().await?;

    Ok(Json(toggled))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(todo_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let mut tx = state.db.begin().await?;
    let caller = acting_user(&mut tx, &auth).await?;
    owned_todo(&mut tx, todo_id, &caller).await?;

    if !todo::delete(&mut tx, todo_id).await? {
        return Err(ApiError::todo_not_found());
    }
    tx.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}
