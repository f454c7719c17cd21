use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domain::{Todo, TodoId, TodoPatch};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{CreateTodoRequest, DeleteTodoResponse, HealthBody, UpdateTodoRequest};
use crate::state::AppState;

/// Content-Type に依存せず本文を JSON として解釈する
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Request body is required".to_string()));
    }
    Ok(serde_json::from_slice(body)?)
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.repo.list().await?;
    tracing::debug!(count = todos.len(), "Listed todos");
    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let input: CreateTodoRequest = parse_json(&body)?;

    let title = input
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title is required".to_string()))?;

    let todo = state.repo.create(title).await?;
    tracing::info!(todo_id = %todo.id, "Todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::from_string(id);
    state
        .repo
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(ApiError::todo_not_found)
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Todo>, ApiError> {
    let id = TodoId::from_string(id);
    let input: UpdateTodoRequest = parse_json(&body)?;
    let patch = TodoPatch::from(input).normalized()?;

    let todo = state
        .repo
        .update(&id, patch)
        .await?
        .ok_or_else(ApiError::todo_not_found)?;

    tracing::info!(todo_id = %todo.id, "Todo updated");
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let id = TodoId::from_string(id);
    if !state.repo.delete(&id).await? {
        return Err(ApiError::todo_not_found());
    }

    tracing::info!(todo_id = %id, "Todo deleted");
    Ok(Json(DeleteTodoResponse { success: true }))
}

/// プリフライト。CORS ヘッダはミドルウェアが付与する
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
