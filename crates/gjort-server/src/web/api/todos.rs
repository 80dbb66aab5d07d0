use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::CurrentUser;
use crate::web::api::{created, default_limit, ok, parse_todo_id};
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use gjort_common::models::todo::Todo;
use gjort_common::validation::{validate_new_todo, validate_todo_update};
use gjort_db::{StatusFilter, TodoRepo, TodoRow};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ListTodosQuery {
    pub status: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Fetch the todo and enforce ownership: 404 when the row does not
/// exist, 403 when it exists but belongs to someone else -- always in
/// that order, so existence is checked before ownership.
async fn fetch_owned_todo(
    state: &AppState,
    user: &CurrentUser,
    todo_id: Uuid,
) -> Result<TodoRow, ApiError> {
    let todo = TodoRepo::get(&state.pool, todo_id)
        .await?
        .ok_or(ApiError::NotFound("Todo not found"))?;
    if todo.user_id != user.0.user_id {
        return Err(ApiError::Forbidden("You do not have access to this todo"));
    }
    Ok(todo)
}

/// GET /api/todos
#[tracing::instrument(skip(state, user))]
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(query): Query<ListTodosQuery>,
) -> Result<Response, ApiError> {
    let mut errors = Vec::new();
    let status = match query.status.as_deref() {
        None => StatusFilter::All,
        Some(s) => StatusFilter::parse(s).unwrap_or_else(|| {
            errors.push("status must be one of: all, completed, pending".to_string());
            StatusFilter::All
        }),
    };
    if !(1..=100).contains(&query.limit) {
        errors.push("limit must be between 1 and 100".to_string());
    }
    if query.offset < 0 {
        errors.push("offset must not be negative".to_string());
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let owner = user.0.user_id;
    let rows = TodoRepo::list_by_owner(&state.pool, owner, status, query.limit, query.offset)
        .await?;
    let total = TodoRepo::count_by_owner(&state.pool, owner, status).await?;

    let todos: Vec<Todo> = rows.iter().map(TodoRow::to_todo).collect();
    Ok(ok(
        "Todos fetched",
        json!({
            "todos": todos,
            "pagination": {
                "total": total,
                "limit": query.limit,
                "offset": query.offset,
                "hasMore": query.offset + query.limit < total,
            },
        }),
    ))
}

/// POST /api/todos
#[tracing::instrument(skip(state, user, req))]
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Json(req): Json<CreateTodoRequest>,
) -> Result<Response, ApiError> {
    let errors = validate_new_todo(&req.title, req.description.as_deref());
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let todo = TodoRepo::create(
        &state.pool,
        Uuid::new_v4(),
        user.0.user_id,
        &req.title,
        req.description.as_deref(),
    )
    .await?;

    Ok(created("Todo created", json!({"todo": todo.to_todo()})))
}

/// GET /api/todos/:id
#[tracing::instrument(skip(state, user))]
pub async fn get_todo(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let todo_id = parse_todo_id(&id)?;
    let todo = fetch_owned_todo(&state, &user, todo_id).await?;
    Ok(ok("Todo fetched", json!({"todo": todo.to_todo()})))
}

/// PUT /api/todos/:id
#[tracing::instrument(skip(state, user, req))]
pub async fn update_todo(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Response, ApiError> {
    let todo_id = parse_todo_id(&id)?;

    let errors = validate_todo_update(req.title.as_deref(), req.description.as_deref());
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    fetch_owned_todo(&state, &user, todo_id).await?;

    let updated = TodoRepo::update(
        &state.pool,
        todo_id,
        req.title.as_deref(),
        req.description.as_deref(),
        req.completed,
    )
    .await?
    // Deleted between the ownership check and the update
    .ok_or(ApiError::NotFound("Todo not found"))?;

    Ok(ok("Todo updated", json!({"todo": updated.to_todo()})))
}

/// DELETE /api/todos/:id
#[tracing::instrument(skip(state, user))]
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let todo_id = parse_todo_id(&id)?;
    fetch_owned_todo(&state, &user, todo_id).await?;

    let rows_affected = TodoRepo::delete(&state.pool, todo_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Todo not found"));
    }

    Ok(ok("Todo deleted", json!({})))
}
