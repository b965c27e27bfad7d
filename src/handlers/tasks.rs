use axum::extract::{Path, Query, State};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use time::OffsetDateTime;
use tracing::info;

use crate::error::AppError;
use crate::filter::Filter;
use crate::middleware::CurrentUser;
use crate::models::{CreateTask, Task, UpdateTask, UpdateTaskStatus};
use crate::service;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    pub filter: Option<String>,
}

pub async fn list_all_tasks(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    let filter = Filter::from_param(query.filter.as_deref().unwrap_or(""))
        .ok_or(AppError::BadRequest("Unrecognized filter"))?;

    let tasks = service::list(&state.db, user.id, filter, OffsetDateTime::now_utc())?;
    info!(count = tasks.len(), ?filter, "Listed tasks");
    Ok(Json(tasks))
}

pub async fn get_single_task(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, AppError> {
    let task = service::get(&state.db, user.id, id)?;
    Ok(Json(task))
}

pub async fn create_new_task(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let task = service::create(&state.db, user.id, &req)?;
    info!(id = task.id, description = %task.description, "Created task");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_existing_task(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTask>,
) -> Result<Json<Task>, AppError> {
    let task = service::update(&state.db, user.id, id, &req)?;
    info!(id = task.id, "Updated task");
    Ok(Json(task))
}

pub async fn patch_task_status(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskStatus>,
) -> Result<Json<Task>, AppError> {
    let task = service::patch_status(&state.db, user.id, id, &req)?;
    info!(id = task.id, completed = task.completed, "Patched task status");
    Ok(Json(task))
}

pub async fn delete_existing_task(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    service::delete(&state.db, user.id, id)?;
    info!(id, "Deleted task");
    Ok(Json(json!({ "success": true })))
}
