//! The five-plus-one task operations: validate, scope by owner, hit the
//! store, hand back the row. Ownership mismatches and missing rows are
//! deliberately the same `NotFound` so ids never leak across users.

use time::OffsetDateTime;

use crate::db::{self, DbPool};
use crate::error::AppError;
use crate::filter::Filter;
use crate::models::{CreateTask, Task, UpdateTask, UpdateTaskStatus};
use crate::validate;

/// Owner-scoped list with the filter predicate applied in-memory, stable
/// id order. `now` is the reference instant for the day-window filters.
pub fn list(
    pool: &DbPool,
    owner: i64,
    filter: Filter,
    now: OffsetDateTime,
) -> Result<Vec<Task>, AppError> {
    let tasks = db::list_tasks(pool, owner)?;
    Ok(tasks
        .into_iter()
        .filter(|task| filter.matches(task, now))
        .collect())
}

pub fn get(pool: &DbPool, owner: i64, id: i64) -> Result<Task, AppError> {
    db::get_task(pool, owner, id)?.ok_or(AppError::NotFound)
}

/// Validated create; `completed` is forced false and the owner comes from
/// the session, never from the payload.
pub fn create(pool: &DbPool, owner: i64, req: &CreateTask) -> Result<Task, AppError> {
    let draft = validate::validate_create(req)?;
    db::create_task(pool, owner, &draft)
}

/// Full replace of the editable fields; id, owner and completed stay as
/// they are.
pub fn update(pool: &DbPool, owner: i64, id: i64, req: &UpdateTask) -> Result<Task, AppError> {
    let draft = validate::validate_update(id, req)?;
    db::update_task(pool, owner, id, &draft)?.ok_or(AppError::NotFound)
}

pub fn patch_status(
    pool: &DbPool,
    owner: i64,
    id: i64,
    req: &UpdateTaskStatus,
) -> Result<Task, AppError> {
    let completed = validate::validate_patch_status(req)?;
    db::set_task_completed(pool, owner, id, completed)?.ok_or(AppError::NotFound)
}

pub fn delete(pool: &DbPool, owner: i64, id: i64) -> Result<(), AppError> {
    if db::delete_task(pool, owner, id)? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}
