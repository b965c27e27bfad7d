use time::{Date, PrimitiveDateTime};
use time::macros::format_description;

use crate::error::{AppError, FieldError};
use crate::models::{CreateTask, UpdateTask, UpdateTaskStatus};

/// Normalized, fully-typed editable fields of a task, produced by a
/// successful validation and safe to hand to the store.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub description: String,
    pub important: bool,
    pub private: bool,
    pub deadline: Option<PrimitiveDateTime>,
}

pub fn validate_create(req: &CreateTask) -> Result<TaskDraft, AppError> {
    validate_draft(
        req.description.as_deref(),
        req.important,
        req.private,
        req.deadline.as_deref(),
    )
}

/// `update` carries the task id in both the path and the body; a mismatch is
/// a validation failure and never reaches the store.
pub fn validate_update(path_id: i64, req: &UpdateTask) -> Result<TaskDraft, AppError> {
    let mut errors = Vec::new();
    match req.id {
        Some(id) if id == path_id => {}
        Some(_) => errors.push(FieldError::new(
            "id",
            "request path id and request body id do not match",
        )),
        None => errors.push(FieldError::new("id", "id is required")),
    }

    match validate_draft(
        req.description.as_deref(),
        req.important,
        req.private,
        req.deadline.as_deref(),
    ) {
        Ok(draft) if errors.is_empty() => Ok(draft),
        Ok(_) => Err(AppError::Validation(errors)),
        Err(AppError::Validation(mut field_errors)) => {
            errors.append(&mut field_errors);
            Err(AppError::Validation(errors))
        }
        Err(other) => Err(other),
    }
}

pub fn validate_patch_status(req: &UpdateTaskStatus) -> Result<bool, AppError> {
    req.completed.ok_or_else(|| {
        AppError::Validation(vec![FieldError::new(
            "completed",
            "completed must be a boolean",
        )])
    })
}

fn validate_draft(
    description: Option<&str>,
    important: Option<bool>,
    private: Option<bool>,
    deadline: Option<&str>,
) -> Result<TaskDraft, AppError> {
    let mut errors = Vec::new();

    let description = description.map(str::trim).unwrap_or_default();
    if description.is_empty() {
        errors.push(FieldError::new(
            "description",
            "description must be a non-empty string",
        ));
    }

    if important.is_none() {
        errors.push(FieldError::new("important", "important must be a boolean"));
    }
    if private.is_none() {
        errors.push(FieldError::new("private", "private must be a boolean"));
    }

    // Absent or empty means "no deadline"; anything else has to parse.
    let deadline = match deadline {
        None | Some("") => None,
        Some(raw) => match parse_deadline(raw) {
            Some(parsed) => Some(parsed),
            None => {
                errors.push(FieldError::new(
                    "deadline",
                    format!("{raw:?} is not a valid date/time"),
                ));
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    Ok(TaskDraft {
        description: description.to_string(),
        important: important.unwrap_or_default(),
        private: private.unwrap_or_default(),
        deadline,
    })
}

/// Accepted deadline shapes, most specific first. A bare date lands on
/// midnight.
pub fn parse_deadline(raw: &str) -> Option<PrimitiveDateTime> {
    let space_minutes = format_description!("[year]-[month]-[day] [hour]:[minute]");
    let space_seconds = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let t_minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let t_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let date_only = format_description!("[year]-[month]-[day]");

    PrimitiveDateTime::parse(raw, space_seconds)
        .or_else(|_| PrimitiveDateTime::parse(raw, space_minutes))
        .or_else(|_| PrimitiveDateTime::parse(raw, t_seconds))
        .or_else(|_| PrimitiveDateTime::parse(raw, t_minutes))
        .or_else(|_| Date::parse(raw, date_only).map(|d| d.midnight()))
        .ok()
}
