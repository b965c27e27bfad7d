use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::PrimitiveDateTime;

// Deadlines travel as "YYYY-MM-DD HH:MM", seconds truncated, both on the
// wire and in the tasks table.
time::serde::format_description!(
    deadline_format,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]"
);

pub(crate) fn format_deadline(deadline: PrimitiveDateTime) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]");
    deadline.format(format).expect("formatting deadline")
}

pub(crate) fn parse_stored_deadline(raw: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]");
    PrimitiveDateTime::parse(raw, format)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub owner: i64,
    pub description: String,
    #[serde(with = "deadline_format::option")]
    pub deadline: Option<PrimitiveDateTime>,
    pub important: bool,
    pub private: bool,
    pub completed: bool,
}

/// Stored user record. The argon2 hash stays server-side.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub hash: String,
}

/// Client-facing projection of a [`User`]; every task operation is scoped
/// by one of these.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Identity {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// Request DTOs are loosely shaped on purpose: every field optional at the
// serde level so the validator can report all problems in one pass.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTask {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "boolish")]
    pub important: Option<bool>,
    #[serde(default, deserialize_with = "boolish")]
    pub private: Option<bool>,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub id: Option<i64>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "boolish")]
    pub important: Option<bool>,
    #[serde(default, deserialize_with = "boolish")]
    pub private: Option<bool>,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskStatus {
    #[serde(default, deserialize_with = "boolish")]
    pub completed: Option<bool>,
}

/// Accepts `true`/`false`, `"true"`/`"false"`, `"1"`/`"0"` and `1`/`0`,
/// matching the coercion the HTTP clients historically relied on.
fn boolish<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => match s.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, got {other:?}"
            ))),
        },
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(serde::de::Error::custom("expected a boolean, got a number")),
        },
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a boolean, got {other}"
        ))),
    }
}
