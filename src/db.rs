use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Result, Row};

use crate::error::AppError;
use crate::models::{self, Session, Task, User};
use crate::validate::TaskDraft;

pub type DbPool = Arc<Mutex<Connection>>;

pub fn init_db(path: &str) -> Result<DbPool> {
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Creates the tables on a fresh connection; tests run this against an
/// in-memory database.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL,
            hash TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES users(id),
            created_at INTEGER DEFAULT (strftime('%s', 'now')),
            expires_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY,
            owner INTEGER NOT NULL REFERENCES users(id),
            description TEXT NOT NULL,
            deadline TEXT,
            important INTEGER NOT NULL DEFAULT 0,
            private INTEGER NOT NULL DEFAULT 0,
            completed INTEGER NOT NULL DEFAULT 0
        );
        ",
    )
}

// User operations
pub fn create_user(pool: &DbPool, email: &str, name: &str, hash: &str) -> Result<User, AppError> {
    let conn = pool.lock().unwrap();
    conn.execute(
        "INSERT INTO users (email, name, hash) VALUES (?1, ?2, ?3)",
        (email, name, hash),
    )?;
    let id = conn.last_insert_rowid();

    let mut stmt = conn.prepare("SELECT id, email, name, hash FROM users WHERE id = ?1")?;
    let user = stmt.query_row([id], row_to_user)?;
    Ok(user)
}

pub fn get_user_by_email(pool: &DbPool, email: &str) -> Result<Option<User>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare("SELECT id, email, name, hash FROM users WHERE email = ?1")?;
    let mut rows = stmt.query([email])?;

    match rows.next()? {
        Some(row) => Ok(Some(row_to_user(row)?)),
        None => Ok(None),
    }
}

pub fn get_user(pool: &DbPool, id: i64) -> Result<Option<User>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare("SELECT id, email, name, hash FROM users WHERE id = ?1")?;
    let mut rows = stmt.query([id])?;

    match rows.next()? {
        Some(row) => Ok(Some(row_to_user(row)?)),
        None => Ok(None),
    }
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        hash: row.get(3)?,
    })
}

// Session operations
pub fn create_session(pool: &DbPool, session: &Session) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    conn.execute(
        "INSERT INTO sessions (id, user_id, expires_at) VALUES (?1, ?2, ?3)",
        (&session.id, session.user_id, session.expires_at),
    )?;
    Ok(())
}

pub fn get_session(pool: &DbPool, id: &str) -> Result<Option<Session>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt =
        conn.prepare("SELECT id, user_id, created_at, expires_at FROM sessions WHERE id = ?1")?;
    let mut rows = stmt.query([id])?;

    if let Some(row) = rows.next()? {
        Ok(Some(Session {
            id: row.get(0)?,
            user_id: row.get(1)?,
            created_at: row.get(2)?,
            expires_at: row.get(3)?,
        }))
    } else {
        Ok(None)
    }
}

pub fn delete_session(pool: &DbPool, id: &str) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    conn.execute("DELETE FROM sessions WHERE id = ?1", [id])?;
    Ok(())
}

pub fn cleanup_expired_sessions(pool: &DbPool) -> Result<(), AppError> {
    let conn = pool.lock().unwrap();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;
    conn.execute("DELETE FROM sessions WHERE expires_at < ?1", [now])?;
    Ok(())
}

// Task operations. Every statement is scoped by owner; a row owned by
// another user behaves exactly like a missing row.

const TASK_COLUMNS: &str = "id, owner, description, deadline, important, private, completed";

pub fn create_task(pool: &DbPool, owner: i64, draft: &TaskDraft) -> Result<Task, AppError> {
    let conn = pool.lock().unwrap();
    conn.execute(
        "INSERT INTO tasks (owner, description, deadline, important, private, completed)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        (
            owner,
            &draft.description,
            draft.deadline.map(models::format_deadline),
            draft.important as i32,
            draft.private as i32,
        ),
    )?;
    let id = conn.last_insert_rowid();

    let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
    let task = stmt.query_row([id], row_to_task)?;
    Ok(task)
}

pub fn list_tasks(pool: &DbPool, owner: i64) -> Result<Vec<Task>, AppError> {
    let conn = pool.lock().unwrap();
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE owner = ?1 ORDER BY id ASC"
    ))?;
    let tasks = stmt
        .query_map([owner], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn get_task(pool: &DbPool, owner: i64, id: i64) -> Result<Option<Task>, AppError> {
    let conn = pool.lock().unwrap();
    get_task_internal(&conn, owner, id)
}

pub fn update_task(
    pool: &DbPool,
    owner: i64,
    id: i64,
    draft: &TaskDraft,
) -> Result<Option<Task>, AppError> {
    let conn = pool.lock().unwrap();
    let rows = conn.execute(
        "UPDATE tasks SET description = ?1, deadline = ?2, important = ?3, private = ?4
         WHERE id = ?5 AND owner = ?6",
        (
            &draft.description,
            draft.deadline.map(models::format_deadline),
            draft.important as i32,
            draft.private as i32,
            id,
            owner,
        ),
    )?;

    if rows == 0 {
        return Ok(None);
    }
    get_task_internal(&conn, owner, id)
}

pub fn set_task_completed(
    pool: &DbPool,
    owner: i64,
    id: i64,
    completed: bool,
) -> Result<Option<Task>, AppError> {
    let conn = pool.lock().unwrap();
    let rows = conn.execute(
        "UPDATE tasks SET completed = ?1 WHERE id = ?2 AND owner = ?3",
        (completed as i32, id, owner),
    )?;

    if rows == 0 {
        return Ok(None);
    }
    get_task_internal(&conn, owner, id)
}

pub fn delete_task(pool: &DbPool, owner: i64, id: i64) -> Result<bool, AppError> {
    let conn = pool.lock().unwrap();
    let rows = conn.execute(
        "DELETE FROM tasks WHERE id = ?1 AND owner = ?2",
        (id, owner),
    )?;
    Ok(rows > 0)
}

fn get_task_internal(conn: &Connection, owner: i64, id: i64) -> Result<Option<Task>, AppError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1 AND owner = ?2"
    ))?;
    let mut rows = stmt.query((id, owner))?;

    match rows.next()? {
        Some(row) => Ok(Some(row_to_task(row)?)),
        None => Ok(None),
    }
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let deadline = row
        .get::<_, Option<String>>(3)?
        .map(|raw| {
            models::parse_stored_deadline(&raw).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    3,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()?;

    Ok(Task {
        id: row.get(0)?,
        owner: row.get(1)?,
        description: row.get(2)?,
        deadline,
        important: row.get::<_, i32>(4)? != 0,
        private: row.get::<_, i32>(5)? != 0,
        completed: row.get::<_, i32>(6)? != 0,
    })
}
