use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde_json::json;
use tracing::info;

use crate::auth::{generate_session_id, verify_password};
use crate::db::{create_session, delete_session, get_user_by_email};
use crate::error::AppError;
use crate::models::{Identity, LoginRequest, Session};
use crate::AppState;

const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Unknown user and wrong password take the same exit so a caller cannot
/// probe which emails exist.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Identity>), AppError> {
    let user = get_user_by_email(&state.db, &req.username)?.ok_or(AppError::WrongCredentials)?;

    if !verify_password(&req.password, &user.hash) {
        return Err(AppError::WrongCredentials);
    }

    let session_id = generate_session_id();
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let session = Session {
        id: session_id.clone(),
        user_id: user.id,
        created_at: now,
        expires_at: now + SESSION_TTL_SECS,
    };

    create_session(&state.db, &session)?;
    info!(user = %user.email, "User logged in");

    let cookie = Cookie::build(("session", session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::days(7));

    Ok((jar.add(cookie), Json(Identity::from(user))))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, impl IntoResponse), AppError> {
    if let Some(session_cookie) = jar.get("session") {
        delete_session(&state.db, session_cookie.value())?;
    }
    info!("User logged out");

    let cookie = Cookie::build(("session", ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::seconds(0));

    Ok((jar.remove(cookie), Json(json!({ "message": "Logged out" }))))
}
