use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tracing::warn;

use crate::db::{get_session, get_user, DbPool};
use crate::error::AppError;
use crate::models::Identity;
use crate::AppState;

/// The authenticated principal behind the request, resolved from the
/// `session` cookie before any task operation runs. Absent or expired
/// sessions reject with 401.
pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_session(parts, &state.db)? {
            Some(identity) => Ok(CurrentUser(identity)),
            None => {
                warn!("Unauthenticated API access attempt");
                Err(AppError::Unauthorized)
            }
        }
    }
}

fn resolve_session(parts: &Parts, db: &DbPool) -> Result<Option<Identity>, AppError> {
    let cookies = parts
        .headers
        .get_all("cookie")
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|s| s.split(';'))
        .filter_map(|s| {
            let mut parts = s.trim().splitn(2, '=');
            Some((parts.next()?, parts.next()?))
        });

    for (name, value) in cookies {
        if name != "session" {
            continue;
        }
        let Some(session) = get_session(db, value)? else {
            continue;
        };
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        if session.expires_at <= now {
            continue;
        }
        if let Some(user) = get_user(db, session.user_id)? {
            return Ok(Some(Identity::from(user)));
        }
    }
    Ok(None)
}
