pub mod auth;
pub mod db;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod service;
pub mod validate;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use db::DbPool;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/users/login", post(handlers::auth::login))
        .route("/users/logout", delete(handlers::auth::logout))
        .route("/tasks", get(handlers::tasks::list_all_tasks))
        .route("/tasks", post(handlers::tasks::create_new_task))
        .route("/tasks/{id}", get(handlers::tasks::get_single_task))
        .route("/tasks/{id}", put(handlers::tasks::update_existing_task))
        .route("/tasks/{id}", patch(handlers::tasks::patch_task_status))
        .route("/tasks/{id}", delete(handlers::tasks::delete_existing_task))
        .layer(
            tower::ServiceBuilder::new()
                .layer(tower_http::trace::TraceLayer::new_for_http())
                .layer(tower_http::compression::CompressionLayer::new()),
        )
        .with_state(state)
}
