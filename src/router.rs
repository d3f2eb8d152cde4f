use crate::handlers::{health, storage};
use crate::middleware::logging;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    let storage_routes = Router::new()
        .route("/list", get(storage::list_entries))
        // Uploads enforce their own size cap while streaming the form,
        // so the default body limit is lifted for this route only.
        .route(
            "/create",
            post(storage::create_entry).layer(axum::extract::DefaultBodyLimit::disable()),
        )
        .route("/move", post(storage::move_entry))
        .route("/copy", post(storage::copy_entry))
        .route("/delete", post(storage::delete_entry));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/storage", storage_routes)
        .layer(middleware::from_fn(logging::logging_middleware))
        .with_state(state)
}
