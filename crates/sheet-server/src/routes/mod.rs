mod health;
mod sheets;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes();

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/sheets", post(sheets::create_sheet))
        .route("/api/v1/sheets/progress/:job", get(sheets::progress_stream))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
