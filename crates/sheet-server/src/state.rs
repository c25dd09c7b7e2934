use crate::config::Config;
use crate::jobs::Jobs;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Routes each in-flight request's progress channel to its SSE observers.
    pub jobs: Jobs,
}
