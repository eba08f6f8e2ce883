use std::sync::Arc;

use crate::analysis::engine::ResumeAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Analysis engine with the configured AI strategy, shared by all requests.
    pub analyzer: Arc<ResumeAnalyzer>,
}
