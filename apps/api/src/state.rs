use std::sync::Arc;

use crate::config::Config;
use crate::screening::matcher::Screener;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// The matching engine. Immutable after startup; every call is pure,
    /// so one instance serves all requests concurrently without locking.
    pub screener: Arc<Screener>,
}
