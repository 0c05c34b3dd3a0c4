use std::sync::Arc;

use crate::config::Config;
use crate::session::SimulationSession;

/// Shared host state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single live simulation session.
    pub session: Arc<SimulationSession>,
    pub config: Config,
}
