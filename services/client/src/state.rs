//! services/client/src/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use crate::session::store::SessionStore;
use elevate_core::ports::{EvaluationService, StudyApi};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across the Whole Process)
//=========================================================================================

/// The shared application state, created once at startup and passed to
/// whatever drives the user interface.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionStore>,
    pub api: Arc<dyn StudyApi>,
    pub evaluator: Arc<dyn EvaluationService>,
}
