//! Shared application state.
//!
//! All external collaborators are constructed once and injected, so tests
//! can substitute doubles (notably a scripted model client).

use std::sync::Arc;

use pharmscope_core::PharmScopeConfig;
use pharmscope_llm::ModelClient;
use pharmscope_store::DocumentStore;
use pharmscope_trials::TrialsClient;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: PharmScopeConfig,
    pub store: DocumentStore,
    pub model: Arc<dyn ModelClient>,
    pub trials: TrialsClient,
}

impl AppState {
    pub fn new(
        config: PharmScopeConfig,
        store: DocumentStore,
        model: Arc<dyn ModelClient>,
        trials: TrialsClient,
    ) -> Self {
        Self {
            config,
            store,
            model,
            trials,
        }
    }
}
