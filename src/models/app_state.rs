use std::sync::{Arc, Mutex};

use crate::backend::BackendError;
use crate::interfaces::SubmitGate;
use crate::models::RuleStore;
use crate::settings::Settings;
use crate::utils::HttpBackend;

/// Application state structure for the web server
#[derive(Debug)]
pub struct AppState<B = HttpBackend> {
    /// Settings the server was started with
    pub config: Arc<Settings>,

    /// The edited rule set. Never held across an await.
    store: Mutex<RuleStore>,

    pub encode_gate: SubmitGate,
    pub decode_gate: SubmitGate,

    /// Encoder/decoder service
    pub backend: B,
}

impl AppState<HttpBackend> {
    /// Create a state talking to the backend named in the settings
    pub fn from_settings(config: Arc<Settings>) -> Result<Self, BackendError> {
        let backend = HttpBackend::from_settings(&config)?;
        Ok(Self::new(config, backend))
    }
}

impl<B> AppState<B> {
    pub fn new(config: Arc<Settings>, backend: B) -> Self {
        let store = RuleStore::with_limits(config.limits());
        Self {
            encode_gate: SubmitGate::new(config.submit_cooldown_ms),
            decode_gate: SubmitGate::new(config.submit_cooldown_ms),
            store: Mutex::new(store),
            config,
            backend,
        }
    }

    /// Run `f` with exclusive access to the store
    pub fn with_store<R>(&self, f: impl FnOnce(&mut RuleStore) -> R) -> R {
        let mut store = match self.store.lock() {
            Ok(store) => store,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut store)
    }
}
