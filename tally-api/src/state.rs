use std::sync::Arc;
use tally_core::{RulesProvider, SessionRepository};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionRepository>,
    pub rules: Arc<dyn RulesProvider>,
}
