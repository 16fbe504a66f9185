// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, generator::QuizGenerator, store::Store, utils::identity::IdentityProvider};

/// Collaborators built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: Arc<dyn IdentityProvider>,
    pub generator: Option<Arc<dyn QuizGenerator>>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<dyn Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
