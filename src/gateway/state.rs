use std::sync::Arc;

use parking_lot::RwLock;

use crate::engine::Recommender;

/// Shared handler state. The recommender slot is filled once loading finishes.
#[derive(Clone, Default)]
pub struct AppState {
    recommender: Arc<RwLock<Option<Arc<Recommender>>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(recommender: Arc<Recommender>) -> Self {
        let state = Self::new();
        state.install(recommender);
        state
    }

    pub fn install(&self, recommender: Arc<Recommender>) {
        *self.recommender.write() = Some(recommender);
    }

    /// Clones the handle out so no lock is held across a request.
    pub fn recommender(&self) -> Option<Arc<Recommender>> {
        self.recommender.read().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.recommender().is_some_and(|r| r.is_ready())
    }
}
