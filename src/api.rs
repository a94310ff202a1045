//! HTTP API for the advisory chatbot

mod handlers;
mod sessions;
mod types;

pub use handlers::create_router;
pub use sessions::{SessionHandle, SessionRegistry};
pub use types::*;

use crate::knowledge::Catalog;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new(catalog.clone(), max_sessions)),
            catalog,
        }
    }
}
