//! In-memory registry of live conversations
//!
//! Each conversation gets its own `Chatbot` behind its own lock, so two
//! requests on the same session run one after the other while different
//! sessions never contend. The catalog is shared by every `Chatbot`.

use crate::dialogue::Chatbot;
use crate::knowledge::Catalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

pub type SessionHandle = Arc<Mutex<Chatbot>>;

struct SessionEntry {
    bot: SessionHandle,
    last_active: Instant,
}

pub struct SessionRegistry {
    catalog: Arc<Catalog>,
    capacity: usize,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, capacity: usize) -> Self {
        Self {
            catalog,
            capacity: capacity.max(1),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Existing session for `id`, or a new session under a fresh id when
    /// `id` is absent or unknown
    pub async fn checkout(&self, id: Option<&str>) -> (String, SessionHandle) {
        let mut sessions = self.sessions.write().await;

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(id) {
                entry.last_active = Instant::now();
                return (id.to_string(), entry.bot.clone());
            }
        }

        if sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_active)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                sessions.remove(&oldest);
                tracing::info!(session_id = %oldest, "Evicted least recently used session");
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let bot = Arc::new(Mutex::new(Chatbot::new(self.catalog.clone())));
        sessions.insert(
            id.clone(),
            SessionEntry {
                bot: bot.clone(),
                last_active: Instant::now(),
            },
        );
        tracing::info!(session_id = %id, "Session created");

        (id, bot)
    }

    /// Existing session only
    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(id).map(|entry| {
            entry.last_active = Instant::now();
            entry.bot.clone()
        })
    }

    #[cfg(test)]
    async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
