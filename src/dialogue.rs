//! Multilingual dialogue engine
//!
//! One turn: detect the language, classify the intent, answer from the
//! catalog, record the exchange in the session, suggest follow-ups.

mod intent;
mod language;
mod responder;
mod session;
pub mod suggestions;

#[cfg(test)]
mod proptests;

pub use intent::{Intent, IntentClassifier};
pub use language::{LanguageDetector, MarkerLists};
pub use responder::{handle_intent, Response};
pub use session::{ConversationContext, ConversationTurn, Role, Session, Topic};
pub use suggestions::{SuggestionTable, MAX_SUGGESTIONS};

use crate::knowledge::{Catalog, Language};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// On-disk shape of `rules.json`
#[derive(Debug, Deserialize)]
pub struct RulesFile {
    pub language_markers: MarkerLists,
    pub intents: HashMap<Intent, Vec<String>>,
}

/// Structured answer to one user message
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub language: Language,
    pub intent: Intent,
    pub suggestions: Vec<String>,
    pub context: ConversationContext,
    pub timestamp: DateTime<Utc>,
}

/// A conversation: the shared catalog plus this conversation's session.
///
/// Each conversation owns its own `Chatbot`; only the catalog is shared.
#[derive(Debug, Clone)]
pub struct Chatbot {
    catalog: Arc<Catalog>,
    session: Session,
}

impl Chatbot {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            session: Session::new(),
        }
    }

    #[must_use]
    pub fn detect_language(&self, text: &str) -> Language {
        self.catalog.languages().detect(text)
    }

    #[must_use]
    pub fn detect_intent(&self, text: &str) -> Intent {
        self.catalog.intents().detect(text)
    }

    #[must_use]
    pub fn suggestions(&self, intent: Intent, language: Language) -> Vec<String> {
        self.catalog
            .phrasebook()
            .suggestions()
            .lookup(intent, language)
            .to_vec()
    }

    /// Answer `message` and record the exchange.
    ///
    /// `context` is what the caller knows about the conversation (for
    /// instance a disease found by the image classifier). Without one, the
    /// context produced by the previous turn is used.
    pub fn generate_response(
        &mut self,
        message: &str,
        context: Option<ConversationContext>,
    ) -> ChatReply {
        let language = self.detect_language(message);
        self.session.set_language(language);

        let intent = self.detect_intent(message);
        let incoming = context.unwrap_or_else(|| self.session.context().clone());
        let response = handle_intent(&self.catalog, intent, message, language, &incoming);

        self.session.record_exchange(message, &response.text);
        let suggestions = self.suggestions(intent, self.session.language());
        self.session.replace_context(response.context.clone());

        tracing::debug!(
            language = %language,
            intent = %intent,
            turns = self.session.turns().len(),
            "Generated response"
        );

        ChatReply {
            response: response.text,
            language,
            intent,
            suggestions,
            context: response.context,
            timestamp: Utc::now(),
        }
    }

    /// Start over: empty memory, French
    pub fn reset(&mut self) {
        self.session.reset();
        tracing::debug!("Conversation reset");
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
}
