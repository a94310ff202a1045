//! Per-conversation state: language, turn log, carried context

use crate::knowledge::Language;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Agent,
}

/// One message in the conversation log. Never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    fn now(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// What the previous answer was about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Disease,
    Treatment,
    Prevention,
    Crop,
}

/// State carried from one turn to the next.
///
/// Only these keys are recognized; anything else a caller sends is dropped
/// during deserialization, as is a `topic` outside the known set.
/// `disease` may also come from the image classifier, which names the field
/// `disease_key`; when both are sent, `disease` wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireContext")]
pub struct ConversationContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,
    /// Classifier confidence, as a fraction in `[0, 1]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Caller-supplied context as it arrives on the wire
#[derive(Deserialize)]
struct WireContext {
    #[serde(default, deserialize_with = "lenient_topic")]
    topic: Option<Topic>,
    #[serde(default)]
    disease: Option<String>,
    #[serde(default)]
    disease_key: Option<String>,
    #[serde(default)]
    confidence: Option<f32>,
}

impl From<WireContext> for ConversationContext {
    fn from(wire: WireContext) -> Self {
        Self {
            topic: wire.topic,
            disease: wire.disease.or(wire.disease_key),
            confidence: wire.confidence,
        }
    }
}

fn lenient_topic<'de, D>(deserializer: D) -> Result<Option<Topic>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

impl ConversationContext {
    #[must_use]
    pub fn with_topic(topic: Topic) -> Self {
        Self {
            topic: Some(topic),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.disease.is_none() && self.confidence.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    language: Language,
    turns: Vec<ConversationTurn>,
    context: ConversationContext,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Append the user message and the agent answer, in that order
    pub(crate) fn record_exchange(&mut self, user: &str, agent: &str) {
        self.turns.push(ConversationTurn::now(Role::User, user));
        self.turns.push(ConversationTurn::now(Role::Agent, agent));
    }

    pub(crate) fn replace_context(&mut self, context: ConversationContext) {
        self.context = context;
    }

    /// Forget everything: empty log, empty context, French
    pub fn reset(&mut self) {
        self.turns.clear();
        self.context = ConversationContext::default();
        self.language = Language::French;
    }
}
