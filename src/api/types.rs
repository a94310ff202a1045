//! API request and response types

use crate::dialogue::{ChatReply, ConversationContext, ConversationTurn, Intent};
use crate::knowledge::{Language, TreatmentCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub version: &'static str,
}

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Omitted on the first message of a conversation
    #[serde(default)]
    pub session_id: Option<String>,
    /// Context from the caller, e.g. the image classifier's last detection
    #[serde(default)]
    pub context: Option<ConversationContext>,
}

/// Response for a chat message
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    #[serde(flatten)]
    pub reply: ChatReply,
}

/// Response with a conversation's memory
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub language: Language,
    pub turns: Vec<ConversationTurn>,
    pub context: ConversationContext,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub intent: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub intent: Intent,
    pub language: Language,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommonDiseasesQuery {
    pub crop_type: Option<String>,
    pub language: Option<String>,
}

/// Treatment entry as shown to API clients
#[derive(Debug, Serialize)]
pub struct TreatmentView {
    pub treatment_id: String,
    pub category: TreatmentCategory,
    pub name: String,
    pub description: String,
    pub application_method: String,
    pub organic: bool,
    pub cost_estimate: String,
}

#[derive(Debug, Serialize)]
pub struct TreatmentsResponse {
    pub disease_id: String,
    pub disease_name: String,
    pub treatments: Vec<TreatmentView>,
}

#[derive(Debug, Serialize)]
pub struct DiseaseSummary {
    pub id: String,
    pub name: String,
    pub symptoms: Vec<String>,
    pub crops_affected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CommonDiseasesResponse {
    pub diseases: Vec<DiseaseSummary>,
    pub total: usize,
}

/// Seasonal tips and planting/harvest calendar
#[derive(Debug, Serialize)]
pub struct SeasonalAdviceResponse {
    pub language: Language,
    pub title: String,
    pub tips: Vec<String>,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
