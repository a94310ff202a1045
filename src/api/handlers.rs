//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, CommonDiseasesQuery, CommonDiseasesResponse, DiseaseSummary,
    ErrorResponse, HealthResponse, HistoryResponse, LanguageQuery, SeasonalAdviceResponse,
    SuccessResponse, SuggestionsQuery, SuggestionsResponse, TreatmentView, TreatmentsResponse,
};
use super::AppState;
use crate::dialogue::Intent;
use crate::knowledge::{Language, PhraseKey, TreatmentCategory, TreatmentRecord};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// Create the API router
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/version", get(get_version))
        .route("/health", get(health_check))
        // Conversation
        .route("/api/v1/chat", post(send_chat))
        .route("/api/v1/chat/:session_id/reset", post(reset_chat))
        .route("/api/v1/chat/:session_id/history", get(chat_history))
        .route("/api/v1/suggestions", get(get_suggestions))
        // Knowledge lookups
        .route("/api/v1/treatments/:disease_id", get(get_treatments))
        .route("/api/v1/diseases/common", get(common_diseases))
        .route("/api/v1/advice/seasonal", get(seasonal_advice))
        .with_state(state)
}

// ============================================================
// Service
// ============================================================

async fn service_info() -> impl IntoResponse {
    let languages: Vec<_> = Language::ALL
        .iter()
        .map(|l| json!({ "code": l.code(), "name": l.display_name() }))
        .collect();
    Json(json!({
        "service": "agrichat",
        "version": env!("CARGO_PKG_VERSION"),
        "languages": languages,
    }))
}

async fn get_version() -> impl IntoResponse {
    concat!("agrichat ", env!("CARGO_PKG_VERSION"))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================
// Conversation
// ============================================================

async fn send_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let (session_id, bot) = state.sessions.checkout(req.session_id.as_deref()).await;
    let reply = bot.lock().await.generate_response(&req.message, req.context);

    tracing::info!(
        session_id = %session_id,
        language = %reply.language,
        intent = %reply.intent,
        "Chat message answered"
    );

    Ok(Json(ChatResponse { session_id, reply }))
}

async fn reset_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let bot = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| unknown_session(&session_id))?;
    bot.lock().await.reset();

    Ok(Json(SuccessResponse { success: true }))
}

async fn chat_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let bot = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| unknown_session(&session_id))?;
    let bot = bot.lock().await;
    let session = bot.session();

    Ok(Json(HistoryResponse {
        session_id,
        language: session.language(),
        turns: session.turns().to_vec(),
        context: session.context().clone(),
    }))
}

async fn get_suggestions(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<SuggestionsResponse>, AppError> {
    let language = parse_language(query.language.as_deref())?;
    let intent = query
        .intent
        .as_deref()
        .map_or(Intent::General, Intent::from_name);
    let suggestions = state
        .catalog
        .phrasebook()
        .suggestions()
        .lookup(intent, language)
        .to_vec();

    Ok(Json(SuggestionsResponse {
        intent,
        language,
        suggestions,
    }))
}

// ============================================================
// Knowledge lookups
// ============================================================

async fn get_treatments(
    State(state): State<AppState>,
    Path(disease_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<TreatmentsResponse>, AppError> {
    let language = parse_language(query.language.as_deref())?;
    let knowledge = state.catalog.knowledge();
    let disease = knowledge
        .disease(&disease_id)
        .ok_or_else(|| AppError::NotFound(format!("Unknown disease: {disease_id}")))?;

    let organic = knowledge
        .treatments
        .organic_for(&disease.treatments, usize::MAX)
        .into_iter()
        .map(|t| treatment_view(t, TreatmentCategory::Organic, language));
    let chemical = knowledge
        .treatments
        .chemical
        .iter()
        .map(|t| treatment_view(t, TreatmentCategory::Chemical, language));

    Ok(Json(TreatmentsResponse {
        disease_name: disease.info.get(language).name.clone(),
        disease_id,
        treatments: organic.chain(chemical).collect(),
    }))
}

async fn common_diseases(
    State(state): State<AppState>,
    Query(query): Query<CommonDiseasesQuery>,
) -> Result<Json<CommonDiseasesResponse>, AppError> {
    let language = parse_language(query.language.as_deref())?;
    let knowledge = state.catalog.knowledge();

    let records: Vec<_> = match query.crop_type.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(crop) => knowledge.diseases_affecting(crop).collect(),
        None => knowledge.diseases.iter().collect(),
    };

    let diseases: Vec<_> = records
        .into_iter()
        .map(|d| {
            let info = d.info.get(language);
            DiseaseSummary {
                id: d.key.clone(),
                name: info.name.clone(),
                symptoms: info.symptoms.clone(),
                crops_affected: info.affected_crops.clone(),
            }
        })
        .collect();

    Ok(Json(CommonDiseasesResponse {
        total: diseases.len(),
        diseases,
    }))
}

async fn seasonal_advice(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<SeasonalAdviceResponse>, AppError> {
    let language = parse_language(query.language.as_deref())?;
    let title = state
        .catalog
        .phrasebook()
        .phrase(PhraseKey::SeasonalLabel, language)
        .to_string();
    let tips = state
        .catalog
        .knowledge()
        .seasonal_tips(language)
        .map(str::to_string)
        .collect();

    Ok(Json(SeasonalAdviceResponse {
        language,
        title,
        tips,
    }))
}

fn treatment_view(
    record: &TreatmentRecord,
    category: TreatmentCategory,
    language: Language,
) -> TreatmentView {
    let info = record.info.get(language);
    TreatmentView {
        treatment_id: record.key.clone(),
        category,
        name: info.name.clone(),
        description: info.description.clone(),
        application_method: info.application.clone(),
        organic: info.organic,
        cost_estimate: info.cost_estimate.clone(),
    }
}

/// Absent means French
fn parse_language(raw: Option<&str>) -> Result<Language, AppError> {
    match raw {
        None => Ok(Language::default()),
        Some(code) => code
            .parse::<Language>()
            .map_err(|e| AppError::BadRequest(e.to_string())),
    }
}

fn unknown_session(id: &str) -> AppError {
    AppError::NotFound(format!("Unknown session: {id}"))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        tracing::warn!(status = %status, error = %message, "Request rejected");

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::test_catalog;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(test_catalog(), 16))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_uri(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_chat_creates_session_and_keeps_history() {
        let app = app();

        let (status, first) = send(&app, post_json("/api/v1/chat", &json!({ "message": "Bonjour" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["intent"], "greeting");
        assert_eq!(first["language"], "fr");
        let session_id = first["session_id"].as_str().unwrap().to_string();
        assert!(uuid::Uuid::parse_str(&session_id).is_ok());

        let (status, second) = send(
            &app,
            post_json(
                "/api/v1/chat",
                &json!({ "message": "Merci pour votre aide", "session_id": session_id }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(second["session_id"], session_id.as_str());
        assert_eq!(second["intent"], "thanks");

        let (status, history) = send(&app, get_uri(&format!("/api/v1/chat/{session_id}/history"))).await;
        assert_eq!(status, StatusCode::OK);
        let turns = history["turns"].as_array().unwrap();
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[0]["text"], "Bonjour");
        assert_eq!(turns[3]["role"], "agent");
    }

    #[tokio::test]
    async fn test_chat_with_caller_context() {
        let app = app();
        let body = json!({
            "message": "Quel traitement?",
            "context": { "disease_key": "mildiou", "confidence": 0.87 }
        });

        let (status, reply) = send(&app, post_json("/api/v1/chat", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["intent"], "treatment_request");
        assert_eq!(reply["context"]["disease"], "mildiou");
        assert!(reply["response"].as_str().unwrap().contains("Bouillie bordelaise"));
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let (status, body) = send(&app(), post_json("/api/v1/chat", &json!({ "message": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let app = app();
        let (_, reply) = send(&app, post_json("/api/v1/chat", &json!({ "message": "Nanga def?" }))).await;
        let session_id = reply["session_id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, post_json(&format!("/api/v1/chat/{session_id}/reset"), &json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (_, history) = send(&app, get_uri(&format!("/api/v1/chat/{session_id}/history"))).await;
        assert_eq!(history["turns"], json!([]));
        assert_eq!(history["language"], "fr");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let app = app();
        let (status, _) = send(&app, post_json("/api/v1/chat/nope/reset", &json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get_uri("/api/v1/chat/nope/history")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_suggestions_endpoint() {
        let app = app();

        let (status, body) = send(&app, get_uri("/api/v1/suggestions?intent=greeting&language=wo")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"], "greeting");
        assert_eq!(body["language"], "wo");
        assert_eq!(body["suggestions"][0], "Xool feebar");

        // Unknown intent names fall back to the general list
        let (_, body) = send(&app, get_uri("/api/v1/suggestions?intent=banana")).await;
        assert_eq!(body["intent"], "general");
        assert!(!body["suggestions"].as_array().unwrap().is_empty());

        let (status, _) = send(&app, get_uri("/api/v1/suggestions?language=klingon")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_treatments_list_referenced_first() {
        let app = app();
        let (status, body) = send(&app, get_uri("/api/v1/treatments/mildiou")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["disease_name"], "Mildiou");

        let ids: Vec<_> = body["treatments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["treatment_id"].as_str().unwrap())
            .collect();
        assert_eq!(
            ids,
            vec!["copper", "neem", "soap", "ash", "systemic", "contact", "insecticide"]
        );
        assert_eq!(body["treatments"][0]["category"], "organic");
        assert_eq!(body["treatments"][4]["category"], "chemical");

        let (status, _) = send(&app, get_uri("/api/v1/treatments/scorbut")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_common_diseases_filtered_by_crop() {
        let app = app();

        let (_, all) = send(&app, get_uri("/api/v1/diseases/common")).await;
        assert_eq!(all["diseases"].as_array().unwrap().len(), 3);
        assert_eq!(all["total"], 3);

        let (status, body) = send(&app, get_uri("/api/v1/diseases/common?crop_type=tomate")).await;
        assert_eq!(status, StatusCode::OK);
        let diseases = body["diseases"].as_array().unwrap();
        assert_eq!(diseases.len(), 1);
        assert_eq!(diseases[0]["id"], "mildiou");
        assert_eq!(body["total"], 1);

        // Wolof crop name, answered in Wolof
        let (_, body) = send(&app, get_uri("/api/v1/diseases/common?crop_type=Mbay&language=wo")).await;
        assert_eq!(body["diseases"][0]["id"], "rouille");
        assert_eq!(body["diseases"][0]["crops_affected"][0], "Mbay");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(&app(), get_uri("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_seasonal_advice_endpoint() {
        let (status, body) = send(&app(), get_uri("/api/v1/advice/seasonal")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Conseils saisonniers");

        let tips: Vec<_> = body["tips"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap())
            .collect();
        assert_eq!(tips.len(), 4);
        assert!(tips[0].starts_with("Pendant la saison des pluies"));
        assert_eq!(tips[3], "Récolter tôt le matin quand il fait frais");
    }

    #[tokio::test]
    async fn test_weather_question_gets_open_ended_answer() {
        let body = json!({ "message": "Il va y avoir de la pluie" });
        let (status, reply) = send(&app(), post_json("/api/v1/chat", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["intent"], "weather_concern");
        assert_eq!(
            reply["response"],
            "Je suis là pour vous aider avec vos questions agricoles. Que souhaitez-vous savoir?"
        );
        assert_eq!(reply["context"], json!({}));
    }

    #[tokio::test]
    async fn test_chat_tolerates_unknown_context_values() {
        let body = json!({
            "message": "Quel traitement?",
            "context": { "topic": "irrigation", "disease": "rouille", "disease_key": "mildiou" }
        });
        let (status, reply) = send(&app(), post_json("/api/v1/chat", &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["context"]["disease"], "rouille");
        assert!(reply["response"].as_str().unwrap().contains("Cendre de bois"));
    }

    #[tokio::test]
    async fn test_version_and_root() {
        let app = app();
        let (status, body) = send(&app, get_uri("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["languages"].as_array().unwrap().len(), 3);

        let response = app.clone().oneshot(get_uri("/version")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
