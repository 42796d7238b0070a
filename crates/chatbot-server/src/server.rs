use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use chat_common::catalog::CatalogSource;
use chat_common::knowledge::{load_snapshot, system_prompt};
use chat_common::openai::{ChatCompletionRequest, LazyOpenAiClient, Message};

use crate::error::ChatError;

const NO_RESPONSE: &str = "No response from the model.";

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub completion: Arc<LazyOpenAiClient>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chatbot", post(chatbot))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Inbound chat body. The text is read from `message`, falling back to `query` when
/// `message` is absent. The text is forwarded to the model exactly as received.
#[derive(Debug, Default, Deserialize)]
struct ChatRequest {
    message: Option<String>,
    query: Option<String>,
}

impl ChatRequest {
    fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.query.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Serialize)]
struct ChatReply {
    success: bool,
    reply: String,
}

#[derive(Debug, Serialize)]
struct OkResponse {
    ok: bool,
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(OkResponse { ok: true }))
}

async fn chatbot(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>, ChatError> {
    // A malformed body is treated the same as one without a message.
    let request: ChatRequest = serde_json::from_slice(&body)
        .inspect_err(|e| debug!(error = %e, "chat body is not a JSON object"))
        .unwrap_or_default();
    let message = request.text().ok_or(ChatError::MissingInput)?;

    if !state.completion.has_api_key() {
        return Err(ChatError::MissingCredential);
    }
    let client = state.completion.get().await.map_err(ChatError::Upstream)?;

    let knowledge = load_snapshot(state.catalog.as_ref()).await;

    let config = state.completion.config();
    let completion_request = ChatCompletionRequest {
        model: config.model.clone(),
        messages: vec![
            Message::system(system_prompt(&knowledge)),
            Message::user(message),
        ],
        max_tokens: Some(config.max_tokens),
    };

    let response = client
        .chat_completions(&completion_request)
        .await
        .map_err(ChatError::Upstream)?;

    let reply = response
        .first_content()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_RESPONSE)
        .to_string();

    info!(
        model = %config.model,
        total_tokens = response.usage.as_ref().and_then(|u| u.total_tokens),
        reply_chars = reply.chars().count(),
        "chat reply sent"
    );

    Ok(Json(ChatReply {
        success: true,
        reply,
    }))
}
