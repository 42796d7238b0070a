use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use chat_common::error::CommonError;
use chat_common::openai::OpenAiClientError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),
}

/// Failures of a single chat request. `Display` is the message returned to the client.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Missing message or query in request body")]
    MissingInput,

    #[error("GROQ_API_KEY is not set in server .env. Get a free key at https://console.groq.com")]
    MissingCredential,

    #[error("AI service failed. Try again.")]
    Upstream(#[source] OpenAiClientError),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::MissingInput => StatusCode::BAD_REQUEST,
            ChatError::MissingCredential | ChatError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match &self {
            ChatError::Upstream(e) => error!(error = %e, "chat completion failed"),
            ChatError::MissingCredential => warn!("chat request rejected: provider key not set"),
            ChatError::MissingInput => warn!(reason = %self, "chat request rejected"),
        }
        (
            self.status(),
            Json(ErrorReply {
                success: false,
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}
