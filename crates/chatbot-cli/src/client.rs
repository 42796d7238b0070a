use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

const FALLBACK_ERROR: &str = "Something went wrong. Try again.";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with `success: false`; holds its message.
    #[error("{0}")]
    Rejected(String),
}

impl ClientError {
    /// Text shown to the user in place of a reply.
    pub fn user_message(&self) -> &str {
        match self {
            ClientError::Rejected(message) => message,
            ClientError::Request(_) => FALLBACK_ERROR,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    success: bool,
    reply: Option<String>,
    message: Option<String>,
}

/// Thin HTTP client for the chatbot endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    url: String,
}

impl ChatClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent("studynotion-chatbot-cli")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one question and return the raw reply text.
    pub async fn ask(&self, message: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .post(&self.url)
            .json(&json!({ "message": message }))
            .send()
            .await?;

        let status = resp.status();
        let body = match resp.json::<ChatResponse>().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => return Err(ClientError::Rejected(FALLBACK_ERROR.to_string())),
        };

        match (body.success, body.reply) {
            (true, Some(reply)) => Ok(reply),
            _ => Err(ClientError::Rejected(
                body.message.unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn_server(status: StatusCode, body: Value) -> String {
        let app = Router::new().route(
            "/chatbot",
            post(move |Json(_req): Json<Value>| {
                let body = body.clone();
                async move { (status, Json(body)) }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/chatbot")
    }

    #[tokio::test]
    async fn test_ask_returns_reply() {
        let url = spawn_server(
            StatusCode::OK,
            json!({"success": true, "reply": "**Hi** there"}),
        )
        .await;
        let client = ChatClient::new(url, Duration::from_secs(5)).unwrap();
        assert_eq!(client.ask("hello").await.unwrap(), "**Hi** there");
    }

    #[tokio::test]
    async fn test_ask_surfaces_server_message() {
        let url = spawn_server(
            StatusCode::BAD_REQUEST,
            json!({"success": false, "message": "Missing message or query in request body"}),
        )
        .await;
        let client = ChatClient::new(url, Duration::from_secs(5)).unwrap();
        let err = client.ask("").await.unwrap_err();
        assert_eq!(
            err.user_message(),
            "Missing message or query in request body"
        );
    }

    #[tokio::test]
    async fn test_ask_falls_back_on_unreadable_error() {
        let url = spawn_server(StatusCode::BAD_GATEWAY, json!("upstream down")).await;
        let client = ChatClient::new(url, Duration::from_secs(5)).unwrap();
        let err = client.ask("hello").await.unwrap_err();
        assert_eq!(err.user_message(), "Something went wrong. Try again.");
    }
}
