//! The task backend's chat API client.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::TokenStore,
    config::Config,
    models::{ChatRequest, ChatResponse, ConversationId},
};

const FALLBACK_ERROR: &str = "Chat failed";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct HttpChatClient {
    endpoint: String,
    token_store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for HttpChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpChatClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl HttpChatClient {
    pub fn new(config: &Config, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            endpoint: config.chat_endpoint(),
            token_store,
        }
    }

    /// Sends one message. The stored token, if any, is attached as a bearer
    /// credential; without one the request still goes out and the backend
    /// decides. Single attempt, no timeout.
    pub async fn send_message(
        &self,
        message: String,
        conversation_id: Option<ConversationId>,
    ) -> Result<ChatResponse, ChatError> {
        log::info!(
            "HttpChatClient: Sending message to {} (conversation {:?})",
            self.endpoint,
            conversation_id
        );
        let client = reqwest::Client::new();
        let mut request = client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&ChatRequest {
                message,
                conversation_id,
            });
        if let Some(token) = self.token_store.get() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body, status.canonical_reason());
            log::error!(
                "HttpChatClient: Request failed with status {}: {}",
                status,
                message
            );
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response.json().await?;
        log::info!(
            "HttpChatClient: Received reply for conversation {}",
            chat_response.conversation_id
        );
        Ok(chat_response)
    }
}

// `{"detail": ...}` when the body is JSON, the status text otherwise.
fn error_message(body: &str, status_text: Option<&str>) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) => match json.get("detail") {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => detail.clone(),
            Some(serde_json::Value::Null) | None => FALLBACK_ERROR.to_string(),
            Some(serde_json::Value::String(_)) => FALLBACK_ERROR.to_string(),
            Some(detail) => detail.to_string(),
        },
        Err(_) => status_text
            .filter(|text| !text.is_empty())
            .unwrap_or(FALLBACK_ERROR)
            .to_string(),
    }
}
