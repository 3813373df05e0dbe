use strum_macros::Display;

use crate::models::{ChatResponse, ToolCall};

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            tool_calls: vec![],
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            tool_calls: vec![],
        }
    }

    pub fn error(message: &str) -> Self {
        let message = if message.is_empty() {
            "Unknown error occurred."
        } else {
            message
        };
        Self::ai(format!("Error: {}", message))
    }
}

impl From<ChatResponse> for ChatMessage {
    fn from(response: ChatResponse) -> Self {
        Self {
            sender: Sender::Ai,
            text: response.response,
            tool_calls: response.tool_calls.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ChatAction {
    InputChanged(String),
    SendMessage,
    ResponseReceived(u64, Result<ChatResponse, String>),
    Close,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Display)]
pub enum Sender {
    #[strum(serialize = "user")]
    User,
    #[strum(serialize = "ai")]
    Ai,
}
