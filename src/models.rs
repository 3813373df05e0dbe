use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// Accepts RFC 3339 timestamps as well as the naive UTC ones the backend
// emits for `created_date`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let value = String::deserialize(deserializer)?;

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| D::Error::custom(format!("invalid timestamp {value:?}: {e}")))
}

pub type ConversationId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub conversation_id: ConversationId,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

/// A tool invocation the assistant performed on the user's behalf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

impl ToolCall {
    pub fn summary(&self) -> String {
        format!(
            "{}({})",
            self.tool_name,
            serde_json::Value::Object(self.args.clone())
        )
    }
}

// Tasks are owned by the backend; this is only the display copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub completed: bool,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_conversation_id() {
        let request = ChatRequest {
            message: "Add buy milk".to_string(),
            conversation_id: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"message":"Add buy milk"}"#);
    }

    #[test]
    fn test_request_includes_conversation_id() {
        let request = ChatRequest {
            message: "And eggs".to_string(),
            conversation_id: Some(1),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"message":"And eggs","conversation_id":1}"#);
    }

    #[test]
    fn test_response_with_tool_calls() {
        let json = r#"{"conversation_id":3,"response":"Added.","tool_calls":[{"tool_name":"add_task","args":{"title":"buy milk"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.conversation_id, 3);
        assert_eq!(response.response, "Added.");
        let tool_calls = response.tool_calls.unwrap();
        assert_eq!(tool_calls.len(), 1);
        assert_eq!(tool_calls[0].tool_name, "add_task");
        assert_eq!(tool_calls[0].args["title"], "buy milk");
        assert_eq!(tool_calls[0].summary(), r#"add_task({"title":"buy milk"})"#);
    }

    #[test]
    fn test_response_without_tool_calls() {
        let json = r#"{"conversation_id":1,"response":"Hi"}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.tool_calls.is_none());
    }

    #[test]
    fn test_task_item_parses_iso_timestamp() {
        let json = r#"{"id":"t1","title":"Buy milk","description":"2 litres","completed":false,"created_date":"2024-05-01T10:30:00Z"}"#;
        let task: TaskItem = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, "t1");
        assert!(!task.completed);
        assert_eq!(task.created_date.to_rfc3339(), "2024-05-01T10:30:00+00:00");
    }

    #[test]
    fn test_task_item_parses_naive_timestamp() {
        let json = r#"{"id":"t2","title":"Call mum","completed":true,"created_date":"2024-05-01T10:30:00.123456"}"#;
        let task: TaskItem = serde_json::from_str(json).unwrap();
        assert!(task.completed);
        assert_eq!(task.description, "");
        assert_eq!(task.created_date.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 10:30");
    }

    #[test]
    fn test_task_item_rejects_garbage_timestamp() {
        let json = r#"{"id":"t3","title":"x","completed":false,"created_date":"yesterday"}"#;
        assert!(serde_json::from_str::<TaskItem>(json).is_err());
    }
}
