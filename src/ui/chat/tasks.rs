use crate::{
    api::clients::HttpChatClient,
    models::{ChatRequest, ChatResponse},
};

/// Runs one chat exchange, flattening the error to the text shown in the thread.
pub async fn send_message(
    client: HttpChatClient,
    request: ChatRequest,
) -> Result<ChatResponse, String> {
    client
        .send_message(request.message, request.conversation_id)
        .await
        .map_err(|err| err.to_string())
}
