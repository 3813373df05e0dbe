use iced::{
    task,
    widget::{button, column, container, row, scrollable, text, text_input, Column},
    Alignment, Element, Length, Task,
};

use crate::{
    api::clients::HttpChatClient,
    auth::Session,
    models::{ChatRequest, ChatResponse, ConversationId},
    ui::chat::{send_message, ChatAction, ChatMessage, Sender},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStatus {
    Unauthenticated,
    Idle,
    Sending,
}

#[derive(Debug)]
struct PendingRequest {
    id: u64,
    // Aborts the request when the panel is dropped.
    _handle: task::Handle,
}

/// One mounted chat panel. The thread lives as long as the panel does.
#[derive(Debug)]
pub struct State {
    session: Session,
    client: HttpChatClient,
    messages: Vec<ChatMessage>,
    input_value: String,
    conversation_id: Option<ConversationId>,
    pending: Option<PendingRequest>,
    last_request_id: u64,
}

impl State {
    pub fn new(session: Session, client: HttpChatClient) -> Self {
        Self {
            session,
            client,
            messages: vec![],
            input_value: String::new(),
            conversation_id: None,
            pending: None,
            last_request_id: 0,
        }
    }

    pub fn status(&self) -> PanelStatus {
        if !self.session.is_authenticated || self.session.user_id.is_none() {
            PanelStatus::Unauthenticated
        } else if self.pending.is_some() {
            PanelStatus::Sending
        } else {
            PanelStatus::Idle
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.conversation_id
    }

    pub fn update(&mut self, action: ChatAction) -> Task<ChatAction> {
        match action {
            ChatAction::InputChanged(value) => self.on_input_changed(value),
            ChatAction::SendMessage => self.on_send_message(),
            ChatAction::ResponseReceived(request_id, result) => {
                self.on_response_received(request_id, result)
            }
            // Unmounting is the shell's job.
            ChatAction::Close => Task::none(),
        }
    }

    fn on_input_changed(&mut self, value: String) -> Task<ChatAction> {
        self.input_value = value;
        Task::none()
    }

    // Both the Send button and Enter land here.
    fn on_send_message(&mut self) -> Task<ChatAction> {
        if self.input_value.trim().is_empty() || self.status() != PanelStatus::Idle {
            return Task::none();
        }

        let message = std::mem::take(&mut self.input_value);
        self.messages.push(ChatMessage::user(message.clone()));
        let request = self.outgoing_request(message);

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        let (task, handle) = Task::perform(
            send_message(self.client.clone(), request),
            move |result| ChatAction::ResponseReceived(request_id, result),
        )
        .abortable();
        self.pending = Some(PendingRequest {
            id: request_id,
            _handle: handle.abort_on_drop(),
        });
        task
    }

    /// The request the next submit would send.
    pub fn outgoing_request(&self, message: String) -> ChatRequest {
        ChatRequest {
            message,
            conversation_id: self.conversation_id,
        }
    }

    fn on_response_received(
        &mut self,
        request_id: u64,
        result: Result<ChatResponse, String>,
    ) -> Task<ChatAction> {
        if self.pending.as_ref().map(|pending| pending.id) != Some(request_id) {
            log::warn!("Ignoring response to stale chat request {}", request_id);
            return Task::none();
        }
        self.pending = None;

        let reply = match result {
            Ok(response) => {
                log::info!("Response received: {:?}", response);
                self.conversation_id = Some(response.conversation_id);
                ChatMessage::from(response)
            }
            Err(err) => {
                log::error!("Chat request {} failed: {}", request_id, err);
                ChatMessage::error(&err)
            }
        };
        log::debug!("Appending {} message to thread", reply.sender);
        self.messages.push(reply);
        Task::none()
    }

    pub fn view(&self) -> Element<'_, ChatAction> {
        if self.status() == PanelStatus::Unauthenticated {
            return self.build_login_prompt();
        }

        let chat_window = column![
            self.build_header(),
            self.build_message_list(),
            self.build_input_area(),
        ]
        .spacing(10)
        .padding(10);

        container(chat_window)
            .width(Length::Fixed(360.0))
            .height(Length::Fixed(480.0))
            .style(container::rounded_box)
            .into()
    }

    fn build_login_prompt(&self) -> Element<'_, ChatAction> {
        container(
            column![
                text("Please log in to use the AI Chatbot."),
                button("Close").on_press(ChatAction::Close),
            ]
            .spacing(10)
            .align_x(Alignment::Center),
        )
        .width(Length::Fixed(360.0))
        .padding(20)
        .style(container::rounded_box)
        .into()
    }

    fn build_header(&self) -> Element<'_, ChatAction> {
        row![
            text("AI Todo Chatbot").size(18).width(Length::Fill),
            button("X").on_press(ChatAction::Close),
        ]
        .align_y(Alignment::Center)
        .into()
    }

    fn build_message_list(&self) -> Element<'_, ChatAction> {
        let mut rows: Vec<Element<ChatAction>> =
            self.messages.iter().map(Self::build_message_row).collect();
        if self.status() == PanelStatus::Sending {
            rows.push(
                container(text("Thinking..."))
                    .padding(8)
                    .style(container::rounded_box)
                    .into(),
            );
        }

        // Anchored to the bottom so the newest entry stays in view.
        scrollable(Column::with_children(rows).spacing(8).padding(4))
            .anchor_bottom()
            .height(Length::Fill)
            .into()
    }

    fn build_message_row(msg: &ChatMessage) -> Element<'_, ChatAction> {
        let tool_lines = msg
            .tool_calls
            .iter()
            .map(|call| text(format!("→ {}", call.summary())).size(12).into());
        let bubble = container(
            Column::new()
                .push(text(&msg.text))
                .extend(tool_lines)
                .spacing(4),
        )
        .padding(8)
        .max_width(280.0)
        .style(match msg.sender {
            Sender::User => container::bordered_box,
            Sender::Ai => container::rounded_box,
        });

        match msg.sender {
            Sender::User => container(bubble).align_right(Length::Fill).into(),
            Sender::Ai => container(bubble).align_left(Length::Fill).into(),
        }
    }

    fn build_input_area(&self) -> Element<'_, ChatAction> {
        let idle = self.status() == PanelStatus::Idle;
        row![
            text_input("Type your message...", &self.input_value)
                .on_input_maybe(idle.then_some(ChatAction::InputChanged))
                .on_submit(ChatAction::SendMessage)
                .width(Length::Fill),
            button("Send").on_press_maybe(idle.then_some(ChatAction::SendMessage)),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{auth::MemoryTokenStore, config::Config, models::ToolCall};

    fn authenticated_session() -> Session {
        Session {
            is_authenticated: true,
            user_id: Some("7".to_string()),
            token: Some("header.payload.sig".to_string()),
        }
    }

    fn panel(session: Session) -> State {
        let client = HttpChatClient::new(&Config::default(), Arc::new(MemoryTokenStore::default()));
        State::new(session, client)
    }

    fn submit(state: &mut State, text: &str) {
        let _ = state.update(ChatAction::InputChanged(text.to_string()));
        let _ = state.update(ChatAction::SendMessage);
    }

    #[test]
    fn test_opens_idle_with_empty_thread() {
        let state = panel(authenticated_session());
        assert_eq!(state.status(), PanelStatus::Idle);
        assert!(state.messages().is_empty());
        assert_eq!(state.conversation_id(), None);
    }

    #[test]
    fn test_unauthenticated_panel_ignores_submit() {
        let mut state = panel(Session::unauthenticated());
        assert_eq!(state.status(), PanelStatus::Unauthenticated);

        submit(&mut state, "hello");

        assert!(state.messages().is_empty());
        assert_eq!(state.status(), PanelStatus::Unauthenticated);
    }

    #[test]
    fn test_input_changed() {
        let mut state = panel(authenticated_session());
        let _ = state.update(ChatAction::InputChanged("Hello, world!".to_string()));
        assert_eq!(state.input_value, "Hello, world!");
    }

    #[test]
    fn test_send_message() {
        let mut state = panel(authenticated_session());

        submit(&mut state, "Add buy milk");

        assert_eq!(state.status(), PanelStatus::Sending);
        assert!(state.input_value.is_empty());
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].sender, Sender::User);
        assert_eq!(state.messages()[0].text, "Add buy milk");
    }

    #[test]
    fn test_send_blank_message_is_ignored() {
        let mut state = panel(authenticated_session());

        submit(&mut state, "   ");
        let _ = state.update(ChatAction::SendMessage);

        assert!(state.messages().is_empty());
        assert_eq!(state.status(), PanelStatus::Idle);
        assert_eq!(state.input_value, "   ");
    }

    #[test]
    fn test_second_submit_while_sending_is_ignored() {
        let mut state = panel(authenticated_session());

        submit(&mut state, "first");
        let first_request = state.pending.as_ref().map(|p| p.id);
        submit(&mut state, "second");

        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.pending.as_ref().map(|p| p.id), first_request);
        assert_eq!(state.last_request_id, 1);
        assert_eq!(state.input_value, "second");
    }

    #[test]
    fn test_response_received_threads_conversation_id() {
        let mut state = panel(authenticated_session());
        submit(&mut state, "Add buy milk");

        let _ = state.update(ChatAction::ResponseReceived(
            1,
            Ok(ChatResponse {
                conversation_id: 1,
                response: "Added.".to_string(),
                tool_calls: Some(vec![]),
            }),
        ));

        assert_eq!(state.status(), PanelStatus::Idle);
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.messages()[0].sender, Sender::User);
        assert_eq!(state.messages()[0].text, "Add buy milk");
        assert_eq!(state.messages()[1].sender, Sender::Ai);
        assert_eq!(state.messages()[1].text, "Added.");
        assert_eq!(state.conversation_id(), Some(1));

        let next = state.outgoing_request("And eggs".to_string());
        assert_eq!(next.conversation_id, Some(1));
    }

    #[test]
    fn test_response_keeps_tool_calls() {
        let mut state = panel(authenticated_session());
        submit(&mut state, "Add buy milk");

        let mut args = serde_json::Map::new();
        args.insert("title".to_string(), "buy milk".into());
        let _ = state.update(ChatAction::ResponseReceived(
            1,
            Ok(ChatResponse {
                conversation_id: 4,
                response: "Added.".to_string(),
                tool_calls: Some(vec![ToolCall {
                    tool_name: "add_task".to_string(),
                    args,
                }]),
            }),
        ));

        assert_eq!(state.messages()[1].tool_calls.len(), 1);
        assert_eq!(state.messages()[1].tool_calls[0].tool_name, "add_task");
    }

    #[test]
    fn test_response_error_is_appended_to_thread() {
        let mut state = panel(authenticated_session());
        submit(&mut state, "Add buy milk");

        let _ = state.update(ChatAction::ResponseReceived(1, Err("db down".to_string())));

        assert_eq!(state.status(), PanelStatus::Idle);
        assert_eq!(state.messages().len(), 2);
        assert_eq!(state.messages()[1].sender, Sender::Ai);
        assert_eq!(state.messages()[1].text, "Error: db down");
        assert_eq!(state.conversation_id(), None);
    }

    #[test]
    fn test_empty_error_message() {
        let mut state = panel(authenticated_session());
        submit(&mut state, "hi");

        let _ = state.update(ChatAction::ResponseReceived(1, Err(String::new())));

        assert_eq!(state.messages()[1].text, "Error: Unknown error occurred.");
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut state = panel(authenticated_session());
        submit(&mut state, "hi");

        let _ = state.update(ChatAction::ResponseReceived(
            42,
            Ok(ChatResponse {
                conversation_id: 9,
                response: "late".to_string(),
                tool_calls: None,
            }),
        ));

        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.status(), PanelStatus::Sending);
        assert_eq!(state.conversation_id(), None);
    }

    #[test]
    fn test_can_send_again_after_reply() {
        let mut state = panel(authenticated_session());
        submit(&mut state, "first");
        let _ = state.update(ChatAction::ResponseReceived(1, Err("db down".to_string())));

        submit(&mut state, "retry");

        assert_eq!(state.status(), PanelStatus::Sending);
        assert_eq!(state.messages().len(), 3);
        assert_eq!(state.last_request_id, 2);
    }

    #[test]
    fn test_close_leaves_state_untouched() {
        let mut state = panel(authenticated_session());
        submit(&mut state, "hi");
        let _ = state.update(ChatAction::Close);
        assert_eq!(state.messages().len(), 1);
    }
}
