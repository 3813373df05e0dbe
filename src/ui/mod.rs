use std::sync::Arc;

use iced::{
    widget::{button, container, stack, Column},
    Alignment, Element, Length, Task,
};

use crate::{
    api::clients::HttpChatClient,
    auth::{FileTokenStore, Session, TokenStore},
    config::Config,
};

mod chat;
mod tasks;

pub use chat::{ChatAction, ChatMessage, PanelStatus, Sender, State as ChatPanel};
pub use tasks::{Board, BoardAction};

pub fn init(config: Config) -> (App, Task<Message>) {
    let token_store: Arc<dyn TokenStore> =
        Arc::new(FileTokenStore::new(&config.settings_dir, &config.token_key));
    (App::new(&config, token_store, Board::default()), Task::none())
}

/// The window's root: the task board plus, for signed-in users, the chat
/// launcher and panel.
pub struct App {
    session: Session,
    token_store: Arc<dyn TokenStore>,
    client: HttpChatClient,
    board: Board,
    chat: Option<chat::State>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("client", &self.client)
            .field("board", &self.board)
            .field("chat", &self.chat)
            .finish_non_exhaustive()
    }
}

impl App {
    /// Derives the launcher's session once; each opened panel re-reads the
    /// store for its own.
    pub fn new(config: &Config, token_store: Arc<dyn TokenStore>, board: Board) -> Self {
        let session = Session::derive(token_store.as_ref());
        log::info!(
            "Session derived: authenticated={} user_id={:?}",
            session.is_authenticated,
            session.user_id
        );
        Self {
            session,
            client: HttpChatClient::new(config, token_store.clone()),
            token_store,
            board,
            chat: None,
        }
    }

    /// The launcher only exists for users the backend can key by id.
    pub fn chat_available(&self) -> bool {
        self.session.is_authenticated && self.session.numeric_user_id().is_some()
    }

    pub fn is_chat_open(&self) -> bool {
        self.chat.is_some()
    }

    pub fn chat(&self) -> Option<&ChatPanel> {
        self.chat.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    fn open_chat(&mut self) {
        let session = Session::derive(self.token_store.as_ref());
        self.chat = Some(chat::State::new(session, self.client.clone()));
    }

    // Dropping the panel aborts any request it still has in flight.
    fn close_chat(&mut self) {
        self.chat = None;
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    ToggleChat,
    Chat(ChatAction),
    Board(BoardAction),
}

pub fn update(app: &mut App, message: Message) -> Task<Message> {
    match message {
        Message::ToggleChat => {
            if !app.chat_available() {
                log::warn!("Chat launcher pressed without a usable session");
                return Task::none();
            }
            if app.is_chat_open() {
                app.close_chat();
            } else {
                app.open_chat();
            }
            Task::none()
        }
        Message::Chat(ChatAction::Close) => {
            app.close_chat();
            Task::none()
        }
        Message::Chat(chat_action) => match app.chat.as_mut() {
            Some(chat) => chat.update(chat_action).map(Message::Chat),
            None => {
                log::debug!("Dropping chat action for unmounted panel: {:?}", chat_action);
                Task::none()
            }
        },
        Message::Board(board_action) => app.board.update(board_action).map(Message::Board),
    }
}

pub fn view(app: &App) -> Element<'_, Message> {
    let content = container(app.board.view().map(Message::Board))
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10);

    if !app.chat_available() {
        return content.into();
    }

    let mut corner: Vec<Element<Message>> = Vec::with_capacity(2);
    if let Some(chat) = &app.chat {
        corner.push(chat.view().map(Message::Chat));
    }
    corner.push(
        button(if app.is_chat_open() { "Close chat" } else { "Chat" })
            .on_press(Message::ToggleChat)
            .padding(12)
            .into(),
    );

    let overlay = container(
        Column::with_children(corner)
            .spacing(10)
            .align_x(Alignment::End),
    )
    .align_right(Length::Fill)
    .align_bottom(Length::Fill)
    .padding(16);

    stack![content, overlay].into()
}
