mod models;
mod state;
mod tasks;
pub use models::{ChatAction, ChatMessage, Sender};
pub use state::{PanelStatus, State};
pub use tasks::send_message;
