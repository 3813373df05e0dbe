//! Client-side credentials: the persisted bearer token and the session
//! derived from it.

mod session;
mod token_store;

pub use session::{decode_user_id, Session, TokenDecodeError};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
