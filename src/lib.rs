//! Desktop task board with an embedded assistant chat.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod ui;
