//! Telegram layer: bot setup, dispatcher schema and reply rendering

pub mod bot;
pub mod handlers;
pub mod markdown;
pub mod reply;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use reply::{render, RenderedReply};
