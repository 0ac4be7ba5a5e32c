//! Telegram bot handler tree configuration
//!
//! The same schema is used by the production dispatcher and is kept free of
//! global state so it can be built against any [`AppContext`](crate::core::AppContext).

mod commands;
mod schema;
mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};
