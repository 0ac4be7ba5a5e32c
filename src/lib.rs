//! TeraBox link bot
//!
//! Takes TeraBox share links from Telegram chats and replies with a direct
//! download link, file name, size and an estimated download time.
//!
//! # Module Structure
//!
//! - `core`: configuration, logging, errors, metrics, keep-alive server
//! - `resolver`: link validation, extraction backends, size estimation
//! - `telegram`: bot setup, dispatcher schema, reply rendering
//! - `cli`: command-line interface

pub mod cli;
pub mod core;
pub mod resolver;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppConfig, AppContext, AppError};
pub use crate::resolver::{LinkResolver, ResolutionFailure, ResolutionResult, UserFacingReply};
