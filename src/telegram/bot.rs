//! Bot initialization
//!
//! This module contains:
//! - Command enum definition
//! - Bot instance creation
//! - Command list registration

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::error::{AppError, AppResult};

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "show the welcome message")]
    Start,
    #[command(description = "how to use the bot")]
    Help,
}

/// Creates a Bot instance for `token`.
///
/// Uses teloxide's reqwest settings so the client timeout stays above the
/// long-polling timeout.
pub fn create_bot(token: &str) -> AppResult<Bot> {
    if token.trim().is_empty() {
        return Err(AppError::invalid_config("BOT_TOKEN is not set"));
    }

    let client = teloxide::net::default_reqwest_settings().build()?;
    Ok(Bot::with_client(token, client))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}
