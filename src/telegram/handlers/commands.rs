//! Command and link handler implementations

use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::core::metrics;
use crate::resolver::UserFacingReply;
use crate::telegram::bot::Command;
use crate::telegram::reply::{help_text, send_reply, PROCESSING_TEXT, WELCOME_TEXT};

pub(super) async fn handle_command(bot: &Bot, msg: &Message, cmd: Command, deps: &HandlerDeps) -> Result<(), HandlerError> {
    metrics::record_message("command");

    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, help_text(&deps.context.config.hosts))
                .await?;
        }
    }
    Ok(())
}

/// Validates the text, acknowledges it, resolves it and sends the outcome.
pub(super) async fn handle_link_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    deps: &HandlerDeps,
) -> Result<(), HandlerError> {
    let resolver = &deps.context.resolver;

    let Some(link) = resolver.validator().parse(text) else {
        metrics::record_message("invalid");
        log::debug!("Rejected non-link message in chat {}", msg.chat.id);
        send_reply(bot, msg.chat.id, &UserFacingReply::InvalidLink).await?;
        return Ok(());
    };

    metrics::record_message("link");
    log::info!("🔗 Resolving {} for chat {}", link, msg.chat.id);

    bot.send_message(msg.chat.id, PROCESSING_TEXT).await?;

    let reply = resolver.handle_parsed_link(&link).await;
    send_reply(bot, msg.chat.id, &reply).await?;
    Ok(())
}
