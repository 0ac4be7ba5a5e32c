//! Chat reply texts and rendering of [`UserFacingReply`]

use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};

use super::markdown::{escape_link_url, escape_markdown_v2};
use crate::resolver::UserFacingReply;

pub const WELCOME_TEXT: &str =
    "👋 Welcome! Send me a valid TeraBox link, and I will fetch the direct download link for you.";
pub const PROCESSING_TEXT: &str = "⏳ Processing your link, please wait...";
pub const INVALID_LINK_TEXT: &str = "❌ Invalid TeraBox link! Please send a valid link.";
pub const COULD_NOT_EXTRACT_TEXT: &str =
    "⚠️ Could not extract a download link from this share. It may be private or expired.";
pub const FAILED_TEXT: &str = "❌ Failed to fetch download link. Please try again later.";

const DOWNLOAD_BUTTON: &str = "⬇️ Download";

/// A MarkdownV2 message ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReply {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

/// Plain-text usage help listing the accepted share-link hosts.
pub fn help_text(hosts: &[String]) -> String {
    let mut text = String::from(
        "ℹ️ How to use:\n\nSend a TeraBox share link like https://terabox.com/s/abc123 and I will reply \
         with a direct download link.\n\nSupported domains:\n",
    );
    for host in hosts {
        text.push_str("• ");
        text.push_str(host);
        text.push('\n');
    }
    text
}

pub fn render(reply: &UserFacingReply) -> RenderedReply {
    match reply {
        UserFacingReply::Resolved { result, estimate } => {
            let mut text = String::from("✅ *Direct Download Link Found\\!*\n\n");

            if let Some(name) = &result.file_name {
                text.push_str(&format!("📄 *File:* {}\n", escape_markdown_v2(name)));
            }
            if let Some(size) = &result.size_label {
                text.push_str(&format!("📦 *Size:* {}\n", escape_markdown_v2(size)));
            }
            if let Some(estimate) = estimate {
                text.push_str(&format!(
                    "⏱ *Estimated download time:* {}\n",
                    escape_markdown_v2(&estimate.to_string())
                ));
            }
            if result.file_name.is_some() || result.size_label.is_some() || estimate.is_some() {
                text.push('\n');
            }
            text.push_str(&format!(
                "[Click here to download]({})",
                escape_link_url(&result.download_url)
            ));

            let keyboard = url::Url::parse(&result.download_url)
                .ok()
                .map(|url| InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(DOWNLOAD_BUTTON, url)]]));

            RenderedReply { text, keyboard }
        }
        UserFacingReply::InvalidLink => plain(INVALID_LINK_TEXT),
        UserFacingReply::CouldNotExtract => plain(COULD_NOT_EXTRACT_TEXT),
        UserFacingReply::Failed => plain(FAILED_TEXT),
    }
}

fn plain(text: &str) -> RenderedReply {
    RenderedReply {
        text: escape_markdown_v2(text),
        keyboard: None,
    }
}

pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &UserFacingReply) -> ResponseResult<Message> {
    let rendered = render(reply);
    let mut req = bot.send_message(chat_id, rendered.text).parse_mode(ParseMode::MarkdownV2);
    if let Some(keyboard) = rendered.keyboard {
        req = req.reply_markup(keyboard);
    }
    req.await
}
