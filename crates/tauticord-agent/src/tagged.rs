// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replies to messages that mention the bot.

use tauticord_core::message::{MentionEvent, Reply};
use tauticord_core::TauticordError;
use tracing::debug;

use crate::context::AgentContext;

/// Text sent in answer to a mention.
pub fn mention_reply(ctx: &AgentContext, author: u64) -> String {
    let mut text = String::from(
        "Hi! I keep an eye on Plex for you. Try `/most`, `/recently added` or `/graphs` to see what's popular.",
    );
    if ctx.is_admin(author) {
        text.push_str(&format!(
            "\nLive activity is posted in #{}; react with a stream number there to end it.",
            ctx.config.discord.summary_channel_name
        ));
    }
    text
}

/// Answer a mention unless the bot mentioned itself.
pub async fn handle_mention(ctx: &AgentContext, event: &MentionEvent) -> Result<(), TauticordError> {
    if ctx.platform.bot_user_id() == Some(event.author_id) {
        return Ok(());
    }
    debug!(author = %event.author_id, channel = %event.channel_id, "bot mentioned");
    let reply = Reply::text(mention_reply(ctx, event.author_id.0));
    ctx.platform.send_message(event.channel_id, &reply).await?;
    Ok(())
}
