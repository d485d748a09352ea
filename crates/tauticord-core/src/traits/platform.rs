// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat platform primitives used by the refresh services and commands.

use async_trait::async_trait;

use crate::error::TauticordError;
use crate::message::{
    ChannelId, ChannelInfo, CommandSpec, Interaction, MessageId, MessageInfo, Reply, UserId,
};
use crate::traits::adapter::PluginAdapter;

/// A custom emoji already present on the guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildEmoji {
    pub id: u64,
    pub name: String,
}

impl GuildEmoji {
    /// Inline form usable inside message text and embeds.
    pub fn mention(&self) -> String {
        format!("<:{}:{}>", self.name, self.id)
    }
}

/// The subset of a chat platform the agent needs, bound to one guild.
///
/// Implementations must be safe to call from several refresh loops at once.
/// HTTP 429 responses are reported as [`TauticordError::RateLimited`].
#[async_trait]
pub trait ChatPlatform: PluginAdapter {
    /// The bot's own user id, known once the connection is ready.
    fn bot_user_id(&self) -> Option<UserId>;

    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, TauticordError>;

    async fn create_category(&self, name: &str) -> Result<ChannelInfo, TauticordError>;

    async fn create_voice_channel(
        &self,
        name: &str,
        parent: Option<ChannelId>,
    ) -> Result<ChannelInfo, TauticordError>;

    async fn create_text_channel(
        &self,
        name: &str,
        parent: Option<ChannelId>,
    ) -> Result<ChannelInfo, TauticordError>;

    async fn rename_channel(&self, channel: ChannelId, name: &str) -> Result<(), TauticordError>;

    /// Up to `limit` most recent messages, newest first.
    async fn recent_messages(
        &self,
        channel: ChannelId,
        limit: u8,
    ) -> Result<Vec<MessageInfo>, TauticordError>;

    async fn send_message(&self, channel: ChannelId, reply: &Reply) -> Result<MessageId, TauticordError>;

    /// Replace the content, embeds and buttons of an existing message.
    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        reply: &Reply,
    ) -> Result<(), TauticordError>;

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<(), TauticordError>;

    /// Emojis currently reacted on a message, in display order.
    async fn reactions(&self, channel: ChannelId, message: MessageId) -> Result<Vec<String>, TauticordError>;

    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), TauticordError>;

    /// Remove every user's reaction of one emoji.
    async fn remove_reaction_emoji(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), TauticordError>;

    /// Remove a single user's reaction.
    async fn remove_user_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        user: UserId,
        emoji: &str,
    ) -> Result<(), TauticordError>;

    async fn clear_reactions(&self, channel: ChannelId, message: MessageId) -> Result<(), TauticordError>;

    async fn list_emojis(&self) -> Result<Vec<GuildEmoji>, TauticordError>;

    /// Maximum number of static custom emojis the guild may hold.
    async fn emoji_slot_limit(&self) -> Result<usize, TauticordError>;

    async fn upload_emoji(&self, name: &str, png: &[u8]) -> Result<GuildEmoji, TauticordError>;

    async fn set_presence(&self, text: &str) -> Result<(), TauticordError>;

    /// Answer an interaction with a new response.
    async fn respond(&self, interaction: &Interaction, reply: &Reply) -> Result<(), TauticordError>;

    /// Answer a component interaction by editing the message it belongs to.
    async fn update_interaction_message(
        &self,
        interaction: &Interaction,
        reply: &Reply,
    ) -> Result<(), TauticordError>;

    /// Replace the guild's slash commands with `commands`.
    async fn register_commands(&self, commands: &[CommandSpec]) -> Result<(), TauticordError>;
}
