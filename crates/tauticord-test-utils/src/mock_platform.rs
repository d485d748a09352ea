// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory chat platform for deterministic testing.
//!
//! `MockPlatform` implements `ChatPlatform` over one fake guild. Channels,
//! messages and reactions behave like the real thing closely enough for the
//! refresh services: ids grow monotonically, reactions keep insertion order,
//! and every mutating call is appended to a call log.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tauticord_core::message::{
    ChannelId, ChannelInfo, ChannelKind, CommandSpec, Interaction, MessageId, MessageInfo, Reply,
    UserId,
};
use tauticord_core::traits::{ChatPlatform, GuildEmoji, PluginAdapter};
use tauticord_core::types::HealthStatus;
use tauticord_core::TauticordError;

/// The bot's user id in every mock guild.
pub const BOT_USER: UserId = UserId(1);

/// A message held by the mock.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub reply: Reply,
}

#[derive(Default)]
struct State {
    channels: Vec<ChannelInfo>,
    messages: Vec<StoredMessage>,
    reactions: HashMap<MessageId, Vec<(String, Vec<UserId>)>>,
    emojis: Vec<GuildEmoji>,
    emoji_slots: usize,
    presence: Option<String>,
    responses: Vec<(u64, Reply)>,
    interaction_updates: Vec<(u64, Reply)>,
    commands: Vec<CommandSpec>,
    failing: HashSet<String>,
    missing: HashSet<String>,
    rate_limited: HashSet<String>,
    calls: Vec<String>,
}

/// A fake guild.
#[derive(Clone)]
pub struct MockPlatform {
    state: Arc<Mutex<State>>,
    next_id: Arc<AtomicU64>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                emoji_slots: 50,
                ..State::default()
            })),
            next_id: Arc::new(AtomicU64::new(1000)),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Add a pre-existing channel and return it.
    pub async fn add_channel(&self, name: &str, kind: ChannelKind, parent: Option<ChannelId>) -> ChannelInfo {
        self.create_channel(name, kind, parent).await
    }

    /// Post a message as someone else (or as the bot with [`BOT_USER`]).
    pub async fn inject_message(&self, channel: ChannelId, author: UserId, reply: Reply) -> MessageId {
        let id = MessageId(self.next_id());
        self.state.lock().await.messages.push(StoredMessage {
            id,
            channel_id: channel,
            author_id: author,
            reply,
        });
        id
    }

    /// React as a user without going through the call log.
    pub async fn inject_reaction(&self, message: MessageId, user: UserId, emoji: &str) {
        let mut state = self.state.lock().await;
        add_reaction_entry(&mut state, message, user, emoji);
    }

    pub async fn set_emoji_slots(&self, slots: usize) {
        self.state.lock().await.emoji_slots = slots;
    }

    pub async fn add_emoji(&self, name: &str) {
        let id = self.next_id();
        self.state.lock().await.emojis.push(GuildEmoji {
            id,
            name: name.to_string(),
        });
    }

    /// Make every call named `op` fail with a platform error.
    pub async fn fail_op(&self, op: &str) {
        self.state.lock().await.failing.insert(op.to_string());
    }

    /// Make every call named `op` fail with a rate-limit error.
    pub async fn rate_limit_op(&self, op: &str) {
        self.state.lock().await.rate_limited.insert(op.to_string());
    }

    /// Make every call named `op` fail as if its target was deleted.
    pub async fn not_found_op(&self, op: &str) {
        self.state.lock().await.missing.insert(op.to_string());
    }

    pub async fn clear_failures(&self) {
        let mut state = self.state.lock().await;
        state.failing.clear();
        state.missing.clear();
        state.rate_limited.clear();
    }

    pub async fn channels(&self) -> Vec<ChannelInfo> {
        self.state.lock().await.channels.clone()
    }

    pub async fn channel_named(&self, name: &str) -> Option<ChannelInfo> {
        self.state
            .lock()
            .await
            .channels
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    /// Voice channels under `parent`, in creation order.
    pub async fn voice_channels_in(&self, parent: ChannelId) -> Vec<ChannelInfo> {
        self.state
            .lock()
            .await
            .channels
            .iter()
            .filter(|c| c.kind == ChannelKind::Voice && c.parent_id == Some(parent))
            .cloned()
            .collect()
    }

    /// Messages of one channel, oldest first.
    pub async fn messages_in(&self, channel: ChannelId) -> Vec<StoredMessage> {
        self.state
            .lock()
            .await
            .messages
            .iter()
            .filter(|m| m.channel_id == channel)
            .cloned()
            .collect()
    }

    pub async fn message(&self, id: MessageId) -> Option<StoredMessage> {
        self.state.lock().await.messages.iter().find(|m| m.id == id).cloned()
    }

    /// Emojis on a message, in display order.
    pub async fn reactions_on(&self, message: MessageId) -> Vec<String> {
        self.state
            .lock()
            .await
            .reactions
            .get(&message)
            .map(|r| r.iter().map(|(e, _)| e.clone()).collect())
            .unwrap_or_default()
    }

    /// Users that reacted with `emoji` on a message.
    pub async fn reactors(&self, message: MessageId, emoji: &str) -> Vec<UserId> {
        self.state
            .lock()
            .await
            .reactions
            .get(&message)
            .and_then(|r| r.iter().find(|(e, _)| e == emoji))
            .map(|(_, users)| users.clone())
            .unwrap_or_default()
    }

    pub async fn presence(&self) -> Option<String> {
        self.state.lock().await.presence.clone()
    }

    pub async fn emojis(&self) -> Vec<GuildEmoji> {
        self.state.lock().await.emojis.clone()
    }

    /// Interaction responses as (interaction id, reply).
    pub async fn responses(&self) -> Vec<(u64, Reply)> {
        self.state.lock().await.responses.clone()
    }

    pub async fn interaction_updates(&self) -> Vec<(u64, Reply)> {
        self.state.lock().await.interaction_updates.clone()
    }

    pub async fn commands(&self) -> Vec<CommandSpec> {
        self.state.lock().await.commands.clone()
    }

    /// Call log entries such as `rename_channel` or `add_reaction:1️⃣`.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    /// Number of log entries equal to `op` or starting with `op:`.
    pub async fn call_count(&self, op: &str) -> usize {
        let prefix = format!("{op}:");
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|c| *c == op || c.starts_with(&prefix))
            .count()
    }

    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// Record `entry` and check the failure switches for `op`.
    async fn enter(&self, op: &str, entry: String) -> Result<(), TauticordError> {
        let mut state = self.state.lock().await;
        state.calls.push(entry);
        if state.rate_limited.contains(op) {
            return Err(TauticordError::RateLimited(format!("{op}: 429 Too Many Requests")));
        }
        if state.failing.contains(op) {
            return Err(TauticordError::platform(format!("{op}: injected failure")));
        }
        if state.missing.contains(op) {
            return Err(not_found(format!("{op}: target")));
        }
        Ok(())
    }

    async fn create_channel(
        &self,
        name: &str,
        kind: ChannelKind,
        parent: Option<ChannelId>,
    ) -> ChannelInfo {
        let channel = ChannelInfo {
            id: ChannelId(self.next_id()),
            name: name.to_string(),
            kind,
            parent_id: parent,
        };
        self.state.lock().await.channels.push(channel.clone());
        channel
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn add_reaction_entry(state: &mut State, message: MessageId, user: UserId, emoji: &str) {
    let entries = state.reactions.entry(message).or_default();
    match entries.iter_mut().find(|(e, _)| e == emoji) {
        Some((_, users)) => {
            if !users.contains(&user) {
                users.push(user);
            }
        }
        None => entries.push((emoji.to_string(), vec![user])),
    }
}

fn not_found(what: impl std::fmt::Display) -> TauticordError {
    TauticordError::NotFound {
        what: what.to_string(),
    }
}

#[async_trait]
impl PluginAdapter for MockPlatform {
    fn name(&self) -> &str {
        "mock-platform"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, TauticordError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    fn bot_user_id(&self) -> Option<UserId> {
        Some(BOT_USER)
    }

    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, TauticordError> {
        self.enter("list_channels", "list_channels".into()).await?;
        Ok(self.channels().await)
    }

    async fn create_category(&self, name: &str) -> Result<ChannelInfo, TauticordError> {
        self.enter("create_category", format!("create_category:{name}")).await?;
        Ok(self.create_channel(name, ChannelKind::Category, None).await)
    }

    async fn create_voice_channel(
        &self,
        name: &str,
        parent: Option<ChannelId>,
    ) -> Result<ChannelInfo, TauticordError> {
        self.enter("create_voice_channel", format!("create_voice_channel:{name}"))
            .await?;
        Ok(self.create_channel(name, ChannelKind::Voice, parent).await)
    }

    async fn create_text_channel(
        &self,
        name: &str,
        parent: Option<ChannelId>,
    ) -> Result<ChannelInfo, TauticordError> {
        self.enter("create_text_channel", format!("create_text_channel:{name}"))
            .await?;
        Ok(self.create_channel(name, ChannelKind::Text, parent).await)
    }

    async fn rename_channel(&self, channel: ChannelId, name: &str) -> Result<(), TauticordError> {
        self.enter("rename_channel", format!("rename_channel:{name}")).await?;
        let mut state = self.state.lock().await;
        let found = state
            .channels
            .iter_mut()
            .find(|c| c.id == channel)
            .ok_or_else(|| not_found(format!("channel {channel}")))?;
        found.name = name.to_string();
        Ok(())
    }

    async fn recent_messages(
        &self,
        channel: ChannelId,
        limit: u8,
    ) -> Result<Vec<MessageInfo>, TauticordError> {
        self.enter("recent_messages", "recent_messages".into()).await?;
        let state = self.state.lock().await;
        Ok(state
            .messages
            .iter()
            .rev()
            .filter(|m| m.channel_id == channel)
            .take(limit as usize)
            .map(|m| MessageInfo {
                id: m.id,
                author_id: m.author_id,
                embed_footers: m.reply.embeds.iter().filter_map(|e| e.footer.clone()).collect(),
            })
            .collect())
    }

    async fn send_message(&self, channel: ChannelId, reply: &Reply) -> Result<MessageId, TauticordError> {
        self.enter("send_message", "send_message".into()).await?;
        Ok(self.inject_message(channel, BOT_USER, reply.clone()).await)
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        reply: &Reply,
    ) -> Result<(), TauticordError> {
        self.enter("edit_message", "edit_message".into()).await?;
        let mut state = self.state.lock().await;
        let found = state
            .messages
            .iter_mut()
            .find(|m| m.id == message && m.channel_id == channel)
            .ok_or_else(|| not_found(format!("message {message}")))?;
        found.reply = reply.clone();
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> Result<(), TauticordError> {
        self.enter("delete_message", "delete_message".into()).await?;
        let mut state = self.state.lock().await;
        let before = state.messages.len();
        state
            .messages
            .retain(|m| !(m.id == message && m.channel_id == channel));
        if state.messages.len() == before {
            return Err(not_found(format!("message {message}")));
        }
        state.reactions.remove(&message);
        Ok(())
    }

    async fn reactions(&self, _channel: ChannelId, message: MessageId) -> Result<Vec<String>, TauticordError> {
        self.enter("reactions", "reactions".into()).await?;
        Ok(self.reactions_on(message).await)
    }

    async fn add_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), TauticordError> {
        self.enter("add_reaction", format!("add_reaction:{emoji}")).await?;
        let mut state = self.state.lock().await;
        add_reaction_entry(&mut state, message, BOT_USER, emoji);
        Ok(())
    }

    async fn remove_reaction_emoji(
        &self,
        _channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), TauticordError> {
        self.enter("remove_reaction_emoji", format!("remove_reaction_emoji:{emoji}"))
            .await?;
        let mut state = self.state.lock().await;
        if let Some(entries) = state.reactions.get_mut(&message) {
            entries.retain(|(e, _)| e != emoji);
        }
        Ok(())
    }

    async fn remove_user_reaction(
        &self,
        _channel: ChannelId,
        message: MessageId,
        user: UserId,
        emoji: &str,
    ) -> Result<(), TauticordError> {
        self.enter("remove_user_reaction", format!("remove_user_reaction:{emoji}"))
            .await?;
        let mut state = self.state.lock().await;
        if let Some(entries) = state.reactions.get_mut(&message) {
            for (e, users) in entries.iter_mut() {
                if e == emoji {
                    users.retain(|u| *u != user);
                }
            }
            entries.retain(|(_, users)| !users.is_empty());
        }
        Ok(())
    }

    async fn clear_reactions(&self, _channel: ChannelId, message: MessageId) -> Result<(), TauticordError> {
        self.enter("clear_reactions", "clear_reactions".into()).await?;
        self.state.lock().await.reactions.remove(&message);
        Ok(())
    }

    async fn list_emojis(&self) -> Result<Vec<GuildEmoji>, TauticordError> {
        self.enter("list_emojis", "list_emojis".into()).await?;
        Ok(self.emojis().await)
    }

    async fn emoji_slot_limit(&self) -> Result<usize, TauticordError> {
        Ok(self.state.lock().await.emoji_slots)
    }

    async fn upload_emoji(&self, name: &str, _png: &[u8]) -> Result<GuildEmoji, TauticordError> {
        self.enter("upload_emoji", format!("upload_emoji:{name}")).await?;
        let emoji = GuildEmoji {
            id: self.next_id(),
            name: name.to_string(),
        };
        self.state.lock().await.emojis.push(emoji.clone());
        Ok(emoji)
    }

    async fn set_presence(&self, text: &str) -> Result<(), TauticordError> {
        self.enter("set_presence", "set_presence".into()).await?;
        self.state.lock().await.presence = Some(text.to_string());
        Ok(())
    }

    async fn respond(&self, interaction: &Interaction, reply: &Reply) -> Result<(), TauticordError> {
        self.enter("respond", "respond".into()).await?;
        self.state
            .lock()
            .await
            .responses
            .push((interaction.id, reply.clone()));
        Ok(())
    }

    async fn update_interaction_message(
        &self,
        interaction: &Interaction,
        reply: &Reply,
    ) -> Result<(), TauticordError> {
        self.enter("update_interaction_message", "update_interaction_message".into())
            .await?;
        let mut state = self.state.lock().await;
        state.interaction_updates.push((interaction.id, reply.clone()));
        if let tauticord_core::InteractionKind::Component { message_id, .. } = &interaction.kind
            && let Some(found) = state.messages.iter_mut().find(|m| m.id == *message_id)
        {
            found.reply = reply.clone();
        }
        Ok(())
    }

    async fn register_commands(&self, commands: &[CommandSpec]) -> Result<(), TauticordError> {
        self.enter("register_commands", "register_commands".into()).await?;
        self.state.lock().await.commands = commands.to_vec();
        Ok(())
    }
}
