// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discord platform adapter for Tauticord.
//!
//! Implements [`ChatPlatform`] over serenity's HTTP client for one guild and
//! runs the gateway connection whose events feed the supervisor.

pub mod convert;
pub mod error;
pub mod handler;

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serenity::all::{
    ActivityData, ChannelId as DiscordChannelId, ChannelType, Client, CreateChannel, CreateInteractionResponse,
    EditChannel, GatewayIntents, GetMessages, GuildId, Http, InteractionId, MessageId as DiscordMessageId,
    ShardManager, ShardMessenger, UserId as DiscordUserId,
};
use tauticord_config::model::DiscordConfig;
use tauticord_core::message::{
    ChannelId, ChannelInfo, CommandSpec, Interaction, MessageId, MessageInfo, PlatformEvent, Reply, UserId,
};
use tauticord_core::traits::{ChatPlatform, GuildEmoji, PluginAdapter};
use tauticord_core::types::HealthStatus;
use tauticord_core::TauticordError;
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, info};

use crate::error::platform_error;
use crate::handler::Handler;

/// Gateway events the agent subscribes to.
pub fn intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_EMOJIS_AND_STICKERS
}

/// State filled in by the gateway and read by the HTTP side.
#[derive(Default)]
pub(crate) struct Shared {
    pub(crate) bot: OnceLock<UserId>,
    pub(crate) shard: RwLock<Option<ShardMessenger>>,
    pub(crate) shard_manager: Mutex<Option<Arc<ShardManager>>>,
}

/// [`ChatPlatform`] bound to the configured guild.
pub struct DiscordPlatform {
    http: Arc<Http>,
    guild: GuildId,
    shared: Arc<Shared>,
}

/// The gateway connection; [`DiscordGateway::run`] blocks until it closes.
pub struct DiscordGateway {
    client: Client,
}

impl DiscordGateway {
    pub async fn run(mut self) -> Result<(), TauticordError> {
        info!("starting Discord gateway");
        self.client.start().await.map_err(|e| platform_error("gateway", e))
    }
}

/// Check the token's shape and the guild id before connecting.
pub fn validate(config: &DiscordConfig) -> Result<(), TauticordError> {
    serenity::utils::validate_token(&config.bot_token).map_err(|_| TauticordError::InvalidToken)?;
    if config.server_id == 0 {
        return Err(TauticordError::Config("Discord.ServerID is required".into()));
    }
    Ok(())
}

/// Build the platform client and its gateway connection. Gateway events are
/// sent on `events`.
pub async fn connect(
    config: &DiscordConfig,
    events: mpsc::Sender<PlatformEvent>,
) -> Result<(DiscordPlatform, DiscordGateway), TauticordError> {
    validate(config)?;
    let guild = GuildId::new(config.server_id);
    let shared = Arc::new(Shared::default());
    let handler = Handler {
        guild,
        events,
        shared: shared.clone(),
    };

    let client = Client::builder(&config.bot_token, intents())
        .event_handler(handler)
        .await
        .map_err(|e| platform_error("client setup", e))?;
    *shared.shard_manager.lock().await = Some(client.shard_manager.clone());

    let platform = DiscordPlatform {
        http: client.http.clone(),
        guild,
        shared,
    };
    Ok((platform, DiscordGateway { client }))
}

fn channel(id: ChannelId) -> DiscordChannelId {
    DiscordChannelId::new(id.0)
}

fn message(id: MessageId) -> DiscordMessageId {
    DiscordMessageId::new(id.0)
}

impl DiscordPlatform {
    /// Confirm the token is accepted and return the bot's user id.
    pub async fn verify(&self) -> Result<UserId, TauticordError> {
        let me = self
            .http
            .get_current_user()
            .await
            .map_err(|e| platform_error("current user", e))?;
        debug!(bot = %me.name, "bot token accepted");
        Ok(UserId(me.id.get()))
    }

    async fn create_channel(
        &self,
        name: &str,
        kind: ChannelType,
        parent: Option<ChannelId>,
    ) -> Result<ChannelInfo, TauticordError> {
        let mut builder = CreateChannel::new(name).kind(kind);
        if let Some(parent) = parent {
            builder = builder.category(channel(parent));
        }
        let created = self
            .guild
            .create_channel(&*self.http, builder)
            .await
            .map_err(|e| platform_error(&format!("create channel {name}"), e))?;
        info!(channel = %name, "created channel");
        Ok(convert::channel_info(&created))
    }
}

#[async_trait]
impl PluginAdapter for DiscordPlatform {
    fn name(&self) -> &str {
        "discord"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, TauticordError> {
        match self.http.get_current_user().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("Discord unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), TauticordError> {
        if let Some(manager) = self.shared.shard_manager.lock().await.take() {
            debug!("closing Discord gateway");
            manager.shutdown_all().await;
        }
        Ok(())
    }
}

#[async_trait]
impl ChatPlatform for DiscordPlatform {
    fn bot_user_id(&self) -> Option<UserId> {
        self.shared.bot.get().copied()
    }

    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, TauticordError> {
        let channels = self
            .guild
            .channels(&*self.http)
            .await
            .map_err(|e| platform_error("list channels", e))?;
        let mut channels: Vec<_> = channels.into_values().collect();
        channels.sort_by_key(|c| (c.position, c.id));
        Ok(channels.iter().map(convert::channel_info).collect())
    }

    async fn create_category(&self, name: &str) -> Result<ChannelInfo, TauticordError> {
        self.create_channel(name, ChannelType::Category, None).await
    }

    async fn create_voice_channel(
        &self,
        name: &str,
        parent: Option<ChannelId>,
    ) -> Result<ChannelInfo, TauticordError> {
        self.create_channel(name, ChannelType::Voice, parent).await
    }

    async fn create_text_channel(
        &self,
        name: &str,
        parent: Option<ChannelId>,
    ) -> Result<ChannelInfo, TauticordError> {
        self.create_channel(name, ChannelType::Text, parent).await
    }

    async fn rename_channel(&self, id: ChannelId, name: &str) -> Result<(), TauticordError> {
        channel(id)
            .edit(&*self.http, EditChannel::new().name(name))
            .await
            .map_err(|e| platform_error(&format!("rename channel {id}"), e))?;
        Ok(())
    }

    async fn recent_messages(&self, id: ChannelId, limit: u8) -> Result<Vec<MessageInfo>, TauticordError> {
        let messages = channel(id)
            .messages(&*self.http, GetMessages::new().limit(limit))
            .await
            .map_err(|e| platform_error(&format!("messages of channel {id}"), e))?;
        Ok(messages
            .iter()
            .map(|m| MessageInfo {
                id: MessageId(m.id.get()),
                author_id: UserId(m.author.id.get()),
                embed_footers: m
                    .embeds
                    .iter()
                    .filter_map(|e| e.footer.as_ref().map(|f| f.text.clone()))
                    .collect(),
            })
            .collect())
    }

    async fn send_message(&self, id: ChannelId, reply: &Reply) -> Result<MessageId, TauticordError> {
        let sent = channel(id)
            .send_message(&*self.http, convert::create_message(reply))
            .await
            .map_err(|e| platform_error(&format!("send to channel {id}"), e))?;
        Ok(MessageId(sent.id.get()))
    }

    async fn edit_message(&self, id: ChannelId, msg: MessageId, reply: &Reply) -> Result<(), TauticordError> {
        channel(id)
            .edit_message(&*self.http, message(msg), convert::edit_message(reply))
            .await
            .map_err(|e| platform_error(&format!("message {msg}"), e))?;
        Ok(())
    }

    async fn delete_message(&self, id: ChannelId, msg: MessageId) -> Result<(), TauticordError> {
        channel(id)
            .delete_message(&*self.http, message(msg))
            .await
            .map_err(|e| platform_error(&format!("message {msg}"), e))
    }

    async fn reactions(&self, id: ChannelId, msg: MessageId) -> Result<Vec<String>, TauticordError> {
        let fetched = self
            .http
            .get_message(channel(id), message(msg))
            .await
            .map_err(|e| platform_error(&format!("message {msg}"), e))?;
        Ok(fetched
            .reactions
            .iter()
            .filter(|r| r.count > 0)
            .map(|r| r.reaction_type.to_string())
            .collect())
    }

    async fn add_reaction(&self, id: ChannelId, msg: MessageId, emoji: &str) -> Result<(), TauticordError> {
        self.http
            .create_reaction(channel(id), message(msg), &convert::reaction_type(emoji))
            .await
            .map_err(|e| platform_error(&format!("add reaction {emoji}"), e))
    }

    async fn remove_reaction_emoji(
        &self,
        id: ChannelId,
        msg: MessageId,
        emoji: &str,
    ) -> Result<(), TauticordError> {
        self.http
            .delete_message_reaction_emoji(channel(id), message(msg), &convert::reaction_type(emoji))
            .await
            .map_err(|e| platform_error(&format!("remove reaction {emoji}"), e))
    }

    async fn remove_user_reaction(
        &self,
        id: ChannelId,
        msg: MessageId,
        user: UserId,
        emoji: &str,
    ) -> Result<(), TauticordError> {
        self.http
            .delete_reaction(
                channel(id),
                message(msg),
                DiscordUserId::new(user.0),
                &convert::reaction_type(emoji),
            )
            .await
            .map_err(|e| platform_error(&format!("remove reaction {emoji} of {user}"), e))
    }

    async fn clear_reactions(&self, id: ChannelId, msg: MessageId) -> Result<(), TauticordError> {
        self.http
            .delete_message_reactions(channel(id), message(msg))
            .await
            .map_err(|e| platform_error(&format!("clear reactions of {msg}"), e))
    }

    async fn list_emojis(&self) -> Result<Vec<GuildEmoji>, TauticordError> {
        let emojis = self
            .guild
            .emojis(&*self.http)
            .await
            .map_err(|e| platform_error("list emojis", e))?;
        Ok(emojis
            .into_iter()
            .filter(|e| !e.animated)
            .map(|e| GuildEmoji {
                id: e.id.get(),
                name: e.name,
            })
            .collect())
    }

    async fn emoji_slot_limit(&self) -> Result<usize, TauticordError> {
        let guild = self
            .guild
            .to_partial_guild(&*self.http)
            .await
            .map_err(|e| platform_error("guild", e))?;
        Ok(convert::emoji_slots(guild.premium_tier))
    }

    async fn upload_emoji(&self, name: &str, png: &[u8]) -> Result<GuildEmoji, TauticordError> {
        let emoji = self
            .guild
            .create_emoji(&*self.http, name, &convert::png_data_uri(png))
            .await
            .map_err(|e| platform_error(&format!("upload emoji {name}"), e))?;
        info!(emoji = %name, "uploaded custom emoji");
        Ok(GuildEmoji {
            id: emoji.id.get(),
            name: emoji.name,
        })
    }

    async fn set_presence(&self, text: &str) -> Result<(), TauticordError> {
        match self.shared.shard.read().await.as_ref() {
            Some(shard) => {
                shard.set_activity(Some(ActivityData::watching(text)));
                Ok(())
            }
            None => Err(TauticordError::platform("gateway not connected")),
        }
    }

    async fn respond(&self, interaction: &Interaction, reply: &Reply) -> Result<(), TauticordError> {
        let (builder, files) = convert::interaction_message(reply);
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.id),
                &interaction.token,
                &CreateInteractionResponse::Message(builder),
                files,
            )
            .await
            .map_err(|e| platform_error(&format!("respond to interaction {}", interaction.id), e))
    }

    async fn update_interaction_message(
        &self,
        interaction: &Interaction,
        reply: &Reply,
    ) -> Result<(), TauticordError> {
        let (builder, files) = convert::interaction_message(reply);
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.id),
                &interaction.token,
                &CreateInteractionResponse::UpdateMessage(builder),
                files,
            )
            .await
            .map_err(|e| platform_error(&format!("update interaction {}", interaction.id), e))
    }

    async fn register_commands(&self, commands: &[CommandSpec]) -> Result<(), TauticordError> {
        self.guild
            .set_commands(&*self.http, commands.iter().map(convert::command).collect())
            .await
            .map_err(|e| platform_error("register commands", e))?;
        Ok(())
    }
}
