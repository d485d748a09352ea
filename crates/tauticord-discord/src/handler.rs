// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway event handler.
//!
//! Translates the guild's gateway events into [`PlatformEvent`]s and forwards
//! them to the supervisor. Events from other guilds and from bots are
//! dropped here.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    CommandDataOption, CommandDataOptionValue, CommandInteraction, ComponentInteraction, Context,
    EventHandler, GuildId, Interaction as GatewayInteraction, Message, Reaction, Ready,
};
use tauticord_core::message::{
    ChannelId, Interaction, InteractionKind, MentionEvent, MessageId, OptionValue, PlatformEvent,
    ReactionEvent, UserId,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::Shared;

pub(crate) struct Handler {
    pub(crate) guild: GuildId,
    pub(crate) events: mpsc::Sender<PlatformEvent>,
    pub(crate) shared: Arc<Shared>,
}

impl Handler {
    async fn forward(&self, event: PlatformEvent) {
        if self.events.send(event).await.is_err() {
            warn!("event channel closed, dropping gateway event");
        }
    }
}

/// Split a command's options into the subcommand path and its values.
pub fn flatten_options(name: &str, options: &[CommandDataOption]) -> (Vec<String>, Vec<(String, OptionValue)>) {
    let mut path = vec![name.to_string()];
    let mut current = options;
    loop {
        match current {
            [single] => match &single.value {
                CommandDataOptionValue::SubCommand(inner) | CommandDataOptionValue::SubCommandGroup(inner) => {
                    path.push(single.name.clone());
                    current = inner.as_slice();
                }
                _ => break,
            },
            _ => break,
        }
    }

    let values = current
        .iter()
        .filter_map(|option| {
            let value = match &option.value {
                CommandDataOptionValue::String(s) => OptionValue::String(s.clone()),
                CommandDataOptionValue::Integer(i) => OptionValue::Integer(*i),
                CommandDataOptionValue::Boolean(b) => OptionValue::Boolean(*b),
                _ => return None,
            };
            Some((option.name.clone(), value))
        })
        .collect();
    (path, values)
}

fn command_interaction(command: &CommandInteraction) -> Interaction {
    let (path, options) = flatten_options(&command.data.name, &command.data.options);
    Interaction {
        id: command.id.get(),
        token: command.token.clone(),
        user_id: UserId(command.user.id.get()),
        channel_id: ChannelId(command.channel_id.get()),
        kind: InteractionKind::Command { path, options },
    }
}

fn component_interaction(component: &ComponentInteraction) -> Interaction {
    Interaction {
        id: component.id.get(),
        token: component.token.clone(),
        user_id: UserId(component.user.id.get()),
        channel_id: ChannelId(component.channel_id.get()),
        kind: InteractionKind::Component {
            custom_id: component.data.custom_id.clone(),
            message_id: MessageId(component.message.id.get()),
        },
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        let bot = UserId(ready.user.id.get());
        info!(bot = %bot, name = %ready.user.name, guilds = ready.guilds.len(), "connected to Discord");
        let _ = self.shared.bot.set(bot);
        *self.shared.shard.write().await = Some(ctx.shard.clone());
        self.forward(PlatformEvent::Ready { bot_user_id: bot }).await;
    }

    async fn reaction_add(&self, _ctx: Context, reaction: Reaction) {
        if reaction.guild_id != Some(self.guild) {
            return;
        }
        let Some(user) = reaction.user_id else {
            return;
        };
        self.forward(PlatformEvent::ReactionAdded(ReactionEvent {
            channel_id: ChannelId(reaction.channel_id.get()),
            message_id: MessageId(reaction.message_id.get()),
            user_id: UserId(user.get()),
            emoji: reaction.emoji.to_string(),
        }))
        .await;
    }

    async fn interaction_create(&self, _ctx: Context, interaction: GatewayInteraction) {
        let interaction = match &interaction {
            GatewayInteraction::Command(command) if command.guild_id == Some(self.guild) => {
                command_interaction(command)
            }
            GatewayInteraction::Component(component) if component.guild_id == Some(self.guild) => {
                component_interaction(component)
            }
            _ => {
                debug!("ignoring interaction");
                return;
            }
        };
        self.forward(PlatformEvent::Interaction(interaction)).await;
    }

    async fn message(&self, _ctx: Context, message: Message) {
        if message.guild_id != Some(self.guild) || message.author.bot {
            return;
        }
        let Some(bot) = self.shared.bot.get() else {
            return;
        };
        if !message.mentions_user_id(serenity::all::UserId::new(bot.0)) {
            return;
        }
        self.forward(PlatformEvent::Mention(MentionEvent {
            channel_id: ChannelId(message.channel_id.get()),
            message_id: MessageId(message.id.get()),
            author_id: UserId(message.author.id.get()),
            content: message.content.clone(),
        }))
        .await;
    }
}
