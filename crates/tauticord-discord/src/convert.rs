// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversions between the platform-neutral message types and serenity
//! builders and models.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serenity::all::{
    ButtonStyle, ChannelType, CommandOptionType, CreateActionRow, CreateAttachment, CreateButton,
    CreateCommand, CreateCommandOption, CreateEmbed, CreateEmbedFooter, CreateInteractionResponseMessage,
    CreateMessage, EditMessage, EmojiId, GuildChannel, PremiumTier, ReactionType,
};
use tauticord_core::message::{
    Button, ChannelId, ChannelInfo, ChannelKind, CommandOption, CommandSpec, Embed, OptionKind, Reply,
};

/// Discord allows at most five buttons per action row.
const BUTTONS_PER_ROW: usize = 5;

pub fn embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description);
    }
    if let Some(url) = &embed.url {
        builder = builder.url(url);
    }
    if let Some(color) = embed.color {
        builder = builder.color(color);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(image) = &embed.image_url {
        builder = builder.image(image);
    }
    if let Some(thumbnail) = &embed.thumbnail_url {
        builder = builder.thumbnail(thumbnail);
    }
    builder
}

fn button(button: &Button) -> CreateButton {
    CreateButton::new(&button.custom_id)
        .label(&button.label)
        .style(ButtonStyle::Secondary)
        .disabled(button.disabled)
}

pub fn action_rows(buttons: &[Button]) -> Vec<CreateActionRow> {
    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|row| CreateActionRow::Buttons(row.iter().map(button).collect()))
        .collect()
}

fn attachment(reply: &Reply) -> Option<CreateAttachment> {
    reply
        .attachment
        .as_ref()
        .map(|a| CreateAttachment::bytes(a.data.clone(), &a.filename))
}

pub fn create_message(reply: &Reply) -> CreateMessage {
    let mut builder = CreateMessage::new();
    if let Some(content) = &reply.content {
        builder = builder.content(content);
    }
    if !reply.embeds.is_empty() {
        builder = builder.embeds(reply.embeds.iter().map(embed).collect());
    }
    if !reply.buttons.is_empty() {
        builder = builder.components(action_rows(&reply.buttons));
    }
    if let Some(file) = attachment(reply) {
        builder = builder.add_file(file);
    }
    builder
}

/// Edits replace every part of the message, clearing what `reply` lacks.
pub fn edit_message(reply: &Reply) -> EditMessage {
    EditMessage::new()
        .content(reply.content.clone().unwrap_or_default())
        .embeds(reply.embeds.iter().map(embed).collect())
        .components(action_rows(&reply.buttons))
}

pub fn interaction_message(reply: &Reply) -> (CreateInteractionResponseMessage, Vec<CreateAttachment>) {
    let mut builder = CreateInteractionResponseMessage::new()
        .embeds(reply.embeds.iter().map(embed).collect())
        .components(action_rows(&reply.buttons))
        .ephemeral(reply.ephemeral);
    if let Some(content) = &reply.content {
        builder = builder.content(content);
    }
    (builder, attachment(reply).into_iter().collect())
}

fn command_option(option: &CommandOption) -> CreateCommandOption {
    let kind = match option.kind {
        OptionKind::String => CommandOptionType::String,
        OptionKind::Integer => CommandOptionType::Integer,
        OptionKind::Boolean => CommandOptionType::Boolean,
        OptionKind::SubCommand => CommandOptionType::SubCommand,
    };
    let mut builder = CreateCommandOption::new(kind, &option.name, &option.description);
    if option.kind != OptionKind::SubCommand {
        builder = builder.required(option.required);
    }
    for (name, value) in &option.choices {
        builder = builder.add_string_choice(name, value);
    }
    for sub in &option.options {
        builder = builder.add_sub_option(command_option(sub));
    }
    builder
}

pub fn command(spec: &CommandSpec) -> CreateCommand {
    CreateCommand::new(&spec.name)
        .description(&spec.description)
        .set_options(spec.options.iter().map(command_option).collect())
}

pub fn channel_info(channel: &GuildChannel) -> ChannelInfo {
    let kind = match channel.kind {
        ChannelType::Text => ChannelKind::Text,
        ChannelType::Voice => ChannelKind::Voice,
        ChannelType::Category => ChannelKind::Category,
        _ => ChannelKind::Other,
    };
    ChannelInfo {
        id: ChannelId(channel.id.get()),
        name: channel.name.clone(),
        kind,
        parent_id: channel.parent_id.map(|id| ChannelId(id.get())),
    }
}

/// Parse `<:name:id>`, `<a:name:id>` or a Unicode emoji.
pub fn reaction_type(emoji: &str) -> ReactionType {
    if let Some(inner) = emoji.strip_prefix('<').and_then(|e| e.strip_suffix('>')) {
        let (animated, rest) = match inner.strip_prefix("a:") {
            Some(rest) => (true, rest),
            None => (false, inner.strip_prefix(':').unwrap_or(inner)),
        };
        if let Some((name, id)) = rest.rsplit_once(':')
            && let Ok(id) = id.parse::<u64>()
            && id != 0
        {
            return ReactionType::Custom {
                animated,
                id: EmojiId::new(id),
                name: Some(name.to_string()),
            };
        }
    }
    ReactionType::Unicode(emoji.to_string())
}

/// Static emoji slots available at a guild boost tier.
pub fn emoji_slots(tier: PremiumTier) -> usize {
    match tier {
        PremiumTier::Tier1 => 100,
        PremiumTier::Tier2 => 150,
        PremiumTier::Tier3 => 250,
        _ => 50,
    }
}

/// PNG bytes as the data URI expected by the emoji upload endpoint.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}
