// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-neutral chat objects: ids, channels, messages, embeds,
//! interactions and slash command definitions.

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// A guild channel (text, voice or category).
    ChannelId
);
snowflake!(
    /// A message. Ids grow monotonically, so a larger id is newer.
    MessageId
);
snowflake!(
    /// A platform user.
    UserId
);

/// Kind of a guild channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    Other,
}

/// A guild channel as listed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
    pub parent_id: Option<ChannelId>,
}

/// A message as seen when scanning channel history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageInfo {
    pub id: MessageId,
    pub author_id: UserId,
    /// Footer texts of the message's embeds, in order.
    pub embed_footers: Vec<String>,
}

/// Maximum length of an embed field name.
pub const EMBED_FIELD_NAME_LIMIT: usize = 200;

/// Maximum length of an embed field value.
pub const EMBED_FIELD_VALUE_LIMIT: usize = 1024;

/// Truncate `text` to at most `limit` characters, ending in `...` when cut.
pub fn truncate_with_ellipsis(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// One field of an embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A rich embed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub color: Option<u32>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl Embed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Add a field; name and value are truncated to the platform limits.
    pub fn field(mut self, name: impl AsRef<str>, value: impl AsRef<str>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: truncate_with_ellipsis(name.as_ref(), EMBED_FIELD_NAME_LIMIT),
            value: truncate_with_ellipsis(value.as_ref(), EMBED_FIELD_VALUE_LIMIT),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail_url = Some(url.into());
        self
    }
}

/// A clickable button attached below a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub custom_id: String,
    pub label: String,
    pub disabled: bool,
}

/// Content of an outgoing message or interaction response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
    pub buttons: Vec<Button>,
    /// Optional PNG attachment, referenced from embeds as `attachment://{name}`.
    pub attachment: Option<Attachment>,
    pub ephemeral: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
            ..Self::default()
        }
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

/// A file sent alongside a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// A value passed to a slash command option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

/// A user interaction with the bot.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: u64,
    pub token: String,
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub kind: InteractionKind,
}

/// What the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionKind {
    /// A slash command; `path` holds the command followed by any subcommand
    /// names, e.g. `["graphs", "play-count"]`.
    Command {
        path: Vec<String>,
        options: Vec<(String, OptionValue)>,
    },
    /// A button press on a message.
    Component {
        custom_id: String,
        message_id: MessageId,
    },
}

impl Interaction {
    /// Look up a command option by name.
    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        match &self.kind {
            InteractionKind::Command { options, .. } => options
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v),
            InteractionKind::Component { .. } => None,
        }
    }

    pub fn string_option(&self, name: &str) -> Option<&str> {
        match self.option(name) {
            Some(OptionValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn integer_option(&self, name: &str) -> Option<i64> {
        match self.option(name) {
            Some(OptionValue::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn boolean_option(&self, name: &str) -> Option<bool> {
        match self.option(name) {
            Some(OptionValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }
}

/// Type of a slash command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Integer,
    Boolean,
    SubCommand,
}

/// Definition of one slash command option or subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOption {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
    /// String choices as (display name, value).
    pub choices: Vec<(String, String)>,
    /// Nested options, only for `SubCommand`.
    pub options: Vec<CommandOption>,
}

impl CommandOption {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn choice(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.choices.push((name.into(), value.into()));
        self
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}

/// Definition of one top-level slash command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub options: Vec<CommandOption>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }
}

/// A reaction added to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub user_id: UserId,
    /// Unicode emoji or `name:id` for custom emojis.
    pub emoji: String,
}

/// A message that mentions the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionEvent {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author_id: UserId,
    pub content: String,
}

/// Events the platform client forwards to the supervisor.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    Ready { bot_user_id: UserId },
    ReactionAdded(ReactionEvent),
    Interaction(Interaction),
    Mention(MentionEvent),
}
