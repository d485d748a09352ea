// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Tauticord.
//!
//! Holds the error type, the domain types reported by the monitoring API,
//! platform-neutral chat objects, and the traits behind which the monitoring
//! API client, the chat platform client and the chart renderer live.

pub mod error;
pub mod message;
pub mod traits;
pub mod types;

pub use error::{EXIT_FATAL, EXIT_INVALID_TOKEN, TauticordError};
pub use message::{
    Attachment, Button, ChannelId, ChannelInfo, ChannelKind, CommandOption, CommandSpec, Embed,
    EmbedField, Interaction, InteractionKind, MentionEvent, MessageId, MessageInfo, OptionKind,
    OptionValue, PlatformEvent, ReactionEvent, Reply, UserId,
};
pub use traits::{
    ChartRenderer, ChartSpec, ChartStyle, ChatPlatform, GuildEmoji, PluginAdapter, UpstreamApi,
};
pub use types::*;
