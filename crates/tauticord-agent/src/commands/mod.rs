// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands and button routing.
//!
//! Commands are read-only queries against the monitoring API. Each module
//! exposes its [`CommandSpec`] and a `run` function returning the reply;
//! [`CommandRouter`] dispatches interactions and sends the response.

pub mod graphs;
pub mod most;
pub mod recently;
pub mod summary;

use tauticord_core::message::{CommandOption, CommandSpec, Interaction, InteractionKind, OptionKind, Reply};
use tauticord_core::types::StatMetric;
use tauticord_core::TauticordError;
use tracing::{debug, error, info};

use crate::context::AgentContext;

/// Default look-back window of statistics commands.
pub const DEFAULT_DAYS: u32 = 30;

/// Longest accepted look-back window.
pub const MAX_DAYS: u32 = 365;

pub(crate) fn days_option() -> CommandOption {
    CommandOption::new(OptionKind::Integer, "days", "Number of days to look back (default 30)")
}

pub(crate) fn metric_option() -> CommandOption {
    CommandOption::new(OptionKind::String, "metric", "Rank by play count or play duration")
        .choice("Plays", "plays")
        .choice("Duration", "duration")
}

pub(crate) fn share_option() -> CommandOption {
    CommandOption::new(OptionKind::Boolean, "share", "Post the result for everyone in the channel")
}

/// Error replies that end a command early.
pub(crate) fn denied() -> Reply {
    Reply::text("You do not have permission to use this command.").ephemeral(true)
}

pub(crate) fn invalid(message: impl Into<String>) -> Reply {
    Reply::text(message).ephemeral(true)
}

/// The `days` option, defaulted and range-checked.
pub(crate) fn days(interaction: &Interaction) -> Result<u32, Reply> {
    match interaction.integer_option("days") {
        None => Ok(DEFAULT_DAYS),
        Some(days) if (1..=i64::from(MAX_DAYS)).contains(&days) => Ok(days as u32),
        Some(_) => Err(invalid(format!("Days must be between 1 and {MAX_DAYS}."))),
    }
}

pub(crate) fn metric(interaction: &Interaction) -> StatMetric {
    interaction
        .string_option("metric")
        .and_then(|m| m.parse().ok())
        .unwrap_or(StatMetric::Plays)
}

/// Replies are private unless the user asked to share them.
pub(crate) fn ephemeral(interaction: &Interaction) -> bool {
    !interaction.boolean_option("share").unwrap_or(false)
}

/// Every command this agent registers.
pub fn command_specs() -> Vec<CommandSpec> {
    vec![most::spec(), recently::spec(), summary::spec(), graphs::spec()]
}

/// Dispatches interactions to commands and carousel buttons.
pub struct CommandRouter {
    ctx: AgentContext,
}

impl CommandRouter {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }

    /// Replace the guild's commands with [`command_specs`].
    pub async fn register(&self) -> Result<(), TauticordError> {
        let specs = command_specs();
        self.ctx.platform.register_commands(&specs).await?;
        info!(count = specs.len(), "slash commands registered");
        Ok(())
    }

    pub async fn handle(&self, interaction: &Interaction) -> Result<(), TauticordError> {
        match &interaction.kind {
            InteractionKind::Component { custom_id, .. } => {
                let reply = self.ctx.carousels.press(custom_id);
                match reply {
                    Some(reply) => self.ctx.platform.update_interaction_message(interaction, &reply).await,
                    None => {
                        debug!(custom_id = %custom_id, "button for unknown carousel");
                        self.ctx
                            .platform
                            .respond(interaction, &invalid("This view has expired."))
                            .await
                    }
                }
            }
            InteractionKind::Command { path, .. } => {
                let path: Vec<&str> = path.iter().map(String::as_str).collect();
                debug!(command = ?path, user = %interaction.user_id, "slash command");
                let result = match path.as_slice() {
                    ["most", category] => most::run(&self.ctx, interaction, category).await,
                    ["recently", "added"] => recently::run(&self.ctx, interaction).await,
                    ["summary"] => summary::run(&self.ctx, interaction).await,
                    ["graphs", chart] => graphs::run(&self.ctx, interaction, chart).await,
                    _ => Ok(invalid("Unknown command.")),
                };
                let reply = result.unwrap_or_else(|e| {
                    error!(command = ?path, error = %e, "command failed");
                    invalid("Something went wrong while talking to Tautulli. Please try again later.")
                });
                self.ctx.platform.respond(interaction, &reply).await
            }
        }
    }
}
