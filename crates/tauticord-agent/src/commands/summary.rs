// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/summary`: the current activity embed on demand.

use chrono::Utc;
use tauticord_core::message::{CommandSpec, Interaction, Reply};
use tauticord_core::TauticordError;
use tracing::warn;

use super::{denied, ephemeral, share_option};
use crate::context::AgentContext;

pub fn spec() -> CommandSpec {
    CommandSpec::new("summary", "Show the current activity summary").option(share_option())
}

pub async fn run(ctx: &AgentContext, interaction: &Interaction) -> Result<Reply, TauticordError> {
    if !ctx.is_admin(interaction.user_id.0) {
        return Ok(denied());
    }
    let now = Utc::now();
    let embed = match ctx.upstream.get_activity().await {
        Ok(snapshot) => {
            let icons = ctx.icons().await;
            ctx.text.activity_embed(&snapshot, now, &icons, false)
        }
        Err(e) => {
            warn!(error = %e, "activity unavailable for summary command");
            ctx.text.connection_lost_embed(now)
        }
    };
    Ok(Reply::embed(embed).ephemeral(ephemeral(interaction)))
}
