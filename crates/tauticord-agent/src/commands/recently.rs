// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/recently added`: a private carousel of the newest items.

use tauticord_core::message::{CommandOption, CommandSpec, Interaction, OptionKind, Reply};
use tauticord_core::TauticordError;
use tracing::debug;

use super::{ephemeral, share_option};
use crate::carousel::{CAROUSEL_ITEMS, CarouselView, item_embed};
use crate::context::AgentContext;

pub fn spec() -> CommandSpec {
    CommandSpec::new("recently", "Recently added media").option(
        CommandOption::new(OptionKind::SubCommand, "added", "Show the most recently added items")
            .option(
                CommandOption::new(OptionKind::String, "media-type", "Only show one type of media")
                    .choice("Movies", "movie")
                    .choice("Shows", "show")
                    .choice("Music", "artist"),
            )
            .option(share_option()),
    )
}

pub async fn run(ctx: &AgentContext, interaction: &Interaction) -> Result<Reply, TauticordError> {
    let media_type = interaction.string_option("media-type");
    let items = ctx
        .upstream
        .get_recently_added(CAROUSEL_ITEMS, media_type, None)
        .await?;
    debug!(count = items.len(), ?media_type, "recently added items");

    let machine = match ctx.upstream.server_info().await {
        Ok(info) => info.machine_identifier,
        Err(_) => String::new(),
    };
    let base = ctx.upstream.base_url();
    let pages = items.iter().map(|item| item_embed(item, base, &machine)).collect();
    let view = CarouselView::new(interaction.id.to_string(), pages).ephemeral(ephemeral(interaction));
    Ok(ctx.carousels.insert(view))
}
