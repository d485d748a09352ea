// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/most {category}`: top five of a home statistic.

use tauticord_core::message::{CommandOption, CommandSpec, Embed, Interaction, OptionKind, Reply};
use tauticord_core::types::{HomeStatCategory, HomeStatRow, StatMetric};
use tauticord_core::TauticordError;

use super::{days, days_option, denied, ephemeral, invalid, metric, metric_option, share_option};
use crate::context::AgentContext;
use crate::format;
use crate::text::SUMMARY_COLOR;

/// Rows shown per statistic.
pub const TOP_N: u32 = 5;

fn describe(category: HomeStatCategory) -> &'static str {
    match category {
        HomeStatCategory::Movies => "Most popular movies",
        HomeStatCategory::Shows => "Most popular shows",
        HomeStatCategory::Artists => "Most popular artists",
        HomeStatCategory::Libraries => "Most active libraries",
        HomeStatCategory::Users => "Most active users",
        HomeStatCategory::Platforms => "Most active platforms",
    }
}

pub fn spec() -> CommandSpec {
    let mut spec = CommandSpec::new("most", "Top items by play count or play duration");
    for category in HomeStatCategory::ALL {
        spec = spec.option(
            CommandOption::new(OptionKind::SubCommand, category.to_string(), describe(category))
                .option(days_option())
                .option(metric_option())
                .option(share_option()),
        );
    }
    spec
}

fn row_value(row: &HomeStatRow, metric: StatMetric, separator: &str) -> String {
    match metric {
        StatMetric::Plays => format!("{} plays", format::count(row.plays, separator)),
        StatMetric::Duration => format::long_duration(row.duration_secs),
    }
}

/// The ranking embed for `rows`.
pub fn embed(category: HomeStatCategory, days: u32, metric: StatMetric, rows: &[HomeStatRow], separator: &str) -> Embed {
    let mut embed = Embed::new()
        .title(format!("{} in the last {days} days", describe(category)))
        .color(SUMMARY_COLOR);
    if rows.is_empty() {
        return embed.description("No data for this period.");
    }
    for (i, row) in rows.iter().enumerate() {
        embed = embed.field(format!("{}. {}", i + 1, row.label), row_value(row, metric, separator), false);
    }
    embed.footer(match metric {
        StatMetric::Plays => "Ranked by play count",
        StatMetric::Duration => "Ranked by play duration",
    })
}

pub async fn run(ctx: &AgentContext, interaction: &Interaction, category: &str) -> Result<Reply, TauticordError> {
    let Ok(category) = category.parse::<HomeStatCategory>() else {
        return Ok(invalid(format!("Unknown statistic `{category}`.")));
    };
    if category == HomeStatCategory::Users && !ctx.is_admin(interaction.user_id.0) {
        return Ok(denied());
    }
    let days = match days(interaction) {
        Ok(days) => days,
        Err(reply) => return Ok(reply),
    };
    let metric = metric(interaction);

    let rows = ctx.upstream.get_home_stats(category, days, TOP_N, metric).await?;
    let rows: Vec<HomeStatRow> = rows.into_iter().take(TOP_N as usize).collect();
    let separator = ctx.text.thousands_separator();
    Ok(Reply::embed(embed(category, days, metric, &rows, separator)).ephemeral(ephemeral(interaction)))
}
