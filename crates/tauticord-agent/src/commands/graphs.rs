// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/graphs {chart}`: play statistics rendered as a PNG chart.

use tauticord_core::message::{Attachment, CommandOption, CommandSpec, Embed, Interaction, OptionKind, Reply};
use tauticord_core::traits::{ChartSpec, ChartStyle};
use tauticord_core::types::{ChartKind, ChartSeries, StatMetric};
use tauticord_core::TauticordError;

use super::{days, days_option, denied, ephemeral, invalid, metric, metric_option, share_option};
use crate::context::AgentContext;
use crate::text::SUMMARY_COLOR;

const GRAPH_FILE: &str = "graph.png";

/// Four evenly spaced ticks up to the smallest power of ten not below `max`.
pub fn y_ticks(max: f64) -> Vec<f64> {
    let mut bound = 1.0;
    while bound < max {
        bound *= 10.0;
    }
    (1..=4).map(|i| bound * f64::from(i) / 4.0).collect()
}

fn describe(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::DayOfWeek => "Plays grouped by day of the week",
        ChartKind::HourOfDay => "Plays grouped by hour of the day",
        ChartKind::TopPlatforms => "Plays on the ten most used platforms",
        ChartKind::TopUsers => "Plays of the ten most active users",
        ChartKind::DailyByMediaType => "Daily plays split by media type",
    }
}

pub fn spec() -> CommandSpec {
    let mut spec = CommandSpec::new("graphs", "Charts of play counts and durations");
    for kind in ChartKind::ALL {
        spec = spec.option(
            CommandOption::new(OptionKind::SubCommand, kind.to_string(), describe(kind))
                .option(metric_option())
                .option(days_option())
                .option(CommandOption::new(OptionKind::String, "username", "Only count plays of this user"))
                .option(share_option()),
        );
    }
    spec
}

/// Durations arrive in seconds and are charted in hours.
fn scale(mut series: ChartSeries, metric: StatMetric) -> ChartSeries {
    if metric == StatMetric::Duration {
        for named in &mut series.series {
            for value in &mut named.data {
                *value /= 3600.0;
            }
        }
    }
    series
}

/// Renderer input for one chart.
pub fn chart_spec(kind: ChartKind, metric: StatMetric, days: u32, username: Option<&str>, series: ChartSeries) -> ChartSpec {
    let series = scale(series, metric);
    let measure = match metric {
        StatMetric::Plays => "Play count",
        StatMetric::Duration => "Play duration",
    };
    let mut title = format!("{measure} {} (last {days} days)", kind.title());
    if let Some(user) = username {
        title.push_str(&format!(" for {user}"));
    }
    ChartSpec {
        title,
        style: match kind {
            ChartKind::DailyByMediaType => ChartStyle::Line,
            _ => ChartStyle::Bar,
        },
        y_ticks: y_ticks(series.max_value()),
        series,
        y_label: match metric {
            StatMetric::Plays => "Plays".to_string(),
            StatMetric::Duration => "Hours".to_string(),
        },
    }
}

pub async fn run(ctx: &AgentContext, interaction: &Interaction, chart: &str) -> Result<Reply, TauticordError> {
    let Ok(kind) = chart.parse::<ChartKind>() else {
        return Ok(invalid(format!("Unknown graph `{chart}`.")));
    };
    let username = interaction.string_option("username").filter(|u| !u.trim().is_empty());
    let admin = ctx.is_admin(interaction.user_id.0);
    if (kind == ChartKind::TopUsers || username.is_some()) && !admin {
        return Ok(denied());
    }
    let days = match days(interaction) {
        Ok(days) => days,
        Err(reply) => return Ok(reply),
    };
    let metric = metric(interaction);

    let user_id = match username {
        Some(name) => match ctx.upstream.get_user_id(name).await? {
            Some(id) => Some(id),
            None => return Ok(invalid(format!("No user named `{name}` was found."))),
        },
        None => None,
    };

    let series = ctx.upstream.get_chart_series(kind, days, metric, user_id).await?;
    let spec = chart_spec(kind, metric, days, username, series);
    let png = ctx.renderer.render(&spec).await?;

    let embed = Embed::new()
        .title(spec.title)
        .color(SUMMARY_COLOR)
        .image(format!("attachment://{GRAPH_FILE}"));
    Ok(Reply::embed(embed)
        .attachment(Attachment {
            filename: GRAPH_FILE.to_string(),
            data: png,
        })
        .ephemeral(ephemeral(interaction)))
}
