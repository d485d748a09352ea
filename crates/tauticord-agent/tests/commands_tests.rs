// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slash commands and carousel buttons routed through [`CommandRouter`].

use std::sync::Arc;

use tauticord_agent::commands::{CommandRouter, command_specs};
use tauticord_agent::context::AgentContext;
use tauticord_config::model::TauticordConfig;
use tauticord_core::message::{
    ChannelId, Interaction, InteractionKind, MessageId, OptionValue, Reply, UserId,
};
use tauticord_core::types::{ChartSeries, HomeStatCategory, HomeStatRow, NamedSeries};
use tauticord_test_utils::fixtures::{recent_item, two_stream_snapshot};
use tauticord_test_utils::{FAKE_PNG, MockPlatform, MockRenderer, MockUpstream};

const ADMIN: UserId = UserId(7);
const GUEST: UserId = UserId(8);

struct Harness {
    upstream: MockUpstream,
    platform: MockPlatform,
    renderer: MockRenderer,
    router: CommandRouter,
}

impl Harness {
    fn new() -> Self {
        let mut config = TauticordConfig::default();
        config.discord.admin_ids = vec![ADMIN.0];
        let upstream = MockUpstream::new();
        let platform = MockPlatform::new();
        let renderer = MockRenderer::new();
        let ctx = AgentContext::new(
            config,
            Arc::new(upstream.clone()),
            Arc::new(platform.clone()),
            Arc::new(renderer.clone()),
        );
        Self {
            upstream,
            platform,
            renderer,
            router: CommandRouter::new(ctx),
        }
    }

    async fn command(&self, id: u64, user: UserId, path: &[&str], options: Vec<(&str, OptionValue)>) -> Reply {
        let interaction = Interaction {
            id,
            token: format!("token-{id}"),
            user_id: user,
            channel_id: ChannelId(50),
            kind: InteractionKind::Command {
                path: path.iter().map(|p| p.to_string()).collect(),
                options: options.into_iter().map(|(n, v)| (n.to_string(), v)).collect(),
            },
        };
        self.router.handle(&interaction).await.unwrap();
        self.reply_to(id).await
    }

    async fn press(&self, id: u64, custom_id: &str) {
        let interaction = Interaction {
            id,
            token: format!("token-{id}"),
            user_id: GUEST,
            channel_id: ChannelId(50),
            kind: InteractionKind::Component {
                custom_id: custom_id.to_string(),
                message_id: MessageId(900),
            },
        };
        self.router.handle(&interaction).await.unwrap();
    }

    async fn reply_to(&self, id: u64) -> Reply {
        self.platform
            .responses()
            .await
            .into_iter()
            .find(|(i, _)| *i == id)
            .map(|(_, reply)| reply)
            .expect("interaction answered")
    }
}

fn row(label: &str, plays: u64, duration_secs: u64) -> HomeStatRow {
    HomeStatRow {
        label: label.to_string(),
        plays,
        duration_secs,
    }
}

#[tokio::test]
async fn register_publishes_every_command() {
    let h = Harness::new();
    h.router.register().await.unwrap();
    let names: Vec<String> = h.platform.commands().await.into_iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["most", "recently", "summary", "graphs"]);
    assert_eq!(command_specs().len(), 4);
}

#[tokio::test]
async fn most_movies_lists_ranked_rows() {
    let h = Harness::new();
    h.upstream
        .set_home_stats(
            HomeStatCategory::Movies,
            vec![row("Heat", 12, 0), row("Alien", 9, 0), row("Ran", 4, 0)],
        )
        .await;

    let reply = h.command(1, GUEST, &["most", "movies"], vec![]).await;
    assert!(reply.ephemeral);
    let embed = &reply.embeds[0];
    assert_eq!(embed.title.as_deref(), Some("Most popular movies in the last 30 days"));
    assert_eq!(embed.fields.len(), 3);
    assert_eq!(embed.fields[0].name, "1. Heat");
    assert_eq!(embed.fields[0].value, "12 plays");
}

#[tokio::test]
async fn most_can_be_shared_and_scoped() {
    let h = Harness::new();
    h.upstream.set_home_stats(HomeStatCategory::Shows, vec![row("Dark", 3, 0)]).await;
    let reply = h
        .command(
            2,
            GUEST,
            &["most", "shows"],
            vec![("days", OptionValue::Integer(7)), ("share", OptionValue::Boolean(true))],
        )
        .await;
    assert!(!reply.ephemeral);
    assert_eq!(
        reply.embeds[0].title.as_deref(),
        Some("Most popular shows in the last 7 days")
    );
}

#[tokio::test]
async fn most_users_is_admin_only() {
    let h = Harness::new();
    h.upstream.set_home_stats(HomeStatCategory::Users, vec![row("alice", 5, 0)]).await;

    let denied = h.command(3, GUEST, &["most", "users"], vec![]).await;
    assert!(denied.ephemeral);
    assert!(denied.content.as_deref().unwrap().contains("permission"));
    assert_eq!(h.upstream.call_count("get_home_stats").await, 0);

    let allowed = h.command(4, ADMIN, &["most", "users"], vec![]).await;
    assert_eq!(allowed.embeds[0].fields[0].name, "1. alice");
}

#[tokio::test]
async fn out_of_range_days_are_rejected() {
    let h = Harness::new();
    let reply = h
        .command(5, GUEST, &["most", "movies"], vec![("days", OptionValue::Integer(0))])
        .await;
    assert_eq!(reply.content.as_deref(), Some("Days must be between 1 and 365."));
    assert_eq!(h.upstream.call_count("get_home_stats").await, 0);
}

#[tokio::test]
async fn graphs_render_an_attachment() {
    let h = Harness::new();
    h.upstream
        .set_chart(ChartSeries {
            categories: vec!["Mon".into(), "Tue".into()],
            series: vec![NamedSeries {
                name: "Movies".into(),
                data: vec![3.0, 37.0],
            }],
        })
        .await;

    let reply = h.command(6, GUEST, &["graphs", "day-of-week"], vec![]).await;
    let attachment = reply.attachment.as_ref().expect("graph attached");
    assert_eq!(attachment.data, FAKE_PNG);
    assert_eq!(reply.embeds[0].image_url.as_deref(), Some("attachment://graph.png"));

    let rendered = h.renderer.rendered().await;
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered[0].title, "Play count by day of week (last 30 days)");
    assert_eq!(rendered[0].y_ticks, vec![25.0, 50.0, 75.0, 100.0]);
}

#[tokio::test]
async fn graphs_gate_user_breakdowns() {
    let h = Harness::new();
    let top_users = h.command(7, GUEST, &["graphs", "top-users"], vec![]).await;
    assert!(top_users.content.as_deref().unwrap().contains("permission"));

    let per_user = h
        .command(
            8,
            GUEST,
            &["graphs", "hour-of-day"],
            vec![("username", OptionValue::String("alice".into()))],
        )
        .await;
    assert!(per_user.content.as_deref().unwrap().contains("permission"));
    assert!(h.renderer.rendered().await.is_empty());
}

#[tokio::test]
async fn graphs_for_unknown_user() {
    let h = Harness::new();
    h.upstream.add_user("alice", 11).await;
    let reply = h
        .command(
            9,
            ADMIN,
            &["graphs", "hour-of-day"],
            vec![("username", OptionValue::String("bob".into()))],
        )
        .await;
    assert_eq!(reply.content.as_deref(), Some("No user named `bob` was found."));

    let reply = h
        .command(
            10,
            ADMIN,
            &["graphs", "hour-of-day"],
            vec![("username", OptionValue::String("Alice".into()))],
        )
        .await;
    assert!(reply.attachment.is_some());
    assert!(h.renderer.rendered().await[0].title.ends_with("for Alice"));
}

#[tokio::test]
async fn recently_added_pages_with_buttons() {
    let h = Harness::new();
    h.upstream
        .set_recently_added(vec![
            recent_item("1", "Heat", 1_700_000_000),
            recent_item("2", "Alien", 1_700_000_100),
        ])
        .await;

    let reply = h.command(11, GUEST, &["recently", "added"], vec![]).await;
    assert_eq!(reply.embeds[0].title.as_deref(), Some("Heat (2020)"));
    assert_eq!(reply.buttons.len(), 4);
    assert!(reply.buttons[0].disabled);
    assert!(!reply.buttons[2].disabled);

    let next = reply.buttons[2].custom_id.clone();
    h.press(12, &next).await;
    let updates = h.platform.interaction_updates().await;
    assert_eq!(updates.len(), 1);
    let page = &updates[0].1;
    assert_eq!(page.embeds[0].title.as_deref(), Some("Alien (2020)"));
    assert!(page.buttons[3].disabled);
}

#[tokio::test]
async fn stale_buttons_expire() {
    let h = Harness::new();
    h.press(13, "tc_carousel:404:next").await;
    assert!(h.platform.interaction_updates().await.is_empty());
    let reply = h.reply_to(13).await;
    assert_eq!(reply.content.as_deref(), Some("This view has expired."));
}

#[tokio::test]
async fn summary_is_admin_only() {
    let h = Harness::new();
    h.upstream.set_activity(two_stream_snapshot()).await;

    let denied = h.command(14, GUEST, &["summary"], vec![]).await;
    assert!(denied.embeds.is_empty());

    let reply = h.command(15, ADMIN, &["summary"], vec![]).await;
    assert!(reply.ephemeral);
    assert_eq!(reply.embeds[0].fields.len(), 2);
    assert!(!reply.embeds[0].footer.as_deref().unwrap().contains("terminate"));
}

#[tokio::test]
async fn upstream_failure_gets_a_generic_reply() {
    let h = Harness::new();
    h.upstream.fail_activity().await;
    let reply = h.command(16, ADMIN, &["summary"], vec![]).await;
    assert!(reply.ephemeral);
    assert!(!reply.embeds.is_empty() || reply.content.is_some());
}
