// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end activity loop behaviour against the in-memory platform.

use std::sync::Arc;
use std::time::Duration;

use tauticord_agent::activity::ActivityService;
use tauticord_agent::context::AgentContext;
use tauticord_agent::service::RefreshService;
use tauticord_config::model::{GaugeConfig, TauticordConfig};
use tauticord_core::message::{ChannelId, ChannelKind, Embed, MessageId, ReactionEvent, Reply, UserId};
use tauticord_core::traits::ChatPlatform;
use tauticord_test_utils::fixtures::{snapshot_with, two_stream_snapshot};
use tauticord_test_utils::{BOT_USER, MockPlatform, MockRenderer, MockUpstream};

const ADMIN: UserId = UserId(7);
const GUEST: UserId = UserId(8);

fn config() -> TauticordConfig {
    let mut config = TauticordConfig::default();
    config.discord.admin_ids = vec![ADMIN.0];
    let activity = &mut config.stats.activity;
    activity.enable = true;
    let types = &mut activity.stat_types;
    types.stream_count = GaugeConfig::enabled();
    types.transcode_count = GaugeConfig::enabled();
    types.bandwidth = GaugeConfig::enabled();
    types.local_bandwidth = GaugeConfig::enabled();
    types.remote_bandwidth = GaugeConfig::enabled();
    types.plex_server_availability = GaugeConfig::enabled();
    config
}

struct Harness {
    upstream: MockUpstream,
    platform: MockPlatform,
    service: ActivityService,
}

impl Harness {
    async fn new(config: TauticordConfig) -> Self {
        let upstream = MockUpstream::new();
        let platform = MockPlatform::new();
        let ctx = AgentContext::new(
            config,
            Arc::new(upstream.clone()),
            Arc::new(platform.clone()),
            Arc::new(MockRenderer::new()),
        );
        let service = ActivityService::new(ctx).with_confirmation_ttl(Duration::from_millis(50));
        service.on_ready().await.unwrap();
        Self {
            upstream,
            platform,
            service,
        }
    }

    async fn summary(&self) -> (ChannelId, MessageId) {
        self.service.summary_message().await.expect("summary posted")
    }

    async fn summary_reply(&self) -> Reply {
        let (_, message) = self.summary().await;
        self.platform.message(message).await.expect("summary exists").reply
    }

    async fn gauge_names(&self) -> Vec<String> {
        let category = self.platform.channel_named("Tautulli Stats").await.expect("category");
        let mut names: Vec<String> = self
            .platform
            .voice_channels_in(category.id)
            .await
            .into_iter()
            .map(|c| c.name)
            .collect();
        names.sort();
        names
    }

    async fn reactions(&self) -> Vec<String> {
        let (_, message) = self.summary().await;
        self.platform.reactions_on(message).await
    }

    fn reaction(&self, channel: ChannelId, message: MessageId, user: UserId, emoji: &str) -> ReactionEvent {
        ReactionEvent {
            channel_id: channel,
            message_id: message,
            user_id: user,
            emoji: emoji.to_string(),
        }
    }
}

#[tokio::test]
async fn no_activity() {
    let h = Harness::new(config()).await;
    h.service.tick().await.unwrap();

    let reply = h.summary_reply().await;
    let embed = &reply.embeds[0];
    assert_eq!(embed.title.as_deref(), Some("No current activity"));
    assert!(embed.fields.is_empty());
    assert!(embed.footer.as_deref().unwrap().starts_with("Updated "));
    assert!(h.reactions().await.is_empty());

    assert_eq!(
        h.gauge_names().await,
        vec![
            "Plex Status: 🟢",
            "🌊 Current Streams: 0",
            "🌐 Remote Bandwidth: 0.0 bps",
            "🏠 Local Bandwidth: 0.0 bps",
            "📶 Bandwidth: 0.0 bps",
            "🔄 Current Transcodes: 0",
        ]
    );
}

#[tokio::test]
async fn two_streams_one_transcode() {
    let h = Harness::new(config()).await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();

    let names = h.gauge_names().await;
    assert!(names.contains(&"🌊 Current Streams: 2".to_string()));
    assert!(names.contains(&"🔄 Current Transcodes: 1".to_string()));
    assert!(names.contains(&"📶 Bandwidth: 13.2 Mbps".to_string()));
    assert!(names.contains(&"🏠 Local Bandwidth: 4.4 Mbps".to_string()));
    assert!(names.contains(&"🌐 Remote Bandwidth: 8.8 Mbps".to_string()));

    let reply = h.summary_reply().await;
    assert_eq!(reply.embeds[0].fields.len(), 2);
    assert!(reply.embeds[0].footer.as_deref().unwrap().contains("To terminate a stream"));
    assert_eq!(h.reactions().await, vec!["1️⃣", "2️⃣"]);
}

#[tokio::test]
async fn admin_terminates_stream_one() {
    let h = Harness::new(config()).await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();
    let (channel, message) = h.summary().await;

    h.platform.inject_reaction(message, ADMIN, "1️⃣").await;
    let event = h.reaction(channel, message, ADMIN, "1️⃣");
    assert!(h.service.handle_reaction(&event).await.unwrap());

    assert_eq!(
        h.upstream.terminated().await,
        vec![("A".to_string(), "Your stream has ended.".to_string())]
    );
    assert_eq!(h.platform.reactors(message, "1️⃣").await, vec![BOT_USER]);
    assert_eq!(h.platform.messages_in(channel).await.len(), 2);

    // A double-fired reaction does not terminate again.
    assert!(h.service.handle_reaction(&event).await.unwrap());
    assert_eq!(h.upstream.call_count("terminate_session").await, 1);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(h.platform.messages_in(channel).await.len(), 1);

    let mut remaining = two_stream_snapshot();
    remaining.sessions.remove(0);
    h.upstream.set_activity(remaining).await;
    h.service.tick().await.unwrap();

    let reply = h.summary_reply().await;
    assert_eq!(reply.embeds[0].fields.len(), 1);
    assert!(reply.embeds[0].fields[0].name.contains("Title B"));
    assert_eq!(h.reactions().await, vec!["1️⃣"]);
    assert_eq!(h.service.session_for(1).await.as_deref(), Some("B"));
}

#[tokio::test]
async fn upstream_down_mid_tick() {
    let h = Harness::new(config()).await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();

    h.upstream.fail_activity().await;
    h.service.tick().await.unwrap();

    let reply = h.summary_reply().await;
    assert!(reply.embeds[0].footer.as_deref().unwrap().starts_with("Connection lost."));
    assert!(h.reactions().await.is_empty());
    let names = h.gauge_names().await;
    assert!(names.contains(&"🌊 Current Streams: 2".to_string()));
    assert!(names.contains(&"Plex Status: 🟢".to_string()));

    h.upstream.set_plex_online(false).await;
    h.service.tick().await.unwrap();
    assert!(h.gauge_names().await.contains(&"Plex Status: 🔴".to_string()));
}

#[tokio::test]
async fn reaction_from_non_admin_is_ignored() {
    let h = Harness::new(config()).await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();
    let (channel, message) = h.summary().await;

    h.platform.inject_reaction(message, GUEST, "1️⃣").await;
    let event = h.reaction(channel, message, GUEST, "1️⃣");
    assert!(!h.service.handle_reaction(&event).await.unwrap());
    assert_eq!(h.upstream.call_count("terminate_session").await, 0);

    h.service.tick().await.unwrap();
    assert_eq!(h.reactions().await, vec!["1️⃣", "2️⃣"]);
}

#[tokio::test]
async fn reactions_on_other_messages_or_out_of_range_are_ignored() {
    let h = Harness::new(config()).await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();
    let (channel, message) = h.summary().await;

    let elsewhere = h.reaction(channel, MessageId(message.0 + 1000), ADMIN, "1️⃣");
    assert!(!h.service.handle_reaction(&elsewhere).await.unwrap());
    let out_of_range = h.reaction(channel, message, ADMIN, "3️⃣");
    assert!(!h.service.handle_reaction(&out_of_range).await.unwrap());
    let own = h.reaction(channel, message, BOT_USER, "1️⃣");
    assert!(!h.service.handle_reaction(&own).await.unwrap());
    assert_eq!(h.upstream.call_count("terminate_session").await, 0);
}

#[tokio::test]
async fn reaction_set_tracks_stream_count() {
    let h = Harness::new(config()).await;

    h.upstream.set_activity(snapshot_with(40)).await;
    h.service.tick().await.unwrap();
    let reactions = h.reactions().await;
    assert_eq!(reactions.len(), 36);
    assert_eq!(reactions.last().map(String::as_str), Some("🇿"));

    h.upstream.set_activity(snapshot_with(3)).await;
    h.service.tick().await.unwrap();
    assert_eq!(h.reactions().await, vec!["1️⃣", "2️⃣", "3️⃣"]);

    h.platform.clear_calls().await;
    h.upstream.set_activity(snapshot_with(0)).await;
    h.service.tick().await.unwrap();
    assert!(h.reactions().await.is_empty());
    assert_eq!(h.platform.call_count("clear_reactions").await, 1);
    assert_eq!(h.platform.call_count("remove_reaction_emoji").await, 0);
}

#[tokio::test]
async fn summary_is_edited_until_someone_else_posts() {
    let h = Harness::new(config()).await;
    h.service.tick().await.unwrap();
    h.service.tick().await.unwrap();
    assert_eq!(h.platform.call_count("send_message").await, 1);
    assert_eq!(h.platform.call_count("edit_message").await, 1);
    let (channel, first) = h.summary().await;

    let foreign = h.platform.inject_message(channel, GUEST, Reply::text("hello")).await;
    h.service.tick().await.unwrap();

    let (_, second) = h.summary().await;
    assert!(second > foreign);
    assert!(h.platform.message(first).await.is_none());
    assert_eq!(h.platform.messages_in(channel).await.len(), 2);
}

#[tokio::test]
async fn existing_summary_channel_is_reused() {
    let h = Harness::new(config()).await;
    let channel = h.platform.add_channel("tauticord", ChannelKind::Text, None).await;
    h.service.tick().await.unwrap();
    assert_eq!(h.summary().await.0, channel.id);
    assert_eq!(h.platform.call_count("create_text_channel").await, 0);
}

#[tokio::test]
async fn gauges_stay_unique_over_many_ticks() {
    let h = Harness::new(config()).await;
    for n in [0, 2, 2, 5, 1] {
        h.upstream.set_activity(snapshot_with(n)).await;
        h.service.tick().await.unwrap();
    }
    assert_eq!(h.gauge_names().await.len(), 6);
    assert_eq!(h.platform.call_count("create_voice_channel").await, 6);
    assert_eq!(h.platform.call_count("create_category").await, 1);
}

#[tokio::test]
async fn without_plex_pass_no_reactions_are_offered() {
    let h = {
        let upstream = MockUpstream::new();
        upstream.set_plex_pass(false).await;
        let platform = MockPlatform::new();
        let ctx = AgentContext::new(
            config(),
            Arc::new(upstream.clone()),
            Arc::new(platform.clone()),
            Arc::new(MockRenderer::new()),
        );
        let service = ActivityService::new(ctx);
        service.on_ready().await.unwrap();
        Harness {
            upstream,
            platform,
            service,
        }
    };
    assert!(!h.service.termination_enabled());

    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();
    assert!(h.reactions().await.is_empty());
    let reply = h.summary_reply().await;
    assert!(!reply.embeds[0].footer.as_deref().unwrap().contains("terminate"));

    let (channel, message) = h.summary().await;
    let event = h.reaction(channel, message, ADMIN, "1️⃣");
    assert!(!h.service.handle_reaction(&event).await.unwrap());
}

#[tokio::test]
async fn configured_plex_pass_overrides_server() {
    let mut config = config();
    config.tautulli.plex_pass = Some(true);
    let h = Harness::new(config).await;
    h.upstream.set_plex_pass(false).await;
    assert!(h.service.termination_enabled());
    assert_eq!(h.upstream.call_count("server_info").await, 0);
}

#[tokio::test]
async fn presence_counts_streams() {
    let mut config = config();
    config.discord.status_message = "{stream_count} streams".into();
    let h = Harness::new(config).await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();
    assert_eq!(h.platform.presence().await.as_deref(), Some("2 streams"));
}

#[tokio::test]
async fn rate_limited_gauge_does_not_fail_tick() {
    let h = Harness::new(config()).await;
    h.service.tick().await.unwrap();
    h.platform.rate_limit_op("rename_channel").await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();
    assert_eq!(h.reactions().await, vec!["1️⃣", "2️⃣"]);
}

#[tokio::test]
async fn summary_deleted_mid_tick_is_reposted() {
    let h = Harness::new(config()).await;
    h.upstream.set_activity(two_stream_snapshot()).await;
    h.service.tick().await.unwrap();
    let (channel, first) = h.summary().await;

    h.platform.not_found_op("reactions").await;
    h.service.tick().await.unwrap();
    assert!(h.service.summary_message().await.is_none());

    h.platform.clear_failures().await;
    h.platform.delete_message(channel, first).await.unwrap();
    h.service.tick().await.unwrap();

    let (_, second) = h.summary().await;
    assert_ne!(second, first);
    assert_eq!(h.reactions().await, vec!["1️⃣", "2️⃣"]);
}

#[tokio::test]
async fn own_confirmation_is_not_adopted_as_summary() {
    let h = Harness::new(config()).await;
    let channel = h.platform.add_channel("tauticord", ChannelKind::Text, None).await;
    let summary = h
        .platform
        .inject_message(
            channel.id,
            BOT_USER,
            Reply::embed(Embed::new().title("No current activity").footer("Updated 18:00")),
        )
        .await;
    let confirmation = h
        .platform
        .inject_message(channel.id, BOT_USER, Reply::text("Stream 1 was terminated"))
        .await;

    h.service.tick().await.unwrap();

    assert_eq!(h.summary().await.1, summary);
    assert_eq!(h.platform.call_count("send_message").await, 0);
    let untouched = h.platform.message(confirmation).await.expect("confirmation kept");
    assert!(untouched.reply.embeds.is_empty());
}

#[tokio::test]
async fn lone_confirmation_leads_to_a_fresh_summary() {
    let h = Harness::new(config()).await;
    let channel = h.platform.add_channel("tauticord", ChannelKind::Text, None).await;
    let confirmation = h
        .platform
        .inject_message(channel.id, BOT_USER, Reply::text("Stream 1 was terminated"))
        .await;

    h.service.tick().await.unwrap();

    let (_, summary) = h.summary().await;
    assert_ne!(summary, confirmation);
    assert_eq!(h.platform.call_count("send_message").await, 1);
    assert!(h.platform.message(confirmation).await.unwrap().reply.embeds.is_empty());
}
