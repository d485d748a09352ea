// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Library, performance and carousel refresh loops plus emoji upload and
//! mention replies.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tauticord_agent::carousel::{CAROUSEL_SENTINEL, CarouselService};
use tauticord_agent::context::AgentContext;
use tauticord_agent::library::LibraryService;
use tauticord_agent::performance::{HostSampler, PerformanceService, Usage};
use tauticord_agent::service::RefreshService;
use tauticord_agent::tagged;
use tauticord_config::model::{GaugeConfig, LibraryConfig, TauticordConfig};
use tauticord_core::message::{ChannelId, ChannelKind, MentionEvent, MessageId, UserId};
use tauticord_core::traits::ChatPlatform;
use tauticord_core::types::{LibraryDescriptor, LibraryItemCounts, LibraryKind};
use tauticord_test_utils::fixtures::recent_item;
use tauticord_test_utils::{BOT_USER, MockPlatform, MockRenderer, MockUpstream};

const ADMIN: UserId = UserId(7);

fn context(config: TauticordConfig, upstream: &MockUpstream, platform: &MockPlatform) -> AgentContext {
    AgentContext::new(
        config,
        Arc::new(upstream.clone()),
        Arc::new(platform.clone()),
        Arc::new(MockRenderer::new()),
    )
}

async fn gauge_names(platform: &MockPlatform, category: &str) -> Vec<String> {
    let category = platform.channel_named(category).await.expect("category exists");
    let mut names: Vec<String> = platform
        .voice_channels_in(category.id)
        .await
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    names
}

fn descriptor(section_id: u64, name: &str, kind: LibraryKind) -> LibraryDescriptor {
    LibraryDescriptor {
        section_id,
        name: name.to_string(),
        kind,
    }
}

fn library(name: &str) -> LibraryConfig {
    LibraryConfig {
        name: name.to_string(),
        ..LibraryConfig::default()
    }
}

#[tokio::test]
async fn library_counts_and_combined_totals() {
    let upstream = MockUpstream::new();
    upstream
        .add_library(descriptor(1, "Movies", LibraryKind::Movie), LibraryItemCounts::movies(1200))
        .await;
    upstream
        .add_library(descriptor(2, "4K Movies", LibraryKind::Movie), LibraryItemCounts::movies(30))
        .await;
    upstream
        .add_library(
            descriptor(3, "TV", LibraryKind::Show),
            LibraryItemCounts {
                series: 40,
                seasons: 120,
                episodes: 2000,
                ..LibraryItemCounts::default()
            },
        )
        .await;

    let mut config = TauticordConfig::default();
    config.display.thousands_separator = ",".into();
    let libraries = &mut config.stats.libraries;
    libraries.enable = true;
    libraries.libraries.push(LibraryConfig {
        movies: GaugeConfig::enabled(),
        ..library("Movies")
    });
    libraries.libraries.push(LibraryConfig {
        series: GaugeConfig::enabled(),
        episodes: GaugeConfig::enabled(),
        ..library("tv")
    });
    libraries.combined_libraries.push(LibraryConfig {
        libraries: vec!["Movies".into(), "4K Movies".into()],
        movies: GaugeConfig::enabled(),
        ..library("All Movies")
    });

    let platform = MockPlatform::new();
    let service = LibraryService::new(context(config, &upstream, &platform));
    assert_eq!(service.gauge_count(), 4);
    service.tick().await.unwrap();

    assert_eq!(
        gauge_names(&platform, "Libraries Stats").await,
        vec![
            "🎞️ tv Episodes: 2,000",
            "🎥 All Movies: 1,230",
            "🎥 Movies: 1,200",
            "📺 tv: 40",
        ]
    );
}

#[tokio::test]
async fn mixed_combined_library_is_skipped() {
    let upstream = MockUpstream::new();
    upstream
        .add_library(descriptor(1, "Movies", LibraryKind::Movie), LibraryItemCounts::movies(5))
        .await;
    upstream
        .add_library(descriptor(2, "Music", LibraryKind::Music), LibraryItemCounts::default())
        .await;

    let mut config = TauticordConfig::default();
    config.stats.libraries.enable = true;
    config.stats.libraries.combined_libraries.push(LibraryConfig {
        libraries: vec!["Movies".into(), "Music".into()],
        movies: GaugeConfig::enabled(),
        ..library("Everything")
    });
    config.stats.libraries.libraries.push(LibraryConfig {
        movies: GaugeConfig::enabled(),
        ..library("Missing")
    });

    let platform = MockPlatform::new();
    let service = LibraryService::new(context(config, &upstream, &platform));
    service.tick().await.unwrap();
    assert_eq!(platform.call_count("create_voice_channel").await, 0);
    assert_eq!(upstream.call_count("get_library_counts").await, 0);
}

#[tokio::test]
async fn recently_added_counts_within_window() {
    let upstream = MockUpstream::new();
    upstream
        .add_library(descriptor(1, "Movies", LibraryKind::Movie), LibraryItemCounts::movies(3))
        .await;
    let now = Utc::now().timestamp();
    upstream
        .set_recently_added(vec![
            recent_item("1", "New", now - 60),
            recent_item("2", "Newer", now - 3600),
            recent_item("3", "Old", now - 48 * 3600),
        ])
        .await;

    let mut config = TauticordConfig::default();
    config.stats.libraries.enable = true;
    let mut movies = library("Movies");
    movies.recently_added.enable = true;
    movies.recently_added.hours = 24;
    config.stats.libraries.libraries.push(movies);

    let platform = MockPlatform::new();
    LibraryService::new(context(config, &upstream, &platform))
        .tick()
        .await
        .unwrap();
    assert_eq!(gauge_names(&platform, "Libraries Stats").await, vec!["🆕 Movies New: 2"]);
}

#[tokio::test]
async fn disabled_libraries_make_no_calls() {
    let upstream = MockUpstream::new();
    let platform = MockPlatform::new();
    let mut config = TauticordConfig::default();
    config.stats.libraries.libraries.push(LibraryConfig {
        movies: GaugeConfig::enabled(),
        ..library("Movies")
    });
    let service = LibraryService::new(context(config, &upstream, &platform));
    assert_eq!(service.gauge_count(), 0);
    service.tick().await.unwrap();
    assert!(upstream.calls().await.is_empty());
}

struct FakeSampler;

#[async_trait]
impl HostSampler for FakeSampler {
    async fn cpu_percent(&self) -> f64 {
        12.34
    }

    async fn memory(&self) -> Usage {
        Usage {
            used: 4_000_000_000,
            total: 16_000_000_000,
        }
    }

    async fn disk(&self, path: &Path) -> Option<Usage> {
        (path == Path::new("/data")).then_some(Usage {
            used: 1_500_000_000_000,
            total: 2_000_000_000_000,
        })
    }
}

fn performance_config(disk_path: &str) -> TauticordConfig {
    let mut config = TauticordConfig::default();
    let performance = &mut config.stats.performance;
    performance.enable = true;
    performance.metrics.user_count = GaugeConfig::enabled();
    performance.metrics.cpu = GaugeConfig::enabled();
    performance.metrics.memory = GaugeConfig::enabled();
    performance.metrics.disk_space.enable = true;
    performance.metrics.disk_space.path = disk_path.to_string();
    config
}

#[tokio::test]
async fn performance_gauges_show_host_metrics() {
    let upstream = MockUpstream::new();
    upstream.add_user("alice", 1).await;
    upstream.add_user("bob", 2).await;
    let platform = MockPlatform::new();
    let service = PerformanceService::with_sampler(
        context(performance_config("/data"), &upstream, &platform),
        Box::new(FakeSampler),
    );
    service.tick().await.unwrap();

    assert_eq!(
        gauge_names(&platform, "Performance").await,
        vec![
            "👤 Users: 2",
            "💾 Disk: 1.5 TB/2.0 TB (75.0%)",
            "🔲 CPU: 12.3%",
            "🧠 Memory: 4.0 GB (25.0%)",
        ]
    );
}

#[tokio::test]
async fn missing_disk_path_is_unavailable() {
    let upstream = MockUpstream::new();
    let platform = MockPlatform::new();
    let service = PerformanceService::with_sampler(
        context(performance_config("/nowhere"), &upstream, &platform),
        Box::new(FakeSampler),
    );
    service.tick().await.unwrap();
    assert!(
        gauge_names(&platform, "Performance")
            .await
            .contains(&"💾 Disk: N/A".to_string())
    );
}

#[tokio::test]
async fn carousel_posts_then_edits_one_message() {
    let upstream = MockUpstream::new();
    upstream
        .set_recently_added(vec![recent_item("10", "Heat", 1_700_000_000)])
        .await;
    let platform = MockPlatform::new();
    let mut config = TauticordConfig::default();
    config.discord.announcements_channel_name = "announcements".into();
    config.discord.post_recently_added_message = true;
    let ctx = context(config, &upstream, &platform);

    let service = CarouselService::new(ctx.clone());
    service.on_ready().await.unwrap();
    service.tick().await.unwrap();
    service.tick().await.unwrap();

    let (channel, message) = service.message().await.expect("carousel posted");
    assert_eq!(platform.call_count("send_message").await, 1);
    let stored = platform.message(message).await.unwrap();
    let embed = &stored.reply.embeds[0];
    assert_eq!(embed.title.as_deref(), Some("Heat (2020)"));
    assert_eq!(
        embed.url.as_deref(),
        Some("https://app.plex.tv/desktop/#!/server/mock/details?key=%2Flibrary%2Fmetadata%2F10")
    );
    assert!(embed.footer.as_deref().unwrap().starts_with(CAROUSEL_SENTINEL));
    assert_eq!(stored.reply.buttons.len(), 4);

    // A restart adopts the existing message.
    let restarted = CarouselService::new(ctx);
    restarted.on_ready().await.unwrap();
    assert_eq!(restarted.message().await, Some((channel, message)));
    assert_eq!(platform.call_count("send_message").await, 1);
}

#[tokio::test]
async fn deleted_carousel_is_reposted() {
    let upstream = MockUpstream::new();
    let platform = MockPlatform::new();
    let mut config = TauticordConfig::default();
    config.discord.announcements_channel_name = "announcements".into();
    let service = CarouselService::new(context(config, &upstream, &platform));
    service.on_ready().await.unwrap();
    let (channel, first) = service.message().await.unwrap();

    platform.delete_message(channel, first).await.unwrap();
    service.tick().await.unwrap();

    let (_, second) = service.message().await.unwrap();
    assert_ne!(first, second);
    let reply = platform.message(second).await.unwrap().reply;
    assert_eq!(reply.embeds[0].description.as_deref(), Some("Nothing was added recently."));
}

#[tokio::test]
async fn emoji_assets_upload_once() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("movie.png"), b"png").unwrap();
    std::fs::write(dir.path().join("show.png"), b"png").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

    let upstream = MockUpstream::new();
    let platform = MockPlatform::new();
    platform.add_emoji("tc_movie").await;
    let ctx = context(TauticordConfig::default(), &upstream, &platform);

    let available = ctx.emojis.upload_assets(&platform, dir.path()).await.unwrap();
    assert_eq!(available, 2);
    assert_eq!(platform.call_count("upload_emoji").await, 1);
    assert_eq!(platform.call_count("upload_emoji:tc_show").await, 1);
    assert!(ctx.emojis.icon("show", "📺").await.starts_with("<:tc_show:"));
    assert_eq!(ctx.emojis.icon("music", "🎵").await, "🎵");
}

#[tokio::test]
async fn emoji_upload_needs_free_slots() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("movie.png"), b"png").unwrap();

    let upstream = MockUpstream::new();
    let platform = MockPlatform::new();
    platform.set_emoji_slots(0).await;
    let ctx = context(TauticordConfig::default(), &upstream, &platform);

    assert_eq!(ctx.emojis.upload_assets(&platform, dir.path()).await.unwrap(), 0);
    assert_eq!(platform.call_count("upload_emoji").await, 0);
    assert_eq!(ctx.emojis.icon("movie", "🎥").await, "🎥");
}

#[tokio::test]
async fn mentions_get_a_help_reply() {
    let upstream = MockUpstream::new();
    let platform = MockPlatform::new();
    let channel = platform.add_channel("general", ChannelKind::Text, None).await;
    let mut config = TauticordConfig::default();
    config.discord.admin_ids = vec![ADMIN.0];
    let ctx = context(config, &upstream, &platform);

    let mention = |author: UserId| MentionEvent {
        channel_id: channel.id,
        message_id: MessageId(1),
        author_id: author,
        content: "<@1> hi".into(),
    };

    tagged::handle_mention(&ctx, &mention(UserId(9))).await.unwrap();
    tagged::handle_mention(&ctx, &mention(ADMIN)).await.unwrap();
    tagged::handle_mention(&ctx, &mention(BOT_USER)).await.unwrap();

    let messages = platform.messages_in(channel.id).await;
    assert_eq!(messages.len(), 2);
    assert!(!messages[0].reply.content.as_deref().unwrap().contains("#tauticord"));
    assert!(messages[1].reply.content.as_deref().unwrap().contains("#tauticord"));
    assert_eq!(messages[0].channel_id, ChannelId(channel.id.0));
}
