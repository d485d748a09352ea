// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voice-channel gauges.
//!
//! A gauge is one voice channel whose name reads `{emoji} {name}: {value}`.
//! Channels are found by configured id, then by name prefix inside the
//! service's category, and created only when neither matches. Discord and
//! users sometimes inject zero-width characters into names, so they are
//! stripped before comparing.

use std::collections::HashMap;
use std::sync::Arc;

use tauticord_config::model::GaugeConfig;
use tauticord_config::model::labels::GaugeLabel;
use tauticord_core::message::{ChannelId, ChannelInfo, ChannelKind};
use tauticord_core::traits::ChatPlatform;
use tauticord_core::TauticordError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::format;

/// Which bandwidth an activity gauge shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BandwidthKind {
    Total,
    Local,
    Remote,
}

/// Which count a library gauge shows. Order matches
/// `tauticord_config::validation::library_gauges`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryCountKind {
    Movies,
    Series,
    Seasons,
    Episodes,
    Artists,
    Albums,
    Tracks,
    RecentlyAdded,
}

impl LibraryCountKind {
    pub const ALL: [LibraryCountKind; 8] = [
        Self::Movies,
        Self::Series,
        Self::Seasons,
        Self::Episodes,
        Self::Artists,
        Self::Albums,
        Self::Tracks,
        Self::RecentlyAdded,
    ];
}

/// Which host metric a performance gauge shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemMetricKind {
    Cpu,
    Memory,
    Disk,
    UserCount,
}

/// The kinds of gauge the services maintain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gauge {
    StreamCount,
    TranscodeCount,
    Bandwidth(BandwidthKind),
    LibraryCount(LibraryCountKind),
    SystemMetric(SystemMetricKind),
    PlexStatus,
}

/// A value to display on a gauge.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeValue {
    Count(u64),
    BandwidthKbps(u64),
    Online(bool),
    Text(String),
    Unavailable,
}

pub const ONLINE_EMOJI: &str = "🟢";
pub const OFFLINE_EMOJI: &str = "🔴";

impl Gauge {
    /// The text after `prefix: ` for `value`.
    pub fn render(&self, value: &GaugeValue, thousands_separator: &str) -> String {
        match value {
            GaugeValue::Count(n) => format::count(*n, thousands_separator),
            GaugeValue::BandwidthKbps(kbps) => format::bandwidth(*kbps),
            GaugeValue::Online(true) => ONLINE_EMOJI.to_string(),
            GaugeValue::Online(false) => OFFLINE_EMOJI.to_string(),
            GaugeValue::Text(text) => text.clone(),
            GaugeValue::Unavailable => "N/A".to_string(),
        }
    }
}

/// A configured gauge: its kind plus the resolved emoji and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeBinding {
    pub gauge: Gauge,
    pub emoji: String,
    pub name: String,
    pub channel_id: Option<ChannelId>,
}

impl GaugeBinding {
    /// Bind `gauge` using `config` overrides over `label` defaults.
    pub fn new(gauge: Gauge, config: &GaugeConfig, label: GaugeLabel) -> Self {
        Self::with_defaults(gauge, config, label.emoji, label.name)
    }

    pub fn with_defaults(gauge: Gauge, config: &GaugeConfig, emoji: &str, name: &str) -> Self {
        Self {
            gauge,
            emoji: config.emoji(emoji).to_string(),
            name: config.name(name).to_string(),
            channel_id: (config.voice_channel_id != 0).then_some(ChannelId(config.voice_channel_id)),
        }
    }

    /// `{emoji} {name}`, trimmed.
    pub fn prefix(&self) -> String {
        format!("{} {}", self.emoji, self.name).trim().to_string()
    }

    /// Full channel name for an already rendered value.
    pub fn channel_name(&self, rendered: &str) -> String {
        if rendered.is_empty() {
            self.prefix()
        } else {
            format!("{}: {rendered}", self.prefix())
        }
    }
}

/// Remove zero-width and other invisible characters, then trim.
pub fn strip_invisible(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// True when `channel_name` belongs to the gauge with `prefix`.
pub fn matches_prefix(channel_name: &str, prefix: &str) -> bool {
    let name = strip_invisible(channel_name);
    let prefix = strip_invisible(prefix);
    name == prefix || name.starts_with(&format!("{prefix}:"))
}

/// Finds, creates and renames the voice channels of one category.
/// Gauge categories by name, shared by every service so that two services
/// naming the same category never both create it.
pub struct CategoryDirectory {
    platform: Arc<dyn ChatPlatform>,
    ids: Mutex<HashMap<String, ChannelId>>,
}

impl CategoryDirectory {
    pub fn new(platform: Arc<dyn ChatPlatform>) -> Self {
        Self {
            platform,
            ids: Mutex::new(HashMap::new()),
        }
    }

    /// Id of the category called `name`, creating it when missing.
    /// `channels` is a listing taken by the caller; a fresh one is fetched
    /// under the lock before anything is created.
    pub async fn resolve(&self, name: &str, channels: &[ChannelInfo]) -> Result<ChannelId, TauticordError> {
        let mut ids = self.ids.lock().await;
        if let Some(&id) = ids.get(name)
            && channels.iter().any(|c| c.id == id)
        {
            return Ok(id);
        }
        let fresh = self.platform.list_channels().await?;
        let id = match fresh
            .iter()
            .find(|c| c.kind == ChannelKind::Category && strip_invisible(&c.name) == name)
        {
            Some(category) => category.id,
            None => {
                info!(category = %name, "creating gauge category");
                self.platform.create_category(name).await?.id
            }
        };
        ids.insert(name.to_string(), id);
        Ok(id)
    }
}

pub struct GaugeManager {
    platform: Arc<dyn ChatPlatform>,
    category_name: String,
    thousands_separator: String,
    categories: Arc<CategoryDirectory>,
    resolved: Mutex<HashMap<String, ChannelId>>,
}

impl GaugeManager {
    pub fn new(
        platform: Arc<dyn ChatPlatform>,
        category_name: impl Into<String>,
        thousands_separator: impl Into<String>,
    ) -> Self {
        let categories = Arc::new(CategoryDirectory::new(platform.clone()));
        Self {
            platform,
            category_name: category_name.into(),
            thousands_separator: thousands_separator.into(),
            categories,
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve categories through a directory shared with other managers.
    pub fn with_categories(mut self, categories: Arc<CategoryDirectory>) -> Self {
        self.categories = categories;
        self
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    async fn category_id(&self, channels: &[ChannelInfo]) -> Result<ChannelId, TauticordError> {
        self.categories.resolve(&self.category_name, channels).await
    }

    /// Show `value` on the gauge, creating its channel when needed.
    pub async fn set(&self, binding: &GaugeBinding, value: &GaugeValue) -> Result<(), TauticordError> {
        let rendered = binding.gauge.render(value, &self.thousands_separator);
        let name = binding.channel_name(&rendered);
        let prefix = binding.prefix();

        let channels = self.platform.list_channels().await?;

        let channel = match binding.channel_id {
            Some(id) => channels
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or_else(|| TauticordError::NotFound {
                    what: format!("voice channel {id} for gauge {prefix}"),
                })?,
            None => {
                let category = self.category_id(&channels).await?;
                let remembered = self.resolved.lock().await.get(&prefix).copied();
                let found = remembered
                    .and_then(|id| channels.iter().find(|c| c.id == id))
                    .or_else(|| {
                        channels.iter().find(|c| {
                            c.kind == ChannelKind::Voice
                                && c.parent_id == Some(category)
                                && matches_prefix(&c.name, &prefix)
                        })
                    })
                    .cloned();
                match found {
                    Some(channel) => channel,
                    None => {
                        info!(gauge = %prefix, name = %name, "creating gauge channel");
                        let created = self.platform.create_voice_channel(&name, Some(category)).await?;
                        self.resolved.lock().await.insert(prefix, created.id);
                        return Ok(());
                    }
                }
            }
        };
        self.resolved.lock().await.insert(prefix, channel.id);

        if channel.name == name {
            debug!(channel = %channel.id, name = %name, "gauge unchanged");
            return Ok(());
        }
        self.platform.rename_channel(channel.id, &name).await
    }

    /// Report a failed gauge update without interrupting the tick.
    pub fn log_failure(binding: &GaugeBinding, error: &TauticordError) {
        match error {
            TauticordError::RateLimited(_) => {
                warn!(gauge = %binding.prefix(), "gauge update rate limited, deferring to next tick")
            }
            other => warn!(gauge = %binding.prefix(), error = %other, "gauge update failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tauticord_config::model::labels;
    use tauticord_test_utils::MockPlatform;

    fn binding(config: &GaugeConfig) -> GaugeBinding {
        GaugeBinding::new(Gauge::StreamCount, config, labels::STREAM_COUNT)
    }

    #[test]
    fn values_render() {
        let gauge = Gauge::Bandwidth(BandwidthKind::Total);
        assert_eq!(gauge.render(&GaugeValue::BandwidthKbps(13_500), ""), "13.2 Mbps");
        assert_eq!(gauge.render(&GaugeValue::Count(1500), ","), "1,500");
        assert_eq!(Gauge::PlexStatus.render(&GaugeValue::Online(false), ""), OFFLINE_EMOJI);
        assert_eq!(gauge.render(&GaugeValue::Unavailable, ""), "N/A");
    }

    #[test]
    fn channel_name_and_prefix() {
        let b = binding(&GaugeConfig::enabled());
        assert_eq!(b.prefix(), "🌊 Current Streams");
        assert_eq!(b.channel_name("2"), "🌊 Current Streams: 2");
        assert_eq!(b.channel_name(""), "🌊 Current Streams");
    }

    #[test]
    fn prefix_matching_ignores_zero_width() {
        assert!(matches_prefix("🌊 Current Streams\u{200B}: 3", "🌊 Current Streams"));
        assert!(matches_prefix(" 🌊 Current Streams ", "🌊 Current Streams"));
        assert!(!matches_prefix("🌊 Current Streams Total: 3", "🌊 Current Streams"));
    }

    #[tokio::test]
    async fn second_set_renames_instead_of_creating() {
        let platform = MockPlatform::new();
        let manager = GaugeManager::new(Arc::new(platform.clone()), "Tautulli Stats", "");
        let b = binding(&GaugeConfig::enabled());

        manager.set(&b, &GaugeValue::Count(1)).await.unwrap();
        manager.set(&b, &GaugeValue::Count(1)).await.unwrap();
        manager.set(&b, &GaugeValue::Count(2)).await.unwrap();

        assert_eq!(platform.call_count("create_category").await, 1);
        assert_eq!(platform.call_count("create_voice_channel").await, 1);
        assert_eq!(platform.call_count("rename_channel").await, 1);
        let category = platform.channel_named("Tautulli Stats").await.unwrap();
        let voice = platform.voice_channels_in(category.id).await;
        assert_eq!(voice.len(), 1);
        assert_eq!(voice[0].name, "🌊 Current Streams: 2");
    }

    #[tokio::test]
    async fn existing_channel_is_adopted_by_prefix() {
        let platform = MockPlatform::new();
        let category = platform.add_channel("Tautulli Stats", ChannelKind::Category, None).await;
        platform
            .add_channel("🌊 Current Streams\u{200B}: 9", ChannelKind::Voice, Some(category.id))
            .await;
        let manager = GaugeManager::new(Arc::new(platform.clone()), "Tautulli Stats", "");

        manager.set(&binding(&GaugeConfig::enabled()), &GaugeValue::Count(0)).await.unwrap();

        assert_eq!(platform.call_count("create_voice_channel").await, 0);
        let voice = platform.voice_channels_in(category.id).await;
        assert_eq!(voice.len(), 1);
        assert_eq!(voice[0].name, "🌊 Current Streams: 0");
    }

    #[tokio::test]
    async fn managers_sharing_a_category_create_it_once() {
        let platform = MockPlatform::new();
        let shared: Arc<dyn ChatPlatform> = Arc::new(platform.clone());
        let categories = Arc::new(CategoryDirectory::new(shared.clone()));
        let streams = GaugeManager::new(shared.clone(), "Tautulli Stats", "").with_categories(categories.clone());
        let transcodes = GaugeManager::new(shared, "Tautulli Stats", "").with_categories(categories);
        let config = GaugeConfig::enabled();
        let transcode_binding = GaugeBinding::new(Gauge::TranscodeCount, &config, labels::TRANSCODE_COUNT);

        let stream_binding = binding(&config);
        let (a, b) = tokio::join!(
            streams.set(&stream_binding, &GaugeValue::Count(2)),
            transcodes.set(&transcode_binding, &GaugeValue::Count(1)),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(platform.call_count("create_category").await, 1);
        let category = platform.channel_named("Tautulli Stats").await.unwrap();
        assert_eq!(platform.voice_channels_in(category.id).await.len(), 2);
    }

    #[tokio::test]
    async fn configured_channel_id_must_exist() {
        let platform = MockPlatform::new();
        let manager = GaugeManager::new(Arc::new(platform.clone()), "Tautulli Stats", "");
        let mut config = GaugeConfig::enabled();
        config.voice_channel_id = 4242;

        let err = manager.set(&binding(&config), &GaugeValue::Count(0)).await.unwrap_err();
        assert!(matches!(err, TauticordError::NotFound { .. }));
        assert_eq!(platform.call_count("create_voice_channel").await, 0);
    }

    #[tokio::test]
    async fn rate_limit_surfaces_as_error() {
        let platform = MockPlatform::new();
        let manager = GaugeManager::new(Arc::new(platform.clone()), "Tautulli Stats", "");
        let b = binding(&GaugeConfig::enabled());
        manager.set(&b, &GaugeValue::Count(1)).await.unwrap();

        platform.rate_limit_op("rename_channel").await;
        let err = manager.set(&b, &GaugeValue::Count(2)).await.unwrap_err();
        assert!(matches!(err, TauticordError::RateLimited(_)));

        platform.clear_failures().await;
        manager.set(&b, &GaugeValue::Count(2)).await.unwrap();
        assert_eq!(platform.call_count("create_voice_channel").await, 1);
    }
}
