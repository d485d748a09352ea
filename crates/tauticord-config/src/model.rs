// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for Tauticord.
//!
//! The on-disk file uses PascalCase keys. Every field carries a default, so a
//! partial file is completed from [`TauticordConfig::default`]. Boolean
//! fields go through the lenient parser in [`crate::boolean`].

use serde::{Deserialize, Serialize};

/// Top-level keys accepted in `tauticord.yaml`.
pub const TOP_LEVEL_KEYS: [&str; 6] = [
    "Tautulli", "Discord", "Display", "Stats", "Extras", "Webhooks",
];

/// Top-level Tauticord configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TauticordConfig {
    #[serde(default)]
    pub tautulli: TautulliConfig,

    #[serde(default)]
    pub discord: DiscordConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub stats: StatsConfig,

    #[serde(default)]
    pub extras: ExtrasConfig,

    #[serde(default)]
    pub webhooks: WebhooksConfig,
}

/// Connection to the monitoring API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TautulliConfig {
    /// Base URL of the monitoring API, e.g. `http://localhost:8181`.
    #[serde(rename = "URL", default)]
    pub url: String,

    #[serde(rename = "APIKey", default)]
    pub api_key: String,

    /// Skip TLS certificate verification.
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub use_self_signed_cert: bool,

    /// Activity refresh interval. Clamped up to 5 seconds.
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u64,

    /// Message shown to a user whose stream is terminated.
    #[serde(default = "default_terminate_message")]
    pub terminate_message: String,

    /// Override for the Plex Pass flag; `None` detects it from the server.
    #[serde(default, deserialize_with = "crate::boolean::deserialize_option")]
    pub plex_pass: Option<bool>,
}

impl Default for TautulliConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            use_self_signed_cert: false,
            refresh_seconds: default_refresh_seconds(),
            terminate_message: default_terminate_message(),
            plex_pass: None,
        }
    }
}

fn default_refresh_seconds() -> u64 {
    15
}

fn default_terminate_message() -> String {
    "Your stream has ended.".to_string()
}

/// Chat platform settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscordConfig {
    #[serde(default)]
    pub bot_token: String,

    #[serde(rename = "ServerID", default, deserialize_with = "crate::boolean::deserialize_id")]
    pub server_id: u64,

    /// Users allowed to terminate streams and run privileged commands.
    #[serde(rename = "AdminIDs", default, deserialize_with = "crate::boolean::deserialize_ids")]
    pub admin_ids: Vec<u64>,

    /// Text channel holding the activity summary message.
    #[serde(default = "default_summary_channel")]
    pub summary_channel_name: String,

    /// Text channel for the recently-added carousel; empty disables it.
    #[serde(default)]
    pub announcements_channel_name: String,

    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub post_summary_message: bool,

    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub post_recently_added_message: bool,

    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub enable_slash_commands: bool,

    /// Retained for compatibility with older files; has no effect.
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub nitro: bool,

    /// Presence text; `{stream_count}` is substituted. Empty disables it.
    #[serde(default)]
    pub status_message: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            server_id: 0,
            admin_ids: Vec::new(),
            summary_channel_name: default_summary_channel(),
            announcements_channel_name: String::new(),
            post_summary_message: true,
            post_recently_added_message: false,
            enable_slash_commands: true,
            nitro: false,
            status_message: String::new(),
        }
    }
}

impl DiscordConfig {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

fn default_summary_channel() -> String {
    "tauticord".to_string()
}

fn default_true() -> bool {
    true
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayConfig {
    #[serde(default = "default_server_name")]
    pub server_name: String,

    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub use_friendly_names: bool,

    /// Thousands separator for counts; empty for none.
    #[serde(default)]
    pub thousands_separator: String,

    #[serde(default)]
    pub anonymize: AnonymizeConfig,

    #[serde(default)]
    pub time: TimeConfig,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            use_friendly_names: false,
            thousands_separator: String::new(),
            anonymize: AnonymizeConfig::default(),
            time: TimeConfig::default(),
        }
    }
}

fn default_server_name() -> String {
    "Plex".to_string()
}

/// Independent hide flags for session rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnonymizeConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_usernames: bool,
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_platforms: bool,
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_player_names: bool,
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_quality: bool,
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_bandwidth: bool,
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_transcode: bool,
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_progress: bool,
    #[serde(rename = "HideETA", default, deserialize_with = "crate::boolean::deserialize")]
    pub hide_eta: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub use_24_hour_time: bool,

    /// IANA time zone name used for footer timestamps.
    #[serde(default = "default_time_zone")]
    pub server_time_zone: String,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            use_24_hour_time: false,
            server_time_zone: default_time_zone(),
        }
    }
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

/// One voice-channel gauge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GaugeConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub enable: bool,

    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub use_emojis: bool,

    #[serde(default)]
    pub custom_emoji: String,

    #[serde(default)]
    pub custom_name: String,

    /// Fixed channel to rename; 0 finds or creates one by prefix.
    #[serde(rename = "VoiceChannelID", default, deserialize_with = "crate::boolean::deserialize_id")]
    pub voice_channel_id: u64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            enable: false,
            use_emojis: true,
            custom_emoji: String::new(),
            custom_name: String::new(),
            voice_channel_id: 0,
        }
    }
}

impl GaugeConfig {
    pub fn enabled() -> Self {
        Self {
            enable: true,
            ..Self::default()
        }
    }

    /// Emoji shown before the name, if any.
    pub fn emoji<'a>(&'a self, default_emoji: &'a str) -> &'a str {
        if !self.use_emojis {
            ""
        } else if self.custom_emoji.is_empty() {
            default_emoji
        } else {
            &self.custom_emoji
        }
    }

    pub fn name<'a>(&'a self, default_name: &'a str) -> &'a str {
        if self.custom_name.is_empty() {
            default_name
        } else {
            &self.custom_name
        }
    }

    /// `{emoji} {name}` trimmed; channels are matched on this prefix.
    pub fn prefix(&self, default_emoji: &str, default_name: &str) -> String {
        format!("{} {}", self.emoji(default_emoji), self.name(default_name))
            .trim()
            .to_string()
    }
}

/// Disk usage gauge; carries the path to measure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskGaugeConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub enable: bool,

    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub use_emojis: bool,

    #[serde(default)]
    pub custom_emoji: String,

    #[serde(default)]
    pub custom_name: String,

    #[serde(rename = "VoiceChannelID", default, deserialize_with = "crate::boolean::deserialize_id")]
    pub voice_channel_id: u64,

    #[serde(default)]
    pub path: String,
}

impl Default for DiskGaugeConfig {
    fn default() -> Self {
        Self {
            enable: false,
            use_emojis: true,
            custom_emoji: String::new(),
            custom_name: String::new(),
            voice_channel_id: 0,
            path: String::new(),
        }
    }
}

impl DiskGaugeConfig {
    /// The gauge part of this entry.
    pub fn gauge(&self) -> GaugeConfig {
        GaugeConfig {
            enable: self.enable,
            use_emojis: self.use_emojis,
            custom_emoji: self.custom_emoji.clone(),
            custom_name: self.custom_name.clone(),
            voice_channel_id: self.voice_channel_id,
        }
    }
}

/// Recently-added count gauge of one library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecentlyAddedGaugeConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub enable: bool,

    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub use_emojis: bool,

    #[serde(default)]
    pub custom_emoji: String,

    #[serde(default)]
    pub custom_name: String,

    #[serde(rename = "VoiceChannelID", default, deserialize_with = "crate::boolean::deserialize_id")]
    pub voice_channel_id: u64,

    /// Items added within this many hours are counted.
    #[serde(default = "default_recent_hours")]
    pub hours: u32,
}

impl Default for RecentlyAddedGaugeConfig {
    fn default() -> Self {
        Self {
            enable: false,
            use_emojis: true,
            custom_emoji: String::new(),
            custom_name: String::new(),
            voice_channel_id: 0,
            hours: default_recent_hours(),
        }
    }
}

impl RecentlyAddedGaugeConfig {
    pub fn gauge(&self) -> GaugeConfig {
        GaugeConfig {
            enable: self.enable,
            use_emojis: self.use_emojis,
            custom_emoji: self.custom_emoji.clone(),
            custom_name: self.custom_name.clone(),
            voice_channel_id: self.voice_channel_id,
        }
    }
}

fn default_recent_hours() -> u32 {
    24
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatsConfig {
    #[serde(default)]
    pub activity: ActivityStatsConfig,

    #[serde(default)]
    pub libraries: LibraryStatsConfig,

    #[serde(default)]
    pub performance: PerformanceStatsConfig,
}

/// Activity gauges, refreshed with the summary message.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActivityStatsConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub enable: bool,

    #[serde(default = "default_activity_category")]
    pub category_name: String,

    #[serde(default)]
    pub stat_types: ActivityStatTypes,
}

impl Default for ActivityStatsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            category_name: default_activity_category(),
            stat_types: ActivityStatTypes::default(),
        }
    }
}

fn default_activity_category() -> String {
    "Tautulli Stats".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActivityStatTypes {
    #[serde(default)]
    pub stream_count: GaugeConfig,
    #[serde(default)]
    pub transcode_count: GaugeConfig,
    #[serde(default)]
    pub bandwidth: GaugeConfig,
    #[serde(default)]
    pub local_bandwidth: GaugeConfig,
    #[serde(default)]
    pub remote_bandwidth: GaugeConfig,
    #[serde(default)]
    pub plex_server_availability: GaugeConfig,
}

/// Per-library count gauges.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryStatsConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub enable: bool,

    #[serde(default = "default_libraries_category")]
    pub category_name: String,

    /// Clamped up to 300 seconds.
    #[serde(default = "default_library_refresh")]
    pub refresh_seconds: u64,

    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,

    #[serde(default)]
    pub combined_libraries: Vec<LibraryConfig>,
}

impl Default for LibraryStatsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            category_name: default_libraries_category(),
            refresh_seconds: default_library_refresh(),
            libraries: Vec::new(),
            combined_libraries: Vec::new(),
        }
    }
}

fn default_libraries_category() -> String {
    "Libraries Stats".to_string()
}

fn default_library_refresh() -> u64 {
    3600
}

/// One library entry. Combined entries list their member libraries in
/// `Libraries`; plain entries leave it empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryConfig {
    #[serde(default)]
    pub name: String,

    /// Display name used instead of `Name` in gauges.
    #[serde(default)]
    pub alternate_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libraries: Vec<String>,

    #[serde(default)]
    pub movies: GaugeConfig,
    #[serde(default)]
    pub series: GaugeConfig,
    #[serde(default)]
    pub seasons: GaugeConfig,
    #[serde(default)]
    pub episodes: GaugeConfig,
    #[serde(default)]
    pub artists: GaugeConfig,
    #[serde(default)]
    pub albums: GaugeConfig,
    #[serde(default)]
    pub tracks: GaugeConfig,
    #[serde(default)]
    pub recently_added: RecentlyAddedGaugeConfig,
}

impl LibraryConfig {
    /// Name shown in gauges.
    pub fn display_name(&self) -> &str {
        if self.alternate_name.is_empty() {
            &self.name
        } else {
            &self.alternate_name
        }
    }
}

/// Host metrics and user count.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerformanceStatsConfig {
    #[serde(default, deserialize_with = "crate::boolean::deserialize")]
    pub enable: bool,

    #[serde(default = "default_performance_category")]
    pub category_name: String,

    #[serde(default)]
    pub metrics: PerformanceMetrics,
}

impl Default for PerformanceStatsConfig {
    fn default() -> Self {
        Self {
            enable: false,
            category_name: default_performance_category(),
            metrics: PerformanceMetrics::default(),
        }
    }
}

fn default_performance_category() -> String {
    "Performance".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PerformanceMetrics {
    #[serde(default)]
    pub user_count: GaugeConfig,
    #[serde(default)]
    pub disk_space: DiskGaugeConfig,
    #[serde(rename = "CPU", default)]
    pub cpu: GaugeConfig,
    #[serde(default)]
    pub memory: GaugeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtrasConfig {
    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub analytics: bool,

    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub enable_update_reminders: bool,

    /// QuickChart-compatible endpoint used to render graphs.
    #[serde(rename = "ChartRendererURL", default = "default_chart_renderer_url")]
    pub chart_renderer_url: String,
}

impl Default for ExtrasConfig {
    fn default() -> Self {
        Self {
            analytics: true,
            enable_update_reminders: true,
            chart_renderer_url: default_chart_renderer_url(),
        }
    }
}

fn default_chart_renderer_url() -> String {
    "https://quickchart.io/chart".to_string()
}

/// Webhook intake server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WebhooksConfig {
    #[serde(default = "default_true", deserialize_with = "crate::boolean::deserialize")]
    pub enable: bool,

    #[serde(default = "default_webhook_host")]
    pub host: String,

    #[serde(default = "default_webhook_port")]
    pub port: u16,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            enable: true,
            host: default_webhook_host(),
            port: default_webhook_port(),
        }
    }
}

fn default_webhook_host() -> String {
    "0.0.0.0".to_string()
}

fn default_webhook_port() -> u16 {
    8283
}

/// Default emoji and name of each gauge.
pub mod labels {
    /// Default emoji and display name of a gauge.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GaugeLabel {
        pub emoji: &'static str,
        pub name: &'static str,
    }

    pub const STREAM_COUNT: GaugeLabel = GaugeLabel { emoji: "🌊", name: "Current Streams" };
    pub const TRANSCODE_COUNT: GaugeLabel = GaugeLabel { emoji: "🔄", name: "Current Transcodes" };
    pub const BANDWIDTH: GaugeLabel = GaugeLabel { emoji: "📶", name: "Bandwidth" };
    pub const LOCAL_BANDWIDTH: GaugeLabel = GaugeLabel { emoji: "🏠", name: "Local Bandwidth" };
    pub const REMOTE_BANDWIDTH: GaugeLabel = GaugeLabel { emoji: "🌐", name: "Remote Bandwidth" };
    pub const PLEX_STATUS: GaugeLabel = GaugeLabel { emoji: "", name: "Plex Status" };

    pub const USER_COUNT: GaugeLabel = GaugeLabel { emoji: "👤", name: "Users" };
    pub const DISK_SPACE: GaugeLabel = GaugeLabel { emoji: "💾", name: "Disk" };
    pub const CPU: GaugeLabel = GaugeLabel { emoji: "🔲", name: "CPU" };
    pub const MEMORY: GaugeLabel = GaugeLabel { emoji: "🧠", name: "Memory" };

    pub const MOVIES: &str = "🎥";
    pub const SERIES: &str = "📺";
    pub const SEASONS: &str = "📼";
    pub const EPISODES: &str = "🎞️";
    pub const ARTISTS: &str = "🎤";
    pub const ALBUMS: &str = "💿";
    pub const TRACKS: &str = "🎵";
    pub const RECENTLY_ADDED: &str = "🆕";
}
