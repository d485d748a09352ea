// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types describing what the monitoring API reports.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Playback state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PlaybackState {
    Playing,
    Paused,
    Buffering,
    Unknown,
}

impl PlaybackState {
    /// Parse an upstream state string, mapping anything unrecognised to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }
}

/// Kind of media being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MediaKind {
    Movie,
    Episode,
    Track,
    Live,
    Clip,
    Photo,
    Unknown,
}

impl MediaKind {
    /// Parse an upstream media type, mapping anything unrecognised to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::Unknown)
    }
}

/// Whether the container is delivered as-is or transcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerDecision {
    Original,
    Transcode,
}

impl ContainerDecision {
    /// Upstream reports `transcode`, `copy` or `direct play`; only the first
    /// counts as a transcode.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("transcode") {
            Self::Transcode
        } else {
            Self::Original
        }
    }
}

/// One active playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque upstream session id, unique within one poll.
    pub session_id: String,
    pub username: String,
    pub friendly_name: String,
    /// Client platform, e.g. `Roku` or `Chrome`.
    pub product: String,
    /// Player name, e.g. `Living Room TV`.
    pub player: String,
    pub quality_profile: String,
    /// Current bandwidth as reported upstream, in KB/s.
    pub bandwidth_kbps: u64,
    pub view_offset_ms: u64,
    pub duration_ms: u64,
    pub state: PlaybackState,
    pub container_decision: ContainerDecision,
    pub media_kind: MediaKind,
    pub title: String,
}

impl Session {
    /// True when the session is being transcoded.
    pub fn is_transcoding(&self) -> bool {
        self.container_decision == ContainerDecision::Transcode
    }

    /// Progress needs a known duration and an offset inside it.
    pub fn has_valid_progress(&self) -> bool {
        self.duration_ms > 0 && self.view_offset_ms <= self.duration_ms
    }

    /// Playback progress in percent, when valid.
    pub fn progress_percent(&self) -> Option<f64> {
        self.has_valid_progress()
            .then(|| self.view_offset_ms as f64 / self.duration_ms as f64 * 100.0)
    }

    /// Milliseconds left until the end of the item, when valid.
    pub fn remaining_ms(&self) -> Option<u64> {
        self.has_valid_progress()
            .then(|| self.duration_ms - self.view_offset_ms)
    }
}

/// The result of one poll of the activity endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub sessions: Vec<Session>,
    /// Total bandwidth in KB/s.
    pub total_bandwidth_kbps: u64,
    /// LAN bandwidth in KB/s.
    pub lan_bandwidth_kbps: u64,
}

impl ActivitySnapshot {
    pub fn new(sessions: Vec<Session>, total_bandwidth_kbps: u64, lan_bandwidth_kbps: u64) -> Self {
        Self {
            sessions,
            total_bandwidth_kbps,
            lan_bandwidth_kbps,
        }
    }

    pub fn stream_count(&self) -> usize {
        self.sessions.len()
    }

    /// Counted locally from the sessions. The upstream transcode field is
    /// known to be wrong and never consulted.
    pub fn transcode_count(&self) -> usize {
        self.sessions.iter().filter(|s| s.is_transcoding()).count()
    }

    pub fn remote_bandwidth_kbps(&self) -> u64 {
        self.total_bandwidth_kbps.saturating_sub(self.lan_bandwidth_kbps)
    }

    /// Session ids in render order.
    pub fn session_ids(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.session_id.clone()).collect()
    }
}

/// Kind of an upstream library section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
pub enum LibraryKind {
    #[strum(serialize = "movie")]
    Movie,
    #[strum(serialize = "show")]
    Show,
    #[strum(to_string = "music", serialize = "artist")]
    Music,
}

/// One library section as reported upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDescriptor {
    pub section_id: u64,
    pub name: String,
    pub kind: LibraryKind,
}

/// Item totals for one library, or the sum over several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LibraryItemCounts {
    pub movies: u64,
    pub series: u64,
    pub seasons: u64,
    pub episodes: u64,
    pub artists: u64,
    pub albums: u64,
    pub tracks: u64,
}

impl LibraryItemCounts {
    pub fn movies(movies: u64) -> Self {
        Self {
            movies,
            ..Self::default()
        }
    }

    pub fn shows(series: u64, seasons: u64, episodes: u64) -> Self {
        Self {
            series,
            seasons,
            episodes,
            ..Self::default()
        }
    }

    pub fn music(artists: u64, albums: u64, tracks: u64) -> Self {
        Self {
            artists,
            albums,
            tracks,
            ..Self::default()
        }
    }
}

impl std::ops::Add for LibraryItemCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            movies: self.movies + rhs.movies,
            series: self.series + rhs.series,
            seasons: self.seasons + rhs.seasons,
            episodes: self.episodes + rhs.episodes,
            artists: self.artists + rhs.artists,
            albums: self.albums + rhs.albums,
            tracks: self.tracks + rhs.tracks,
        }
    }
}

/// Facts about the media server itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub plex_pass: bool,
    /// Direct URL of the media server, used for online checks.
    pub pms_url: String,
    pub machine_identifier: String,
    pub version: String,
}

/// Category of a top-N home statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HomeStatCategory {
    Movies,
    Shows,
    Artists,
    Libraries,
    Users,
    Platforms,
}

impl HomeStatCategory {
    /// Upstream `stat_id` for this category.
    pub fn stat_id(self) -> &'static str {
        match self {
            Self::Movies => "top_movies",
            Self::Shows => "top_tv",
            Self::Artists => "top_music",
            Self::Libraries => "top_libraries",
            Self::Users => "top_users",
            Self::Platforms => "top_platforms",
        }
    }

    pub const ALL: [HomeStatCategory; 6] = [
        Self::Movies,
        Self::Shows,
        Self::Artists,
        Self::Libraries,
        Self::Users,
        Self::Platforms,
    ];
}

/// What a statistic measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StatMetric {
    Plays,
    Duration,
}

/// One row of a home statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeStatRow {
    pub label: String,
    pub plays: u64,
    pub duration_secs: u64,
}

/// Chart families offered by the graphs commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ChartKind {
    DayOfWeek,
    HourOfDay,
    TopPlatforms,
    TopUsers,
    DailyByMediaType,
}

impl ChartKind {
    /// Upstream command returning this chart's data.
    pub fn command(self) -> &'static str {
        match self {
            Self::DayOfWeek => "get_plays_by_dayofweek",
            Self::HourOfDay => "get_plays_by_hourofday",
            Self::TopPlatforms => "get_plays_by_top_10_platforms",
            Self::TopUsers => "get_plays_by_top_10_users",
            Self::DailyByMediaType => "get_plays_by_date",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::DayOfWeek => "by day of week",
            Self::HourOfDay => "by hour of day",
            Self::TopPlatforms => "by top 10 platforms",
            Self::TopUsers => "by top 10 users",
            Self::DailyByMediaType => "per day by media type",
        }
    }

    pub const ALL: [ChartKind; 5] = [
        Self::DayOfWeek,
        Self::HourOfDay,
        Self::TopPlatforms,
        Self::TopUsers,
        Self::DailyByMediaType,
    ];
}

/// One named data series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub data: Vec<f64>,
}

/// Chart categories plus per-media-type series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub categories: Vec<String>,
    pub series: Vec<NamedSeries>,
}

impl ChartSeries {
    /// Largest single value across all series.
    pub fn max_value(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// One recently added item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentlyAddedItem {
    pub rating_key: String,
    pub title: String,
    pub summary: String,
    pub library_name: String,
    pub media_type: String,
    /// Upstream thumbnail path, e.g. `/library/metadata/1/thumb/2`.
    pub thumb: String,
    /// Unix timestamp.
    pub added_at: i64,
    pub year: Option<u32>,
}
