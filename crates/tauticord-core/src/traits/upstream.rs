// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed facade over the media server monitoring API.

use async_trait::async_trait;

use crate::error::TauticordError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ActivitySnapshot, ChartKind, ChartSeries, HomeStatCategory, HomeStatRow, LibraryDescriptor,
    LibraryItemCounts, RecentlyAddedItem, ServerInfo, StatMetric,
};

/// Operations the projection engine consumes from the monitoring API.
///
/// Every operation returns `Err` for transport, HTTP or envelope failures and
/// `Ok` with an empty value for genuinely empty data.
#[async_trait]
pub trait UpstreamApi: PluginAdapter {
    /// Current playback sessions.
    async fn get_activity(&self) -> Result<ActivitySnapshot, TauticordError>;

    /// Direct reachability check of the media server itself.
    ///
    /// A 2xx or 401 response counts as online.
    async fn plex_online(&self) -> bool;

    async fn get_libraries(&self) -> Result<Vec<LibraryDescriptor>, TauticordError>;

    async fn get_library_counts(&self, section_id: u64) -> Result<LibraryItemCounts, TauticordError>;

    /// Ask the server to stop a session. Terminating an id that no longer
    /// exists is reported as `Ok(false)`, not an error.
    async fn terminate_session(&self, session_id: &str, message: &str) -> Result<bool, TauticordError>;

    async fn get_home_stats(
        &self,
        category: HomeStatCategory,
        days: u32,
        limit: u32,
        metric: StatMetric,
    ) -> Result<Vec<HomeStatRow>, TauticordError>;

    async fn get_chart_series(
        &self,
        kind: ChartKind,
        days: u32,
        metric: StatMetric,
        user_id: Option<u64>,
    ) -> Result<ChartSeries, TauticordError>;

    /// Most recently added items, newest first, optionally filtered by media
    /// type (`movie`, `show`, `artist`) and library section.
    async fn get_recently_added(
        &self,
        count: u32,
        media_type: Option<&str>,
        section_id: Option<u64>,
    ) -> Result<Vec<RecentlyAddedItem>, TauticordError>;

    async fn get_user_count(&self) -> Result<u64, TauticordError>;

    /// Resolve a username or friendly name (case-insensitive) to a user id.
    async fn get_user_id(&self, username: &str) -> Result<Option<u64>, TauticordError>;

    async fn server_info(&self) -> Result<ServerInfo, TauticordError>;

    /// Public base URL of the monitoring API, used to build poster proxy links.
    fn base_url(&self) -> &str;
}
