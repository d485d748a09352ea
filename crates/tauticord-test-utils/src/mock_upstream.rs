// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock monitoring API for deterministic testing.
//!
//! `MockUpstream` implements `UpstreamApi` over scripted state. Every call is
//! recorded by name so tests can assert which operations ran.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tauticord_core::traits::{PluginAdapter, UpstreamApi};
use tauticord_core::types::{
    ActivitySnapshot, ChartKind, ChartSeries, HealthStatus, HomeStatCategory, HomeStatRow,
    LibraryDescriptor, LibraryItemCounts, RecentlyAddedItem, ServerInfo, StatMetric,
};
use tauticord_core::TauticordError;

#[derive(Default)]
struct State {
    activity: Option<ActivitySnapshot>,
    activity_fails: bool,
    plex_online: bool,
    libraries: Vec<LibraryDescriptor>,
    counts: HashMap<u64, LibraryItemCounts>,
    home_stats: HashMap<HomeStatCategory, Vec<HomeStatRow>>,
    chart: ChartSeries,
    recently_added: Vec<RecentlyAddedItem>,
    users: Vec<(String, u64)>,
    server_info: ServerInfo,
    terminated: Vec<(String, String)>,
    calls: Vec<String>,
}

/// A scriptable monitoring API.
///
/// Defaults: no activity, media server online, Plex Pass enabled.
#[derive(Clone)]
pub struct MockUpstream {
    state: Arc<Mutex<State>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        let state = State {
            activity: Some(ActivitySnapshot::default()),
            plex_online: true,
            server_info: ServerInfo {
                name: "Mock Server".to_string(),
                plex_pass: true,
                pms_url: "http://plex.test:32400".to_string(),
                machine_identifier: "mock".to_string(),
                version: "1.0.0".to_string(),
            },
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Activity returned by the next polls.
    pub async fn set_activity(&self, snapshot: ActivitySnapshot) {
        let mut state = self.state.lock().await;
        state.activity = Some(snapshot);
        state.activity_fails = false;
    }

    /// Make `get_activity` fail until the next `set_activity`.
    pub async fn fail_activity(&self) {
        self.state.lock().await.activity_fails = true;
    }

    pub async fn set_plex_online(&self, online: bool) {
        self.state.lock().await.plex_online = online;
    }

    pub async fn set_plex_pass(&self, plex_pass: bool) {
        self.state.lock().await.server_info.plex_pass = plex_pass;
    }

    pub async fn add_library(&self, library: LibraryDescriptor, counts: LibraryItemCounts) {
        let mut state = self.state.lock().await;
        state.counts.insert(library.section_id, counts);
        state.libraries.push(library);
    }

    pub async fn set_home_stats(&self, category: HomeStatCategory, rows: Vec<HomeStatRow>) {
        self.state.lock().await.home_stats.insert(category, rows);
    }

    pub async fn set_chart(&self, chart: ChartSeries) {
        self.state.lock().await.chart = chart;
    }

    pub async fn set_recently_added(&self, items: Vec<RecentlyAddedItem>) {
        self.state.lock().await.recently_added = items;
    }

    pub async fn add_user(&self, name: &str, user_id: u64) {
        self.state.lock().await.users.push((name.to_string(), user_id));
    }

    /// Every `terminate_session` call as (session id, message).
    pub async fn terminated(&self) -> Vec<(String, String)> {
        self.state.lock().await.terminated.clone()
    }

    /// Operation names in call order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn call_count(&self, op: &str) -> usize {
        self.state.lock().await.calls.iter().filter(|c| *c == op).count()
    }

    async fn record(&self, op: &str) {
        self.state.lock().await.calls.push(op.to_string());
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockUpstream {
    fn name(&self) -> &str {
        "mock-upstream"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, TauticordError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl UpstreamApi for MockUpstream {
    async fn get_activity(&self) -> Result<ActivitySnapshot, TauticordError> {
        self.record("get_activity").await;
        let state = self.state.lock().await;
        if state.activity_fails {
            return Err(TauticordError::upstream("get_activity: connection refused"));
        }
        Ok(state.activity.clone().unwrap_or_default())
    }

    async fn plex_online(&self) -> bool {
        self.record("plex_online").await;
        self.state.lock().await.plex_online
    }

    async fn get_libraries(&self) -> Result<Vec<LibraryDescriptor>, TauticordError> {
        self.record("get_libraries").await;
        Ok(self.state.lock().await.libraries.clone())
    }

    async fn get_library_counts(&self, section_id: u64) -> Result<LibraryItemCounts, TauticordError> {
        self.record("get_library_counts").await;
        self.state
            .lock()
            .await
            .counts
            .get(&section_id)
            .copied()
            .ok_or_else(|| TauticordError::upstream(format!("no library {section_id}")))
    }

    async fn terminate_session(&self, session_id: &str, message: &str) -> Result<bool, TauticordError> {
        self.record("terminate_session").await;
        let mut state = self.state.lock().await;
        state
            .terminated
            .push((session_id.to_string(), message.to_string()));
        let live = state
            .activity
            .as_ref()
            .is_some_and(|a| a.sessions.iter().any(|s| s.session_id == session_id));
        Ok(live)
    }

    async fn get_home_stats(
        &self,
        category: HomeStatCategory,
        _days: u32,
        limit: u32,
        _metric: StatMetric,
    ) -> Result<Vec<HomeStatRow>, TauticordError> {
        self.record("get_home_stats").await;
        let state = self.state.lock().await;
        let mut rows = state.home_stats.get(&category).cloned().unwrap_or_default();
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn get_chart_series(
        &self,
        _kind: ChartKind,
        _days: u32,
        _metric: StatMetric,
        _user_id: Option<u64>,
    ) -> Result<ChartSeries, TauticordError> {
        self.record("get_chart_series").await;
        Ok(self.state.lock().await.chart.clone())
    }

    async fn get_recently_added(
        &self,
        count: u32,
        media_type: Option<&str>,
        _section_id: Option<u64>,
    ) -> Result<Vec<RecentlyAddedItem>, TauticordError> {
        self.record("get_recently_added").await;
        let state = self.state.lock().await;
        Ok(state
            .recently_added
            .iter()
            .filter(|item| media_type.is_none_or(|m| item.media_type == m))
            .take(count as usize)
            .cloned()
            .collect())
    }

    async fn get_user_count(&self) -> Result<u64, TauticordError> {
        self.record("get_user_count").await;
        Ok(self.state.lock().await.users.len() as u64)
    }

    async fn get_user_id(&self, username: &str) -> Result<Option<u64>, TauticordError> {
        self.record("get_user_id").await;
        let state = self.state.lock().await;
        Ok(state
            .users
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(username))
            .map(|(_, id)| *id))
    }

    async fn server_info(&self) -> Result<ServerInfo, TauticordError> {
        self.record("server_info").await;
        Ok(self.state.lock().await.server_info.clone())
    }

    fn base_url(&self) -> &str {
        "http://tautulli.test"
    }
}
