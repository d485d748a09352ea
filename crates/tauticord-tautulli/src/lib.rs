// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tautulli adapter for Tauticord.
//!
//! This crate implements [`UpstreamApi`] on top of the Tautulli API v2,
//! translating its loosely typed JSON into the domain types of
//! `tauticord-core`.

pub mod client;
pub mod types;

use std::sync::RwLock;

use async_trait::async_trait;
use tauticord_config::model::TautulliConfig;
use tauticord_core::error::TauticordError;
use tauticord_core::traits::{PluginAdapter, UpstreamApi};
use tauticord_core::types::{
    ActivitySnapshot, ChartKind, ChartSeries, ContainerDecision, HealthStatus, HomeStatCategory,
    HomeStatRow, LibraryDescriptor, LibraryItemCounts, LibraryKind, MediaKind, NamedSeries,
    PlaybackState, RecentlyAddedItem, ServerInfo, Session, StatMetric,
};
use tracing::{debug, info, warn};

use crate::client::{CallOutcome, TautulliClient};
use crate::types::{
    RawActivity, RawChart, RawHomeStat, RawLibrary, RawRecentItem, RawRecentlyAdded,
    RawServerInfo, RawSession, RawTable, RawUser,
};

/// Rows requested from the paged `*_table` commands.
const TABLE_LENGTH: u32 = 1000;

/// Tautulli-backed [`UpstreamApi`].
pub struct TautulliApi {
    client: TautulliClient,
    /// Media server URL from the last successful `get_server_info`.
    pms_url: RwLock<Option<String>>,
}

impl TautulliApi {
    /// Creates the adapter from the `Tautulli` configuration section.
    pub fn new(config: &TautulliConfig) -> Result<Self, TauticordError> {
        let client = TautulliClient::new(&config.url, &config.api_key, config.use_self_signed_cert)?;
        info!(
            url = %client.base_url(),
            self_signed = config.use_self_signed_cert,
            "Tautulli client initialized"
        );
        Ok(Self::from_client(client))
    }

    /// Wraps an already built client.
    pub fn from_client(client: TautulliClient) -> Self {
        Self {
            client,
            pms_url: RwLock::new(None),
        }
    }

    fn remember_pms_url(&self, url: &str) {
        if url.is_empty() {
            return;
        }
        let mut slot = self.pms_url.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(url.to_string());
    }

    fn cached_pms_url(&self) -> Option<String> {
        self.pms_url.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn users(&self) -> Result<Vec<RawUser>, TauticordError> {
        let table: RawTable<RawUser> = self
            .client
            .call("get_users_table", &[("length", TABLE_LENGTH.to_string())])
            .await?;
        Ok(table.data)
    }
}

fn to_session(raw: RawSession) -> Session {
    let decision = if raw.stream_container_decision.is_empty() {
        &raw.transcode_decision
    } else {
        &raw.stream_container_decision
    };
    let title = if raw.full_title.is_empty() {
        raw.title
    } else {
        raw.full_title
    };
    Session {
        session_id: raw.session_id,
        username: raw.username,
        friendly_name: raw.friendly_name,
        product: raw.product,
        player: raw.player,
        quality_profile: raw.quality_profile,
        bandwidth_kbps: raw.bandwidth,
        view_offset_ms: raw.view_offset,
        duration_ms: raw.duration,
        state: PlaybackState::parse(&raw.state),
        container_decision: ContainerDecision::parse(decision),
        media_kind: MediaKind::parse(&raw.media_type),
        title,
    }
}

fn to_counts(raw: &RawLibrary, kind: LibraryKind) -> LibraryItemCounts {
    match kind {
        LibraryKind::Movie => LibraryItemCounts::movies(raw.count),
        LibraryKind::Show => LibraryItemCounts::shows(raw.count, raw.parent_count, raw.child_count),
        LibraryKind::Music => {
            LibraryItemCounts::music(raw.count, raw.parent_count, raw.child_count)
        }
    }
}

fn to_recent(raw: RawRecentItem) -> RecentlyAddedItem {
    let title = if raw.full_title.is_empty() {
        raw.title
    } else {
        raw.full_title
    };
    RecentlyAddedItem {
        rating_key: raw.rating_key,
        title,
        summary: raw.summary,
        library_name: raw.library_name,
        media_type: raw.media_type,
        thumb: raw.thumb,
        added_at: i64::try_from(raw.added_at).unwrap_or(i64::MAX),
        year: raw.year.and_then(|y| u32::try_from(y).ok()),
    }
}

fn json_to_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn json_to_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn to_chart(raw: RawChart) -> ChartSeries {
    ChartSeries {
        categories: raw.categories.iter().map(json_to_label).collect(),
        series: raw
            .series
            .into_iter()
            .map(|s| NamedSeries {
                name: s.name,
                data: s.data.iter().map(json_to_f64).collect(),
            })
            .collect(),
    }
}

/// `get_home_stats` returns one object when filtered by `stat_id` and a list
/// otherwise; accept both.
fn home_stat_rows(
    data: serde_json::Value,
    stat_id: &str,
) -> Result<Vec<HomeStatRow>, TauticordError> {
    let stats: Vec<RawHomeStat> = match data {
        serde_json::Value::Array(_) => serde_json::from_value(data),
        serde_json::Value::Null => Ok(Vec::new()),
        other => serde_json::from_value(other).map(|s: RawHomeStat| vec![s]),
    }
    .map_err(|e| TauticordError::Upstream {
        message: format!("get_home_stats: unexpected data shape: {e}"),
        source: Some(Box::new(e)),
    })?;

    Ok(stats
        .into_iter()
        .filter(|s| s.stat_id.is_empty() || s.stat_id == stat_id)
        .flat_map(|s| s.rows)
        .map(|row| HomeStatRow {
            label: row.label().to_string(),
            plays: row.total_plays,
            duration_secs: row.total_duration,
        })
        .collect())
}

fn y_axis(metric: StatMetric) -> String {
    match metric {
        StatMetric::Plays => "plays".to_string(),
        StatMetric::Duration => "duration".to_string(),
    }
}

#[async_trait]
impl PluginAdapter for TautulliApi {
    fn name(&self) -> &str {
        "tautulli"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, TauticordError> {
        match self.client.call_raw("status", &[]).await {
            Ok(CallOutcome::Success(_)) => Ok(HealthStatus::Healthy),
            Ok(CallOutcome::Declined(message)) => Ok(HealthStatus::Degraded(message)),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), TauticordError> {
        debug!("Tautulli client shutting down");
        Ok(())
    }
}

#[async_trait]
impl UpstreamApi for TautulliApi {
    async fn get_activity(&self) -> Result<ActivitySnapshot, TauticordError> {
        let raw: RawActivity = self.client.call("get_activity", &[]).await?;
        let sessions: Vec<Session> = raw.sessions.into_iter().map(to_session).collect();
        let snapshot = ActivitySnapshot::new(sessions, raw.total_bandwidth, raw.lan_bandwidth);
        if raw.stream_count_transcode != snapshot.transcode_count() as u64 {
            debug!(
                reported = raw.stream_count_transcode,
                counted = snapshot.transcode_count(),
                "upstream transcode count disagrees with sessions"
            );
        }
        Ok(snapshot)
    }

    async fn plex_online(&self) -> bool {
        let pms_url = match self.server_info().await {
            Ok(info) if !info.pms_url.is_empty() => Some(info.pms_url),
            Ok(_) => self.cached_pms_url(),
            Err(e) => {
                debug!(error = %e, "server info unavailable, pinging last known media server");
                self.cached_pms_url()
            }
        };
        let Some(pms_url) = pms_url else {
            warn!("media server URL unknown, reporting Plex offline");
            return false;
        };
        match self.client.probe(&pms_url).await {
            Ok(status) => status.is_success() || status == reqwest::StatusCode::UNAUTHORIZED,
            Err(e) => {
                debug!(error = %e, url = %pms_url, "media server probe failed");
                false
            }
        }
    }

    async fn get_libraries(&self) -> Result<Vec<LibraryDescriptor>, TauticordError> {
        let table: RawTable<RawLibrary> = self
            .client
            .call("get_libraries_table", &[("length", TABLE_LENGTH.to_string())])
            .await?;
        Ok(table
            .data
            .into_iter()
            .filter_map(|raw| match raw.section_type.parse::<LibraryKind>() {
                Ok(kind) => Some(LibraryDescriptor {
                    section_id: raw.section_id,
                    name: raw.section_name,
                    kind,
                }),
                Err(_) => {
                    debug!(
                        section = %raw.section_name,
                        section_type = %raw.section_type,
                        "skipping library of unsupported type"
                    );
                    None
                }
            })
            .collect())
    }

    async fn get_library_counts(&self, section_id: u64) -> Result<LibraryItemCounts, TauticordError> {
        let raw: RawLibrary = self
            .client
            .call("get_library", &[("section_id", section_id.to_string())])
            .await?;
        let kind = raw.section_type.parse::<LibraryKind>().map_err(|_| {
            TauticordError::upstream(format!(
                "get_library: section {section_id} has unsupported type {:?}",
                raw.section_type
            ))
        })?;
        Ok(to_counts(&raw, kind))
    }

    async fn terminate_session(&self, session_id: &str, message: &str) -> Result<bool, TauticordError> {
        let outcome = self
            .client
            .call_raw(
                "terminate_session",
                &[
                    ("session_id", session_id.to_string()),
                    ("message", message.to_string()),
                ],
            )
            .await?;
        match outcome {
            CallOutcome::Success(_) => {
                info!(session_id, "terminated session");
                Ok(true)
            }
            CallOutcome::Declined(reason) => {
                warn!(session_id, reason = %reason, "session termination declined");
                Ok(false)
            }
        }
    }

    async fn get_home_stats(
        &self,
        category: HomeStatCategory,
        days: u32,
        limit: u32,
        metric: StatMetric,
    ) -> Result<Vec<HomeStatRow>, TauticordError> {
        let stat_id = category.stat_id();
        let stats_type = y_axis(metric);
        let data: serde_json::Value = self
            .client
            .call(
                "get_home_stats",
                &[
                    ("time_range", days.to_string()),
                    ("stats_type", stats_type),
                    ("stats_count", limit.to_string()),
                    ("stat_id", stat_id.to_string()),
                ],
            )
            .await?;
        let mut rows = home_stat_rows(data, stat_id)?;
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn get_chart_series(
        &self,
        kind: ChartKind,
        days: u32,
        metric: StatMetric,
        user_id: Option<u64>,
    ) -> Result<ChartSeries, TauticordError> {
        let mut params = vec![("time_range", days.to_string()), ("y_axis", y_axis(metric))];
        if let Some(user_id) = user_id {
            params.push(("user_id", user_id.to_string()));
        }
        let raw: RawChart = self.client.call(kind.command(), &params).await?;
        Ok(to_chart(raw))
    }

    async fn get_recently_added(
        &self,
        count: u32,
        media_type: Option<&str>,
        section_id: Option<u64>,
    ) -> Result<Vec<RecentlyAddedItem>, TauticordError> {
        let mut params = vec![("count", count.to_string())];
        if let Some(media_type) = media_type {
            params.push(("media_type", media_type.to_string()));
        }
        if let Some(section_id) = section_id {
            params.push(("section_id", section_id.to_string()));
        }
        let raw: RawRecentlyAdded = self.client.call("get_recently_added", &params).await?;
        Ok(raw.recently_added.into_iter().map(to_recent).collect())
    }

    async fn get_user_count(&self) -> Result<u64, TauticordError> {
        let users = self.users().await?;
        Ok(users.iter().filter(|u| u.is_active).count() as u64)
    }

    async fn get_user_id(&self, username: &str) -> Result<Option<u64>, TauticordError> {
        let wanted = username.trim().to_lowercase();
        let users = self.users().await?;
        Ok(users
            .into_iter()
            .find(|u| u.username.to_lowercase() == wanted || u.friendly_name.to_lowercase() == wanted)
            .map(|u| u.user_id))
    }

    async fn server_info(&self) -> Result<ServerInfo, TauticordError> {
        let raw: RawServerInfo = self.client.call("get_server_info", &[]).await?;
        self.remember_pms_url(&raw.pms_url);
        Ok(ServerInfo {
            name: raw.pms_name,
            plex_pass: raw.pms_plexpass,
            pms_url: raw.pms_url,
            machine_identifier: raw.pms_identifier,
            version: raw.pms_version,
        })
    }

    fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_prefers_container_decision() {
        let raw = RawSession {
            stream_container_decision: "transcode".into(),
            transcode_decision: "direct play".into(),
            ..RawSession::default()
        };
        assert!(to_session(raw).is_transcoding());

        let raw = RawSession {
            transcode_decision: "transcode".into(),
            ..RawSession::default()
        };
        assert!(to_session(raw).is_transcoding());
    }

    #[test]
    fn counts_follow_library_kind() {
        let raw = RawLibrary {
            count: 10,
            parent_count: 40,
            child_count: 400,
            ..RawLibrary::default()
        };
        assert_eq!(to_counts(&raw, LibraryKind::Movie), LibraryItemCounts::movies(10));
        assert_eq!(
            to_counts(&raw, LibraryKind::Music),
            LibraryItemCounts::music(10, 40, 400)
        );
    }

    #[test]
    fn home_stats_accept_object_or_list() {
        let object = serde_json::json!({
            "stat_id": "top_movies",
            "rows": [{"title": "Heat", "total_plays": "4", "total_duration": 600}]
        });
        let rows = home_stat_rows(object, "top_movies").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Heat");
        assert_eq!(rows[0].plays, 4);

        let list = serde_json::json!([
            {"stat_id": "top_tv", "rows": [{"title": "Other"}]},
            {"stat_id": "top_movies", "rows": [{"title": "Heat"}]}
        ]);
        let rows = home_stat_rows(list, "top_movies").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Heat");
    }

    #[test]
    fn chart_values_are_lenient() {
        let raw: RawChart = serde_json::from_value(serde_json::json!({
            "categories": ["Sunday", 1],
            "series": [{"name": "Movies", "data": [1, "2", null]}]
        }))
        .unwrap();
        let chart = to_chart(raw);
        assert_eq!(chart.categories, vec!["Sunday".to_string(), "1".to_string()]);
        assert_eq!(chart.series[0].data, vec![1.0, 2.0, 0.0]);
    }
}
