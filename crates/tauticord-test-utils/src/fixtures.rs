// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for domain fixtures.

use tauticord_core::types::{
    ActivitySnapshot, ContainerDecision, MediaKind, PlaybackState, RecentlyAddedItem, Session,
};

/// A playing session with sensible defaults.
pub fn session(id: &str, kind: MediaKind, decision: ContainerDecision, bandwidth_kbps: u64) -> Session {
    Session {
        session_id: id.to_string(),
        username: format!("user_{id}"),
        friendly_name: format!("User {id}"),
        product: "Plex Web".to_string(),
        player: "Chrome".to_string(),
        quality_profile: "Original".to_string(),
        bandwidth_kbps,
        view_offset_ms: 600_000,
        duration_ms: 3_600_000,
        state: PlaybackState::Playing,
        container_decision: decision,
        media_kind: kind,
        title: format!("Title {id}"),
    }
}

/// The two-stream snapshot: A is a direct-played movie on the LAN at
/// 4500 KB/s, B a transcoded episode over the WAN at 9000 KB/s.
pub fn two_stream_snapshot() -> ActivitySnapshot {
    ActivitySnapshot::new(
        vec![
            session("A", MediaKind::Movie, ContainerDecision::Original, 4500),
            session("B", MediaKind::Episode, ContainerDecision::Transcode, 9000),
        ],
        13_500,
        4_500,
    )
}

/// `n` direct-play sessions named `s1..sn`.
pub fn snapshot_with(n: usize) -> ActivitySnapshot {
    let sessions = (1..=n)
        .map(|i| session(&format!("s{i}"), MediaKind::Movie, ContainerDecision::Original, 1000))
        .collect();
    ActivitySnapshot::new(sessions, 1000 * n as u64, 0)
}

/// A recently added movie.
pub fn recent_item(key: &str, title: &str, added_at: i64) -> RecentlyAddedItem {
    RecentlyAddedItem {
        rating_key: key.to_string(),
        title: title.to_string(),
        summary: format!("Summary of {title}"),
        library_name: "Movies".to_string(),
        media_type: "movie".to_string(),
        thumb: format!("/library/metadata/{key}/thumb/1"),
        added_at,
        year: Some(2020),
    }
}
