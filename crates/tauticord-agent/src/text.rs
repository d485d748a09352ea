// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of sessions and the activity summary embed.
//!
//! Each session becomes one embed field: a title line and a body of up to
//! four lines (user, player, quality, progress). Anonymity flags only ever
//! remove parts; a line whose parts are all hidden is dropped.

use chrono::{DateTime, Utc};
use tauticord_config::model::{AnonymizeConfig, TauticordConfig};
use tauticord_core::message::{EMBED_FIELD_NAME_LIMIT, Embed, truncate_with_ellipsis};
use tauticord_core::types::{ActivitySnapshot, MediaKind, PlaybackState, Session};

use crate::emoji::{EmojiManager, stream_emoji};
use crate::format;

/// Discord caps an embed at 25 fields.
pub const MAX_EMBED_FIELDS: usize = 25;

/// Embed colour of the summary message.
pub const SUMMARY_COLOR: u32 = 0xE5A00D;

const UPDATED_PREFIX: &str = "Updated ";

/// True for footers rendered by [`TextManager::activity_embed`] or
/// [`TextManager::connection_lost_embed`].
pub fn is_summary_footer(footer: &str) -> bool {
    footer.lines().any(|line| line.starts_with(UPDATED_PREFIX))
}

const EMPTY_FIELD: &str = "\u{200B}";

/// Icons used in session lines. Custom guild emojis replace the Unicode
/// defaults when they were uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icons {
    pub playing: String,
    pub paused: String,
    pub buffering: String,
    pub unknown_state: String,
    pub movie: String,
    pub episode: String,
    pub track: String,
    pub live: String,
    pub clip: String,
    pub photo: String,
    pub unknown_kind: String,
    pub user: String,
    pub player: String,
    pub quality: String,
    pub transcode: String,
    pub progress: String,
}

const ICON_DEFAULTS: [(&str, &str); 16] = [
    ("playing", "▶️"),
    ("paused", "⏸️"),
    ("buffering", "⏳"),
    ("unknown_state", "❓"),
    ("movie", "🎥"),
    ("episode", "📺"),
    ("track", "🎧"),
    ("live", "📡"),
    ("clip", "🎬"),
    ("photo", "🖼️"),
    ("unknown_kind", "❔"),
    ("user", "👤"),
    ("player", "📱"),
    ("quality", "⚙️"),
    ("transcode", "🔄"),
    ("progress", "⏱️"),
];

impl Icons {
    fn from_lookup(mut lookup: impl FnMut(&str, &str) -> String) -> Self {
        let mut next = |i: usize| {
            let (name, fallback) = ICON_DEFAULTS[i];
            lookup(name, fallback)
        };
        Self {
            playing: next(0),
            paused: next(1),
            buffering: next(2),
            unknown_state: next(3),
            movie: next(4),
            episode: next(5),
            track: next(6),
            live: next(7),
            clip: next(8),
            photo: next(9),
            unknown_kind: next(10),
            user: next(11),
            player: next(12),
            quality: next(13),
            transcode: next(14),
            progress: next(15),
        }
    }

    /// Resolve every icon through the emoji manager.
    pub async fn resolve(emojis: &EmojiManager) -> Self {
        let mut resolved = Vec::with_capacity(ICON_DEFAULTS.len());
        for (name, fallback) in ICON_DEFAULTS {
            resolved.push(emojis.icon(name, fallback).await);
        }
        let mut resolved = resolved.into_iter();
        Self::from_lookup(|_, fallback| resolved.next().unwrap_or_else(|| fallback.to_string()))
    }

    fn state(&self, state: PlaybackState) -> &str {
        match state {
            PlaybackState::Playing => &self.playing,
            PlaybackState::Paused => &self.paused,
            PlaybackState::Buffering => &self.buffering,
            PlaybackState::Unknown => &self.unknown_state,
        }
    }

    fn kind(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Movie => &self.movie,
            MediaKind::Episode => &self.episode,
            MediaKind::Track => &self.track,
            MediaKind::Live => &self.live,
            MediaKind::Clip => &self.clip,
            MediaKind::Photo => &self.photo,
            MediaKind::Unknown => &self.unknown_kind,
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::from_lookup(|_, fallback| fallback.to_string())
    }
}

/// Renders sessions under the configured display and anonymity rules.
#[derive(Debug, Clone)]
pub struct TextManager {
    anonymize: AnonymizeConfig,
    use_friendly_names: bool,
    thousands_separator: String,
    server_name: String,
    time_zone: String,
    use_24_hour: bool,
}

impl TextManager {
    pub fn from_config(config: &TauticordConfig) -> Self {
        let display = &config.display;
        Self {
            anonymize: display.anonymize,
            use_friendly_names: display.use_friendly_names,
            thousands_separator: display.thousands_separator.clone(),
            server_name: display.server_name.clone(),
            time_zone: display.time.server_time_zone.clone(),
            use_24_hour: display.time.use_24_hour_time,
        }
    }

    pub fn thousands_separator(&self) -> &str {
        &self.thousands_separator
    }

    /// `{number emoji} | {state icon} {kind icon} {title}`, at most 200 chars.
    pub fn session_title(&self, session: &Session, ordinal: usize, icons: &Icons) -> String {
        let number = stream_emoji(ordinal)
            .map(str::to_string)
            .unwrap_or_else(|| ordinal.to_string());
        let title = format!(
            "{number} | {} {} {}",
            icons.state(session.state),
            icons.kind(session.media_kind),
            session.title
        );
        truncate_with_ellipsis(&title, EMBED_FIELD_NAME_LIMIT)
    }

    /// The session body lines, joined by newlines. May be empty.
    pub fn session_body(&self, session: &Session, now: DateTime<Utc>, icons: &Icons) -> String {
        let hide = &self.anonymize;
        let mut lines: Vec<String> = Vec::with_capacity(4);

        if !hide.hide_usernames {
            let name = if self.use_friendly_names && !session.friendly_name.is_empty() {
                &session.friendly_name
            } else {
                &session.username
            };
            lines.push(format!("{} {name}", icons.user));
        }

        let product = (!hide.hide_platforms && !session.product.is_empty()).then_some(&session.product);
        let player = (!hide.hide_player_names && !session.player.is_empty()).then_some(&session.player);
        match (product, player) {
            (Some(product), Some(player)) => lines.push(format!("{} {product} ({player})", icons.player)),
            (Some(one), None) | (None, Some(one)) => lines.push(format!("{} {one}", icons.player)),
            (None, None) => {}
        }

        let mut quality_parts: Vec<String> = Vec::new();
        if !hide.hide_quality && !session.quality_profile.is_empty() {
            quality_parts.push(session.quality_profile.clone());
        }
        if !hide.hide_bandwidth {
            let bandwidth = format::bandwidth(session.bandwidth_kbps);
            if quality_parts.is_empty() {
                quality_parts.push(bandwidth);
            } else {
                quality_parts.push(format!("({bandwidth})"));
            }
        }
        if !hide.hide_transcode && session.is_transcoding() {
            quality_parts.push(format!("{} Transcode", icons.transcode));
        }
        if !quality_parts.is_empty() {
            lines.push(format!("{} {}", icons.quality, quality_parts.join(" ")));
        }

        let mut progress_parts: Vec<String> = Vec::new();
        match (session.progress_percent(), session.remaining_ms()) {
            (Some(percent), Some(remaining)) => {
                if !hide.hide_progress {
                    progress_parts.push(format!(
                        "{}/{} ({percent:.0}%)",
                        format::clock_duration(session.view_offset_ms),
                        format::clock_duration(session.duration_ms)
                    ));
                }
                if !hide.hide_eta {
                    let eta = now.timestamp() + (remaining / 1000) as i64;
                    progress_parts.push(format!("ETA {}", format::relative_timestamp(eta)));
                }
            }
            _ => {
                if !hide.hide_progress {
                    progress_parts.push("Unknown".to_string());
                }
            }
        }
        if !progress_parts.is_empty() {
            lines.push(format!("{} {}", icons.progress, progress_parts.join(" | ")));
        }

        lines.join("\n")
    }

    fn updated(&self, now: DateTime<Utc>) -> String {
        format!(
            "{UPDATED_PREFIX}{}",
            format::local_time(now, &self.time_zone, self.use_24_hour)
        )
    }

    /// Footer summarising the snapshot. With no streams only the timestamp
    /// remains.
    pub fn overview_footer(
        &self,
        snapshot: &ActivitySnapshot,
        now: DateTime<Utc>,
        termination_enabled: bool,
    ) -> String {
        let streams = snapshot.stream_count();
        if streams == 0 {
            return self.updated(now);
        }
        let transcodes = snapshot.transcode_count();
        let mut footer = format!(
            "{streams} {} ({transcodes} {}) @ {} ({} LAN)\n\n{}",
            plural(streams, "stream"),
            plural(transcodes, "transcode"),
            format::bandwidth(snapshot.total_bandwidth_kbps),
            format::bandwidth(snapshot.lan_bandwidth_kbps),
            self.updated(now)
        );
        if termination_enabled {
            footer.push_str("\nTo terminate a stream, react with the stream number.");
        }
        footer
    }

    /// The summary embed for one snapshot.
    pub fn activity_embed(
        &self,
        snapshot: &ActivitySnapshot,
        now: DateTime<Utc>,
        icons: &Icons,
        termination_enabled: bool,
    ) -> Embed {
        let title = if snapshot.stream_count() == 0 {
            "No current activity".to_string()
        } else {
            format!("Current activity on {}", self.server_name)
        };
        let mut embed = Embed::new().title(title).color(SUMMARY_COLOR);

        for (i, session) in snapshot.sessions.iter().take(MAX_EMBED_FIELDS).enumerate() {
            let body = self.session_body(session, now, icons);
            let body = if body.is_empty() { EMPTY_FIELD.to_string() } else { body };
            embed = embed.field(self.session_title(session, i + 1, icons), body, false);
        }
        let hidden = snapshot.stream_count().saturating_sub(MAX_EMBED_FIELDS);
        if hidden > 0 {
            embed = embed.description(format!("+{hidden} more {}", plural(hidden, "stream")));
        }

        embed.footer(self.overview_footer(snapshot, now, termination_enabled))
    }

    /// Single-field embed shown while the monitoring API is unreachable.
    pub fn connection_lost_embed(&self, now: DateTime<Utc>) -> Embed {
        Embed::new()
            .title(format!("Current activity on {}", self.server_name))
            .color(SUMMARY_COLOR)
            .field("Connection lost", "Unable to reach Tautulli.", false)
            .footer(format!("Connection lost.\n\n{}", self.updated(now)))
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tauticord_core::types::ContainerDecision;

    fn session() -> Session {
        Session {
            session_id: "1".into(),
            username: "alice".into(),
            friendly_name: "Alice".into(),
            product: "Plex Web".into(),
            player: "Chrome".into(),
            quality_profile: "1080p".into(),
            bandwidth_kbps: 4500,
            view_offset_ms: 1_800_000,
            duration_ms: 3_600_000,
            state: PlaybackState::Playing,
            container_decision: ContainerDecision::Transcode,
            media_kind: MediaKind::Movie,
            title: "Heat".into(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 18, 0, 0).unwrap()
    }

    fn manager(anonymize: AnonymizeConfig) -> TextManager {
        let mut config = TauticordConfig::default();
        config.display.anonymize = anonymize;
        config.display.time.use_24_hour_time = true;
        TextManager::from_config(&config)
    }

    #[test]
    fn full_body_has_four_lines() {
        let body = manager(AnonymizeConfig::default()).session_body(&session(), now(), &Icons::default());
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "👤 alice");
        assert_eq!(lines[1], "📱 Plex Web (Chrome)");
        assert_eq!(lines[2], "⚙️ 1080p (4.4 Mbps) 🔄 Transcode");
        assert!(lines[3].starts_with("⏱️ 00:30/01:00 (50%) | ETA <t:"));
        assert!(lines[3].ends_with(":R>"));
    }

    #[test]
    fn friendly_names_when_enabled() {
        let mut config = TauticordConfig::default();
        config.display.use_friendly_names = true;
        let body = TextManager::from_config(&config).session_body(&session(), now(), &Icons::default());
        assert!(body.starts_with("👤 Alice"));
    }

    #[test]
    fn hiding_a_whole_group_drops_the_line() {
        let hide = AnonymizeConfig {
            hide_platforms: true,
            hide_player_names: true,
            ..AnonymizeConfig::default()
        };
        let body = manager(hide).session_body(&session(), now(), &Icons::default());
        assert!(!body.contains("📱"));
        assert_eq!(body.lines().count(), 3);
    }

    #[test]
    fn every_flag_only_removes_content() {
        let base = manager(AnonymizeConfig::default()).session_body(&session(), now(), &Icons::default());
        let flags: [fn(&mut AnonymizeConfig); 8] = [
            |a| a.hide_usernames = true,
            |a| a.hide_platforms = true,
            |a| a.hide_player_names = true,
            |a| a.hide_quality = true,
            |a| a.hide_bandwidth = true,
            |a| a.hide_transcode = true,
            |a| a.hide_progress = true,
            |a| a.hide_eta = true,
        ];
        for set in flags {
            let mut hide = AnonymizeConfig::default();
            set(&mut hide);
            let body = manager(hide).session_body(&session(), now(), &Icons::default());
            assert!(body.len() < base.len(), "flag added content: {body}");
            // Remaining lines appear in the same relative order.
            let mut cursor = 0;
            for line in body.lines() {
                let icon = line.split(' ').next().unwrap_or_default();
                let pos = base[cursor..].find(icon).map(|p| p + cursor);
                assert!(pos.is_some(), "line reordered: {line}");
                cursor = pos.unwrap_or(cursor);
            }
        }
    }

    #[test]
    fn invalid_progress_renders_unknown() {
        let mut s = session();
        s.view_offset_ms = s.duration_ms + 1;
        let body = manager(AnonymizeConfig::default()).session_body(&s, now(), &Icons::default());
        assert!(body.ends_with("⏱️ Unknown"));
    }

    #[test]
    fn long_titles_are_truncated() {
        let mut s = session();
        s.title = "t".repeat(400);
        let title = manager(AnonymizeConfig::default()).session_title(&s, 1, &Icons::default());
        assert!(title.chars().count() <= EMBED_FIELD_NAME_LIMIT);
        assert!(title.ends_with("..."));
        assert!(title.starts_with("1️⃣ | ▶️ 🎥 "));
    }

    #[test]
    fn footer_with_and_without_streams() {
        let text = manager(AnonymizeConfig::default());
        let empty = ActivitySnapshot::default();
        assert_eq!(text.overview_footer(&empty, now(), true), "Updated 18:00");

        let snapshot = ActivitySnapshot::new(vec![session()], 13_500, 4_500);
        let footer = text.overview_footer(&snapshot, now(), true);
        assert!(footer.starts_with("1 stream (1 transcode) @ 13.2 Mbps (4.4 Mbps LAN)\n\nUpdated 18:00"));
        assert!(footer.ends_with("To terminate a stream, react with the stream number."));
        assert!(!text.overview_footer(&snapshot, now(), false).contains("terminate"));
    }

    #[test]
    fn empty_embed_title() {
        let embed = manager(AnonymizeConfig::default()).activity_embed(
            &ActivitySnapshot::default(),
            now(),
            &Icons::default(),
            true,
        );
        assert_eq!(embed.title.as_deref(), Some("No current activity"));
        assert!(embed.fields.is_empty());
    }

    #[test]
    fn connection_lost_has_single_field() {
        let embed = manager(AnonymizeConfig::default()).connection_lost_embed(now());
        assert_eq!(embed.fields.len(), 1);
        let footer = embed.footer.unwrap();
        assert!(footer.starts_with("Connection lost."));
        assert!(is_summary_footer(&footer));
    }
}
