// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stream-number emojis and custom guild icons.
//!
//! Stream ordinals 1..=36 map onto keycap digits, the keycap ten and the
//! regional indicators A to Z. Custom icons are PNG files uploaded to the
//! guild as `tc_{stem}`; when the guild lacks room for them every lookup
//! falls back to its Unicode default.

use std::collections::HashMap;
use std::path::Path;

use tauticord_core::traits::ChatPlatform;
use tauticord_core::TauticordError;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// Prefix of every emoji this agent uploads.
pub const CUSTOM_EMOJI_PREFIX: &str = "tc_";

/// Maximum number of streams controllable through reactions.
pub const MAX_CONTROLLABLE_STREAMS: usize = 36;

const STREAM_EMOJIS: [&str; MAX_CONTROLLABLE_STREAMS] = [
    "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟", "🇦", "🇧", "🇨",
    "🇩", "🇪", "🇫", "🇬", "🇭", "🇮", "🇯", "🇰", "🇱", "🇲", "🇳", "🇴", "🇵", "🇶", "🇷",
    "🇸", "🇹", "🇺", "🇻", "🇼", "🇽", "🇾", "🇿",
];

/// Emoji for stream `ordinal` (1-based).
pub fn stream_emoji(ordinal: usize) -> Option<&'static str> {
    ordinal
        .checked_sub(1)
        .and_then(|i| STREAM_EMOJIS.get(i))
        .copied()
}

/// Ordinal of a stream emoji, accepting the keycap forms with and without
/// the variation selector.
pub fn stream_ordinal(emoji: &str) -> Option<usize> {
    let normalized: String = emoji.chars().filter(|c| *c != '\u{FE0F}').collect();
    STREAM_EMOJIS
        .iter()
        .position(|e| e.chars().filter(|c| *c != '\u{FE0F}').collect::<String>() == normalized)
        .map(|i| i + 1)
}

/// Emojis `1..=min(n, 36)` in order.
pub fn stream_emojis(n: usize) -> Vec<String> {
    STREAM_EMOJIS
        .iter()
        .take(n.min(MAX_CONTROLLABLE_STREAMS))
        .map(|e| e.to_string())
        .collect()
}

/// Resolves icon names to inline custom emojis, falling back to Unicode.
#[derive(Default)]
pub struct EmojiManager {
    custom: RwLock<HashMap<String, String>>,
}

impl EmojiManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inline form of icon `name`, or `fallback` when it was never uploaded.
    pub async fn icon(&self, name: &str, fallback: &str) -> String {
        self.custom
            .read()
            .await
            .get(name)
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Upload every `*.png` in `assets_dir` that the guild does not have yet.
    ///
    /// Returns the number of icons available afterwards. Running short of
    /// emoji slots is logged and leaves the Unicode defaults in place.
    pub async fn upload_assets(
        &self,
        platform: &dyn ChatPlatform,
        assets_dir: &Path,
    ) -> Result<usize, TauticordError> {
        let assets = read_assets(assets_dir)?;
        if assets.is_empty() {
            debug!(dir = %assets_dir.display(), "no emoji assets to upload");
            return Ok(0);
        }

        let existing = platform.list_emojis().await?;
        let mut custom = HashMap::new();
        for emoji in &existing {
            if let Some(stem) = emoji.name.strip_prefix(CUSTOM_EMOJI_PREFIX) {
                custom.insert(stem.to_string(), emoji.mention());
            }
        }

        let missing: Vec<&(String, Vec<u8>)> = assets
            .iter()
            .filter(|(stem, _)| !custom.contains_key(stem))
            .collect();

        let limit = platform.emoji_slot_limit().await?;
        let free = limit.saturating_sub(existing.len());
        if missing.len() > free {
            error!(
                fatal = true,
                needed = missing.len(),
                free,
                "not enough emoji slots for custom icons, using Unicode defaults"
            );
            return Ok(0);
        }

        for (stem, png) in missing {
            let name = format!("{CUSTOM_EMOJI_PREFIX}{stem}");
            match platform.upload_emoji(&name, png).await {
                Ok(emoji) => {
                    custom.insert(stem.clone(), emoji.mention());
                }
                Err(e) => warn!(emoji = %name, error = %e, "failed to upload emoji"),
            }
        }

        let available = custom.len();
        *self.custom.write().await = custom;
        info!(count = available, "custom emojis ready");
        Ok(available)
    }
}

/// `(stem, bytes)` of every PNG in `dir`, sorted by stem.
fn read_assets(dir: &Path) -> Result<Vec<(String, Vec<u8>)>, TauticordError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| {
        TauticordError::Internal(format!("cannot read emoji assets {}: {e}", dir.display()))
    })?;

    let mut assets = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match std::fs::read(&path) {
            Ok(bytes) => assets.push((stem.to_string(), bytes)),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable emoji asset"),
        }
    }
    assets.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(assets)
}
