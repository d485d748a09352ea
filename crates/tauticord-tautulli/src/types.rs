// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tautulli API v2 response types.
//!
//! Tautulli reports most numbers as strings (`"4500"`), sometimes as numbers
//! and sometimes as `null` or `""`. Every numeric field goes through
//! [`lenient_u64`] so one odd value never fails a whole poll.

use serde::{Deserialize, Deserializer};

// --- Envelope ---

/// Outer wrapper of every API v2 response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub response: EnvelopeBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeBody {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EnvelopeBody {
    pub fn is_success(&self) -> bool {
        self.result == "success"
    }
}

/// Deserialize an unsigned integer from a number, numeric string, float,
/// empty string or null. Anything unparsable becomes 0.
pub fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_u64(&value))
}

/// Like [`lenient_u64`], keeping "absent" distinct from zero.
pub fn lenient_opt_u64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(ref s) if s.trim().is_empty() => None,
        other => Some(value_to_u64(&other)),
    })
}

/// Deserialize a string from a string, number or null.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Deserialize a flag reported as `1`/`0`, `"1"`/`"0"` or a boolean.
pub fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(ref s) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        }
        other => value_to_u64(&other) != 0,
    })
}

fn value_to_u64(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0)
        }
        serde_json::Value::Bool(b) => u64::from(*b),
        _ => 0,
    }
}

// --- get_activity ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawActivity {
    #[serde(default)]
    pub sessions: Vec<RawSession>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_bandwidth: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub lan_bandwidth: u64,
    /// Known to disagree with the sessions; kept only for debug logging.
    #[serde(default, deserialize_with = "lenient_u64")]
    pub stream_count_transcode: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSession {
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub friendly_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub player: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quality_profile: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub bandwidth: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub view_offset: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stream_container_decision: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transcode_decision: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub media_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
}

// --- libraries ---

/// Row of `get_libraries_table` and body of `get_library`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLibrary {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub section_id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub section_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub section_type: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub parent_count: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub child_count: u64,
}

/// Paged table wrapper used by the `*_table` commands.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTable<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, rename = "recordsTotal", deserialize_with = "lenient_u64")]
    pub records_total: u64,
}

// --- users ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub user_id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub friendly_name: String,
    #[serde(default = "default_active", deserialize_with = "lenient_flag")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

// --- home stats ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHomeStat {
    #[serde(default, deserialize_with = "lenient_string")]
    pub stat_id: String,
    #[serde(default)]
    pub rows: Vec<RawHomeStatRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawHomeStatRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub section_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub friendly_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub platform: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_plays: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_duration: u64,
}

impl RawHomeStatRow {
    /// First non-empty naming field; which one is set depends on the stat.
    pub fn label(&self) -> &str {
        [
            &self.title,
            &self.section_name,
            &self.friendly_name,
            &self.user,
            &self.platform,
        ]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(String::as_str)
        .unwrap_or("Unknown")
    }
}

// --- graphs ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChart {
    #[serde(default)]
    pub categories: Vec<serde_json::Value>,
    #[serde(default)]
    pub series: Vec<RawChartSeries>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChartSeries {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
}

// --- recently added ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecentlyAdded {
    #[serde(default)]
    pub recently_added: Vec<RawRecentItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecentItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating_key: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub library_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub media_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumb: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub added_at: u64,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub year: Option<u64>,
}

// --- server info ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawServerInfo {
    #[serde(default, deserialize_with = "lenient_string")]
    pub pms_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pms_version: String,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub pms_plexpass: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pms_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pms_identifier: String,
}
