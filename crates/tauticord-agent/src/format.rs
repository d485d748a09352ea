// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Number, size, duration and time formatting.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const BIT_UNITS: [&str; 5] = ["bps", "Kbps", "Mbps", "Gbps", "Tbps"];
const BYTE_UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

fn scaled(value: f64, base: f64, units: &[&str]) -> String {
    let mut value = value;
    let mut unit = 0;
    while value >= base && unit < units.len() - 1 {
        value /= base;
        unit += 1;
    }
    format!("{value:.1} {}", units[unit])
}

/// Bandwidth reported in KB/s, rendered on a power-of-1024 scale.
///
/// `13500` renders as `13.2 Mbps`.
pub fn bandwidth(kbps: u64) -> String {
    scaled(kbps as f64 * 1024.0, 1024.0, &BIT_UNITS)
}

/// Byte size on a power-of-1000 scale, e.g. `1.5 GB`.
pub fn bytes(bytes: u64) -> String {
    scaled(bytes as f64, 1000.0, &BYTE_UNITS)
}

/// Integer with an optional thousands separator.
pub fn count(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    if separator.is_empty() {
        return digits;
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

/// Playback position as `HH:MM`.
pub fn clock_duration(ms: u64) -> String {
    let minutes = ms / 60_000;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Long duration as `HHh MMm`, used for watch-time statistics.
pub fn long_duration(secs: u64) -> String {
    let minutes = secs / 60;
    format!("{:02}h {:02}m", minutes / 60, minutes % 60)
}

/// Absolute time rendered by the chat client as relative ("in 5 minutes").
pub fn relative_timestamp(unix: i64) -> String {
    format!("<t:{unix}:R>")
}

/// Wall-clock time in the server's zone.
pub fn local_time(now: DateTime<Utc>, zone: &str, use_24_hour: bool) -> String {
    let tz: Tz = zone.parse().unwrap_or(Tz::UTC);
    let local = now.with_timezone(&tz);
    if use_24_hour {
        local.format("%H:%M").to_string()
    } else {
        local.format("%-I:%M %p").to_string()
    }
}

/// Percentage with one decimal.
pub fn percent(part: f64, whole: f64) -> String {
    if whole <= 0.0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part / whole * 100.0)
}
