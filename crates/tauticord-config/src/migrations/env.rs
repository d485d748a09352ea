// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build a configuration from `TC_*` environment variables.

use std::collections::HashMap;

use crate::boolean::parse_bool;
use crate::model::{GaugeConfig, LibraryConfig, TauticordConfig};

/// Prefix shared by every recognized variable.
pub const ENV_PREFIX: &str = "TC_";

/// Snapshot of the `TC_*` variables of this process.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

struct EnvReader<'a> {
    env: &'a HashMap<String, String>,
    errors: Vec<String>,
}

impl<'a> EnvReader<'a> {
    fn string(&self, name: &str) -> Option<String> {
        self.env.get(name).map(|v| v.trim().to_string())
    }

    fn string_or(&self, name: &str, default: String) -> String {
        self.string(name).unwrap_or(default)
    }

    fn boolean(&mut self, name: &str, default: bool) -> bool {
        match self.env.get(name) {
            Some(raw) => match parse_bool(raw) {
                Ok(b) => b,
                Err(e) => {
                    self.errors.push(format!("{name}: {e}"));
                    default
                }
            },
            None => default,
        }
    }

    fn number<T: std::str::FromStr>(&mut self, name: &str, default: T) -> T {
        match self.env.get(name) {
            Some(raw) => match raw.trim().parse() {
                Ok(n) => n,
                Err(_) => {
                    self.errors.push(format!("{name}: `{raw}` is not a number"));
                    default
                }
            },
            None => default,
        }
    }

    fn gauge(&mut self, name: &str) -> GaugeConfig {
        GaugeConfig {
            enable: self.boolean(name, false),
            ..GaugeConfig::default()
        }
    }

    fn list(&self, name: &str) -> Vec<String> {
        self.string(name)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Build the configuration described by `env`. Missing variables take the
/// schema defaults; malformed values are collected into the error.
pub fn config_from_env(env: &HashMap<String, String>) -> Result<TauticordConfig, String> {
    let mut r = EnvReader {
        env,
        errors: Vec::new(),
    };
    let mut config = TauticordConfig::default();

    let t = &mut config.tautulli;
    t.url = r.string_or("TC_TAUTULLI_URL", String::new());
    t.api_key = r.string_or("TC_TAUTULLI_KEY", String::new());
    t.use_self_signed_cert = r.boolean("TC_USE_SELF_SIGNED_CERT", false);
    t.refresh_seconds = r.number("TC_REFRESH_SECONDS", t.refresh_seconds);
    t.terminate_message = r.string_or("TC_TERMINATE_MESSAGE", t.terminate_message.clone());
    if r.env.contains_key("TC_PLEX_PASS") {
        t.plex_pass = Some(r.boolean("TC_PLEX_PASS", false));
    }

    let d = &mut config.discord;
    d.bot_token = r.string_or("TC_DISCORD_BOT_TOKEN", String::new());
    d.server_id = r.number("TC_DISCORD_SERVER_ID", 0);
    for raw in r.list("TC_DISCORD_ADMIN_IDS") {
        match raw.parse() {
            Ok(id) => d.admin_ids.push(id),
            Err(_) => r
                .errors
                .push(format!("TC_DISCORD_ADMIN_IDS: `{raw}` is not a numeric id")),
        }
    }
    d.summary_channel_name =
        r.string_or("TC_DISCORD_SUMMARY_CHANNEL_NAME", d.summary_channel_name.clone());
    d.announcements_channel_name =
        r.string_or("TC_DISCORD_ANNOUNCEMENTS_CHANNEL_NAME", String::new());
    d.post_recently_added_message = !d.announcements_channel_name.is_empty();

    let display = &mut config.display;
    display.server_name = r.string_or("TC_SERVER_NAME", display.server_name.clone());
    display.thousands_separator = r.string_or("TC_THOUSANDS_SEPARATOR", String::new());
    display.time.server_time_zone =
        r.string_or("TC_SERVER_TIMEZONE", display.time.server_time_zone.clone());
    display.time.use_24_hour_time = r.boolean("TC_USE_24_HOUR_TIME", false);

    let use_emojis = r.boolean("TC_USE_EMOJIS", true);

    let types = &mut config.stats.activity.stat_types;
    types.stream_count = r.gauge("TC_VC_STREAM_COUNT");
    types.transcode_count = r.gauge("TC_VC_TRANSCODE_COUNT");
    types.bandwidth = r.gauge("TC_VC_BANDWIDTH");
    types.local_bandwidth = r.gauge("TC_VC_LOCAL_BANDWIDTH");
    types.remote_bandwidth = r.gauge("TC_VC_REMOTE_BANDWIDTH");
    types.plex_server_availability = r.gauge("TC_VC_PLEX_STATUS");
    let activity_gauges = [
        &mut types.stream_count,
        &mut types.transcode_count,
        &mut types.bandwidth,
        &mut types.local_bandwidth,
        &mut types.remote_bandwidth,
        &mut types.plex_server_availability,
    ];
    let mut any_activity = false;
    for gauge in activity_gauges {
        gauge.use_emojis = use_emojis;
        any_activity |= gauge.enable;
    }
    config.stats.activity.enable = any_activity;

    let libraries = &mut config.stats.libraries;
    libraries.libraries = r
        .list("TC_VC_LIBRARY_NAMES")
        .into_iter()
        .map(|name| library_with_all_gauges(name, Vec::new(), use_emojis))
        .collect();
    if let Some(spec) = r.string("TC_VC_COMBINED_LIBRARIES") {
        match parse_combined(&spec) {
            Ok(combined) => {
                libraries.combined_libraries = combined
                    .into_iter()
                    .map(|(name, members)| library_with_all_gauges(name, members, use_emojis))
                    .collect();
            }
            Err(e) => r.errors.push(format!("TC_VC_COMBINED_LIBRARIES: {e}")),
        }
    }
    libraries.enable = !libraries.libraries.is_empty() || !libraries.combined_libraries.is_empty();

    let metrics = &mut config.stats.performance.metrics;
    metrics.cpu = r.gauge("TC_MONITOR_CPU");
    metrics.memory = r.gauge("TC_MONITOR_MEMORY");
    metrics.user_count = r.gauge("TC_MONITOR_USER_COUNT");
    if let Some(path) = r.string("TC_MONITOR_DISK_SPACE_PATH").filter(|p| !p.is_empty()) {
        metrics.disk_space.enable = true;
        metrics.disk_space.path = path;
    }
    metrics.cpu.use_emojis = use_emojis;
    metrics.memory.use_emojis = use_emojis;
    metrics.user_count.use_emojis = use_emojis;
    metrics.disk_space.use_emojis = use_emojis;
    config.stats.performance.enable = metrics.cpu.enable
        || metrics.memory.enable
        || metrics.user_count.enable
        || metrics.disk_space.enable;

    config.extras.analytics = r.boolean("TC_ALLOW_ANALYTICS", true);
    config.extras.enable_update_reminders = r.boolean("TC_ENABLE_UPDATE_REMINDERS", true);

    if r.errors.is_empty() {
        Ok(config)
    } else {
        Err(r.errors.join("; "))
    }
}

fn library_with_all_gauges(name: String, members: Vec<String>, use_emojis: bool) -> LibraryConfig {
    let gauge = GaugeConfig {
        use_emojis,
        ..GaugeConfig::enabled()
    };
    LibraryConfig {
        name,
        libraries: members,
        movies: gauge.clone(),
        series: gauge.clone(),
        seasons: gauge.clone(),
        episodes: gauge.clone(),
        artists: gauge.clone(),
        albums: gauge.clone(),
        tracks: gauge,
        ..LibraryConfig::default()
    }
}

/// Parse `Name:LibA,LibB;Name2:LibC`.
pub fn parse_combined(spec: &str) -> Result<Vec<(String, Vec<String>)>, String> {
    spec.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (name, members) = entry
                .split_once(':')
                .ok_or_else(|| format!("`{entry}` is missing `:`"))?;
            let members: Vec<String> = members
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if name.trim().is_empty() || members.is_empty() {
                return Err(format!("`{entry}` needs a name and at least one library"));
            }
            Ok((name.trim().to_string(), members))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_env_yields_defaults() {
        let config = config_from_env(&HashMap::new()).unwrap();
        assert_eq!(config, TauticordConfig::default());
    }

    #[test]
    fn values_are_read_and_booleans_parsed() {
        let config = config_from_env(&env(&[
            ("TC_TAUTULLI_URL", "http://tautulli:8181"),
            ("TC_TAUTULLI_KEY", "k"),
            ("TC_USE_SELF_SIGNED_CERT", "Yes"),
            ("TC_REFRESH_SECONDS", "30"),
            ("TC_DISCORD_ADMIN_IDS", "1, 2"),
            ("TC_DISCORD_SERVER_ID", "99"),
            ("TC_VC_STREAM_COUNT", "on"),
            ("TC_MONITOR_DISK_SPACE_PATH", "/data"),
            ("TC_PLEX_PASS", "disable"),
        ]))
        .unwrap();
        assert_eq!(config.tautulli.url, "http://tautulli:8181");
        assert!(config.tautulli.use_self_signed_cert);
        assert_eq!(config.tautulli.refresh_seconds, 30);
        assert_eq!(config.tautulli.plex_pass, Some(false));
        assert_eq!(config.discord.admin_ids, vec![1, 2]);
        assert_eq!(config.discord.server_id, 99);
        assert!(config.stats.activity.enable);
        assert!(config.stats.activity.stat_types.stream_count.enable);
        assert!(!config.stats.activity.stat_types.bandwidth.enable);
        assert!(config.stats.performance.enable);
        assert_eq!(config.stats.performance.metrics.disk_space.path, "/data");
    }

    #[test]
    fn malformed_booleans_are_errors() {
        let err = config_from_env(&env(&[("TC_VC_BANDWIDTH", "sure")])).unwrap_err();
        assert!(err.contains("TC_VC_BANDWIDTH"));
    }

    #[test]
    fn combined_library_spec() {
        let parsed = parse_combined("All Movies:Movies,4K Movies;Shows:TV").unwrap();
        assert_eq!(
            parsed,
            vec![
                (
                    "All Movies".to_string(),
                    vec!["Movies".to_string(), "4K Movies".to_string()]
                ),
                ("Shows".to_string(), vec!["TV".to_string()]),
            ]
        );
        assert!(parse_combined("NoColon").is_err());
        assert!(parse_combined("Name:").is_err());
    }
}
