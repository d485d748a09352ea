// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates what serde cannot express: required credentials, refresh
//! floors, gauge prefix uniqueness and the time zone name.

use std::collections::HashMap;

use crate::diagnostic::ConfigError;
use crate::model::{GaugeConfig, LibraryConfig, TauticordConfig, labels};

/// Minimum activity refresh interval in seconds.
pub const MIN_ACTIVITY_REFRESH_SECONDS: u64 = 5;

/// Minimum library stats refresh interval in seconds.
pub const MIN_LIBRARY_REFRESH_SECONDS: u64 = 300;

/// Raise refresh intervals below their floors, logging a warning for each.
pub fn apply_floors(config: &mut TauticordConfig) {
    if config.tautulli.refresh_seconds < MIN_ACTIVITY_REFRESH_SECONDS {
        tracing::warn!(
            configured = config.tautulli.refresh_seconds,
            minimum = MIN_ACTIVITY_REFRESH_SECONDS,
            "Tautulli.RefreshSeconds below minimum, clamping"
        );
        config.tautulli.refresh_seconds = MIN_ACTIVITY_REFRESH_SECONDS;
    }
    if config.stats.libraries.refresh_seconds < MIN_LIBRARY_REFRESH_SECONDS {
        tracing::warn!(
            configured = config.stats.libraries.refresh_seconds,
            minimum = MIN_LIBRARY_REFRESH_SECONDS,
            "Stats.Libraries.RefreshSeconds below minimum, clamping"
        );
        config.stats.libraries.refresh_seconds = MIN_LIBRARY_REFRESH_SECONDS;
    }
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TauticordConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.tautulli.url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "Tautulli.URL must not be empty".to_string(),
        });
    } else if !config.tautulli.url.starts_with("http://")
        && !config.tautulli.url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "Tautulli.URL `{}` must start with http:// or https://",
                config.tautulli.url
            ),
        });
    }

    if config.tautulli.api_key.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "Tautulli.APIKey must not be empty".to_string(),
        });
    }

    if config.discord.bot_token.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "Discord.BotToken must not be empty".to_string(),
        });
    }

    if config.discord.server_id == 0 {
        errors.push(ConfigError::Validation {
            message: "Discord.ServerID must be set".to_string(),
        });
    }

    if config
        .display
        .time
        .server_time_zone
        .parse::<chrono_tz::Tz>()
        .is_err()
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "Display.Time.ServerTimeZone `{}` is not a valid IANA time zone",
                config.display.time.server_time_zone
            ),
        });
    }

    for (category, prefix) in duplicate_prefixes(config) {
        errors.push(ConfigError::Validation {
            message: format!(
                "more than one gauge in category `{category}` uses the name `{prefix}`"
            ),
        });
    }

    for (i, library) in config.stats.libraries.libraries.iter().enumerate() {
        if library.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("Stats.Libraries.Libraries[{i}].Name must not be empty"),
            });
        }
    }

    for (i, combined) in config.stats.libraries.combined_libraries.iter().enumerate() {
        if combined.libraries.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!(
                    "Stats.Libraries.CombinedLibraries[{i}] (`{}`) must list at least one library",
                    combined.name
                ),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Every enabled gauge as (category name, prefix).
pub fn enabled_gauge_prefixes(config: &TauticordConfig) -> Vec<(String, String)> {
    let mut out = Vec::new();

    let activity = &config.stats.activity;
    if activity.enable {
        let types = &activity.stat_types;
        let gauges: [(&GaugeConfig, labels::GaugeLabel); 6] = [
            (&types.stream_count, labels::STREAM_COUNT),
            (&types.transcode_count, labels::TRANSCODE_COUNT),
            (&types.bandwidth, labels::BANDWIDTH),
            (&types.local_bandwidth, labels::LOCAL_BANDWIDTH),
            (&types.remote_bandwidth, labels::REMOTE_BANDWIDTH),
            (&types.plex_server_availability, labels::PLEX_STATUS),
        ];
        for (gauge, label) in gauges {
            if gauge.enable {
                out.push((
                    activity.category_name.clone(),
                    gauge.prefix(label.emoji, label.name),
                ));
            }
        }
    }

    let libraries = &config.stats.libraries;
    if libraries.enable {
        for library in libraries.libraries.iter().chain(&libraries.combined_libraries) {
            for (gauge, emoji, name) in library_gauges(library) {
                if gauge.enable {
                    out.push((libraries.category_name.clone(), gauge.prefix(emoji, &name)));
                }
            }
        }
    }

    let performance = &config.stats.performance;
    if performance.enable {
        let metrics = &performance.metrics;
        let disk = metrics.disk_space.gauge();
        let gauges: [(&GaugeConfig, labels::GaugeLabel); 4] = [
            (&metrics.user_count, labels::USER_COUNT),
            (&disk, labels::DISK_SPACE),
            (&metrics.cpu, labels::CPU),
            (&metrics.memory, labels::MEMORY),
        ];
        for (gauge, label) in gauges {
            if gauge.enable {
                out.push((
                    performance.category_name.clone(),
                    gauge.prefix(label.emoji, label.name),
                ));
            }
        }
    }

    out
}

/// The count gauges of one library entry with their default emoji and name.
pub fn library_gauges(library: &LibraryConfig) -> Vec<(GaugeConfig, &'static str, String)> {
    let display = library.display_name();
    vec![
        (library.movies.clone(), labels::MOVIES, display.to_string()),
        (library.series.clone(), labels::SERIES, display.to_string()),
        (library.seasons.clone(), labels::SEASONS, format!("{display} Seasons")),
        (library.episodes.clone(), labels::EPISODES, format!("{display} Episodes")),
        (library.artists.clone(), labels::ARTISTS, display.to_string()),
        (library.albums.clone(), labels::ALBUMS, format!("{display} Albums")),
        (library.tracks.clone(), labels::TRACKS, format!("{display} Tracks")),
        (
            library.recently_added.gauge(),
            labels::RECENTLY_ADDED,
            format!("{display} New"),
        ),
    ]
}

fn duplicate_prefixes(config: &TauticordConfig) -> Vec<(String, String)> {
    let mut seen: HashMap<(String, String), usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for key in enabled_gauge_prefixes(config) {
        let count = seen.entry(key.clone()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(key);
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> TauticordConfig {
        let mut config = TauticordConfig::default();
        config.tautulli.url = "http://localhost:8181".into();
        config.tautulli.api_key = "key".into();
        config.discord.bot_token = "token".into();
        config.discord.server_id = 42;
        config
    }

    #[test]
    fn minimal_config_validates() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn default_config_reports_all_missing_credentials() {
        let errors = validate_config(&TauticordConfig::default()).unwrap_err();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(messages.iter().any(|m| m.contains("Tautulli.URL")));
        assert!(messages.iter().any(|m| m.contains("Tautulli.APIKey")));
        assert!(messages.iter().any(|m| m.contains("Discord.BotToken")));
        assert!(messages.iter().any(|m| m.contains("Discord.ServerID")));
    }

    #[test]
    fn invalid_time_zone_fails() {
        let mut config = valid_config();
        config.display.time.server_time_zone = "Mars/Olympus".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("ServerTimeZone"))
        ));
    }

    #[test]
    fn floors_are_applied() {
        let mut config = valid_config();
        config.tautulli.refresh_seconds = 1;
        config.stats.libraries.refresh_seconds = 10;
        apply_floors(&mut config);
        assert_eq!(config.tautulli.refresh_seconds, 5);
        assert_eq!(config.stats.libraries.refresh_seconds, 300);
    }

    #[test]
    fn duplicate_prefixes_in_one_category_are_rejected() {
        let mut config = valid_config();
        config.stats.libraries.enable = true;
        let library = LibraryConfig {
            name: "Movies".into(),
            movies: GaugeConfig::enabled(),
            ..LibraryConfig::default()
        };
        config.stats.libraries.libraries = vec![library.clone(), library];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("🎥 Movies"))
        ));
    }

    #[test]
    fn same_name_in_different_categories_is_fine() {
        let mut config = valid_config();
        config.stats.activity.enable = true;
        config.stats.activity.stat_types.stream_count = GaugeConfig {
            custom_name: "Shared".into(),
            use_emojis: false,
            ..GaugeConfig::enabled()
        };
        config.stats.performance.enable = true;
        config.stats.performance.metrics.cpu = GaugeConfig {
            custom_name: "Shared".into(),
            use_emojis: false,
            ..GaugeConfig::enabled()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn disabled_gauges_do_not_collide() {
        let mut config = valid_config();
        config.stats.libraries.enable = true;
        let library = LibraryConfig {
            name: "Movies".into(),
            ..LibraryConfig::default()
        };
        config.stats.libraries.libraries = vec![library.clone(), library];
        assert!(validate_config(&config).is_ok());
    }
}
