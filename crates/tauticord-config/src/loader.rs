// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment: compiled defaults merged with the
//! YAML file.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Format, Serialized, Yaml},
};

use crate::diagnostic::suggest_key;
use crate::model::{TOP_LEVEL_KEYS, TauticordConfig};

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "tauticord.yaml";

/// Name of the migration marker directory inside the config directory.
pub const MIGRATION_DATA_DIR: &str = ".migration_data";

/// Where the configuration and its migration markers live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub dir: PathBuf,
    pub file: PathBuf,
    pub migration_data: PathBuf,
}

impl ConfigPaths {
    /// Resolve the `--config` argument. A path ending in `.yaml`/`.yml`
    /// names the file; anything else names the directory.
    pub fn resolve(arg: &Path) -> Self {
        let is_file = arg
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        let (dir, file) = if is_file {
            let dir = arg
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (dir, arg.to_path_buf())
        } else {
            (arg.to_path_buf(), arg.join(CONFIG_FILE_NAME))
        };
        let migration_data = dir.join(MIGRATION_DATA_DIR);
        Self {
            dir,
            file,
            migration_data,
        }
    }
}

/// Build the Figment used for config loading.
pub fn build_figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(TauticordConfig::default()))
        .merge(Yaml::file(path))
}

/// Load configuration from a YAML file merged over defaults.
pub fn load_config_from_path(path: &Path) -> Result<TauticordConfig, figment::Error> {
    build_figment(path).extract()
}

/// Load configuration from a YAML string merged over defaults.
pub fn load_config_from_str(yaml: &str) -> Result<TauticordConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TauticordConfig::default()))
        .merge(Yaml::string(yaml))
        .extract()
}

/// Top-level keys in `yaml` that the model does not know, each with an
/// optional suggestion.
pub fn unknown_top_level_keys(yaml: &str) -> Vec<(String, Option<String>)> {
    let Ok(serde_yaml::Value::Mapping(mapping)) = serde_yaml::from_str::<serde_yaml::Value>(yaml)
    else {
        return Vec::new();
    };
    mapping
        .keys()
        .filter_map(|k| k.as_str())
        .filter(|k| !TOP_LEVEL_KEYS.contains(k))
        .map(|k| (k.to_string(), suggest_key(k, &TOP_LEVEL_KEYS)))
        .collect()
}

/// Log a warning for every unknown top-level key.
pub fn warn_unknown_keys(yaml: &str) {
    for (key, suggestion) in unknown_top_level_keys(yaml) {
        match suggestion {
            Some(s) => tracing::warn!(key = %key, suggestion = %s, "unknown configuration key ignored, did you mean `{s}`?"),
            None => tracing::warn!(key = %key, "unknown configuration key ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_argument() {
        let paths = ConfigPaths::resolve(Path::new("/config"));
        assert_eq!(paths.file, PathBuf::from("/config/tauticord.yaml"));
        assert_eq!(paths.migration_data, PathBuf::from("/config/.migration_data"));
    }

    #[test]
    fn file_argument() {
        let paths = ConfigPaths::resolve(Path::new("/etc/tc/custom.yml"));
        assert_eq!(paths.dir, PathBuf::from("/etc/tc"));
        assert_eq!(paths.file, PathBuf::from("/etc/tc/custom.yml"));

        let paths = ConfigPaths::resolve(Path::new("tauticord.yaml"));
        assert_eq!(paths.dir, PathBuf::from("."));
    }

    #[test]
    fn unknown_keys_are_reported_with_suggestions() {
        let unknown = unknown_top_level_keys("Tautuli: {}\nDiscord: {}\nBogus: 1\n");
        assert_eq!(
            unknown,
            vec![
                ("Tautuli".to_string(), Some("Tautulli".to_string())),
                ("Bogus".to_string(), None),
            ]
        );
    }

    #[test]
    fn partial_file_is_completed_from_defaults() {
        let config = load_config_from_str("Tautulli:\n  URL: http://x\n").unwrap();
        assert_eq!(config.tautulli.url, "http://x");
        assert_eq!(config.tautulli.refresh_seconds, 15);
        assert_eq!(config.discord.summary_channel_name, "tauticord");
    }
}
