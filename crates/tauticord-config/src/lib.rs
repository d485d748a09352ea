// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Tauticord.
//!
//! Provides YAML configuration parsing over compiled defaults, a lenient
//! boolean parser, semantic validation, miette diagnostics with typo
//! suggestions, and the migration pipeline that brings an older file (or a
//! set of environment variables) to the current schema.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use tauticord_config::{ConfigPaths, migrations, load_and_validate};
//!
//! let paths = ConfigPaths::resolve(Path::new("/config"));
//! migrations::run_migrations(&paths, &migrations::process_env()).expect("migrations");
//! let config = load_and_validate(&paths.file).expect("config errors");
//! println!("Server: {}", config.display.server_name);
//! ```

pub mod boolean;
pub mod diagnostic;
pub mod loader;
pub mod migrations;
pub mod model;
pub mod validation;

use std::path::Path;

pub use boolean::parse_bool;
pub use diagnostic::{ConfigError, render_errors};
pub use loader::{ConfigPaths, load_config_from_path, load_config_from_str};
pub use model::TauticordConfig;

/// Load the configuration file, apply refresh floors and validate it.
///
/// 1. Reads the YAML file and warns about unknown top-level keys
/// 2. Merges it over compiled defaults via Figment
/// 3. On success: clamps refresh intervals and runs semantic validation
/// 4. On Figment error: converts to miette diagnostics with source spans
pub fn load_and_validate(path: &Path) -> Result<TauticordConfig, Vec<ConfigError>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| vec![ConfigError::Io(format!("{}: {e}", path.display()))])?;
    loader::warn_unknown_keys(&content);
    finish(
        loader::load_config_from_path(path),
        (path.display().to_string(), content),
    )
}

/// Load configuration from a YAML string and validate it.
pub fn load_and_validate_str(yaml: &str) -> Result<TauticordConfig, Vec<ConfigError>> {
    loader::warn_unknown_keys(yaml);
    finish(
        loader::load_config_from_str(yaml),
        ("<inline>".to_string(), yaml.to_string()),
    )
}

fn finish(
    loaded: Result<TauticordConfig, figment::Error>,
    source: (String, String),
) -> Result<TauticordConfig, Vec<ConfigError>> {
    match loaded {
        Ok(mut config) => {
            validation::apply_floors(&mut config);
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, Some(&source))),
    }
}
