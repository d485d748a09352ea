// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

use clap::Parser;

/// Tauticord - Tautulli activity and stats in your Discord server.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tauticord", version, about, long_about = None)]
pub struct Cli {
    /// Configuration directory, or the path of a `.yaml` file.
    #[arg(long = "config", value_name = "PATH", default_value = "/config")]
    pub config: PathBuf,

    /// Directory for `tauticord.log` and its rotated copies.
    #[arg(long = "log", value_name = "DIR", default_value = "/logs")]
    pub log: PathBuf,

    /// SQLite database holding received webhooks.
    #[arg(long = "database", value_name = "PATH", default_value = "/config/tauticord.db")]
    pub database: PathBuf,

    /// Local usage record, written when `Extras.Analytics` is enabled.
    #[arg(long = "usage", value_name = "PATH", default_value = "/config/.tauticord_usage.json")]
    pub usage: PathBuf,

    /// Directory of PNG icons uploaded as custom emojis.
    #[arg(long = "emojis", value_name = "DIR", default_value = "/app/resources/emojis")]
    pub emojis: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["tauticord"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/config"));
        assert_eq!(cli.log, PathBuf::from("/logs"));
        assert_eq!(cli.database, PathBuf::from("/config/tauticord.db"));
    }

    #[test]
    fn all_paths_are_overridable() {
        let cli = Cli::try_parse_from([
            "tauticord",
            "--config",
            "/srv/tc/tauticord.yaml",
            "--log",
            "/srv/tc/logs",
            "--database",
            "/srv/tc/db.sqlite",
            "--usage",
            "/srv/tc/usage.json",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("/srv/tc/tauticord.yaml"));
        assert_eq!(cli.log, PathBuf::from("/srv/tc/logs"));
        assert_eq!(cli.database, PathBuf::from("/srv/tc/db.sqlite"));
        assert_eq!(cli.usage, PathBuf::from("/srv/tc/usage.json"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(Cli::try_parse_from(["tauticord", "--verbose"]).is_err());
    }
}
