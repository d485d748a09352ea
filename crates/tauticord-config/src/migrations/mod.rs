// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration migration pipeline.
//!
//! Runs before the configuration is parsed. Each unit is identified by a
//! zero-padded ordinal and exposes idempotent `pre_check`, `forward` and
//! `post_check` steps; the runner records the outcome in the [`Ledger`].
//! A false pre-check skips the unit, a false post-check aborts boot.

pub mod document;
pub mod env;
pub mod ledger;
mod m001_env_to_yaml;
mod m002_legacy_layout;
mod m003_recently_added;
mod m004_split_channel;
mod m005_seasons;

use std::collections::HashMap;

use tauticord_core::TauticordError;

use crate::loader::ConfigPaths;

pub use env::process_env;
pub use ledger::Ledger;
pub use m002_legacy_layout::LEGACY_KEYS;

/// Inputs shared by every migration.
pub struct MigrationContext<'a> {
    pub paths: &'a ConfigPaths,
    /// `TC_*` environment variables.
    pub env: &'a HashMap<String, String>,
}

/// One configuration migration.
pub trait Migration: Send + Sync {
    fn number(&self) -> u32;

    fn name(&self) -> &'static str;

    /// Whether this migration has anything to do.
    fn pre_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError>;

    /// Apply the migration. Overwrites its output rather than appending.
    fn forward(&self, ctx: &MigrationContext<'_>) -> Result<(), TauticordError>;

    /// Whether the end state on disk reflects the migration.
    fn post_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError>;
}

/// Every migration, in application order.
pub fn all() -> Vec<Box<dyn Migration>> {
    vec![
        Box::new(m001_env_to_yaml::EnvToYaml),
        Box::new(m002_legacy_layout::LegacyLayout),
        Box::new(m003_recently_added::RecentlyAdded),
        Box::new(m004_split_channel::SplitChannel),
        Box::new(m005_seasons::Seasons),
    ]
}

/// What happened to each migration during one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The ledger already marks it done.
    AlreadyDone,
    /// Pre-check found nothing to do.
    Skipped,
    Applied,
}

/// Per-migration outcomes of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub outcomes: Vec<(u32, Outcome)>,
}

impl MigrationReport {
    pub fn applied(&self) -> Vec<u32> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == Outcome::Applied)
            .map(|(n, _)| *n)
            .collect()
    }
}

/// Run every migration in order.
pub fn run_migrations(
    paths: &ConfigPaths,
    env: &HashMap<String, String>,
) -> Result<MigrationReport, TauticordError> {
    run(&all(), paths, env)
}

/// Run the given migrations in order.
pub fn run(
    migrations: &[Box<dyn Migration>],
    paths: &ConfigPaths,
    env: &HashMap<String, String>,
) -> Result<MigrationReport, TauticordError> {
    let ledger = Ledger::new(&paths.migration_data);
    let ctx = MigrationContext { paths, env };
    let mut report = MigrationReport::default();

    for migration in migrations {
        let number = migration.number();
        let name = migration.name();

        if ledger.is_done(number) {
            tracing::debug!(number, name, "migration already applied");
            report.outcomes.push((number, Outcome::AlreadyDone));
            continue;
        }

        if !migration.pre_check(&ctx)? {
            tracing::debug!(number, name, "migration not needed");
            report.outcomes.push((number, Outcome::Skipped));
            continue;
        }

        tracing::info!(number, name, "applying configuration migration");
        if let Err(e) = migration.forward(&ctx) {
            ledger.mark_undone(number)?;
            return Err(e);
        }

        if !migration.post_check(&ctx)? {
            ledger.mark_undone(number)?;
            tracing::error!(number, name, "migration post-check failed");
            return Err(TauticordError::Migration {
                number,
                message: format!("{name}: post-check failed"),
            });
        }

        ledger.mark_done(number)?;
        report.outcomes.push((number, Outcome::Applied));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl Migration for Broken {
        fn number(&self) -> u32 {
            9
        }

        fn name(&self) -> &'static str {
            "broken"
        }

        fn pre_check(&self, _ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
            Ok(true)
        }

        fn forward(&self, _ctx: &MigrationContext<'_>) -> Result<(), TauticordError> {
            Ok(())
        }

        fn post_check(&self, _ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
            Ok(false)
        }
    }

    #[test]
    fn failed_post_check_marks_undone_and_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::resolve(dir.path());
        let migrations: Vec<Box<dyn Migration>> = vec![Box::new(Broken)];

        let err = run(&migrations, &paths, &HashMap::new()).unwrap_err();
        assert!(matches!(err, TauticordError::Migration { number: 9, .. }));

        let ledger = Ledger::new(&paths.migration_data);
        assert!(!ledger.is_done(9));
        assert_eq!(ledger.entries(9), vec!["undone".to_string()]);
    }

    #[test]
    fn numbers_are_ordered() {
        let numbers: Vec<u32> = all().iter().map(|m| m.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }
}
