// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 003: add the `RecentlyAdded` gauge to every library entry.

use serde_yaml::Value;
use tauticord_core::TauticordError;

use super::document::{self, key};
use super::{Migration, MigrationContext};

pub struct RecentlyAdded;

fn missing(ctx: &MigrationContext<'_>, number: u32) -> Result<bool, TauticordError> {
    Ok(document::read(number, &ctx.paths.file)?.is_some_and(|doc| {
        document::library_entries(&doc)
            .iter()
            .any(|entry| !entry.contains_key(key("RecentlyAdded")))
    }))
}

impl Migration for RecentlyAdded {
    fn number(&self) -> u32 {
        3
    }

    fn name(&self) -> &'static str {
        "add recently added gauge to libraries"
    }

    fn pre_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        missing(ctx, self.number())
    }

    fn forward(&self, ctx: &MigrationContext<'_>) -> Result<(), TauticordError> {
        let Some(mut doc) = document::read(self.number(), &ctx.paths.file)? else {
            return Err(document::failure(self.number(), "configuration file disappeared"));
        };
        for entry in document::library_entries_mut(&mut doc) {
            if !entry.contains_key(key("RecentlyAdded")) {
                let mut gauge = document::default_gauge();
                gauge.insert(key("Hours"), Value::Number(24.into()));
                entry.insert(key("RecentlyAdded"), Value::Mapping(gauge));
            }
        }
        document::write(self.number(), &ctx.paths.file, &doc)
    }

    fn post_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        Ok(!missing(ctx, self.number())?)
    }
}
