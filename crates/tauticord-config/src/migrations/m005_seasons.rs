// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 005: add the `Seasons` gauge to show libraries.

use serde_yaml::{Mapping, Value};
use tauticord_core::TauticordError;

use super::document::{self, key};
use super::{Migration, MigrationContext};

pub struct Seasons;

fn needs_seasons(entry: &Mapping) -> bool {
    let is_show = entry.contains_key(key("Series")) || entry.contains_key(key("Episodes"));
    is_show && !entry.contains_key(key("Seasons"))
}

fn missing(ctx: &MigrationContext<'_>, number: u32) -> Result<bool, TauticordError> {
    Ok(document::read(number, &ctx.paths.file)?.is_some_and(|doc| {
        document::library_entries(&doc)
            .iter()
            .any(|entry| needs_seasons(entry))
    }))
}

impl Migration for Seasons {
    fn number(&self) -> u32 {
        5
    }

    fn name(&self) -> &'static str {
        "add seasons gauge to show libraries"
    }

    fn pre_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        missing(ctx, self.number())
    }

    fn forward(&self, ctx: &MigrationContext<'_>) -> Result<(), TauticordError> {
        let Some(mut doc) = document::read(self.number(), &ctx.paths.file)? else {
            return Err(document::failure(self.number(), "configuration file disappeared"));
        };
        for entry in document::library_entries_mut(&mut doc) {
            if needs_seasons(entry) {
                entry.insert(key("Seasons"), Value::Mapping(document::default_gauge()));
            }
        }
        document::write(self.number(), &ctx.paths.file, &doc)
    }

    fn post_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        Ok(!missing(ctx, self.number())?)
    }
}
