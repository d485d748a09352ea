// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 001: synthesize `tauticord.yaml` from environment variables.

use serde_yaml::Value;
use tauticord_core::TauticordError;

use super::document;
use super::env::config_from_env;
use super::{Migration, MigrationContext};

pub struct EnvToYaml;

impl Migration for EnvToYaml {
    fn number(&self) -> u32 {
        1
    }

    fn name(&self) -> &'static str {
        "environment variables to YAML"
    }

    fn pre_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        Ok(!ctx.paths.file.exists())
    }

    fn forward(&self, ctx: &MigrationContext<'_>) -> Result<(), TauticordError> {
        let config = config_from_env(ctx.env).map_err(|e| document::failure(self.number(), e))?;
        let value = serde_yaml::to_value(&config)
            .map_err(|e| document::failure(self.number(), format!("cannot serialize: {e}")))?;
        let Value::Mapping(mapping) = value else {
            return Err(document::failure(self.number(), "configuration did not serialize to a mapping"));
        };
        document::write(self.number(), &ctx.paths.file, &mapping)
    }

    fn post_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        Ok(document::read(self.number(), &ctx.paths.file)?
            .is_some_and(|doc| document::get(&doc, &["Tautulli"]).is_some()))
    }
}
