// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 004: split `Discord.ChannelName` into summary and announcements channels.

use tauticord_core::TauticordError;

use super::document::{self, key};
use super::{Migration, MigrationContext};

pub struct SplitChannel;

impl Migration for SplitChannel {
    fn number(&self) -> u32 {
        4
    }

    fn name(&self) -> &'static str {
        "split channel name"
    }

    fn pre_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        Ok(document::read(self.number(), &ctx.paths.file)?
            .is_some_and(|doc| document::get(&doc, &["Discord", "ChannelName"]).is_some()))
    }

    fn forward(&self, ctx: &MigrationContext<'_>) -> Result<(), TauticordError> {
        let Some(mut doc) = document::read(self.number(), &ctx.paths.file)? else {
            return Err(document::failure(self.number(), "configuration file disappeared"));
        };
        let Some(discord) = document::get_mapping_mut(&mut doc, &["Discord"]) else {
            return Err(document::failure(self.number(), "Discord is not a mapping"));
        };
        if let Some(name) = discord.remove(key("ChannelName")) {
            discord.insert(key("SummaryChannelName"), name);
        }
        if !discord.contains_key(key("AnnouncementsChannelName")) {
            discord.insert(key("AnnouncementsChannelName"), key(""));
        }
        document::write(self.number(), &ctx.paths.file, &doc)
    }

    fn post_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        Ok(document::read(self.number(), &ctx.paths.file)?.is_some_and(|doc| {
            document::get(&doc, &["Discord", "ChannelName"]).is_none()
                && document::get(&doc, &["Discord", "SummaryChannelName"]).is_some()
                && document::get(&doc, &["Discord", "AnnouncementsChannelName"]).is_some()
        }))
    }
}
