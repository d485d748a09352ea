// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 002: move flat pre-v2 keys into the nested layout.

use serde_yaml::{Mapping, Value};
use tauticord_core::TauticordError;

use super::document::{self, key};
use super::{Migration, MigrationContext};

/// Legacy flat key and its nested destination.
pub const LEGACY_KEYS: [(&str, &[&str]); 28] = [
    ("TautulliURL", &["Tautulli", "URL"]),
    ("TautulliAPIKey", &["Tautulli", "APIKey"]),
    ("UseSelfSignedCert", &["Tautulli", "UseSelfSignedCert"]),
    ("RefreshSeconds", &["Tautulli", "RefreshSeconds"]),
    ("TerminateMessage", &["Tautulli", "TerminateMessage"]),
    ("DiscordBotToken", &["Discord", "BotToken"]),
    ("DiscordServerID", &["Discord", "ServerID"]),
    ("DiscordAdminIDs", &["Discord", "AdminIDs"]),
    ("DiscordChannelName", &["Discord", "ChannelName"]),
    ("UseSlashCommands", &["Discord", "EnableSlashCommands"]),
    ("Nitro", &["Discord", "Nitro"]),
    ("ServerName", &["Display", "ServerName"]),
    ("UseFriendlyNames", &["Display", "UseFriendlyNames"]),
    ("ThousandsSeparator", &["Display", "ThousandsSeparator"]),
    ("Anonymize", &["Display", "Anonymize"]),
    ("Use24HourTime", &["Display", "Time", "Use24HourTime"]),
    ("ServerTimeZone", &["Display", "Time", "ServerTimeZone"]),
    ("VoiceChannelCategoryName", &["Stats", "Activity", "CategoryName"]),
    ("StreamCount", &["Stats", "Activity", "StatTypes", "StreamCount"]),
    ("TranscodeCount", &["Stats", "Activity", "StatTypes", "TranscodeCount"]),
    ("Bandwidth", &["Stats", "Activity", "StatTypes", "Bandwidth"]),
    ("LocalBandwidth", &["Stats", "Activity", "StatTypes", "LocalBandwidth"]),
    ("RemoteBandwidth", &["Stats", "Activity", "StatTypes", "RemoteBandwidth"]),
    ("PlexServerAvailability", &["Stats", "Activity", "StatTypes", "PlexServerAvailability"]),
    ("LibraryStats", &["Stats", "Libraries"]),
    ("PerformanceStats", &["Stats", "Performance"]),
    ("AllowAnalytics", &["Extras", "Analytics"]),
    ("EnableUpdateReminders", &["Extras", "EnableUpdateReminders"]),
];

pub struct LegacyLayout;

fn is_gauge_destination(path: &[&str]) -> bool {
    path.len() == 4 && path[2] == "StatTypes"
}

fn has_legacy_keys(doc: &Mapping) -> bool {
    LEGACY_KEYS
        .iter()
        .any(|(legacy, _)| doc.contains_key(key(legacy)))
}

impl Migration for LegacyLayout {
    fn number(&self) -> u32 {
        2
    }

    fn name(&self) -> &'static str {
        "flat layout to nested layout"
    }

    fn pre_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        let Some(doc) = document::read(self.number(), &ctx.paths.file)? else {
            return Ok(false);
        };
        let nested = document::get(&doc, &["Tautulli"]).is_some_and(Value::is_mapping);
        Ok(has_legacy_keys(&doc) && !nested)
    }

    fn forward(&self, ctx: &MigrationContext<'_>) -> Result<(), TauticordError> {
        let Some(legacy) = document::read(self.number(), &ctx.paths.file)? else {
            return Err(document::failure(self.number(), "configuration file disappeared"));
        };

        let mut migrated = Mapping::new();
        let mut extra = Mapping::new();
        for (k, v) in legacy {
            let destination = k
                .as_str()
                .and_then(|name| LEGACY_KEYS.iter().find(|(legacy, _)| *legacy == name))
                .map(|(_, path)| *path);
            match destination {
                Some(path) if is_gauge_destination(path) && !v.is_mapping() => {
                    let mut gauge = document::default_gauge();
                    gauge.insert(key("Enable"), v);
                    document::set(&mut migrated, path, Value::Mapping(gauge));
                }
                Some(path) => document::set(&mut migrated, path, v),
                None => {
                    extra.insert(k, v);
                }
            }
        }
        // Unknown keys stay at the top level; nested sections already present
        // are merged below the moved values.
        for (k, v) in extra {
            if let Some(existing) = migrated.get_mut(&k) {
                if let (Value::Mapping(existing), Value::Mapping(section)) = (existing, v) {
                    for (inner_key, inner_value) in section {
                        existing.entry(inner_key).or_insert(inner_value);
                    }
                }
            } else {
                migrated.insert(k, v);
            }
        }

        document::write(self.number(), &ctx.paths.file, &migrated)
    }

    fn post_check(&self, ctx: &MigrationContext<'_>) -> Result<bool, TauticordError> {
        let Some(doc) = document::read(self.number(), &ctx.paths.file)? else {
            return Ok(false);
        };
        let nested = document::get(&doc, &["Tautulli"]).is_some_and(Value::is_mapping);
        Ok(nested && !has_legacy_keys(&doc))
    }
}
