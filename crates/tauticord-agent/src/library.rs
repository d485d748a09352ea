// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-library item count gauges.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tauticord_config::model::{LibraryConfig, TauticordConfig};
use tauticord_config::validation::library_gauges;
use tauticord_core::types::{LibraryDescriptor, LibraryItemCounts, LibraryKind};
use tauticord_core::TauticordError;
use tracing::{debug, warn};

use crate::context::AgentContext;
use crate::gauge::{Gauge, GaugeBinding, GaugeManager, GaugeValue, LibraryCountKind};
use crate::service::RefreshService;

/// Upper bound of items fetched when counting recent additions.
const RECENT_SCAN_LIMIT: u32 = 100;

/// Enabled gauges of one library entry.
pub fn library_bindings(library: &LibraryConfig) -> Vec<GaugeBinding> {
    library_gauges(library)
        .into_iter()
        .zip(LibraryCountKind::ALL)
        .filter(|((config, _, _), _)| config.enable)
        .map(|((config, emoji, name), kind)| {
            GaugeBinding::with_defaults(Gauge::LibraryCount(kind), &config, emoji, &name)
        })
        .collect()
}

fn count_for(kind: LibraryCountKind, counts: &LibraryItemCounts) -> u64 {
    match kind {
        LibraryCountKind::Movies => counts.movies,
        LibraryCountKind::Series => counts.series,
        LibraryCountKind::Seasons => counts.seasons,
        LibraryCountKind::Episodes => counts.episodes,
        LibraryCountKind::Artists => counts.artists,
        LibraryCountKind::Albums => counts.albums,
        LibraryCountKind::Tracks => counts.tracks,
        LibraryCountKind::RecentlyAdded => 0,
    }
}

/// Member library names of an entry: itself, or its listed libraries when
/// it is a combined entry.
fn members(library: &LibraryConfig) -> Vec<&str> {
    if library.libraries.is_empty() {
        vec![library.name.as_str()]
    } else {
        library.libraries.iter().map(String::as_str).collect()
    }
}

/// Resolve member names against the server's libraries. Returns `None`
/// when a member is missing or the members mix kinds.
fn resolve_members<'a>(
    library: &LibraryConfig,
    available: &'a [LibraryDescriptor],
) -> Option<Vec<&'a LibraryDescriptor>> {
    let mut resolved = Vec::new();
    for name in members(library) {
        match available.iter().find(|d| d.name.eq_ignore_ascii_case(name)) {
            Some(descriptor) => resolved.push(descriptor),
            None => {
                warn!(library = %library.name, member = %name, "library not found on server, skipping");
                return None;
            }
        }
    }
    let kinds: Vec<LibraryKind> = resolved.iter().map(|d| d.kind).collect();
    if kinds.windows(2).any(|pair| pair[0] != pair[1]) {
        warn!(library = %library.name, ?kinds, "combined library mixes library types, skipping");
        return None;
    }
    Some(resolved)
}

struct LibraryEntry {
    config: LibraryConfig,
    bindings: Vec<GaugeBinding>,
}

/// Refreshes the count gauges of every configured library.
pub struct LibraryService {
    ctx: AgentContext,
    gauges: GaugeManager,
    entries: Vec<LibraryEntry>,
}

impl LibraryService {
    pub fn new(ctx: AgentContext) -> Self {
        let entries = Self::entries(&ctx.config);
        let gauges = GaugeManager::new(
            ctx.platform.clone(),
            ctx.config.stats.libraries.category_name.clone(),
            ctx.config.display.thousands_separator.clone(),
        )
        .with_categories(ctx.categories.clone());
        Self { ctx, gauges, entries }
    }

    fn entries(config: &TauticordConfig) -> Vec<LibraryEntry> {
        let libraries = &config.stats.libraries;
        if !libraries.enable {
            return Vec::new();
        }
        libraries
            .libraries
            .iter()
            .chain(&libraries.combined_libraries)
            .map(|library| LibraryEntry {
                config: library.clone(),
                bindings: library_bindings(library),
            })
            .filter(|entry| !entry.bindings.is_empty())
            .collect()
    }

    pub fn gauge_count(&self) -> usize {
        self.entries.iter().map(|e| e.bindings.len()).sum()
    }

    async fn recently_added(&self, sections: &[u64], hours: u32) -> Result<u64, TauticordError> {
        let cutoff = Utc::now().timestamp() - i64::from(hours) * 3600;
        let mut total = 0;
        for section in sections {
            let items = self
                .ctx
                .upstream
                .get_recently_added(RECENT_SCAN_LIMIT, None, Some(*section))
                .await?;
            total += items.iter().filter(|item| item.added_at >= cutoff).count() as u64;
        }
        Ok(total)
    }

    async fn refresh(&self, entry: &LibraryEntry, available: &[LibraryDescriptor]) -> Result<(), TauticordError> {
        let Some(descriptors) = resolve_members(&entry.config, available) else {
            return Ok(());
        };
        let mut counts = LibraryItemCounts::default();
        for descriptor in &descriptors {
            counts = counts + self.ctx.upstream.get_library_counts(descriptor.section_id).await?;
        }
        debug!(library = %entry.config.name, ?counts, "library counts");

        let sections: Vec<u64> = descriptors.iter().map(|d| d.section_id).collect();
        for binding in &entry.bindings {
            let Gauge::LibraryCount(kind) = binding.gauge else {
                continue;
            };
            let value = if kind == LibraryCountKind::RecentlyAdded {
                GaugeValue::Count(self.recently_added(&sections, entry.config.recently_added.hours).await?)
            } else {
                GaugeValue::Count(count_for(kind, &counts))
            };
            if let Err(e) = self.gauges.set(binding, &value).await {
                GaugeManager::log_failure(binding, &e);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshService for LibraryService {
    fn name(&self) -> &str {
        "library-stats"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.ctx.config.stats.libraries.refresh_seconds)
    }

    async fn tick(&self) -> Result<(), TauticordError> {
        if self.entries.is_empty() {
            return Ok(());
        }
        let available = self.ctx.upstream.get_libraries().await?;
        for entry in &self.entries {
            if let Err(e) = self.refresh(entry, &available).await {
                warn!(library = %entry.config.name, error = %e, "failed to refresh library gauges");
            }
        }
        Ok(())
    }
}
