// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host metrics and user count gauges.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{Disks, System};
use tauticord_config::model::TauticordConfig;
use tauticord_config::model::labels;
use tauticord_core::TauticordError;
use tokio::sync::Mutex;
use tracing::debug;

use crate::context::AgentContext;
use crate::format;
use crate::gauge::{Gauge, GaugeBinding, GaugeManager, GaugeValue, SystemMetricKind};
use crate::service::RefreshService;

/// Fixed refresh interval of the performance gauges.
pub const PERFORMANCE_INTERVAL: Duration = Duration::from_secs(300);

/// Used and total bytes of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub used: u64,
    pub total: u64,
}

/// Source of host metrics.
#[async_trait]
pub trait HostSampler: Send + Sync + 'static {
    /// Global CPU usage in percent.
    async fn cpu_percent(&self) -> f64;

    async fn memory(&self) -> Usage;

    /// Usage of the filesystem holding `path`, or `None` when it does not
    /// exist.
    async fn disk(&self, path: &Path) -> Option<Usage>;
}

/// [`HostSampler`] backed by `sysinfo`.
pub struct SystemSampler {
    system: Mutex<System>,
}

impl SystemSampler {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostSampler for SystemSampler {
    async fn cpu_percent(&self) -> f64 {
        let mut system = self.system.lock().await;
        system.refresh_cpu_usage();
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        system.refresh_cpu_usage();
        f64::from(system.global_cpu_usage())
    }

    async fn memory(&self) -> Usage {
        let mut system = self.system.lock().await;
        system.refresh_memory();
        Usage {
            used: system.used_memory(),
            total: system.total_memory(),
        }
    }

    async fn disk(&self, path: &Path) -> Option<Usage> {
        let path = std::fs::canonicalize(path).ok()?;
        let disks = Disks::new_with_refreshed_list();
        disks
            .list()
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| Usage {
                used: disk.total_space().saturating_sub(disk.available_space()),
                total: disk.total_space(),
            })
    }
}

/// Memory as `{used} ({pct})`.
pub fn memory_text(usage: Usage) -> String {
    format!(
        "{} ({})",
        format::bytes(usage.used),
        format::percent(usage.used as f64, usage.total as f64)
    )
}

/// Disk as `{used}/{total} ({pct})`.
pub fn disk_text(usage: Usage) -> String {
    format!(
        "{}/{} ({})",
        format::bytes(usage.used),
        format::bytes(usage.total),
        format::percent(usage.used as f64, usage.total as f64)
    )
}

/// Enabled performance gauges, in display order.
pub fn performance_bindings(config: &TauticordConfig) -> Vec<GaugeBinding> {
    let performance = &config.stats.performance;
    if !performance.enable {
        return Vec::new();
    }
    let metrics = &performance.metrics;
    let disk = metrics.disk_space.gauge();
    [
        (SystemMetricKind::UserCount, &metrics.user_count, labels::USER_COUNT),
        (SystemMetricKind::Disk, &disk, labels::DISK_SPACE),
        (SystemMetricKind::Cpu, &metrics.cpu, labels::CPU),
        (SystemMetricKind::Memory, &metrics.memory, labels::MEMORY),
    ]
    .into_iter()
    .filter(|(_, config, _)| config.enable)
    .map(|(kind, config, label)| GaugeBinding::new(Gauge::SystemMetric(kind), config, label))
    .collect()
}

/// Refreshes CPU, memory, disk and user count gauges every five minutes.
pub struct PerformanceService {
    ctx: AgentContext,
    gauges: GaugeManager,
    bindings: Vec<GaugeBinding>,
    sampler: Box<dyn HostSampler>,
    disk_path: PathBuf,
}

impl PerformanceService {
    pub fn new(ctx: AgentContext) -> Self {
        Self::with_sampler(ctx, Box::new(SystemSampler::new()))
    }

    pub fn with_sampler(ctx: AgentContext, sampler: Box<dyn HostSampler>) -> Self {
        let bindings = performance_bindings(&ctx.config);
        let gauges = GaugeManager::new(
            ctx.platform.clone(),
            ctx.config.stats.performance.category_name.clone(),
            ctx.config.display.thousands_separator.clone(),
        )
        .with_categories(ctx.categories.clone());
        let disk_path = PathBuf::from(&ctx.config.stats.performance.metrics.disk_space.path);
        Self {
            ctx,
            gauges,
            bindings,
            sampler,
            disk_path,
        }
    }

    async fn value(&self, kind: SystemMetricKind) -> Result<GaugeValue, TauticordError> {
        Ok(match kind {
            SystemMetricKind::Cpu => GaugeValue::Text(format!("{:.1}%", self.sampler.cpu_percent().await)),
            SystemMetricKind::Memory => GaugeValue::Text(memory_text(self.sampler.memory().await)),
            SystemMetricKind::Disk => {
                if self.disk_path.as_os_str().is_empty() {
                    GaugeValue::Unavailable
                } else {
                    match self.sampler.disk(&self.disk_path).await {
                        Some(usage) => GaugeValue::Text(disk_text(usage)),
                        None => {
                            debug!(path = %self.disk_path.display(), "disk path not found");
                            GaugeValue::Unavailable
                        }
                    }
                }
            }
            SystemMetricKind::UserCount => GaugeValue::Count(self.ctx.upstream.get_user_count().await?),
        })
    }
}

#[async_trait]
impl RefreshService for PerformanceService {
    fn name(&self) -> &str {
        "performance-stats"
    }

    fn interval(&self) -> Duration {
        PERFORMANCE_INTERVAL
    }

    async fn tick(&self) -> Result<(), TauticordError> {
        for binding in &self.bindings {
            let Gauge::SystemMetric(kind) = binding.gauge else {
                continue;
            };
            let value = match self.value(kind).await {
                Ok(value) => value,
                Err(e) => {
                    debug!(gauge = %binding.prefix(), error = %e, "metric unavailable");
                    GaugeValue::Unavailable
                }
            };
            if let Err(e) = self.gauges.set(binding, &value).await {
                GaugeManager::log_failure(binding, &e);
            }
        }
        Ok(())
    }
}
