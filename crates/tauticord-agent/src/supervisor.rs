// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owns the services, starts their loops once the platform is ready and
//! routes platform events to them.
//!
//! A refresh loop that ends with an error stops the supervisor with that
//! error; the binary maps it to an exit code and an external process
//! manager restarts the agent.

use std::sync::Arc;
use std::time::Duration;

use tauticord_core::message::PlatformEvent;
use tauticord_core::TauticordError;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::activity::ActivityService;
use crate::carousel::CarouselService;
use crate::commands::CommandRouter;
use crate::context::AgentContext;
use crate::library::LibraryService;
use crate::performance::PerformanceService;
use crate::service::{self, RefreshService};
use crate::shutdown::{LoopSet, drain_loops};
use crate::tagged;
use crate::version::{RELEASES_URL, VersionChecker};

/// Time allowed for loops to finish an in-flight tick on shutdown.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

pub struct Supervisor {
    ctx: AgentContext,
    activity: Arc<ActivityService>,
    router: Arc<CommandRouter>,
    services: Vec<Arc<dyn RefreshService>>,
    cancel: CancellationToken,
    loops: LoopSet,
    ready: bool,
}

impl Supervisor {
    /// Build every service enabled in the configuration.
    pub fn new(ctx: AgentContext, cancel: CancellationToken) -> Self {
        let activity = Arc::new(ActivityService::new(ctx.clone()));
        let config = ctx.config.clone();

        let mut services: Vec<Arc<dyn RefreshService>> = vec![activity.clone()];
        if config.stats.libraries.enable {
            services.push(Arc::new(LibraryService::new(ctx.clone())));
        }
        if config.stats.performance.enable {
            services.push(Arc::new(PerformanceService::new(ctx.clone())));
        }
        if config.discord.post_recently_added_message && !config.discord.announcements_channel_name.is_empty() {
            services.push(Arc::new(CarouselService::new(ctx.clone())));
        }
        if config.extras.enable_update_reminders {
            let running = semver::Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or(semver::Version::new(0, 0, 0));
            match VersionChecker::new(RELEASES_URL, running) {
                Ok(checker) => services.push(Arc::new(checker)),
                Err(e) => warn!(error = %e, "update reminders disabled"),
            }
        }

        Self {
            router: Arc::new(CommandRouter::new(ctx.clone())),
            ctx,
            activity,
            services,
            cancel,
            loops: LoopSet::new(),
            ready: false,
        }
    }

    /// Replace the enabled services, e.g. to run a subset in tests.
    pub fn with_services(mut self, services: Vec<Arc<dyn RefreshService>>) -> Self {
        self.services = services;
        self
    }

    pub fn activity(&self) -> Arc<ActivityService> {
        self.activity.clone()
    }

    pub fn service_names(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name().to_string()).collect()
    }

    /// Upload emojis, register commands and start every refresh loop.
    pub async fn on_ready(&mut self) -> Result<(), TauticordError> {
        if self.ready {
            debug!("platform reconnected, services already running");
            return Ok(());
        }
        self.ready = true;

        if let Some(dir) = &self.ctx.emoji_assets {
            if let Err(e) = self.ctx.emojis.upload_assets(self.ctx.platform.as_ref(), dir).await {
                warn!(error = %e, "custom emoji upload failed, using Unicode defaults");
            }
        }

        if self.ctx.config.discord.enable_slash_commands {
            self.router.register().await?;
        }

        for service in &self.services {
            let name = service.name().to_string();
            let handle = service::start(service.clone(), self.cancel.clone());
            self.loops.spawn(async move {
                let result = handle
                    .await
                    .unwrap_or_else(|e| Err(TauticordError::Internal(format!("refresh loop panicked: {e}"))));
                (name, result)
            });
        }
        info!(services = ?self.service_names(), "services started");
        Ok(())
    }

    /// Route one platform event. Handlers run on their own tasks so a slow
    /// command never delays a reaction.
    pub async fn dispatch(&mut self, event: PlatformEvent) -> Result<(), TauticordError> {
        match event {
            PlatformEvent::Ready { bot_user_id } => {
                info!(bot = %bot_user_id, "platform ready");
                self.on_ready().await?;
            }
            PlatformEvent::ReactionAdded(reaction) => {
                let activity = self.activity.clone();
                tokio::spawn(async move {
                    if let Err(e) = activity.handle_reaction(&reaction).await {
                        error!(error = %e, "reaction handling failed");
                    }
                });
            }
            PlatformEvent::Interaction(interaction) => {
                let router = self.router.clone();
                tokio::spawn(async move {
                    if let Err(e) = router.handle(&interaction).await {
                        error!(interaction = interaction.id, error = %e, "interaction handling failed");
                    }
                });
            }
            PlatformEvent::Mention(mention) => {
                let ctx = self.ctx.clone();
                tokio::spawn(async move {
                    if let Err(e) = tagged::handle_mention(&ctx, &mention).await {
                        warn!(error = %e, "failed to answer mention");
                    }
                });
            }
        }
        Ok(())
    }

    /// Process events until shutdown, the event stream closes, or a refresh
    /// loop fails.
    pub async fn run(mut self, mut events: mpsc::Receiver<PlatformEvent>) -> Result<(), TauticordError> {
        let outcome = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("shutdown requested");
                    break Ok(());
                }
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = self.dispatch(event).await {
                            break Err(e);
                        }
                    }
                    None => {
                        info!("platform event stream closed");
                        break Ok(());
                    }
                },
                Some(joined) = self.loops.join_next(), if !self.loops.is_empty() => {
                    match joined {
                        Ok((name, Ok(()))) => debug!(service = %name, "refresh loop finished"),
                        Ok((name, Err(e))) => {
                            error!(service = %name, error = %e, "refresh loop failed, stopping");
                            break Err(e);
                        }
                        Err(e) => break Err(TauticordError::Internal(format!("refresh loop task failed: {e}"))),
                    }
                }
            }
        };

        self.cancel.cancel();
        drain_loops(&mut self.loops, DRAIN_TIMEOUT).await;
        for adapter in [
            self.ctx.platform.shutdown().await,
            self.ctx.upstream.shutdown().await,
        ] {
            if let Err(e) = adapter {
                warn!(error = %e, "adapter shutdown failed");
            }
        }
        outcome
    }
}
