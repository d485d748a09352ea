// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared handles passed to every service and command.

use std::path::PathBuf;
use std::sync::Arc;

use tauticord_config::model::TauticordConfig;
use tauticord_core::traits::{ChartRenderer, ChatPlatform, UpstreamApi};
use tracing::warn;

use crate::carousel::CarouselRegistry;
use crate::emoji::EmojiManager;
use crate::gauge::CategoryDirectory;
use crate::text::{Icons, TextManager};

/// Everything a service needs to talk to the outside world.
///
/// Cheap to clone; all collaborators sit behind `Arc`.
#[derive(Clone)]
pub struct AgentContext {
    pub config: Arc<TauticordConfig>,
    pub upstream: Arc<dyn UpstreamApi>,
    pub platform: Arc<dyn ChatPlatform>,
    pub renderer: Arc<dyn ChartRenderer>,
    pub emojis: Arc<EmojiManager>,
    pub text: Arc<TextManager>,
    pub carousels: Arc<CarouselRegistry>,
    pub categories: Arc<CategoryDirectory>,
    /// Directory of PNG icons uploaded as custom emojis on ready.
    pub emoji_assets: Option<PathBuf>,
}

impl AgentContext {
    pub fn new(
        config: TauticordConfig,
        upstream: Arc<dyn UpstreamApi>,
        platform: Arc<dyn ChatPlatform>,
        renderer: Arc<dyn ChartRenderer>,
    ) -> Self {
        let text = Arc::new(TextManager::from_config(&config));
        let categories = Arc::new(CategoryDirectory::new(platform.clone()));
        Self {
            config: Arc::new(config),
            upstream,
            platform,
            renderer,
            emojis: Arc::new(EmojiManager::new()),
            text,
            carousels: Arc::new(CarouselRegistry::new()),
            categories,
            emoji_assets: None,
        }
    }

    pub fn with_emoji_assets(mut self, dir: impl Into<PathBuf>) -> Self {
        self.emoji_assets = Some(dir.into());
        self
    }

    /// True when `user_id` may terminate streams and run admin commands.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.config.discord.is_admin(user_id)
    }

    /// Icons resolved against the uploaded custom emojis.
    pub async fn icons(&self) -> Icons {
        Icons::resolve(&self.emojis).await
    }

    /// Whether stream termination is available: the configured Plex Pass
    /// flag, else what the server reports.
    pub async fn plex_pass(&self) -> bool {
        if let Some(plex_pass) = self.config.tautulli.plex_pass {
            return plex_pass;
        }
        match self.upstream.server_info().await {
            Ok(info) => info.plex_pass,
            Err(e) => {
                warn!(error = %e, "could not detect Plex Pass, disabling stream termination");
                false
            }
        }
    }
}
