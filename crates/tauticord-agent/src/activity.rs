// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The activity loop: gauges, the summary message and its reactions, and
//! stream termination.
//!
//! The service owns the summary message handle and the ordered session ids
//! of the last render. Reaction events are resolved against that state, so
//! the number a user reacts with always refers to what they saw.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tauticord_config::model::TauticordConfig;
use tauticord_config::model::labels;
use tauticord_core::message::{ChannelId, ChannelKind, MessageId, MessageInfo, ReactionEvent, Reply};
use tauticord_core::types::ActivitySnapshot;
use tauticord_core::TauticordError;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::carousel::is_carousel_message;
use crate::context::AgentContext;
use crate::emoji::{MAX_CONTROLLABLE_STREAMS, stream_emojis, stream_ordinal};
use crate::gauge::{BandwidthKind, Gauge, GaugeBinding, GaugeManager, GaugeValue};
use crate::service::RefreshService;
use crate::text::is_summary_footer;

/// How many recent messages are inspected when deciding edit vs re-post.
const HISTORY_LIMIT: u8 = 100;

/// Default lifetime of a termination confirmation.
pub const CONFIRMATION_TTL: Duration = Duration::from_secs(5);

/// Activity gauges enabled in `config`, in display order.
pub fn activity_bindings(config: &TauticordConfig) -> Vec<GaugeBinding> {
    let activity = &config.stats.activity;
    if !activity.enable {
        return Vec::new();
    }
    let types = &activity.stat_types;
    [
        (Gauge::PlexStatus, &types.plex_server_availability, labels::PLEX_STATUS),
        (Gauge::StreamCount, &types.stream_count, labels::STREAM_COUNT),
        (Gauge::TranscodeCount, &types.transcode_count, labels::TRANSCODE_COUNT),
        (Gauge::Bandwidth(BandwidthKind::Total), &types.bandwidth, labels::BANDWIDTH),
        (Gauge::Bandwidth(BandwidthKind::Local), &types.local_bandwidth, labels::LOCAL_BANDWIDTH),
        (Gauge::Bandwidth(BandwidthKind::Remote), &types.remote_bandwidth, labels::REMOTE_BANDWIDTH),
    ]
    .into_iter()
    .filter(|(_, config, _)| config.enable)
    .map(|(gauge, config, label)| GaugeBinding::new(gauge, config, label))
    .collect()
}

/// Value of a count or bandwidth gauge for a snapshot.
fn snapshot_value(gauge: Gauge, snapshot: &ActivitySnapshot) -> Option<GaugeValue> {
    match gauge {
        Gauge::StreamCount => Some(GaugeValue::Count(snapshot.stream_count() as u64)),
        Gauge::TranscodeCount => Some(GaugeValue::Count(snapshot.transcode_count() as u64)),
        Gauge::Bandwidth(BandwidthKind::Total) => Some(GaugeValue::BandwidthKbps(snapshot.total_bandwidth_kbps)),
        Gauge::Bandwidth(BandwidthKind::Local) => Some(GaugeValue::BandwidthKbps(snapshot.lan_bandwidth_kbps)),
        Gauge::Bandwidth(BandwidthKind::Remote) => {
            Some(GaugeValue::BandwidthKbps(snapshot.remote_bandwidth_kbps()))
        }
        _ => None,
    }
}

fn same_emoji(a: &str, b: &str) -> bool {
    a.chars().filter(|c| *c != '\u{FE0F}').eq(b.chars().filter(|c| *c != '\u{FE0F}'))
}

#[derive(Debug, Default)]
struct ActivityState {
    summary_channel: Option<ChannelId>,
    summary_message: Option<MessageId>,
    stream_count: usize,
    session_ids: Vec<String>,
    /// Sessions asked to stop that were still present in the last snapshot.
    terminating: HashSet<String>,
}

/// A summary embed rendered by this service, as opposed to confirmations or
/// the carousel.
fn is_summary_message(message: &MessageInfo) -> bool {
    !is_carousel_message(message) && message.embed_footers.iter().any(|f| is_summary_footer(f))
}

/// The central refresh loop.
pub struct ActivityService {
    ctx: AgentContext,
    gauges: GaugeManager,
    bindings: Vec<GaugeBinding>,
    state: Mutex<ActivityState>,
    termination_enabled: AtomicBool,
    confirmation_ttl: Duration,
}

impl ActivityService {
    pub fn new(ctx: AgentContext) -> Self {
        let bindings = activity_bindings(&ctx.config);
        let gauges = GaugeManager::new(
            ctx.platform.clone(),
            ctx.config.stats.activity.category_name.clone(),
            ctx.config.display.thousands_separator.clone(),
        )
        .with_categories(ctx.categories.clone());
        Self {
            ctx,
            gauges,
            bindings,
            state: Mutex::new(ActivityState::default()),
            termination_enabled: AtomicBool::new(false),
            confirmation_ttl: CONFIRMATION_TTL,
        }
    }

    pub fn with_confirmation_ttl(mut self, ttl: Duration) -> Self {
        self.confirmation_ttl = ttl;
        self
    }

    pub fn termination_enabled(&self) -> bool {
        self.termination_enabled.load(Ordering::Relaxed)
    }

    /// The tracked summary message, if one was posted.
    pub async fn summary_message(&self) -> Option<(ChannelId, MessageId)> {
        let state = self.state.lock().await;
        state.summary_channel.zip(state.summary_message)
    }

    /// Session id shown as stream `ordinal` in the last render.
    pub async fn session_for(&self, ordinal: usize) -> Option<String> {
        let state = self.state.lock().await;
        if ordinal == 0 || ordinal > state.stream_count.min(MAX_CONTROLLABLE_STREAMS) {
            return None;
        }
        state.session_ids.get(ordinal - 1).cloned()
    }

    async fn update_gauges(&self, activity: &Result<ActivitySnapshot, TauticordError>) {
        if self.bindings.is_empty() {
            return;
        }
        for binding in &self.bindings {
            let value = match (binding.gauge, activity) {
                (Gauge::PlexStatus, Ok(snapshot)) if snapshot.stream_count() > 0 => GaugeValue::Online(true),
                (Gauge::PlexStatus, _) => GaugeValue::Online(self.ctx.upstream.plex_online().await),
                (gauge, Ok(snapshot)) => match snapshot_value(gauge, snapshot) {
                    Some(value) => value,
                    None => continue,
                },
                (_, Err(_)) => {
                    debug!(gauge = %binding.prefix(), "activity unavailable, leaving gauge untouched");
                    continue;
                }
            };
            if let Err(e) = self.gauges.set(binding, &value).await {
                GaugeManager::log_failure(binding, &e);
            }
        }
    }

    /// The summary text channel, created when missing.
    async fn summary_channel(&self) -> Result<ChannelId, TauticordError> {
        let name = &self.ctx.config.discord.summary_channel_name;
        let channels = self.ctx.platform.list_channels().await?;
        let cached = self.state.lock().await.summary_channel;
        if let Some(id) = cached
            && channels.iter().any(|c| c.id == id)
        {
            return Ok(id);
        }
        let id = match channels.iter().find(|c| c.kind == ChannelKind::Text && c.name == *name) {
            Some(channel) => channel.id,
            None => {
                info!(channel = %name, "creating summary channel");
                self.ctx.platform.create_text_channel(name, None).await?.id
            }
        };
        let mut state = self.state.lock().await;
        if state.summary_channel != Some(id) {
            state.summary_channel = Some(id);
            state.summary_message = None;
        }
        Ok(id)
    }

    fn is_own(&self, message: &MessageInfo) -> bool {
        self.ctx.platform.bot_user_id() == Some(message.author_id)
    }

    /// Edit the summary in place when nothing foreign was posted after it,
    /// otherwise replace it with a new message at the bottom.
    async fn place_summary(&self, channel: ChannelId, reply: &Reply) -> Result<MessageId, TauticordError> {
        let platform = &self.ctx.platform;
        let recent = platform.recent_messages(channel, HISTORY_LIMIT).await?;
        let tracked = self.state.lock().await.summary_message;
        let candidate = tracked.or_else(|| {
            recent
                .iter()
                .find(|m| self.is_own(m) && is_summary_message(m))
                .map(|m| m.id)
        });

        if let Some(id) = candidate {
            if recent.iter().any(|m| m.id == id) {
                let only_own_after = recent.iter().take_while(|m| m.id != id).all(|m| self.is_own(m));
                if only_own_after {
                    match platform.edit_message(channel, id, reply).await {
                        Ok(()) => return Ok(id),
                        Err(e) => warn!(error = %e, "failed to edit summary message, re-posting"),
                    }
                }
            }
            if let Err(e) = platform.delete_message(channel, id).await {
                if matches!(e, TauticordError::NotFound { .. }) {
                    debug!(message = %id, "summary message already gone");
                } else {
                    warn!(error = %e, "failed to delete summary message, purging own messages");
                    self.purge_own(channel, &recent).await;
                }
            }
        }

        let id = platform.send_message(channel, reply).await?;
        debug!(message = %id, "posted summary message");
        Ok(id)
    }

    async fn purge_own(&self, channel: ChannelId, recent: &[MessageInfo]) {
        for message in recent.iter().filter(|m| self.is_own(m) && !is_carousel_message(m)) {
            if let Err(e) = self.ctx.platform.delete_message(channel, message.id).await {
                warn!(message = %message.id, error = %e, "failed to purge message");
            }
        }
    }

    /// Make the reactions on `message` equal `desired`, in order.
    async fn reconcile_reactions(
        &self,
        channel: ChannelId,
        message: MessageId,
        desired: &[String],
    ) -> Result<(), TauticordError> {
        let platform = &self.ctx.platform;
        let current = platform.reactions(channel, message).await?;
        let common = current
            .iter()
            .zip(desired)
            .take_while(|(have, want)| same_emoji(have, want))
            .count();

        if common == 0 && !current.is_empty() {
            platform.clear_reactions(channel, message).await?;
        } else {
            for stale in &current[common..] {
                platform.remove_reaction_emoji(channel, message, stale).await?;
            }
        }
        for emoji in &desired[common..] {
            platform.add_reaction(channel, message, emoji).await?;
        }
        Ok(())
    }

    async fn update_summary(&self, activity: &Result<ActivitySnapshot, TauticordError>) -> Result<(), TauticordError> {
        let now = Utc::now();
        let channel = self.summary_channel().await?;
        let termination = self.termination_enabled();
        let (embed, desired) = match activity {
            Ok(snapshot) => {
                let icons = self.ctx.icons().await;
                let desired = if termination {
                    stream_emojis(snapshot.stream_count())
                } else {
                    Vec::new()
                };
                (self.ctx.text.activity_embed(snapshot, now, &icons, termination), desired)
            }
            Err(_) => (self.ctx.text.connection_lost_embed(now), Vec::new()),
        };

        let message = match self.place_summary(channel, &Reply::embed(embed)).await {
            Ok(message) => message,
            Err(TauticordError::NotFound { .. }) => {
                warn!(channel = %channel, "summary channel disappeared, resolving it again next tick");
                self.forget_summary(None).await;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        {
            let mut state = self.state.lock().await;
            state.summary_message = Some(message);
            match activity {
                Ok(snapshot) => {
                    state.stream_count = snapshot.stream_count();
                    state.session_ids = snapshot.session_ids();
                    let live: HashSet<String> = state.session_ids.iter().cloned().collect();
                    state.terminating.retain(|id| live.contains(id));
                }
                Err(_) => {
                    state.stream_count = 0;
                    state.session_ids.clear();
                }
            }
        }
        match self.reconcile_reactions(channel, message, &desired).await {
            Err(TauticordError::NotFound { .. }) => {
                warn!(message = %message, "summary message deleted mid-tick, re-posting next tick");
                self.forget_summary(Some(channel)).await;
                Ok(())
            }
            other => other,
        }
    }

    /// Drop the tracked summary message, and the channel too when `keep` is
    /// not that channel.
    async fn forget_summary(&self, keep: Option<ChannelId>) {
        let mut state = self.state.lock().await;
        state.summary_message = None;
        if state.summary_channel != keep {
            state.summary_channel = None;
        }
    }

    async fn update_presence(&self, activity: &Result<ActivitySnapshot, TauticordError>) {
        let template = &self.ctx.config.discord.status_message;
        if template.is_empty() {
            return;
        }
        let Ok(snapshot) = activity else {
            return;
        };
        let text = template.replace("{stream_count}", &snapshot.stream_count().to_string());
        if let Err(e) = self.ctx.platform.set_presence(&text).await {
            warn!(error = %e, "failed to update presence");
        }
    }

    /// Terminate the stream an admin reacted with on the summary message.
    ///
    /// Returns `true` when the reaction was acted on.
    pub async fn handle_reaction(&self, event: &ReactionEvent) -> Result<bool, TauticordError> {
        let Some((channel, message)) = self.summary_message().await else {
            return Ok(false);
        };
        if event.message_id != message || self.ctx.platform.bot_user_id() == Some(event.user_id) {
            return Ok(false);
        }
        if !self.ctx.is_admin(event.user_id.0) {
            debug!(user = %event.user_id, "ignoring reaction from non-admin");
            return Ok(false);
        }
        if !self.termination_enabled() {
            return Ok(false);
        }
        let Some(ordinal) = stream_ordinal(&event.emoji) else {
            return Ok(false);
        };
        let Some(session_id) = self.session_for(ordinal).await else {
            debug!(ordinal, "reaction does not match a current stream");
            return Ok(false);
        };

        let first_request = self.state.lock().await.terminating.insert(session_id.clone());
        let text = if first_request {
            let message_text = &self.ctx.config.tautulli.terminate_message;
            match self.ctx.upstream.terminate_session(&session_id, message_text).await {
                Ok(true) => {
                    info!(session = %session_id, user = %event.user_id, "terminated stream");
                    format!("Stream {ordinal} was ended.")
                }
                Ok(false) => format!("Stream {ordinal} had already ended."),
                Err(e) => {
                    error!(session = %session_id, error = %e, "failed to terminate stream");
                    self.state.lock().await.terminating.remove(&session_id);
                    format!("Stream {ordinal} could not be ended.")
                }
            }
        } else {
            debug!(session = %session_id, "termination already requested");
            format!("Stream {ordinal} is already ending.")
        };

        self.post_confirmation(channel, text).await;
        if let Err(e) = self
            .ctx
            .platform
            .remove_user_reaction(channel, message, event.user_id, &event.emoji)
            .await
        {
            warn!(error = %e, "failed to clear termination reaction");
        }
        Ok(true)
    }

    async fn post_confirmation(&self, channel: ChannelId, text: String) {
        let platform = self.ctx.platform.clone();
        let id = match platform.send_message(channel, &Reply::text(text)).await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "failed to post termination confirmation");
                return;
            }
        };
        let ttl = self.confirmation_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = platform.delete_message(channel, id).await {
                debug!(message = %id, error = %e, "confirmation already removed");
            }
        });
    }
}

#[async_trait]
impl RefreshService for ActivityService {
    fn name(&self) -> &str {
        "activity"
    }

    fn interval(&self) -> Duration {
        Duration::from_secs(self.ctx.config.tautulli.refresh_seconds)
    }

    async fn on_ready(&self) -> Result<(), TauticordError> {
        let enabled = self.ctx.plex_pass().await;
        self.termination_enabled.store(enabled, Ordering::Relaxed);
        info!(termination = enabled, gauges = self.bindings.len(), "activity service ready");
        Ok(())
    }

    async fn tick(&self) -> Result<(), TauticordError> {
        let activity = self.ctx.upstream.get_activity().await;
        if let Err(e) = &activity {
            error!(error = %e, "failed to fetch activity");
        }

        self.update_gauges(&activity).await;

        if self.ctx.config.discord.post_summary_message {
            self.update_summary(&activity).await?;
        }

        self.update_presence(&activity).await;
        Ok(())
    }
}
