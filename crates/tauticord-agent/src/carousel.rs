// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paginated recently-added embeds.
//!
//! A carousel is a list of embeds shown one at a time with first, previous,
//! next and last buttons. Views live in a [`CarouselRegistry`] keyed by an
//! instance id that is embedded in every button's custom id, so a button
//! press finds its view without any message lookup.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tauticord_core::message::{
    Button, ChannelId, ChannelKind, EMBED_FIELD_VALUE_LIMIT, Embed, MessageId, MessageInfo, Reply,
    truncate_with_ellipsis,
};
use tauticord_core::types::RecentlyAddedItem;
use tauticord_core::TauticordError;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::context::AgentContext;
use crate::service::RefreshService;
use crate::text::SUMMARY_COLOR;

/// Footer that marks the announcements carousel message.
pub const CAROUSEL_SENTINEL: &str = "Announcement Type: Recently Added Carousel";

/// Prefix of every carousel button id.
pub const BUTTON_PREFIX: &str = "tc_carousel";

/// Items shown by the announcements carousel.
pub const CAROUSEL_ITEMS: u32 = 5;

pub const CAROUSEL_INTERVAL: Duration = Duration::from_secs(300);

const ANNOUNCEMENT_INSTANCE: &str = "announcements";

/// Lifetime of a Discord interaction token; views older than this can no
/// longer be updated.
pub const VIEW_TTL: Duration = Duration::from_secs(15 * 60);

/// True when a message is the announcements carousel.
pub fn is_carousel_message(message: &MessageInfo) -> bool {
    message
        .embed_footers
        .iter()
        .any(|footer| footer.starts_with(CAROUSEL_SENTINEL))
}

/// Link opening an item in the Plex web app.
pub fn watch_url(machine_identifier: &str, rating_key: &str) -> String {
    format!(
        "https://app.plex.tv/desktop/#!/server/{machine_identifier}/details?key=%2Flibrary%2Fmetadata%2F{rating_key}"
    )
}

/// Poster URL proxied through the monitoring API.
pub fn poster_url(base_url: &str, thumb: &str) -> String {
    format!("{}/pms_image_proxy?img={thumb}", base_url.trim_end_matches('/'))
}

/// One embed per item.
pub fn item_embed(item: &RecentlyAddedItem, base_url: &str, machine_identifier: &str) -> Embed {
    let title = match item.year {
        Some(year) => format!("{} ({year})", item.title),
        None => item.title.clone(),
    };
    let mut embed = Embed::new()
        .title(title)
        .color(SUMMARY_COLOR)
        .description(truncate_with_ellipsis(&item.summary, EMBED_FIELD_VALUE_LIMIT))
        .field("Library", &item.library_name, true)
        .field("Added", format!("<t:{}:R>", item.added_at), true);
    if !machine_identifier.is_empty() {
        embed = embed.url(watch_url(machine_identifier, &item.rating_key));
    }
    if !item.thumb.is_empty() {
        embed = embed.image(poster_url(base_url, &item.thumb));
    }
    embed
}

/// Button actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    First,
    Previous,
    Next,
    Last,
}

impl Navigation {
    const ALL: [Navigation; 4] = [Self::First, Self::Previous, Self::Next, Self::Last];

    fn key(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Previous => "prev",
            Self::Next => "next",
            Self::Last => "last",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::First => "⏮",
            Self::Previous => "◀",
            Self::Next => "▶",
            Self::Last => "⏭",
        }
    }

    fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.key() == key)
    }
}

/// Split a custom id into (instance, navigation).
pub fn parse_button(custom_id: &str) -> Option<(&str, Navigation)> {
    let rest = custom_id.strip_prefix(BUTTON_PREFIX)?.strip_prefix(':')?;
    let (instance, key) = rest.rsplit_once(':')?;
    Some((instance, Navigation::parse(key)?))
}

/// Pages of one carousel plus its cursor.
#[derive(Debug, Clone)]
pub struct CarouselView {
    instance: String,
    pages: Vec<Embed>,
    page: usize,
    footer: Option<String>,
    ephemeral: bool,
    persistent: bool,
}

impl CarouselView {
    pub fn new(instance: impl Into<String>, pages: Vec<Embed>) -> Self {
        Self {
            instance: instance.into(),
            pages,
            page: 0,
            footer: None,
            ephemeral: false,
            persistent: false,
        }
    }

    /// Never evicted from the registry.
    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    /// Text placed before the page counter in every footer.
    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn navigate(&mut self, navigation: Navigation) {
        let last = self.pages.len().saturating_sub(1);
        self.page = match navigation {
            Navigation::First => 0,
            Navigation::Previous => self.page.saturating_sub(1),
            Navigation::Next => (self.page + 1).min(last),
            Navigation::Last => last,
        };
    }

    /// The current page with its navigation buttons.
    pub fn reply(&self) -> Reply {
        let counter = format!("{} of {}", (self.page + 1).min(self.pages.len()), self.pages.len());
        let footer = match &self.footer {
            Some(prefix) => format!("{prefix}\n{counter}"),
            None => counter,
        };
        let embed = match self.pages.get(self.page) {
            Some(page) => page.clone().footer(footer),
            None => Embed::new()
                .title("Recently Added")
                .description("Nothing was added recently.")
                .color(SUMMARY_COLOR)
                .footer(footer),
        };

        let last = self.pages.len().saturating_sub(1);
        let buttons = Navigation::ALL
            .into_iter()
            .map(|navigation| Button {
                custom_id: format!("{BUTTON_PREFIX}:{}:{}", self.instance, navigation.key()),
                label: navigation.label().to_string(),
                disabled: match navigation {
                    Navigation::First | Navigation::Previous => self.page == 0,
                    Navigation::Next | Navigation::Last => self.page >= last,
                },
            })
            .collect();

        Reply::embed(embed).buttons(buttons).ephemeral(self.ephemeral)
    }
}

/// Live carousels by instance id.
pub struct CarouselRegistry {
    views: DashMap<String, (CarouselView, Instant)>,
    ttl: Duration,
}

impl Default for CarouselRegistry {
    fn default() -> Self {
        Self::with_ttl(VIEW_TTL)
    }
}

impl CarouselRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            views: DashMap::new(),
            ttl,
        }
    }

    /// Store `view`, replacing any previous view of the same instance, and
    /// return its first render. Expired views are dropped first.
    pub fn insert(&self, view: CarouselView) -> Reply {
        self.evict_expired();
        let reply = view.reply();
        self.views.insert(view.instance.clone(), (view, Instant::now()));
        reply
    }

    /// Apply a button press; `None` when the id is not a live carousel.
    pub fn press(&self, custom_id: &str) -> Option<Reply> {
        let (instance, navigation) = parse_button(custom_id)?;
        let mut entry = self.views.get_mut(instance)?;
        let (view, _) = entry.value_mut();
        view.navigate(navigation);
        Some(view.reply())
    }

    pub fn contains(&self, instance: &str) -> bool {
        self.views.contains_key(instance)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn evict_expired(&self) {
        let before = self.views.len();
        self.views
            .retain(|_, (view, inserted)| view.persistent || inserted.elapsed() < self.ttl);
        let evicted = before.saturating_sub(self.views.len());
        if evicted > 0 {
            debug!(evicted, "expired carousel views dropped");
        }
    }
}

/// Keeps the announcements carousel current.
pub struct CarouselService {
    ctx: AgentContext,
    message: Mutex<Option<(ChannelId, MessageId)>>,
    machine_identifier: Mutex<String>,
}

impl CarouselService {
    pub fn new(ctx: AgentContext) -> Self {
        Self {
            ctx,
            message: Mutex::new(None),
            machine_identifier: Mutex::new(String::new()),
        }
    }

    pub async fn message(&self) -> Option<(ChannelId, MessageId)> {
        *self.message.lock().await
    }

    fn placeholder() -> Reply {
        Reply::embed(
            Embed::new()
                .title("Recently Added")
                .description("Loading…")
                .color(SUMMARY_COLOR)
                .footer(CAROUSEL_SENTINEL),
        )
    }

    async fn channel(&self) -> Result<ChannelId, TauticordError> {
        let name = &self.ctx.config.discord.announcements_channel_name;
        let channels = self.ctx.platform.list_channels().await?;
        match channels.iter().find(|c| c.kind == ChannelKind::Text && c.name == *name) {
            Some(channel) => Ok(channel.id),
            None => {
                info!(channel = %name, "creating announcements channel");
                Ok(self.ctx.platform.create_text_channel(name, None).await?.id)
            }
        }
    }

    async fn post_placeholder(&self, channel: ChannelId) -> Result<MessageId, TauticordError> {
        let id = self.ctx.platform.send_message(channel, &Self::placeholder()).await?;
        *self.message.lock().await = Some((channel, id));
        Ok(id)
    }
}

#[async_trait]
impl RefreshService for CarouselService {
    fn name(&self) -> &str {
        "recently-added"
    }

    fn interval(&self) -> Duration {
        CAROUSEL_INTERVAL
    }

    async fn on_ready(&self) -> Result<(), TauticordError> {
        let channel = self.channel().await?;
        let bot = self.ctx.platform.bot_user_id();
        let recent = self.ctx.platform.recent_messages(channel, 100).await?;
        match recent
            .iter()
            .find(|m| Some(m.author_id) == bot && is_carousel_message(m))
        {
            Some(existing) => {
                debug!(message = %existing.id, "reusing carousel message");
                *self.message.lock().await = Some((channel, existing.id));
            }
            None => {
                self.post_placeholder(channel).await?;
            }
        }

        match self.ctx.upstream.server_info().await {
            Ok(info) => *self.machine_identifier.lock().await = info.machine_identifier,
            Err(e) => warn!(error = %e, "server info unavailable, carousel links disabled"),
        }
        Ok(())
    }

    async fn tick(&self) -> Result<(), TauticordError> {
        let items = self
            .ctx
            .upstream
            .get_recently_added(CAROUSEL_ITEMS, None, None)
            .await?;
        let machine = self.machine_identifier.lock().await.clone();
        let base = self.ctx.upstream.base_url();
        let pages = items.iter().map(|item| item_embed(item, base, &machine)).collect();
        let reply = self
            .ctx
            .carousels
            .insert(
                CarouselView::new(ANNOUNCEMENT_INSTANCE, pages)
                    .footer(CAROUSEL_SENTINEL)
                    .persistent(),
            );

        let Some((channel, message)) = self.message().await else {
            return Err(TauticordError::Internal("carousel message not initialised".into()));
        };
        match self.ctx.platform.edit_message(channel, message, &reply).await {
            Ok(()) => Ok(()),
            Err(TauticordError::NotFound { .. }) => {
                warn!("carousel message was deleted, posting a new one");
                let id = self.post_placeholder(channel).await?;
                self.ctx.platform.edit_message(channel, id, &reply).await
            }
            Err(e) => Err(e),
        }
    }
}
