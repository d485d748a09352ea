// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits for the external collaborators.
//!
//! All traits extend [`PluginAdapter`] and use `#[async_trait]` so they can
//! be held as `Arc<dyn Trait>`.

pub mod adapter;
pub mod chart;
pub mod platform;
pub mod upstream;

pub use adapter::PluginAdapter;
pub use chart::{ChartRenderer, ChartSpec, ChartStyle};
pub use platform::{ChatPlatform, GuildEmoji};
pub use upstream::UpstreamApi;
