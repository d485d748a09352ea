// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Projection engine for Tauticord.
//!
//! Turns monitoring API data into chat platform state:
//! - [`activity::ActivityService`] keeps the summary embed, its reactions
//!   and the activity gauges current, and terminates streams on request
//! - [`library::LibraryService`] and [`performance::PerformanceService`]
//!   maintain count and host-metric gauges
//! - [`carousel::CarouselService`] pages through recently added items
//! - [`commands::CommandRouter`] answers slash commands and buttons
//! - [`supervisor::Supervisor`] starts the loops and routes events

pub mod activity;
pub mod carousel;
pub mod chart;
pub mod commands;
pub mod context;
pub mod emoji;
pub mod format;
pub mod gauge;
pub mod library;
pub mod performance;
pub mod service;
pub mod shutdown;
pub mod supervisor;
pub mod tagged;
pub mod text;
pub mod version;

pub use activity::ActivityService;
pub use context::AgentContext;
pub use service::RefreshService;
pub use supervisor::Supervisor;
