// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Tauticord integration tests.
//!
//! Provides in-memory stand-ins for the external collaborators so refresh
//! loops, reaction handling and slash commands can be exercised without a
//! network.
//!
//! # Components
//!
//! - [`MockUpstream`] - scriptable monitoring API with a call log
//! - [`MockPlatform`] - in-memory guild: channels, messages, ordered reactions
//! - [`MockRenderer`] - chart renderer returning a fixed PNG
//! - [`fixtures`] - builders for sessions and snapshots

pub mod fixtures;
pub mod mock_platform;
pub mod mock_renderer;
pub mod mock_upstream;

pub use mock_platform::{BOT_USER, MockPlatform, StoredMessage};
pub use mock_renderer::{FAKE_PNG, MockRenderer};
pub use mock_upstream::MockUpstream;
