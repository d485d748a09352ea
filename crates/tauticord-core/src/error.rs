// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Tauticord.

use thiserror::Error;

/// Exit code for a generic fatal error.
pub const EXIT_FATAL: i32 = 1;

/// Exit code used when the Discord bot token is rejected.
pub const EXIT_INVALID_TOKEN: i32 = 101;

/// The primary error type shared by every Tauticord crate.
#[derive(Debug, Error)]
pub enum TauticordError {
    /// Configuration errors (unreadable YAML, invalid values, missing keys).
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration migration failed its post-check or could not run.
    #[error("migration {number:03} failed: {message}")]
    Migration { number: u32, message: String },

    /// Webhook store errors (database open, query failure, schema version).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Monitoring API errors (transport, HTTP status, envelope, JSON).
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat platform errors (permissions, missing objects, transport).
    #[error("platform error: {message}")]
    Platform {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The chat platform throttled the request (HTTP 429).
    #[error("rate limited by platform: {0}")]
    RateLimited(String),

    /// The chat platform rejected the bot credentials.
    #[error("invalid bot token")]
    InvalidToken,

    /// A named object could not be found.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TauticordError {
    /// Shorthand for an upstream error without a source.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a platform error without a source.
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
            source: None,
        }
    }

    /// Process exit code for this error when it terminates the agent.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidToken => EXIT_INVALID_TOKEN,
            _ => EXIT_FATAL,
        }
    }

    /// True for errors that should be retried on the next tick rather than
    /// surfaced as failures of the loop itself.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::Platform { .. } | Self::RateLimited(_) | Self::Timeout { .. }
        )
    }
}
