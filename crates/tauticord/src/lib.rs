// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tauticord binary support: command line, logging, local usage record and
//! the boot sequence.

pub mod cli;
pub mod logging;
pub mod serve;
pub mod usage;

pub use cli::Cli;

/// Process exit code for the outcome of [`serve::run`].
pub fn exit_code(outcome: &Result<(), tauticord_core::TauticordError>) -> i32 {
    match outcome {
        Ok(()) => 0,
        Err(e) => e.exit_code(),
    }
}
