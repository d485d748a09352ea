// SPDX-FileCopyrightText: 2026 Tauticord Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tauticord - Tautulli activity and stats in your Discord server.
//!
//! This is the binary entry point.

use clap::Parser;
use tauticord::{Cli, exit_code, logging, serve};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let guard = logging::init(&cli.log);

    let outcome = serve::run(cli).await;
    if let Err(e) = &outcome {
        eprintln!("tauticord: {e}");
    }
    let code = exit_code(&outcome);

    // Flush the file writer before exiting.
    drop(guard);
    std::process::exit(code);
}
