//! `quicknote` command-line front end.
//!
//! # Responsibility
//! - Parse flags/env into storage and logging configuration.
//! - Drive the notes controller and print its outcome events.

mod app;
mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use quicknote_core::{core_version, default_log_level, init_logging};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.global.log_dir {
        let level = cli
            .global
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = log_dir
            .to_str()
            .context("log dir must be valid UTF-8")?;
        init_logging(&level, log_dir).context("failed to start logging")?;
        log::info!(
            "event=cli_start module=cli status=ok core_version={}",
            core_version()
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app::run(cli, &mut out, &mut app::stdin_confirm)
}
