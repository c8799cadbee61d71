// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstat: export a repository's commit history as JSON
//!
//! Runs `git log --numstat` once and streams every commit, with per-file
//! line statistics, into a single JSON document.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use gitstat::config::Config;
use gitstat::export;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Logs go to stderr so `--stdout` output stays a clean document
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    config.validate().context("Invalid configuration")?;

    let stats = export::run(&config).await.context("Export failed")?;
    info!(
        commits = stats.commits,
        files = stats.files,
        additions = stats.additions,
        deletions = stats.deletions,
        destination = %config.output(),
        "Export complete"
    );
    Ok(())
}
