// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The export pipeline
//!
//! Wires the `git log` child's stdout through chunk extraction and commit
//! parsing into the streaming document writer. Commits are written in the
//! order git emits them and never held in memory together.

use std::path::PathBuf;

use futures::TryStreamExt;
use gitstat_log::{ChunkReader, Commit, DocumentWriter, LogError, SENTINEL, parse_commit};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite, BufWriter};
use tracing::{info, warn};

use crate::config::{Config, Output};
use crate::git::{self, GitError, LogProcess};

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// Git error
    #[error(transparent)]
    Git(#[from] GitError),

    /// Reading the log or writing the document failed
    #[error(transparent)]
    Log(#[from] LogError),

    /// The output file could not be created
    #[error("Failed to create {path}: {source}")]
    CreateOutput {
        /// Requested output path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Counts from a finished export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Commits written
    pub commits: usize,
    /// File changes written across all commits
    pub files: usize,
    /// Lines added across all commits
    pub additions: u64,
    /// Lines deleted across all commits
    pub deletions: u64,
}

impl ExportStats {
    fn record(&mut self, commit: &Commit) {
        self.files += commit.files.len();
        self.additions = self.additions.saturating_add(commit.total_additions());
        self.deletions = self.deletions.saturating_add(commit.total_deletions());
    }
}

type Sink = BufWriter<Box<dyn AsyncWrite + Unpin + Send>>;

/// Stream a raw `git log` text stream into a JSON document
///
/// Returns the sink (flushed) together with the export counts.
///
/// # Errors
///
/// Returns `ExportError::Log` if reading `input` or writing `output` fails.
pub async fn export_log<R, W>(
    input: R,
    output: W,
    project_name: &str,
) -> Result<(W, ExportStats), ExportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let commits = ChunkReader::new(input, SENTINEL)
        .into_stream()
        .map_ok(|chunk| parse_commit(&chunk));
    futures::pin_mut!(commits);

    let mut document = DocumentWriter::begin(output, project_name).await?;
    let mut stats = ExportStats::default();
    while let Some(commit) = commits.try_next().await? {
        stats.record(&commit);
        document.write_commit(&commit).await?;
    }
    let (output, written) = document.finish().await?;
    stats.commits = written;

    Ok((output, stats))
}

/// Export the configured repository to the configured destination
///
/// # Errors
///
/// Returns `ExportError` if the repository cannot be found, the output
/// cannot be created, or git fails. A document may already be partially
/// written when git fails.
pub async fn run(config: &Config) -> Result<ExportStats, ExportError> {
    let repo = git::discover(config.repo_path())?;
    let name = config.name.clone().unwrap_or_else(|| repo.name.clone());
    let output = config.output();
    info!(
        repo = %repo.dir.display(),
        project = %name,
        destination = %output,
        "Exporting commit log"
    );

    let sink = open_output(&output).await?;

    if repo.is_empty && config.rev.is_none() {
        warn!("Repository has no commits yet; writing an empty project");
        let (_, stats) = export_log(tokio::io::empty(), sink, &name).await?;
        return Ok(stats);
    }

    let (process, stdout) = LogProcess::spawn(&repo.dir, &config.log_options())?;
    let (_, stats) = export_log(stdout, sink, &name).await?;
    process.wait().await?;

    Ok(stats)
}

async fn open_output(output: &Output) -> Result<Sink, ExportError> {
    let writer: Box<dyn AsyncWrite + Unpin + Send> = match output {
        Output::Stdout => Box::new(tokio::io::stdout()),
        Output::File(path) => {
            let file = tokio::fs::File::create(path)
                .await
                .map_err(|source| ExportError::CreateOutput {
                    path: path.clone(),
                    source,
                })?;
            Box::new(file)
        }
    };
    Ok(BufWriter::new(writer))
}
