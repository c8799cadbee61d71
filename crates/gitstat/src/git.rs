// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Repository discovery and the `git log` subprocess
//!
//! The repository is located with `git2`; history itself is read by running
//! the `git` binary once and streaming its stdout.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use chrono::NaiveDate;
use gitstat_log::log_format;
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Errors that can occur while locating a repository or running git
#[derive(Debug, Error)]
pub enum GitError {
    /// Error from git2 library
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),

    /// Repository not found at the specified path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// The git binary could not be started
    #[error("Failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    /// The child was started without a stdout pipe
    #[error("git log produced no stdout pipe")]
    MissingStdout,

    /// Waiting for the child failed
    #[error("Failed waiting for git: {0}")]
    Wait(#[source] std::io::Error),

    /// git exited unsuccessfully
    #[error("git log failed ({status}): {stderr}")]
    ProcessFailed {
        /// Exit status of the child
        status: ExitStatus,
        /// Captured stderr, trimmed
        stderr: String,
    },
}

/// A repository located on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Directory to run git in (the git dir for bare repositories)
    pub dir: PathBuf,
    /// Default project name
    pub name: String,
    /// True when HEAD has no commits yet
    pub is_empty: bool,
}

/// Discover the repository containing `path`
///
/// This walks up the directory tree to find a `.git` directory.
///
/// # Errors
///
/// Returns `GitError::RepositoryNotFound` if no repository is found.
pub fn discover(path: impl AsRef<Path>) -> Result<RepoInfo, GitError> {
    let path = path.as_ref();
    let repo = git2::Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
        path: path.display().to_string(),
    })?;

    let dir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
    let name = project_name(&dir);
    let is_empty = head_is_unborn(&repo)?;
    debug!(dir = %dir.display(), name = %name, is_empty, "Discovered repository");

    Ok(RepoInfo {
        dir,
        name,
        is_empty,
    })
}

/// True when HEAD names a branch that has no commits yet
///
/// `Repository::is_empty` only recognises the configured default branch,
/// so a fresh repository on any other branch name needs this check.
fn head_is_unborn(repo: &git2::Repository) -> Result<bool, GitError> {
    match repo.head() {
        Ok(_) => Ok(false),
        Err(e) if e.code() == git2::ErrorCode::UnbornBranch => Ok(true),
        Err(e) => Err(e.into()),
    }
}

/// Last path component, without a bare repository's `.git` suffix
fn project_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy())
        .map(|n| n.strip_suffix(".git").unwrap_or(&n).to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "repository".to_string())
}

/// Which part of history to read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    /// Maximum number of commits to retrieve
    pub max_count: Option<usize>,
    /// Only include commits after this date
    pub since: Option<NaiveDate>,
    /// Only include commits before this date
    pub until: Option<NaiveDate>,
    /// Start from this revision (defaults to HEAD)
    pub rev: Option<String>,
}

impl LogOptions {
    /// Arguments for `git`, in order
    ///
    /// `core.quotePath=false` keeps non-ASCII paths as raw UTF-8; git still
    /// C-quotes paths containing `"`, `\` or control characters.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-pager".to_string(),
            "-c".to_string(),
            "core.quotePath=false".to_string(),
            "log".to_string(),
            "--no-color".to_string(),
            "--numstat".to_string(),
            format!("--format={}", log_format()),
        ];
        if let Some(n) = self.max_count {
            args.push(format!("--max-count={n}"));
        }
        if let Some(date) = self.since {
            args.push(format!("--since={}", date.format("%Y-%m-%d")));
        }
        if let Some(date) = self.until {
            args.push(format!("--until={}", date.format("%Y-%m-%d")));
        }
        if let Some(ref rev) = self.rev {
            args.push(rev.clone());
        }
        args
    }
}

/// A running `git log` child
pub struct LogProcess {
    child: Child,
    stderr: JoinHandle<String>,
}

impl LogProcess {
    /// Start `git log` in `dir`, returning the child and its stdout
    ///
    /// The child is killed if the returned handle is dropped before
    /// [`LogProcess::wait`] completes.
    ///
    /// # Errors
    ///
    /// Returns `GitError::Spawn` if git cannot be started.
    pub fn spawn(dir: &Path, options: &LogOptions) -> Result<(Self, ChildStdout), GitError> {
        let args = options.to_args();
        debug!(dir = %dir.display(), ?args, "Spawning git");

        let mut child = Command::new("git")
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(GitError::Spawn)?;

        let stdout = child.stdout.take().ok_or(GitError::MissingStdout)?;
        let stderr = child.stderr.take();
        let stderr = tokio::spawn(async move {
            let mut bytes = Vec::new();
            if let Some(mut stderr) = stderr {
                if let Err(e) = stderr.read_to_end(&mut bytes).await {
                    debug!(error = %e, "Failed reading git stderr");
                }
            }
            String::from_utf8_lossy(&bytes).trim().to_string()
        });

        Ok((Self { child, stderr }, stdout))
    }

    /// Wait for git to exit
    ///
    /// Call after stdout has been read to the end.
    ///
    /// # Errors
    ///
    /// Returns `GitError::ProcessFailed` if git exited unsuccessfully.
    pub async fn wait(mut self) -> Result<(), GitError> {
        let status = self.child.wait().await.map_err(GitError::Wait)?;
        let stderr = self.stderr.await.unwrap_or_default();

        if status.success() {
            if !stderr.is_empty() {
                debug!(stderr = %stderr, "git wrote to stderr");
            }
            return Ok(());
        }

        warn!(%status, stderr = %stderr, "git log failed");
        Err(GitError::ProcessFailed { status, stderr })
    }
}
