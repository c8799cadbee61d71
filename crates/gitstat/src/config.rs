//! Configuration for the gitstat command
//!
//! This module provides the command-line surface: where the document goes,
//! which repository to read, how much history to include, and logging.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::git::LogOptions;

/// File written when neither `--out` nor `--stdout` is given
pub const DEFAULT_OUTPUT_FILE: &str = "gitstat_result.json";

/// gitstat - export a repository's commit log with per-file line statistics as JSON
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gitstat")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path of the JSON file to write [default: gitstat_result.json]
    #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
    pub out: Option<PathBuf>,

    /// Write the JSON document to stdout instead of a file
    #[arg(long, default_value = "false")]
    pub stdout: bool,

    /// Repository to read (any path inside it)
    ///
    /// Defaults to the current working directory.
    #[arg(short = 'C', long, value_name = "PATH", env = "GITSTAT_REPO")]
    pub repo: Option<PathBuf>,

    /// Project name recorded in the document
    ///
    /// Defaults to the name of the repository's working directory.
    #[arg(long, env = "GITSTAT_NAME")]
    pub name: Option<String>,

    /// Only export the N most recent commits
    #[arg(short = 'n', long, value_name = "N")]
    pub max_count: Option<usize>,

    /// Only export commits more recent than this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub since: Option<NaiveDate>,

    /// Only export commits older than this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub until: Option<NaiveDate>,

    /// Revision to start from (defaults to HEAD)
    #[arg(long, value_name = "REV")]
    pub rev: Option<String>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are always written to stderr so they never mix with
    /// `--stdout` output.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Where the document is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    /// A file, created or truncated
    File(PathBuf),
    /// Standard output
    Stdout,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::File(path) => write!(f, "{}", path.display()),
            Output::Stdout => f.write_str("<stdout>"),
        }
    }
}

impl Config {
    /// Get the output destination, using the default file if not specified
    #[must_use]
    pub fn output(&self) -> Output {
        if self.stdout {
            Output::Stdout
        } else {
            Output::File(
                self.out
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            )
        }
    }

    /// Get the repository path, using the current directory as default
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        self.repo.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// History filters to pass on to `git log`
    #[must_use]
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            max_count: self.max_count,
            since: self.since,
            until: self.until,
            rev: self.rev.clone(),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository path is specified but doesn't exist or isn't a directory
    /// - The revision looks like an option
    /// - `--since` is after `--until`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref repo) = self.repo {
            if !repo.exists() {
                return Err(ConfigError::RepoNotFound(repo.clone()));
            }
            if !repo.is_dir() {
                return Err(ConfigError::RepoNotDirectory(repo.clone()));
            }
        }

        if let Some(ref rev) = self.rev {
            if rev.is_empty() || rev.starts_with('-') {
                return Err(ConfigError::InvalidRevision(rev.clone()));
            }
        }

        if let (Some(since), Some(until)) = (self.since, self.until) {
            if since > until {
                return Err(ConfigError::EmptyDateRange { since, until });
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Repository path is not a directory
    #[error("Repository path is not a directory: {0}")]
    RepoNotDirectory(PathBuf),

    /// Revision that git would read as an option
    #[error("Invalid revision: {0:?}")]
    InvalidRevision(String),

    /// Date filters that exclude everything
    #[error("--since ({since}) is after --until ({until})")]
    EmptyDateRange {
        /// Lower bound
        since: NaiveDate,
        /// Upper bound
        until: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.out.is_none());
        assert!(!config.stdout);
        assert!(config.repo.is_none());
        assert!(config.name.is_none());
        assert!(!config.verbose);
        assert!(!config.quiet);
    }

    #[test]
    fn test_output_default_file() {
        let config = Config::default();
        assert_eq!(
            config.output(),
            Output::File(PathBuf::from("gitstat_result.json"))
        );
    }

    #[test]
    fn test_output_custom_file() {
        let config = Config {
            out: Some(PathBuf::from("/tmp/log.json")),
            ..Default::default()
        };
        assert_eq!(config.output(), Output::File(PathBuf::from("/tmp/log.json")));
    }

    #[test]
    fn test_output_stdout() {
        let config = Config {
            stdout: true,
            ..Default::default()
        };
        assert_eq!(config.output(), Output::Stdout);
        assert_eq!(config.output().to_string(), "<stdout>");
    }

    #[test]
    fn test_repo_path_default() {
        assert_eq!(Config::default().repo_path(), PathBuf::from("."));
    }

    #[test]
    fn test_log_options_carry_filters() {
        let since = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date");
        let config = Config {
            max_count: Some(10),
            since: Some(since),
            rev: Some("main".to_string()),
            ..Default::default()
        };
        let options = config.log_options();
        assert_eq!(options.max_count, Some(10));
        assert_eq!(options.since, Some(since));
        assert_eq!(options.until, None);
        assert_eq!(options.rev.as_deref(), Some("main"));
    }

    #[test]
    fn test_log_level_default() {
        assert_eq!(Config::default().log_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_log_level_verbose_wins() {
        let config = Config {
            verbose: true,
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_level_quiet() {
        let config = Config {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(config.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_validate_nonexistent_repo() {
        let config = Config {
            repo: Some(PathBuf::from("/nonexistent/path/12345")),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RepoNotFound(_))
        ));
    }

    #[test]
    fn test_validate_repo_is_file() {
        let file = std::env::temp_dir().join(format!("gitstat-config-{}", std::process::id()));
        std::fs::write(&file, "not a dir").expect("write temp file");
        let config = Config {
            repo: Some(file.clone()),
            ..Default::default()
        };
        let result = config.validate();
        let _ = std::fs::remove_file(&file);
        assert!(matches!(result, Err(ConfigError::RepoNotDirectory(_))));
    }

    #[test]
    fn test_validate_option_like_revision() {
        let config = Config {
            rev: Some("--all".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRevision(_))
        ));
    }

    #[test]
    fn test_validate_inverted_dates() {
        let config = Config {
            since: NaiveDate::from_ymd_opt(2026, 1, 2),
            until: NaiveDate::from_ymd_opt(2026, 1, 1),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyDateRange { .. })
        ));
    }

    #[test]
    fn test_validate_defaults_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Config::command().debug_assert();
    }
}
