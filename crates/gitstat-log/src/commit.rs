//! Commit record types
//!
//! These are the shapes downstream consumers read, so field names and
//! their order are part of the output format.

use serde::{Deserialize, Serialize};

/// One file's line statistics within a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    /// Repository-relative path, exactly as git reported it
    pub filepath: String,
    /// Always `false`; binary entries are reported as zero-change files
    pub is_binary: bool,
    /// Lines added
    pub additions: u64,
    /// Lines deleted
    pub deletions: u64,
    /// Mirror of `additions`
    pub raw_additions: u64,
    /// Mirror of `deletions`
    pub raw_deletions: u64,
}

impl FileChange {
    /// Create a change record from numstat counts
    #[must_use]
    pub fn new(filepath: impl Into<String>, additions: u64, deletions: u64) -> Self {
        Self {
            filepath: filepath.into(),
            is_binary: false,
            additions,
            deletions,
            raw_additions: additions,
            raw_deletions: deletions,
        }
    }
}

/// Who did something, and when (ISO-8601 with offset, as git printed it)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Name
    pub name: String,
    /// Timestamp
    pub time: String,
}

/// Represents a parsed git commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Full commit hash (not validated)
    pub hash: String,
    /// Original author
    pub author: Identity,
    /// Whoever made the commit (differs from the author after rebase or cherry-pick)
    pub committer: Identity,
    /// Subject line of the commit message
    pub message: String,
    /// Per-file statistics in the order git reported them
    pub files: Vec<FileChange>,
    /// True iff the commit has more than one parent
    pub is_merge: bool,
}

impl Commit {
    /// Get the short hash (first 7 characters)
    #[must_use]
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(7)
            .map_or(self.hash.len(), |(i, _)| i);
        &self.hash[..end]
    }

    /// Sum of additions across all files, saturating
    #[must_use]
    pub fn total_additions(&self) -> u64 {
        self.files.iter().fold(0, |sum, f| sum.saturating_add(f.additions))
    }

    /// Sum of deletions across all files, saturating
    #[must_use]
    pub fn total_deletions(&self) -> u64 {
        self.files.iter().fold(0, |sum, f| sum.saturating_add(f.deletions))
    }
}
