// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Streaming JSON document output
//!
//! The document has a single project whose `commits` array is written one
//! element at a time, so memory stays bounded by the largest commit rather
//! than the length of the history:
//!
//! ```text
//! { "version": "1.0.0", "projects": [ { "name": ..., "commits": [ ... ] } ] }
//! ```

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::commit::Commit;
use crate::error::LogError;

/// Value of the top-level `version` key
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// Indentation of a commit inside the `commits` array
const COMMIT_INDENT: &str = "        ";

/// The whole output document, for consumers reading it back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Format version
    pub version: String,
    /// Exported projects (exactly one per run)
    pub projects: Vec<Project>,
}

/// One repository's commit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project name
    pub name: String,
    /// Commits, newest first
    pub commits: Vec<Commit>,
}

/// Writes a document incrementally to an async sink
pub struct DocumentWriter<W> {
    writer: W,
    first: bool,
    written: usize,
}

impl<W: AsyncWrite + Unpin> DocumentWriter<W> {
    /// Write the document head up to the opening of the `commits` array
    ///
    /// # Errors
    ///
    /// Returns `LogError` if the name cannot be encoded or the write fails.
    pub async fn begin(mut writer: W, project_name: &str) -> Result<Self, LogError> {
        let head = format!(
            "{{\n  \"version\": {},\n  \"projects\": [\n    {{\n      \"name\": {},\n      \"commits\": [\n",
            serde_json::to_string(DOCUMENT_VERSION)?,
            serde_json::to_string(project_name)?,
        );
        writer.write_all(head.as_bytes()).await?;
        Ok(Self {
            writer,
            first: true,
            written: 0,
        })
    }

    /// Append one commit to the `commits` array
    ///
    /// # Errors
    ///
    /// Returns `LogError` if serialization or the write fails.
    pub async fn write_commit(&mut self, commit: &Commit) -> Result<(), LogError> {
        let element = indent(&serde_json::to_string_pretty(commit)?);
        if !self.first {
            self.writer.write_all(b",\n").await?;
        }
        self.writer.write_all(element.as_bytes()).await?;
        self.first = false;
        self.written += 1;
        debug!(
            hash = %commit.short_hash(),
            files = commit.files.len(),
            "Wrote commit"
        );
        Ok(())
    }

    /// Number of commits written so far
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Close the array and document, flush, and hand back the sink
    ///
    /// # Errors
    ///
    /// Returns `LogError::Io` if the write or flush fails.
    pub async fn finish(mut self) -> Result<(W, usize), LogError> {
        let tail = if self.first {
            "      ]\n    }\n  ]\n}\n"
        } else {
            "\n      ]\n    }\n  ]\n}\n"
        };
        self.writer.write_all(tail.as_bytes()).await?;
        self.writer.flush().await?;
        Ok((self.writer, self.written))
    }
}

fn indent(json: &str) -> String {
    let mut out = String::with_capacity(json.len() + json.len() / 4);
    for (i, line) in json.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(COMMIT_INDENT);
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::{FileChange, Identity};
    use similar_asserts::assert_eq;

    /// Text between two consecutive elements of the `commits` array
    const ELEMENT_SEPARATOR: &str = "\n        },\n        {";

    fn commit(hash: &str, files: Vec<FileChange>) -> Commit {
        Commit {
            hash: hash.to_string(),
            author: Identity {
                name: "Author".to_string(),
                time: "2026-01-17T02:33:06+10:00".to_string(),
            },
            committer: Identity {
                name: "Committer".to_string(),
                time: "2026-01-17T02:40:00+10:00".to_string(),
            },
            message: "Subject".to_string(),
            files,
            is_merge: false,
        }
    }

    async fn render(name: &str, commits: &[Commit]) -> String {
        let mut doc = DocumentWriter::begin(Vec::new(), name).await.expect("begin");
        for c in commits {
            doc.write_commit(c).await.expect("write");
        }
        let (bytes, written) = doc.finish().await.expect("finish");
        assert_eq!(written, commits.len());
        String::from_utf8(bytes).expect("utf-8")
    }

    #[tokio::test]
    async fn test_zero_commits_is_valid_json() {
        let text = render("empty", &[]).await;
        let doc: Document = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(
            doc,
            Document {
                version: "1.0.0".to_string(),
                projects: vec![Project {
                    name: "empty".to_string(),
                    commits: vec![],
                }],
            }
        );
    }

    #[tokio::test]
    async fn test_one_commit_has_no_separator() {
        let c = commit("aaa", vec![FileChange::new("a.rs", 1, 0)]);
        let text = render("one", std::slice::from_ref(&c)).await;
        assert!(!text.contains(ELEMENT_SEPARATOR), "{text}");
        assert!(text.contains("        }\n      ]\n"), "{text}");
        let doc: Document = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(doc.projects[0].commits, vec![c]);
    }

    #[tokio::test]
    async fn test_many_commits_in_order() {
        let commits: Vec<Commit> = (0..5).map(|i| commit(&format!("h{i}"), vec![])).collect();
        let text = render("many", &commits).await;
        assert_eq!(text.matches(ELEMENT_SEPARATOR).count(), 4);
        let doc: Document = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.projects[0].commits, commits);
    }

    #[tokio::test]
    async fn test_project_name_is_escaped() {
        let text = render("we\"ird\\name\n", &[]).await;
        let doc: Document = serde_json::from_str(&text).expect("valid JSON");
        assert_eq!(doc.projects[0].name, "we\"ird\\name\n");
    }

    #[tokio::test]
    async fn test_output_is_indented() {
        let text = render("p", &[commit("abc", vec![])]).await;
        assert!(text.starts_with("{\n  \"version\": \"1.0.0\",\n"));
        assert!(text.contains("\n        {\n          \"hash\": \"abc\","), "{text}");
        assert!(text.ends_with("}\n"));
    }

    #[tokio::test]
    async fn test_written_counter() {
        let mut doc = DocumentWriter::begin(Vec::new(), "p").await.expect("begin");
        assert_eq!(doc.written(), 0);
        doc.write_commit(&commit("a", vec![])).await.expect("write");
        doc.write_commit(&commit("b", vec![])).await.expect("write");
        assert_eq!(doc.written(), 2);
    }
}
