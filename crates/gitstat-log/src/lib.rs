// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstat-log: Git log processing for gitstat
//!
//! This library crate turns the text stream produced by
//! `git log --numstat --format=<log_format()>` into typed commit records and
//! writes them out as a single JSON document, one commit at a time.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gitstat_log::{ChunkReader, DocumentWriter, SENTINEL, parse_commit};
//!
//! # async fn run() -> Result<(), gitstat_log::LogError> {
//! let log: &[u8] = b"";
//! let mut chunks = ChunkReader::new(log, SENTINEL);
//! let mut doc = DocumentWriter::begin(tokio::io::stdout(), "my-repo").await?;
//!
//! while let Some(chunk) = chunks.next_chunk().await? {
//!     doc.write_commit(&parse_commit(&chunk)).await?;
//! }
//! doc.finish().await?;
//! # Ok(())
//! # }
//! ```

pub mod chunk;
pub mod commit;
pub mod error;
pub mod numstat;
pub mod parser;
pub mod serializer;

pub use chunk::{ChunkReader, TrailingChunk};
pub use commit::{Commit, FileChange, Identity};
pub use error::LogError;
pub use numstat::parse_numstat_line;
pub use parser::{SENTINEL, log_format, parse_commit};
pub use serializer::{DOCUMENT_VERSION, Document, DocumentWriter, Project};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunk::ChunkReader;
    pub use crate::commit::{Commit, FileChange, Identity};
    pub use crate::error::LogError;
    pub use crate::parser::{SENTINEL, log_format, parse_commit};
    pub use crate::serializer::DocumentWriter;
}
