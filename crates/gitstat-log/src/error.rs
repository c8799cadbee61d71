// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gitstat-log

use thiserror::Error;

/// Errors that can occur while reading a log stream or writing the document
///
/// Malformed log content never produces an error; only the underlying
/// reader or writer can fail.
#[derive(Debug, Error)]
pub enum LogError {
    /// Error reading the log stream or writing the output document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error serializing a record to JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
