// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitstat library
//!
//! This module exports the command-line plumbing of gitstat (configuration,
//! the `git log` subprocess, and the export pipeline) for use in
//! integration tests and as a library.

pub mod config;
pub mod export;
pub mod git;
