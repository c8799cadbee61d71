// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit chunk parsing
//!
//! A chunk is the text between two sentinel lines: the labelled header
//! fields written by [`log_format`], followed by git's numstat lines.
//! Parsing is best-effort and never fails; missing fields are left blank
//! and unrecognised lines are dropped.

use tracing::debug;

use crate::commit::{Commit, Identity};
use crate::numstat::parse_numstat_line;

/// Separator line written before every commit
pub const SENTINEL: &str = "------------------------ >8 ------------------------";

/// Header fields recognised at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    Hash,
    Parents,
    Subject,
    AuthorName,
    AuthorDate,
    CommitterName,
    CommitterDate,
}

/// Label, git placeholder and field for every header line, in output order
///
/// Labels are matched case-sensitively.
const HEADERS: [(&str, &str, Header); 7] = [
    ("hash:", "%H", Header::Hash),
    ("parents:", "%P", Header::Parents),
    ("subject:", "%s", Header::Subject),
    ("author name:", "%an", Header::AuthorName),
    ("author date:", "%aI", Header::AuthorDate),
    ("committer name:", "%cn", Header::CommitterName),
    ("committer date:", "%cI", Header::CommitterDate),
];

/// Value for `git log --format=` producing the chunks [`parse_commit`] reads
///
/// The sentinel comes first, then one `label placeholder` line per header.
#[must_use]
pub fn log_format() -> String {
    HEADERS
        .iter()
        .fold(SENTINEL.to_string(), |mut format, (label, placeholder, _)| {
            format.push_str("%n");
            format.push_str(label);
            format.push(' ');
            format.push_str(placeholder);
            format
        })
}

fn split_header(line: &str) -> Option<(Header, &str)> {
    HEADERS.iter().find_map(|(label, _, header)| {
        line.strip_prefix(*label).map(|value| (*header, value.trim()))
    })
}

/// Parse one chunk into a commit
///
/// A repeated header overwrites the earlier value. Lines that are neither
/// headers nor numstat lines are skipped.
#[must_use]
pub fn parse_commit(chunk: &str) -> Commit {
    let mut commit = Commit::default();
    let mut parents = "";

    for line in chunk.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        match split_header(line) {
            Some((Header::Hash, value)) => commit.hash = value.to_string(),
            Some((Header::Parents, value)) => parents = value,
            Some((Header::Subject, value)) => commit.message = value.to_string(),
            Some((Header::AuthorName, value)) => commit.author.name = value.to_string(),
            Some((Header::AuthorDate, value)) => commit.author.time = value.to_string(),
            Some((Header::CommitterName, value)) => commit.committer.name = value.to_string(),
            Some((Header::CommitterDate, value)) => commit.committer.time = value.to_string(),
            None => match parse_numstat_line(line) {
                Some(change) => commit.files.push(change),
                None => debug!(line, "Dropping unrecognised log line"),
            },
        }
    }

    commit.is_merge = parent_count(parents) > 1;
    commit
}

/// Count the whitespace-separated hashes in a `parents:` value
#[must_use]
pub fn parent_count(parents: &str) -> usize {
    parents.split_whitespace().count()
}

/// Render a commit back into the chunk text git would have produced
///
/// Used to build synthetic logs; parents are not recorded on [`Commit`], so
/// the caller supplies them.
#[must_use]
pub fn render_chunk(commit: &Commit, parents: &[&str]) -> String {
    let Identity {
        name: author_name,
        time: author_time,
    } = &commit.author;
    let Identity {
        name: committer_name,
        time: committer_time,
    } = &commit.committer;

    let mut chunk = format!(
        "{SENTINEL}\nhash: {}\nparents: {}\nsubject: {}\nauthor name: {author_name}\nauthor date: {author_time}\ncommitter name: {committer_name}\ncommitter date: {committer_time}\n",
        commit.hash,
        parents.join(" "),
        commit.message,
    );
    if !commit.files.is_empty() {
        chunk.push('\n');
        for file in &commit.files {
            chunk.push_str(&format!(
                "{}\t{}\t{}\n",
                file.additions, file.deletions, file.filepath
            ));
        }
    }
    chunk
}
