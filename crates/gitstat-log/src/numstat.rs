// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! `--numstat` line parsing
//!
//! git prints one line per file: `<added>\t<deleted>\t<path>`. Binary files
//! use `-` for both counts. A whitespace-separated form is accepted as a
//! fallback for lines that do not carry the tab columns.
//!
//! Paths that git C-quotes (wrapped in `"` with backslash escapes) are
//! decoded back to the real path, including each side of a `old => new`
//! rename.
//!
//! Lines that do not fit either form are dropped (`None`), never reported as
//! errors, so one odd line cannot sink the rest of the commit.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::commit::FileChange;

/// A line parser that either produces a record or declines the line
type LineShape = fn(&str) -> Option<FileChange>;

/// Shapes tried in order; the first match wins
const SHAPES: [LineShape; 2] = [parse_tabbed, parse_whitespace];

/// Two non-whitespace tokens, then everything else as the path
static WHITESPACE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+(.+)$").expect("numstat whitespace pattern is valid")
});

/// git's count for files it cannot diff line by line
const BINARY_COUNT: &str = "-";

/// Joins the two sides of a rename that git could not abbreviate with `{}`
const RENAME_ARROW: &str = " => ";

/// Parse a single numstat line into a file change
///
/// Returns `None` when the line matches no known shape, a count is not a
/// non-negative integer, or the path is empty.
#[must_use]
pub fn parse_numstat_line(line: &str) -> Option<FileChange> {
    SHAPES.iter().find_map(|shape| shape(line))
}

/// `<added>\t<deleted>\t<path>`; the path keeps any further tabs verbatim
fn parse_tabbed(line: &str) -> Option<FileChange> {
    let mut fields = line.splitn(3, '\t');
    let additions = fields.next()?;
    let deletions = fields.next()?;
    let filepath = fields.next()?;
    build(additions, deletions, filepath)
}

/// `<added> <deleted> <path>`, only for lines without the tab columns
fn parse_whitespace(line: &str) -> Option<FileChange> {
    if line.matches('\t').count() >= 2 {
        return None;
    }
    let caps = WHITESPACE_LINE.captures(line)?;
    build(
        caps.get(1)?.as_str(),
        caps.get(2)?.as_str(),
        caps.get(3)?.as_str(),
    )
}

fn build(additions: &str, deletions: &str, filepath: &str) -> Option<FileChange> {
    let filepath = unquote_path(filepath);
    if filepath.is_empty() {
        return None;
    }
    let additions = parse_count(additions)?;
    let deletions = parse_count(deletions)?;
    Some(FileChange::new(filepath, additions, deletions))
}

/// Undo git's C-style path quoting
///
/// A path that is not quoted, or whose quoting is malformed, is returned
/// unchanged.
fn unquote_path(path: &str) -> Cow<'_, str> {
    if let Some(decoded) = decode_quoted(path) {
        return Cow::Owned(decoded);
    }
    match path.split_once(RENAME_ARROW) {
        Some((from, to)) if is_quoted(from) || is_quoted(to) => {
            let from = decode_quoted(from).map_or(Cow::Borrowed(from), Cow::Owned);
            let to = decode_quoted(to).map_or(Cow::Borrowed(to), Cow::Owned);
            Cow::Owned(format!("{from}{RENAME_ARROW}{to}"))
        }
        _ => Cow::Borrowed(path),
    }
}

fn is_quoted(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"')
}

/// Decode `"..."` when the quotes span the whole of `text`
fn decode_quoted(text: &str) -> Option<String> {
    if !is_quoted(text) {
        return None;
    }
    let inner = &text.as_bytes()[1..text.len() - 1];
    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.iter().copied();

    while let Some(b) = rest.next() {
        match b {
            b'"' => return None,
            b'\\' => {
                let escaped = match rest.next()? {
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b't' => b'\t',
                    b'n' => b'\n',
                    b'v' => 0x0b,
                    b'f' => 0x0c,
                    b'r' => b'\r',
                    b'"' => b'"',
                    b'\\' => b'\\',
                    first @ b'0'..=b'3' => {
                        let mut value = first - b'0';
                        for _ in 0..2 {
                            let digit = rest.next().filter(u8::is_ascii_digit)?;
                            if digit > b'7' {
                                return None;
                            }
                            value = value * 8 + (digit - b'0');
                        }
                        value
                    }
                    _ => return None,
                };
                bytes.push(escaped);
            }
            _ => bytes.push(b),
        }
    }
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Base-10 line count, with git's binary marker read as zero
fn parse_count(token: &str) -> Option<u64> {
    if token == BINARY_COUNT {
        return Some(0);
    }
    // u64::from_str accepts a leading '+', git never prints one
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
