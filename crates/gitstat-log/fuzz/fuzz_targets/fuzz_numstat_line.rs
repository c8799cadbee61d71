// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for numstat line parsing

#![no_main]

use libfuzzer_sys::fuzz_target;

use gitstat_log::parse_numstat_line;

fuzz_target!(|data: &str| {
    for line in data.lines() {
        if let Some(change) = parse_numstat_line(line) {
            assert!(!change.filepath.is_empty());
            assert_eq!(change.additions, change.raw_additions);
            assert_eq!(change.deletions, change.raw_deletions);
        }
    }
});
