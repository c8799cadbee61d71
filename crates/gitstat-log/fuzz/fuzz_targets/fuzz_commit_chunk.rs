// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for commit chunk parsing
//!
//! Chunk parsing is best-effort and must accept any input; the parsed
//! commit must always serialize.

#![no_main]

use libfuzzer_sys::fuzz_target;

use gitstat_log::parse_commit;

fuzz_target!(|data: &[u8]| {
    let chunk = String::from_utf8_lossy(data);
    let commit = parse_commit(&chunk);
    serde_json::to_string(&commit).expect("commit should always serialize");
});
