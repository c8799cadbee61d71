// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Sentinel-delimited chunk extraction
//!
//! Splits a live byte stream (usually a `git log` child's stdout) into one
//! text chunk per commit without waiting for the stream to finish. Bytes
//! are buffered only until the next `sentinel + "\n"` is seen.

use futures::Stream;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::error::LogError;

/// Bytes requested from the reader per read
const READ_SIZE: usize = 8 * 1024;

/// What to do with text left after the last delimiter at end of stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingChunk {
    /// Yield it as a final chunk. `git log` writes the sentinel before each
    /// commit, so the last commit is always trailing.
    #[default]
    Emit,
    /// Drop it; only delimiter-terminated chunks are yielded
    Discard,
}

/// Pull-based reader yielding trimmed, non-empty chunks in arrival order
pub struct ChunkReader<R> {
    reader: R,
    delimiter: Vec<u8>,
    buffer: Vec<u8>,
    /// Buffer offset before which no delimiter can start
    scanned: usize,
    trailing: TrailingChunk,
    eof: bool,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    /// Create a reader splitting on lines equal to `sentinel`
    pub fn new(reader: R, sentinel: &str) -> Self {
        let mut delimiter = sentinel.as_bytes().to_vec();
        delimiter.push(b'\n');
        Self {
            reader,
            delimiter,
            buffer: Vec::with_capacity(READ_SIZE),
            scanned: 0,
            trailing: TrailingChunk::default(),
            eof: false,
        }
    }

    /// Set the end-of-stream policy
    #[must_use]
    pub fn with_trailing(mut self, trailing: TrailingChunk) -> Self {
        self.trailing = trailing;
        self
    }

    /// Wait for the next chunk
    ///
    /// Returns `Ok(None)` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `LogError::Io` if reading the underlying stream fails.
    pub async fn next_chunk(&mut self) -> Result<Option<String>, LogError> {
        loop {
            while let Some(start) = self.find_delimiter() {
                let end = start + self.delimiter.len();
                let chunk = decode(&self.buffer[..start]);
                self.buffer.drain(..end);
                self.scanned = 0;
                if !chunk.is_empty() {
                    return Ok(Some(chunk));
                }
            }

            if self.eof {
                return Ok(self.take_trailing());
            }

            // A delimiter may straddle the old and new bytes
            self.scanned = self
                .buffer
                .len()
                .saturating_sub(self.delimiter.len().saturating_sub(1));
            self.buffer.reserve(READ_SIZE);
            let read = self.reader.read_buf(&mut self.buffer).await?;
            trace!(read, buffered = self.buffer.len(), "Read log bytes");
            if read == 0 {
                self.eof = true;
            }
        }
    }

    /// Turn the reader into a `Stream` of chunks
    pub fn into_stream(self) -> impl Stream<Item = Result<String, LogError>> {
        futures::stream::try_unfold(self, |mut reader| async move {
            let next = reader.next_chunk().await?;
            Ok::<_, LogError>(next.map(|chunk| (chunk, reader)))
        })
    }

    fn find_delimiter(&self) -> Option<usize> {
        self.buffer[self.scanned..]
            .windows(self.delimiter.len())
            .position(|window| window == self.delimiter.as_slice())
            .map(|offset| self.scanned + offset)
    }

    fn take_trailing(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.buffer);
        self.scanned = 0;
        match self.trailing {
            TrailingChunk::Emit => Some(decode(&rest)).filter(|chunk| !chunk.is_empty()),
            TrailingChunk::Discard => None,
        }
    }
}

/// Lossy UTF-8 decode with surrounding whitespace removed
fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use similar_asserts::assert_eq;
    use tokio::io::AsyncWriteExt;

    async fn collect(input: &str, sentinel: &str, trailing: TrailingChunk) -> Vec<String> {
        let mut reader = ChunkReader::new(input.as_bytes(), sentinel).with_trailing(trailing);
        let mut chunks = Vec::new();
        while let Some(chunk) = reader.next_chunk().await.expect("read chunk") {
            chunks.push(chunk);
        }
        chunks
    }

    #[tokio::test]
    async fn test_discard_yields_only_terminated_chunks() {
        let chunks = collect("X\nSCISSOR\nY\nSCISSOR\nZ", "SCISSOR", TrailingChunk::Discard).await;
        assert_eq!(chunks, vec!["X".to_string(), "Y".to_string()]);
    }

    #[tokio::test]
    async fn test_emit_yields_trailing_chunk() {
        let chunks = collect("X\nSCISSOR\nY\nSCISSOR\nZ", "SCISSOR", TrailingChunk::Emit).await;
        assert_eq!(chunks, vec!["X", "Y", "Z"]);
    }

    #[tokio::test]
    async fn test_leading_sentinel_skips_empty_chunk() {
        let chunks = collect("SCISSOR\n a \nSCISSOR\n\n b\n\n", "SCISSOR", TrailingChunk::Emit).await;
        assert_eq!(chunks, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_chunks_skipped() {
        let chunks = collect("SCISSOR\n   \nSCISSOR\nSCISSOR\n", "SCISSOR", TrailingChunk::Emit).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream() {
        assert!(collect("", "SCISSOR", TrailingChunk::Emit).await.is_empty());
    }

    #[tokio::test]
    async fn test_sentinel_without_newline_is_not_a_boundary() {
        let chunks = collect("a SCISSOR b\nSCISSOR\nc", "SCISSOR", TrailingChunk::Emit).await;
        assert_eq!(chunks, vec!["a SCISSOR b", "c"]);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let input: &[u8] = b"SCISSOR\n1\t2\tna\xffme\n";
        let mut reader = ChunkReader::new(input, "SCISSOR");
        let chunk = reader.next_chunk().await.expect("read").expect("chunk");
        assert_eq!(chunk, "1\t2\tna\u{fffd}me");
    }

    #[tokio::test]
    async fn test_delimiter_split_across_reads() {
        let (mut tx, rx) = tokio::io::duplex(4);
        let writer = tokio::spawn(async move {
            for piece in ["fir", "st\nSCIS", "SOR", "\nsec", "ond\nSCISSOR", "\n"] {
                tx.write_all(piece.as_bytes()).await.expect("write");
                tokio::task::yield_now().await;
            }
        });

        let chunks: Vec<String> = ChunkReader::new(rx, "SCISSOR")
            .into_stream()
            .try_collect()
            .await
            .expect("collect");
        writer.await.expect("writer task");
        assert_eq!(chunks, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_first_chunk_available_before_end_of_stream() {
        let (mut tx, rx) = tokio::io::duplex(64);
        tx.write_all(b"SCISSOR\none\nSCISSOR\n").await.expect("write");

        let mut reader = ChunkReader::new(rx, "SCISSOR");
        let first = reader.next_chunk().await.expect("read");
        assert_eq!(first.as_deref(), Some("one"));

        tx.write_all(b"two\n").await.expect("write");
        drop(tx);
        assert_eq!(reader.next_chunk().await.expect("read").as_deref(), Some("two"));
        assert_eq!(reader.next_chunk().await.expect("read"), None);
        assert_eq!(reader.next_chunk().await.expect("read again"), None);
    }

    #[tokio::test]
    async fn test_large_chunk_spanning_many_reads() {
        let body: String = (0..5_000).map(|i| format!("{i}\t{i}\tfile_{i}.rs\n")).collect();
        let input = format!("SCISSOR\n{body}SCISSOR\nlast");
        let chunks = collect(&input, "SCISSOR", TrailingChunk::Emit).await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], body.trim());
        assert_eq!(chunks[1], "last");
    }
}
