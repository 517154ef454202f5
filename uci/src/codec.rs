//! Line framing codec for UCI communication.
//!
//! UCI is plain text, one command or response per `\n`-terminated line, over
//! the engine's stdin/stdout. This module provides [`LineReader`] and
//! [`LineWriter`] for async reading and writing of those lines.

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Maximum line size (64 KiB) to prevent unbounded memory allocation.
const MAX_LINE_BYTES: usize = 64 * 1024;

/// Reads `\n`-terminated lines from an async reader.
///
/// Trailing `\r\n` / `\n` is stripped. Invalid UTF-8 is replaced rather than
/// rejected: the protocol is matched by substring, so a mangled byte in an
/// `info string` line must not end the session.
pub struct LineReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Read the next line.
    ///
    /// Returns `Ok(None)` on EOF (engine closed its output).
    /// Returns `Err` on I/O failure or a line longer than the maximum.
    pub async fn read_line(&mut self) -> Result<Option<String>> {
        let mut buf = Vec::new();
        let limit = (MAX_LINE_BYTES + 1) as u64;
        let bytes_read = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut buf)
            .await
            .context("reading engine output")?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        } else if buf.len() > MAX_LINE_BYTES {
            bail!("engine output line exceeds maximum {MAX_LINE_BYTES} bytes");
        }

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Writes `\n`-terminated lines to an async writer.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write one command line and flush it.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer
            .write_all(line.as_bytes())
            .await
            .context("writing command")?;
        self.writer
            .write_all(b"\n")
            .await
            .context("writing line terminator")?;
        self.writer.flush().await.context("flushing command")?;

        Ok(())
    }
}
