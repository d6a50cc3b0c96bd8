//! Newline-delimited JSON framing for stdio transports.
//!
//! MCP over stdio sends one JSON-RPC message per line:
//!
//! ```text
//! {"jsonrpc":"2.0","id":1,"method":"initialize",...}\n
//! {"jsonrpc":"2.0","id":1,"result":{...}}\n
//! ```
//!
//! Messages must not contain embedded newlines; serde_json never emits them
//! in compact mode.

use std::io::{BufRead, Write};

use serde::{Serialize, de::DeserializeOwned};

use crate::MAX_MESSAGE_SIZE;
use crate::error::{ProtocolError, ProtocolResult};

/// Reads newline-delimited JSON messages from a byte stream.
pub struct LineReader<R> {
    reader: R,
}

impl<R: BufRead> LineReader<R> {
    /// Creates a new LineReader wrapping the given buffered reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Reads a single message.
    ///
    /// Blank lines are skipped. Returns `Ok(None)` at end of stream.
    pub fn read_message<T: DeserializeOwned>(&mut self) -> ProtocolResult<Option<T>> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.reader.read_line(&mut line)?;
            if read == 0 {
                return Ok(None);
            }
            if read > MAX_MESSAGE_SIZE {
                return Err(ProtocolError::MessageTooLarge {
                    size: read,
                    max: MAX_MESSAGE_SIZE,
                });
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Some(serde_json::from_str(trimmed)?));
        }
    }

    /// Unwraps this LineReader, returning the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Writes newline-delimited JSON messages to a byte stream.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: Write> LineWriter<W> {
    /// Creates a new LineWriter wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a single message followed by a newline and flushes.
    ///
    /// Flushing per message matters: the peer is waiting on this response
    /// before it sends anything else.
    pub fn write_message<T: Serialize>(&mut self, message: &T) -> ProtocolResult<()> {
        let json = serde_json::to_vec(message)?;
        if json.len() > MAX_MESSAGE_SIZE {
            return Err(ProtocolError::MessageTooLarge {
                size: json.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        self.writer.write_all(&json)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Unwraps this LineWriter, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
