use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use super::message::{Message, ProtocolError, decode, encode};
use crate::log_warn;

pub const DEFAULT_MAX_LINE_BYTES: usize = 4096;

/// Reads newline-delimited lines, dropping blank, oversized and non-UTF-8
/// ones. At most `max_line_bytes` of a line are ever buffered.
///
/// A partially read line lives in the reader itself, so `next_line` can be
/// raced in `tokio::select!` without losing input.
pub struct LineReader<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    discarding: bool,
    max_line_bytes: usize,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R, max_line_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(reader),
            pending: Vec::new(),
            discarding: false,
            max_line_bytes,
        }
    }

    /// Raw bytes of the next line without its `\n`, or `None` at end of
    /// stream. Lines over the limit are skipped up to their newline.
    async fn next_raw_line(&mut self) -> Option<Vec<u8>> {
        loop {
            let buf = match self.reader.fill_buf().await {
                Ok(buf) => buf,
                Err(e) => {
                    log_warn!("Connection read failed: {}", e);
                    return None;
                }
            };

            if buf.is_empty() {
                self.discarding = false;
                if self.pending.is_empty() {
                    return None;
                }
                return Some(std::mem::take(&mut self.pending));
            }

            let newline = buf.iter().position(|&b| b == b'\n');
            let chunk = &buf[..newline.unwrap_or(buf.len())];
            if !self.discarding {
                let len = self.pending.len() + chunk.len();
                if len > self.max_line_bytes {
                    log_warn!(
                        "{}",
                        ProtocolError::TooLong {
                            len,
                            max: self.max_line_bytes
                        }
                    );
                    self.pending.clear();
                    self.discarding = true;
                } else {
                    self.pending.extend_from_slice(chunk);
                }
            }

            let used = newline.map_or(buf.len(), |i| i + 1);
            self.reader.consume(used);

            if newline.is_some() {
                if self.discarding {
                    self.discarding = false;
                    continue;
                }
                return Some(std::mem::take(&mut self.pending));
            }
        }
    }

    /// Next usable line, or `None` once the peer has gone away.
    pub async fn next_line(&mut self) -> Option<String> {
        loop {
            let raw = self.next_raw_line().await?;
            let line = match String::from_utf8(raw) {
                Ok(line) => line,
                Err(_) => {
                    log_warn!("Ignoring line that is not valid UTF-8");
                    continue;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Some(trimmed.to_string());
        }
    }

    /// Next decodable message; undecodable lines are logged and skipped.
    pub async fn next_message(&mut self) -> Option<Message> {
        loop {
            let line = self.next_line().await?;
            match decode(&line) {
                Ok(message) => return Some(message),
                Err(e) => log_warn!("Ignoring line: {}", e),
            }
        }
    }
}

pub async fn write_line<W: AsyncWrite + Unpin>(writer: &mut W, line: &str) -> std::io::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    if !line.ends_with('\n') {
        writer.write_all(b"\n").await?;
    }
    writer.flush().await
}

pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, message: &Message) -> std::io::Result<()> {
    let line = encode(message).map_err(std::io::Error::other)?;
    write_line(writer, &line).await
}
