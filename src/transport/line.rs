//! Line transport: one JSON object per line over a writer/reader pair
//!
//! Generic over the stream types so the same framing serves a child's
//! stdin/stdout and in-memory pipes in tests.

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

use crate::error::{OrchestratorError, Result};
use crate::message::{encode_user_message, parse_line};
use crate::types::messages::{AgentResponse, InboundMessage};

/// Framed request/response channel to one agent
pub struct LineTransport<W, R> {
    agent: String,
    writer: W,
    lines: FramedRead<R, LinesCodec>,
}

impl<W, R> LineTransport<W, R>
where
    W: AsyncWrite + Unpin + Send,
    R: AsyncRead + Unpin + Send,
{
    /// Wrap a writer/reader pair
    ///
    /// Lines longer than `max_line_length` bytes are rejected as protocol errors.
    pub fn new(agent: impl Into<String>, writer: W, reader: R, max_line_length: usize) -> Self {
        Self {
            agent: agent.into(),
            writer,
            lines: FramedRead::new(reader, LinesCodec::new_with_max_length(max_line_length)),
        }
    }

    /// Write one user message line and flush
    ///
    /// # Errors
    /// Returns `OrchestratorError::Transport` if the write or flush fails
    pub async fn send(&mut self, content: &str) -> Result<()> {
        let line = encode_user_message(content)?;

        self.writer
            .write_all(&line)
            .await
            .map_err(|e| OrchestratorError::transport(format!("Failed to write to stdin: {e}")))?;

        self.writer
            .flush()
            .await
            .map_err(|e| OrchestratorError::transport(format!("Failed to flush stdin: {e}")))?;

        Ok(())
    }

    /// Read lines until a `result` line arrives
    ///
    /// `system` and `assistant` lines seen on the way are kept on the returned
    /// response; other line types are skipped.
    ///
    /// # Errors
    /// - `TransportClosed` if the stream ends before a result
    /// - `Protocol` on a malformed or oversized line
    /// - `Transport` on a read failure
    pub async fn receive(&mut self) -> Result<AgentResponse> {
        let mut system = Vec::new();
        let mut assistant = Vec::new();

        while let Some(next) = self.lines.next().await {
            let line = next.map_err(|e| match e {
                LinesCodecError::MaxLineLengthExceeded => OrchestratorError::protocol(
                    format!("Line from agent '{}' exceeded maximum length", self.agent),
                    None,
                ),
                LinesCodecError::Io(e) => {
                    OrchestratorError::transport(format!("Failed to read from stdout: {e}"))
                }
            })?;

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let parsed = parse_line(line)?;
            match parsed.message {
                InboundMessage::System { .. } => system.push(parsed.raw),
                InboundMessage::Assistant { .. } => assistant.push(parsed.raw),
                InboundMessage::Result(result) => {
                    return Ok(AgentResponse {
                        result,
                        raw: parsed.raw,
                        system,
                        assistant,
                    });
                }
                InboundMessage::Other => {
                    log::trace!("[{}] skipping line: {}", self.agent, line);
                }
            }
        }

        Err(OrchestratorError::transport_closed(&self.agent))
    }

    /// Send `content` and read its response
    ///
    /// # Errors
    /// Any error from [`send`](Self::send) or [`receive`](Self::receive)
    pub async fn exchange(&mut self, content: &str) -> Result<AgentResponse> {
        self.send(content).await?;
        self.receive().await
    }

    /// Close the writer, ignoring errors from an already-closed stream
    pub async fn shutdown_input(&mut self) {
        if let Err(e) = self.writer.shutdown().await {
            log::debug!("[{}] closing stdin: {}", self.agent, e);
        }
    }
}
