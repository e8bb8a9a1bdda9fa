//! Incremental state machine over the compiler's output stream.
//!
//! The stream is a sequence of frames:
//!
//! ```text
//! <decimal length>\n<length bytes of JSON>\n
//! ```
//!
//! Bytes may arrive split at any point. A line that is not a decimal length
//! is passed through as free-form text. A fatal decode error or a
//! `signalled` record latches the parser; everything fed afterwards is
//! ignored.

use tracing::{debug, trace, warn};

use super::buffer::FrameBuffer;
use super::size_line::{SizeLine, interpret_size_line};
use super::sink::MessageSink;
use crate::config::ParserConfig;
use crate::error::ParseError;
use crate::message::{CompilerMessage, decode_message};

const NEWLINE: u8 = b'\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingSizeLine,
    AwaitingBody { size: usize },
    AwaitingTrailingNewline,
}

/// Whether a parser still accepts input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserStatus {
    #[default]
    Active,
    /// A `signalled` record was received.
    Signalled,
    /// A fatal error was reported to the sink.
    Failed,
}

/// Parser for one compiler invocation's output.
#[derive(Debug)]
pub struct OutputParser {
    target_name: String,
    config: ParserConfig,
    buffer: FrameBuffer,
    state: State,
    status: ParserStatus,
}

impl OutputParser {
    /// Create a parser for the compiler job building `target_name`.
    pub fn new(target_name: impl Into<String>) -> Self {
        Self::with_config(target_name, ParserConfig::default())
    }

    pub fn with_config(target_name: impl Into<String>, config: ParserConfig) -> Self {
        Self {
            target_name: target_name.into(),
            config,
            buffer: FrameBuffer::new(),
            state: State::AwaitingSizeLine,
            status: ParserStatus::Active,
        }
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub const fn status(&self) -> ParserStatus {
        self.status
    }

    /// True once the parser ignores further input.
    pub fn is_latched(&self) -> bool {
        self.status != ParserStatus::Active
    }

    /// Bytes held while waiting for the rest of a size line or body.
    pub const fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Feed the next chunk of compiler output.
    ///
    /// Records are delivered to `sink` before this returns. Failures are
    /// reported through [`MessageSink::on_fatal_error`] exactly once; after
    /// that, or after a `signalled` record, calls are no-ops.
    pub fn feed<S: MessageSink + ?Sized>(&mut self, bytes: &[u8], sink: &mut S) {
        if self.is_latched() {
            return;
        }

        trace!(
            target_name = %self.target_name,
            bytes = bytes.len(),
            state = ?self.state,
            "Feeding compiler output"
        );

        if let Err(error) = self.consume(bytes, sink) {
            warn!(target_name = %self.target_name, %error, "Compiler output parsing failed");
            self.latch(ParserStatus::Failed);
            sink.on_fatal_error(error);
        }
    }

    fn consume<S: MessageSink + ?Sized>(
        &mut self,
        bytes: &[u8],
        sink: &mut S,
    ) -> Result<(), ParseError> {
        let mut rest = bytes;

        loop {
            match self.state {
                State::AwaitingSizeLine => {
                    let newline = rest.iter().position(|&b| b == NEWLINE);
                    let line_part = &rest[..newline.unwrap_or(rest.len())];
                    self.check_line_size(line_part.len())?;
                    self.buffer.append(line_part);
                    let Some(newline) = newline else {
                        return Ok(());
                    };
                    rest = &rest[newline + 1..];
                    self.finish_size_line(sink)?;
                }
                State::AwaitingBody { size } => {
                    let remaining = size - self.buffer.len();
                    if rest.len() < remaining {
                        self.buffer.append(rest);
                        return Ok(());
                    }
                    let (body, tail) = rest.split_at(remaining);
                    self.buffer.append(body);
                    rest = tail;

                    let message = self.finish_body()?;
                    let terminal = message.kind.is_terminal();
                    sink.on_message(message);
                    if terminal {
                        debug!(
                            target_name = %self.target_name,
                            "Compiler job was signalled, ignoring further output"
                        );
                        self.latch(ParserStatus::Signalled);
                        return Ok(());
                    }
                }
                State::AwaitingTrailingNewline => {
                    let Some((&first, tail)) = rest.split_first() else {
                        return Ok(());
                    };
                    if first != NEWLINE {
                        return Err(ParseError::MissingNewline { found: first });
                    }
                    self.state = State::AwaitingSizeLine;
                    rest = tail;
                }
            }
        }
    }

    /// Reject a size line once it grows past `max_line_size`, counting the
    /// bytes already buffered so the outcome does not depend on chunking.
    fn check_line_size(&self, incoming: usize) -> Result<(), ParseError> {
        let max = self.config.max_line_size;
        if self.buffer.len() + incoming > max {
            return Err(ParseError::LineTooLong { max });
        }
        Ok(())
    }

    fn finish_size_line<S: MessageSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ParseError> {
        let line = interpret_size_line(self.buffer.as_bytes(), self.config.max_frame_size)?;
        self.buffer.clear();

        match line {
            SizeLine::Frame(size) => {
                trace!(target_name = %self.target_name, size, "Message size");
                self.state = State::AwaitingBody { size };
            }
            SizeLine::Text(text) => {
                debug!(target_name = %self.target_name, %text, "Unparsable compiler output");
                sink.on_message(CompilerMessage::unparsable(text));
            }
        }
        Ok(())
    }

    fn finish_body(&mut self) -> Result<CompilerMessage, ParseError> {
        let message = decode_message(self.buffer.as_bytes());
        self.buffer.clear();
        self.state = State::AwaitingTrailingNewline;
        message
    }

    fn latch(&mut self, status: ParserStatus) {
        self.status = status;
        self.buffer.clear();
    }
}
