//! NDJSON writer for decoded records.

use std::io::Write;

use swiftc_output_core::{CompilerMessage, MessageSink, ParseError};
use tracing::{error, warn};

/// Sink that writes one JSON line per record.
///
/// Write failures are remembered rather than propagated, since the parser
/// delivers records from inside `feed`.
#[derive(Debug)]
pub struct RecordWriter<W> {
    writer: W,
    written: usize,
    failure: Option<String>,
    io_error: Option<std::io::Error>,
}

impl<W: Write> RecordWriter<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            failure: None,
            io_error: None,
        }
    }

    /// Records successfully written so far.
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Reason reported by the parser, if it failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Flush the writer and surface the first write error, if any.
    pub fn finish(mut self) -> std::io::Result<W> {
        if let Some(err) = self.io_error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_record(&mut self, message: &CompilerMessage) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")
    }
}

impl<W: Write> MessageSink for RecordWriter<W> {
    fn on_message(&mut self, message: CompilerMessage) {
        if self.io_error.is_some() {
            return;
        }
        match self.write_record(&message) {
            Ok(()) => self.written += 1,
            Err(e) => {
                warn!(error = %e, "Failed to write record");
                self.io_error = Some(e);
            }
        }
    }

    fn on_fatal_error(&mut self, error: ParseError) {
        error!(%error, "Compiler output could not be parsed");
        self.failure = Some(error.to_string());
    }
}
