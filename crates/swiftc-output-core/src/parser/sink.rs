//! Receivers for parser output.

use crate::error::ParseError;
use crate::message::CompilerMessage;

/// Receives the records and the fatal error produced by an [`OutputParser`].
///
/// The sink is borrowed for the duration of each `feed` call; the parser
/// keeps no reference to it between calls.
///
/// [`OutputParser`]: super::OutputParser
pub trait MessageSink {
    /// Called for each record, in stream order.
    fn on_message(&mut self, message: CompilerMessage);

    /// Called at most once per parser. No records follow it.
    fn on_fatal_error(&mut self, error: ParseError);
}

/// One observable outcome of feeding a parser.
#[derive(Debug)]
pub enum ParseEvent {
    Message(CompilerMessage),
    Failed(ParseError),
}

impl ParseEvent {
    pub const fn as_message(&self) -> Option<&CompilerMessage> {
        match self {
            Self::Message(msg) => Some(msg),
            Self::Failed(_) => None,
        }
    }
}

/// Sink that records every event in arrival order.
#[derive(Debug, Default)]
pub struct ParseEvents {
    events: Vec<ParseEvent>,
}

impl ParseEvents {
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[ParseEvent] {
        &self.events
    }

    /// Decoded records, skipping any failure.
    pub fn messages(&self) -> impl Iterator<Item = &CompilerMessage> {
        self.events.iter().filter_map(ParseEvent::as_message)
    }

    /// Number of fatal errors received.
    pub fn failure_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ParseEvent::Failed(_)))
            .count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl MessageSink for ParseEvents {
    fn on_message(&mut self, message: CompilerMessage) {
        self.events.push(ParseEvent::Message(message));
    }

    fn on_fatal_error(&mut self, error: ParseError) {
        self.events.push(ParseEvent::Failed(error));
    }
}

/// Sink built from a pair of closures.
pub struct FnSink<M, E> {
    on_message: M,
    on_error: E,
}

impl<M, E> FnSink<M, E>
where
    M: FnMut(CompilerMessage),
    E: FnMut(ParseError),
{
    pub const fn new(on_message: M, on_error: E) -> Self {
        Self {
            on_message,
            on_error,
        }
    }
}

impl<M, E> MessageSink for FnSink<M, E>
where
    M: FnMut(CompilerMessage),
    E: FnMut(ParseError),
{
    fn on_message(&mut self, message: CompilerMessage) {
        (self.on_message)(message);
    }

    fn on_fatal_error(&mut self, error: ParseError) {
        (self.on_error)(error);
    }
}
