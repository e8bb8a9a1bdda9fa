//! Streaming parser for the Swift compiler's parseable output.
//!
//! Feed raw stdout bytes as they arrive; decoded records are delivered to
//! a [`MessageSink`] in stream order.

mod buffer;
mod engine;
mod size_line;
mod sink;

pub use buffer::FrameBuffer;
pub use engine::{OutputParser, ParserStatus};
pub use size_line::{SizeLine, interpret_size_line};
pub use sink::{FnSink, MessageSink, ParseEvent, ParseEvents};
