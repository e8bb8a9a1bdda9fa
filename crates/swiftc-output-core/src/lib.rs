//! swiftc-output core library
//!
//! Incremental decoding of the Swift compiler's parseable output:
//! - Compiler message model and JSON body decoding
//! - Length-prefixed stream parser with latching on failure
//! - Configuration resolution and hierarchy
//! - Common error types

pub mod config;
pub mod error;
pub mod message;
pub mod parser;
pub mod tracing_init;

pub use config::{Config, ParserConfig};
pub use error::{Error, ParseError, Result};
pub use message::{CompilerMessage, MessageKind};
pub use parser::{MessageSink, OutputParser, ParserStatus};
