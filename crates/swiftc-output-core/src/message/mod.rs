//! Compiler message model.
//!
//! This module defines the records carried by the Swift compiler's
//! parseable output and decodes a single JSON body into one of them.

mod decode;
mod types;

pub use decode::decode_message;
pub use types::*;
