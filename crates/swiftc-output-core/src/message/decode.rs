//! Decoder for a single message body.
//!
//! Bodies are decoded strictly: the `kind` tag must be one of the known
//! kinds and every field of that kind must be present with the right type.
//! Unknown extra fields are ignored.

use super::types::CompilerMessage;
use crate::error::ParseError;

/// Decode one complete JSON message body.
pub fn decode_message(body: &[u8]) -> Result<CompilerMessage, ParseError> {
    serde_json::from_slice(body).map_err(ParseError::InvalidMessage)
}
