//! Interpretation of the line that precedes each message body.

use crate::error::ParseError;

/// What a complete size line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SizeLine {
    /// Length in bytes of the JSON body that follows.
    Frame(usize),
    /// Free-form text the compiler printed outside the framing, e.g. a
    /// remark emitted under `SWIFTC_MAXIMUM_DETERMINISM`.
    Text(String),
}

/// Interpret the bytes of one size line, newline excluded.
///
/// Sizes above `max_frame_size` are rejected rather than buffered.
pub fn interpret_size_line(line: &[u8], max_frame_size: usize) -> Result<SizeLine, ParseError> {
    let text = std::str::from_utf8(line).map_err(ParseError::InvalidUtf8)?;

    match text.parse::<usize>() {
        Ok(size) if size > max_frame_size => Err(ParseError::FrameTooLarge {
            size,
            max: max_frame_size,
        }),
        Ok(size) => Ok(SizeLine::Frame(size)),
        Err(_) => Ok(SizeLine::Text(text.to_string())),
    }
}
