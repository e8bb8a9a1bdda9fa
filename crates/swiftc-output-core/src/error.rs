//! Error types for the swiftc-output core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from loading settings files.
#[derive(Debug, Error)]
pub enum Error {
    /// A settings file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file was not valid JSON for the config schema
    #[error("Failed to parse config file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Fatal failures raised while decoding the compiler output stream.
///
/// Every variant latches the parser that produced it.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A size line contained bytes that are not UTF-8.
    #[error("invalid UTF-8 bytes in size line")]
    InvalidUtf8(#[source] std::str::Utf8Error),

    /// A size line declared a body larger than the configured limit.
    #[error("declared message size {size} exceeds limit of {max} bytes")]
    FrameTooLarge { size: usize, max: usize },

    /// A size line grew past the configured limit before its newline.
    #[error("size line exceeds limit of {max} bytes")]
    LineTooLong { max: usize },

    /// A complete message body was not a valid compiler message.
    #[error("unexpected JSON message: {0}")]
    InvalidMessage(#[source] serde_json::Error),

    /// The byte following a message body was not a newline.
    #[error("expected newline after message body, found byte 0x{found:02x}")]
    MissingNewline { found: u8 },
}
