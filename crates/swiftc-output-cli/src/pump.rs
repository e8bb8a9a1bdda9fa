//! Async feeding loop between a byte source and the parser.

use swiftc_output_core::{MessageSink, OutputParser};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

/// Default read size for input sources.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Read `reader` to EOF, feeding every chunk to `parser`.
///
/// The source is drained even after the parser latches so a child process
/// writing to a pipe never blocks. Returns the number of bytes read.
pub async fn pump<R, S>(
    mut reader: R,
    parser: &mut OutputParser,
    sink: &mut S,
    chunk_size: usize,
) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    S: MessageSink,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut total: u64 = 0;
    let mut reported_latch = false;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        total += n as u64;
        trace!(target_name = parser.target_name(), bytes = n, "Read chunk");
        parser.feed(&buf[..n], sink);

        if parser.is_latched() && !reported_latch {
            debug!(
                target_name = parser.target_name(),
                status = ?parser.status(),
                "Parser latched, draining remaining input"
            );
            reported_latch = true;
        }
    }

    if parser.buffered_len() > 0 {
        debug!(
            target_name = parser.target_name(),
            pending = parser.buffered_len(),
            "Input ended inside a frame"
        );
    }

    Ok(total)
}
