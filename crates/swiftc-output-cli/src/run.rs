//! Run a compiler command and parse its stdout as it arrives.

use std::process::{ExitStatus, Stdio};

use swiftc_output_core::{MessageSink, OutputParser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::pump::pump;

/// Outcome of a compiler run.
#[derive(Debug)]
pub struct RunOutcome {
    pub status: ExitStatus,
    pub bytes_read: u64,
    /// Lines the compiler wrote to stderr.
    pub stderr_lines: usize,
}

/// Spawn `program` with `args`, feeding its stdout into `parser`.
///
/// Stderr lines are forwarded to the log. Returns once the child has
/// exited and both of its output pipes are drained.
pub async fn run_command<S: MessageSink>(
    program: &str,
    args: &[String],
    parser: &mut OutputParser,
    sink: &mut S,
    chunk_size: usize,
) -> Result<RunOutcome, RunError> {
    info!(
        program,
        target_name = parser.target_name(),
        "Spawning compiler"
    );
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| RunError::SpawnFailed {
            program: program.to_string(),
            reason: e.to_string(),
        })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RunError::SpawnFailed {
            program: program.to_string(),
            reason: "Failed to capture stdout".to_string(),
        })?;

    let stderr_task = child.stderr.take().map(|stderr| {
        let name = program.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut count = 0usize;
            while let Ok(Some(line)) = lines.next_line().await {
                count += 1;
                warn!(program = %name, "stderr: {}", line);
            }
            debug!(program = %name, lines = count, "stderr reader finished");
            count
        })
    });

    let bytes_read = pump(stdout, parser, sink, chunk_size)
        .await
        .map_err(RunError::Read)?;
    let status = child.wait().await.map_err(RunError::Wait)?;

    let stderr_lines = match stderr_task {
        Some(task) => task.await.unwrap_or_else(|e| {
            warn!(program, error = %e, "stderr reader failed");
            0
        }),
        None => 0,
    };
    info!(program, ?status, bytes_read, stderr_lines, "Compiler exited");

    Ok(RunOutcome {
        status,
        bytes_read,
        stderr_lines,
    })
}

/// Errors from running a compiler command.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Failed to spawn {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Failed to read compiler output: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to wait for compiler: {0}")]
    Wait(#[source] std::io::Error),
}
