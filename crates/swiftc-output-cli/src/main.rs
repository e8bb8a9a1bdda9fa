//! swiftc-output CLI
//!
//! Decodes the Swift compiler's parseable output (`-parseable-output`)
//! into one JSON line per record.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use swiftc_output_cli::output::RecordWriter;
use swiftc_output_cli::pump::{DEFAULT_CHUNK_SIZE, pump};
use swiftc_output_cli::run::run_command;
use swiftc_output_core::OutputParser;
use swiftc_output_core::config::load_config;
use swiftc_output_core::tracing_init::init_tracing;

#[derive(Parser, Debug)]
#[command(name = "swiftc-output")]
#[command(version, about = "Swift compiler parseable-output decoder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Largest message body accepted, in bytes
    #[arg(long, global = true)]
    max_frame_size: Option<usize>,

    /// Longest size or text line accepted, in bytes
    #[arg(long, global = true)]
    max_line_size: Option<usize>,

    /// Project directory holding `.swiftc-output/settings.json`
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode compiler output from a file or stdin
    Decode {
        /// Input file ("-" or omitted for stdin)
        file: Option<PathBuf>,

        /// Target the output belongs to
        #[arg(short, long, default_value = "unknown")]
        target: String,

        /// Read size in bytes
        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
    /// Run a compiler and decode its stdout as it arrives
    Run {
        /// Target the compiler is building
        #[arg(short, long, default_value = "unknown")]
        target: String,

        /// Program and arguments, after `--`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = load_config(cli.project_dir.as_deref())?;
    if cli.log_json {
        config.logging.json = true;
    }
    if let Some(max) = cli.max_frame_size {
        config.parser.max_frame_size = max;
    }
    if let Some(max) = cli.max_line_size {
        config.parser.max_line_size = max;
    }
    init_tracing(&config.logging);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting swiftc-output");

    let mut writer = RecordWriter::new(std::io::stdout());

    let exit = match cli.command {
        Command::Decode {
            file,
            target,
            chunk_size,
        } => {
            let mut parser = OutputParser::with_config(target, config.parser);
            match file.filter(|p| p.as_os_str() != "-") {
                Some(path) => {
                    let input = tokio::fs::File::open(&path)
                        .await
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    pump(input, &mut parser, &mut writer, chunk_size).await?;
                }
                None => {
                    pump(tokio::io::stdin(), &mut parser, &mut writer, chunk_size).await?;
                }
            }
            parse_exit_code(&writer)
        }
        Command::Run { target, command } => {
            let (program, args) = command
                .split_first()
                .context("No command given to run")?;
            let mut parser = OutputParser::with_config(target, config.parser);
            let outcome =
                run_command(program, args, &mut parser, &mut writer, DEFAULT_CHUNK_SIZE).await?;
            match outcome.status.code() {
                Some(0) => parse_exit_code(&writer),
                Some(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
                None => ExitCode::FAILURE,
            }
        }
    };

    info!(records = writer.written(), "Done");
    writer.finish().context("Failed to write records")?;
    Ok(exit)
}

fn parse_exit_code<W: std::io::Write>(writer: &RecordWriter<W>) -> ExitCode {
    if writer.failure().is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
