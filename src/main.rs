//! streamify CLI - chunked file and byte-range copy.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use streamify::{TransferError, TransferJob};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "streamify")]
#[command(about = "Copy a file or a byte range of it in fixed-size chunks")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Write a JSON transfer report to this path on success
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the inclusive byte range [START_BYTE, END_BYTE] of SOURCE
    #[command(alias = "read")]
    CopyRange {
        source: PathBuf,
        destination: PathBuf,
        /// Bytes per read, also the write batching threshold
        #[arg(value_parser = parse_chunk_size)]
        chunk_size: usize,
        start_byte: u64,
        end_byte: u64,
    },

    /// Copy all of SOURCE
    #[command(alias = "write")]
    CopyFull {
        source: PathBuf,
        destination: PathBuf,
        /// Bytes per read, also the write batching threshold
        #[arg(value_parser = parse_chunk_size)]
        chunk_size: usize,
    },

    /// Run a transfer described by a JSON job file
    RunJob { job: PathBuf },
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    let size: usize = s.parse().map_err(|e| format!("invalid chunk size: {e}"))?;
    if size == 0 {
        return Err("chunk size must be greater than zero".to_string());
    }
    Ok(size)
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let job = match resolve_job(cli.command) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    if !job.source.exists() {
        eprintln!(
            "Error: input file, {}, does not exist.",
            job.source.display()
        );
        return ExitCode::from(1);
    }

    debug!(?job, "starting transfer");
    let report = match job.run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(e.exit_code());
        }
    };

    if let Some(path) = cli.report {
        if let Err(e) = report.save(&path) {
            eprintln!("Error: failed to write report {}: {e}", path.display());
            return ExitCode::from(1);
        }
    }

    println!(
        "File has been successfully written to {}",
        report.destination.display()
    );
    ExitCode::SUCCESS
}

fn resolve_job(command: Commands) -> Result<TransferJob, TransferError> {
    match command {
        Commands::CopyRange {
            source,
            destination,
            chunk_size,
            start_byte,
            end_byte,
        } => TransferJob::ranged(source, destination, chunk_size, start_byte, end_byte),
        Commands::CopyFull {
            source,
            destination,
            chunk_size,
        } => Ok(TransferJob::full(source, destination, chunk_size)),
        Commands::RunJob { job } => TransferJob::load(job),
    }
}
