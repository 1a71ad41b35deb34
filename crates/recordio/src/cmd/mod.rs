use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use recordio_frame::{FrameReader, PayloadRead, ReaderConfig};

use crate::exit::{io_error, CliResult};
use crate::output::OutputFormat;

pub mod dump;
pub mod stats;
pub mod version;
pub mod write;

/// Default read buffer: 64 KiB.
const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append records to a record file.
    Write(WriteArgs),
    /// Print the records of a record file.
    Dump(DumpArgs),
    /// Summarize a record file.
    Stats(StatsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Write(args) => write::run(args, format),
        Command::Dump(args) => dump::run(args, format),
        Command::Stats(args) => stats::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Record file to write.
    pub path: PathBuf,
    /// Record payload given as a string (repeatable).
    #[arg(long, short = 'd')]
    pub data: Vec<String>,
    /// Read one record from each file (repeatable).
    #[arg(long, short = 'f')]
    pub file: Vec<PathBuf>,
    /// Frame every line of stdin as one record.
    #[arg(long)]
    pub lines: bool,
    /// Append to an existing file instead of truncating it.
    #[arg(long)]
    pub append: bool,
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Read buffer size in bytes; longer records are skipped.
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, value_parser = parse_buffer_size)]
    pub buffer_size: usize,
    /// Fetch each payload with a single read call instead of reading it whole.
    ///
    /// Buffered files return short reads at buffer boundaries, so this only
    /// suits sources that deliver whole records per read.
    #[arg(long)]
    pub single_read: bool,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Record file to read.
    pub path: PathBuf,
    #[command(flatten)]
    pub read: ReadArgs,
    /// Stop after N records (skipped records count).
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Record file to read.
    pub path: PathBuf,
    #[command(flatten)]
    pub read: ReadArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

impl ReadArgs {
    pub fn reader_config(&self) -> ReaderConfig {
        ReaderConfig {
            payload_read: if self.single_read {
                PayloadRead::Single
            } else {
                PayloadRead::Exact
            },
            ..ReaderConfig::default()
        }
    }
}

pub fn open_reader(path: &Path, args: &ReadArgs) -> CliResult<FrameReader<BufReader<File>>> {
    let file = File::open(path)
        .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
    Ok(FrameReader::with_config(
        BufReader::new(file),
        args.reader_config(),
    ))
}

fn parse_buffer_size(input: &str) -> Result<usize, String> {
    let size: usize = input
        .trim()
        .parse()
        .map_err(|_| format!("invalid buffer size: {input}"))?;
    if size == 0 {
        return Err("buffer size must be greater than zero".to_string());
    }
    Ok(size)
}
