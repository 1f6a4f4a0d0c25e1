use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod send;
pub mod stream;
pub mod tail;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Transmit command frames to the telemetry node.
    Send(SendArgs),
    /// Serve synthetic log blocks as a mock telemetry node.
    Stream(StreamArgs),
    /// Follow a node's log-block stream and print decoded records.
    Tail(TailArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args),
        Command::Stream(args) => stream::run(args),
        Command::Tail(args) => tail::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// The transmit command set, as CLI values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CommandKind {
    StartStream,
    StopStream,
    SendData,
    StartPersist,
    StopPersist,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Node address to connect to (host:port).
    pub addr: SocketAddr,
    /// Command to transmit.
    #[arg(long, short = 'c', value_enum, default_value = "send-data")]
    pub command: CommandKind,
    /// Raw string payload (send-data only).
    #[arg(long, conflicts_with = "file")]
    pub data: Option<String>,
    /// Read the payload from a file (send-data only).
    #[arg(long, conflicts_with = "data")]
    pub file: Option<PathBuf>,
    /// Send the data frame N times (load test).
    #[arg(long)]
    pub burst: Option<usize>,
    /// Delay between burst frames (e.g. 5ms, 1s).
    #[arg(long, default_value = "10ms")]
    pub interval: String,
}

#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Address to listen on (host:port; port 0 picks a free port).
    pub addr: SocketAddr,
    /// Blocks to stream per client session.
    #[arg(long, default_value_t = 1000)]
    pub count: u32,
    /// Delay between blocks (e.g. 5ms).
    #[arg(long, default_value = "10ms")]
    pub interval: String,
    /// Serve a single session, then exit.
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug)]
pub struct TailArgs {
    /// Node address to connect to (host:port).
    pub addr: SocketAddr,
    /// Exit after printing N blocks.
    #[arg(long)]
    pub count: Option<usize>,
    /// Delay between connection attempts (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub retry_delay: String,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

pub fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
