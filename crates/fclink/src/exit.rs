use std::fmt;
use std::io;

use fclink_client::ClientError;
use fclink_mock::MockError;
use fclink_wire::WireError;

// Exit code constants, sysexits-flavored.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn wire_error(context: &str, err: WireError) -> CliError {
    match err {
        WireError::Io(source) => io_error(context, source),
        WireError::PayloadTooLarge { .. }
        | WireError::InvalidCommand(_)
        | WireError::ChecksumMismatch { .. }
        | WireError::UnknownBlockType(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        WireError::ConnectionClosed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Connect { source, .. } => io_error(context, source),
        ClientError::Io(source) => io_error(context, source),
        ClientError::Wire(err) => wire_error(context, err),
        ClientError::AlreadyRunning => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}

pub fn mock_error(context: &str, err: MockError) -> CliError {
    match err {
        MockError::Bind { source, .. } | MockError::Accept(source) | MockError::Io(source) => {
            io_error(context, source)
        }
        MockError::Wire(err) => wire_error(context, err),
    }
}
