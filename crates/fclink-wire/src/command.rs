//! Link command set.
//!
//! Command bytes are assigned by the node firmware and must not be
//! renumbered.

use crate::error::WireError;

/// Commands understood by the telemetry node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Begin streaming log blocks upstream.
    StartStream = 0,
    /// Stop streaming log blocks upstream.
    StopStream = 1,
    /// Carry a raw log payload to the node.
    SendData = 2,
    /// Begin persisting log data to the node's local storage.
    StartPersist = 3,
    /// Stop persisting log data.
    StopPersist = 4,
}

impl Command {
    /// The wire encoding of this command.
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Human-readable name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Command::StartStream => "START_STREAM",
            Command::StopStream => "STOP_STREAM",
            Command::SendData => "SEND_DATA",
            Command::StartPersist => "START_PERSIST",
            Command::StopPersist => "STOP_PERSIST",
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = WireError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Command::StartStream),
            1 => Ok(Command::StopStream),
            2 => Ok(Command::SendData),
            3 => Ok(Command::StartPersist),
            4 => Ok(Command::StopPersist),
            other => Err(WireError::InvalidCommand(other)),
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_values_are_stable() {
        assert_eq!(Command::StartStream.as_byte(), 0);
        assert_eq!(Command::StopStream.as_byte(), 1);
        assert_eq!(Command::SendData.as_byte(), 2);
        assert_eq!(Command::StartPersist.as_byte(), 3);
        assert_eq!(Command::StopPersist.as_byte(), 4);
    }

    #[test]
    fn roundtrip_through_byte() {
        for cmd in [
            Command::StartStream,
            Command::StopStream,
            Command::SendData,
            Command::StartPersist,
            Command::StopPersist,
        ] {
            assert_eq!(Command::try_from(cmd.as_byte()).unwrap(), cmd);
        }
    }

    #[test]
    fn unknown_byte_rejected() {
        let err = Command::try_from(5).unwrap_err();
        assert!(matches!(err, WireError::InvalidCommand(5)));
        assert!(matches!(
            Command::try_from(0xFF).unwrap_err(),
            WireError::InvalidCommand(0xFF)
        ));
    }
}
