use std::fs;
use std::net::TcpStream;

use fclink_mock::CommandTransmitter;

use crate::cmd::{parse_duration, CommandKind, SendArgs};
use crate::exit::{io_error, mock_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: SendArgs) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let payload = resolve_payload(&args)?;

    if args.command != CommandKind::SendData && !payload.is_empty() {
        return Err(CliError::new(
            USAGE,
            "--data/--file only apply to send-data frames",
        ));
    }

    let stream =
        TcpStream::connect(args.addr).map_err(|err| io_error("connect failed", err))?;
    let mut tx = CommandTransmitter::new(stream);

    if let Some(count) = args.burst {
        if args.command != CommandKind::SendData {
            return Err(CliError::new(USAGE, "--burst only applies to send-data frames"));
        }
        tx.send_burst(count, &payload, interval)
            .map_err(|err| mock_error("send failed", err))?;
        return Ok(SUCCESS);
    }

    let result = match args.command {
        CommandKind::StartStream => tx.start_stream(),
        CommandKind::StopStream => tx.stop_stream(),
        CommandKind::SendData => tx.send_data(&payload),
        CommandKind::StartPersist => tx.start_persist(),
        CommandKind::StopPersist => tx.stop_persist(),
    };
    result.map_err(|err| mock_error("send failed", err))?;

    Ok(SUCCESS)
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
    }
    Ok(Vec::new())
}
