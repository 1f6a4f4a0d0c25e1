use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fclink_mock::{BlockSource, StreamServer};
use tracing::info;

use crate::cmd::{install_ctrlc_handler, parse_duration, StreamArgs};
use crate::exit::{mock_error, CliResult, SUCCESS};

pub fn run(args: StreamArgs) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let server = StreamServer::bind(args.addr).map_err(|err| mock_error("bind failed", err))?;
    info!(addr = %server.local_addr(), "serving synthetic log blocks");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    // One source across sessions: a reconnecting client sees the id
    // sequence continue instead of restarting at zero.
    let mut source = BlockSource::new();

    loop {
        let served = server
            .serve_one(&mut source, args.count, interval)
            .map_err(|err| mock_error("stream failed", err))?;
        info!(served, "session complete");

        if args.once || !running.load(Ordering::SeqCst) {
            break;
        }
    }

    Ok(SUCCESS)
}
