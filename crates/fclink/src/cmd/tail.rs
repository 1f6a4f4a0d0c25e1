use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use fclink_client::{ClientConfig, TelemetryClient};
use tracing::info;

use crate::cmd::{install_ctrlc_handler, parse_duration, TailArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_block, OutputFormat};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run(args: TailArgs, format: OutputFormat) -> CliResult<i32> {
    let retry_delay = parse_duration(&args.retry_delay)?;
    let config = ClientConfig {
        retry_delay,
        ..ClientConfig::default()
    };

    let mut client = TelemetryClient::with_config(args.addr, config);
    client
        .start()
        .map_err(|err| client_error("start failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;
    'poll: while running.load(Ordering::SeqCst) {
        for block in client.get_log_blocks() {
            print_block(&block, format);
            printed = printed.saturating_add(1);

            if let Some(count) = args.count {
                if printed >= count {
                    break 'poll;
                }
            }
        }
        thread::sleep(POLL_INTERVAL);
    }

    client.stop();
    client.wait_for_complete();

    let stats = client.stats();
    info!(
        blocks = stats.blocks_decoded,
        bytes = stats.bytes_received,
        errors = stats.link_errors,
        "tail finished"
    );

    Ok(SUCCESS)
}
