use std::collections::VecDeque;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use fclink_wire::{LogBlock, WireError};
use tracing::{debug, info, warn};

use crate::connection::ConnectionManager;
use crate::error::{ClientError, Result};
use crate::throughput::ThroughputMeter;

/// Tuning knobs for the telemetry client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Delay between connection attempts. Fixed — no backoff growth, no
    /// attempt limit.
    pub retry_delay: Duration,
    /// Socket read timeout. Bounds how long a stop request can go unnoticed
    /// while the link is quiet.
    pub read_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(5),
            read_timeout: Duration::from_millis(500),
        }
    }
}

/// Snapshot of the worker's link counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Connections successfully established.
    pub connects: u64,
    /// Log blocks decoded and enqueued.
    pub blocks_decoded: u64,
    /// Wire bytes consumed by decoded blocks.
    pub bytes_received: u64,
    /// Errors that forced a reconnect (short read, bad tag, bad checksum).
    pub link_errors: u64,
}

#[derive(Default)]
struct Counters {
    connects: AtomicU64,
    blocks_decoded: AtomicU64,
    bytes_received: AtomicU64,
    link_errors: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> LinkStats {
        LinkStats {
            connects: self.connects.load(Ordering::Relaxed),
            blocks_decoded: self.blocks_decoded.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            link_errors: self.link_errors.load(Ordering::Relaxed),
        }
    }
}

/// Client that connects to the telemetry node and decodes its log-block
/// stream on a background thread.
///
/// Decoded blocks land on an internal queue in wire order;
/// [`get_log_blocks`](TelemetryClient::get_log_blocks) drains it without
/// blocking. The worker owns the socket exclusively and recovers from every
/// link failure by reconnecting.
pub struct TelemetryClient {
    addr: SocketAddr,
    config: ClientConfig,
    stop: Arc<AtomicBool>,
    queue: Arc<Mutex<VecDeque<LogBlock>>>,
    counters: Arc<Counters>,
    worker: Option<JoinHandle<()>>,
}

impl TelemetryClient {
    /// Create a client for the given node address with default settings.
    pub fn new(addr: SocketAddr) -> Self {
        Self::with_config(addr, ClientConfig::default())
    }

    /// Create a client with explicit settings.
    pub fn with_config(addr: SocketAddr, config: ClientConfig) -> Self {
        Self {
            addr,
            config,
            stop: Arc::new(AtomicBool::new(false)),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            counters: Arc::new(Counters::default()),
            worker: None,
        }
    }

    /// Spawn the background worker.
    ///
    /// Returns [`ClientError::AlreadyRunning`] if a worker is active; two
    /// decoders must never share the socket.
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Err(ClientError::AlreadyRunning);
        }

        self.stop.store(false, Ordering::SeqCst);
        let worker = Worker {
            conn: ConnectionManager::new(self.addr, Some(self.config.read_timeout)),
            retry_delay: self.config.retry_delay,
            stop: Arc::clone(&self.stop),
            queue: Arc::clone(&self.queue),
            counters: Arc::clone(&self.counters),
        };
        let handle = thread::Builder::new()
            .name("fclink-client".into())
            .spawn(move || worker.run())?;
        self.worker = Some(handle);
        Ok(())
    }

    /// Request the worker to stop. Fire-and-forget: returns immediately
    /// without waiting for the thread to exit.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Block until the worker thread has fully exited.
    pub fn wait_for_complete(&mut self) {
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    /// Drain the output queue: everything decoded since the last call, in
    /// wire order. Never blocks; returns an empty vec when nothing arrived.
    pub fn get_log_blocks(&self) -> Vec<LogBlock> {
        lock_queue(&self.queue).drain(..).collect()
    }

    /// Snapshot of the link counters.
    pub fn stats(&self) -> LinkStats {
        self.counters.snapshot()
    }
}

impl Drop for TelemetryClient {
    fn drop(&mut self) {
        self.stop();
    }
}

// A poisoned lock only means a consumer died mid-drain; the queue itself is
// still a valid VecDeque.
fn lock_queue(queue: &Mutex<VecDeque<LogBlock>>) -> MutexGuard<'_, VecDeque<LogBlock>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

struct Worker {
    conn: ConnectionManager,
    retry_delay: Duration,
    stop: Arc<AtomicBool>,
    queue: Arc<Mutex<VecDeque<LogBlock>>>,
    counters: Arc<Counters>,
}

impl Worker {
    fn run(mut self) {
        info!(addr = %self.conn.addr(), "telemetry worker started");
        let mut meter = ThroughputMeter::new();

        while !self.stop.load(Ordering::SeqCst) {
            if !self.conn.is_connected() {
                match self.conn.connect() {
                    Ok(()) => {
                        self.counters.connects.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(err) => {
                        debug!(error = %err, "connect failed, retrying");
                        self.sleep_retry();
                    }
                }
                continue;
            }

            let Some(reader) = self.conn.reader() else {
                continue;
            };

            match reader.read_block() {
                Ok(block) => {
                    let wire_size = block.wire_size();
                    self.counters.blocks_decoded.fetch_add(1, Ordering::Relaxed);
                    self.counters
                        .bytes_received
                        .fetch_add(wire_size as u64, Ordering::Relaxed);
                    lock_queue(&self.queue).push_back(block);

                    if let Some(rate) = meter.record(wire_size) {
                        debug!(bytes_per_sec = rate as u64, "link throughput");
                    }
                }
                Err(WireError::Io(err)) if is_read_timeout(&err) => {
                    // Quiet link; loop around and re-check the stop flag.
                }
                Err(err) => {
                    warn!(error = %err, "link error, reconnecting");
                    self.counters.link_errors.fetch_add(1, Ordering::Relaxed);
                    self.conn.disconnect();
                }
            }
        }

        self.conn.disconnect();
        info!("telemetry worker stopped");
    }

    // Fixed-delay retry, sliced so a stop request is honored promptly.
    fn sleep_retry(&self) {
        const SLICE: Duration = Duration::from_millis(50);
        let mut remaining = self.retry_delay;
        while !self.stop.load(Ordering::SeqCst) && !remaining.is_zero() {
            let step = remaining.min(SLICE);
            thread::sleep(step);
            remaining -= step;
        }
    }
}

fn is_read_timeout(err: &std::io::Error) -> bool {
    matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut)
}
