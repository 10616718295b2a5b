//! Heart-rate sample stream
//!
//! Reads one BPM reading per line and forwards every usable one as a float
//! OSC message. Each send runs on its own task, so a slow or failing send
//! never holds up the next sample. Nothing is queued for retry; the next
//! sample is the retry.

use anyhow::Result;
use hrosc_transport::{DatagramTransmitter, Destination, OscSender, TransportError};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

/// Counters reported when the stream ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub sent: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl StreamStats {
    fn record(&mut self, joined: std::result::Result<Result<(), TransportError>, JoinError>) {
        match joined {
            Ok(Ok(())) => self.sent += 1,
            Ok(Err(e)) => {
                self.failed += 1;
                warn!("Heart rate sample dropped: {}", e);
            }
            Err(e) => {
                self.failed += 1;
                error!("Send task failed: {}", e);
            }
        }
    }
}

/// Parse a BPM reading; zero, negative and non-numeric readings are unusable
pub fn parse_sample(line: &str) -> Option<f32> {
    let bpm: f32 = line.trim().parse().ok()?;
    (bpm.is_finite() && bpm > 0.0).then_some(bpm)
}

/// Forward samples from `reader` until EOF or shutdown, then wait for
/// in-flight sends
pub async fn run_stream<R, T>(
    reader: R,
    sender: OscSender<T>,
    destination: Destination,
    path: &str,
    shutdown_rx: &mut mpsc::Receiver<()>,
) -> Result<StreamStats>
where
    R: AsyncBufRead + Unpin,
    T: DatagramTransmitter + 'static,
{
    let path: Arc<str> = Arc::from(path);
    let destination = Arc::new(destination);
    let mut lines = reader.lines();
    let mut tasks = JoinSet::new();
    let mut stats = StreamStats::default();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Sample input closed");
                    break;
                };

                let Some(bpm) = parse_sample(&line) else {
                    if !line.trim().is_empty() {
                        debug!("Skipping unusable sample: {:?}", line);
                    }
                    stats.skipped += 1;
                    continue;
                };

                debug!("Heart rate: {} BPM", bpm);
                let sender = sender.clone();
                let destination = destination.clone();
                let path = path.clone();
                tasks.spawn(async move {
                    sender.send_float(&destination, &path, bpm).await
                });
            }
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                stats.record(joined);
            }
            Some(()) = shutdown_rx.recv() => {
                info!("Stopping sample stream");
                break;
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        stats.record(joined);
    }

    Ok(stats)
}
