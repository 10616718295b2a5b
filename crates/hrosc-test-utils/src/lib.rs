//! Common test helpers and utilities for HROSC tests
//!
//! This crate provides:
//! - Port allocation
//! - Condition-based waiting (no hardcoded sleeps)
//! - A loopback UDP capture socket that decodes OSC with `rosc`
//! - A recording transmitter standing in for the network

use async_trait::async_trait;
use bytes::Bytes;
use hrosc_transport::{DatagramTransmitter, Destination, Result, TransportError};
use parking_lot::Mutex;
use rosc::{OscPacket, OscType};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Default test timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default condition check interval
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(10);

// ============================================================================
// Port Allocation
// ============================================================================

/// Find an available UDP port for testing
pub fn find_available_udp_port() -> u16 {
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap().port()
}

// ============================================================================
// Condition-Based Waiting
// ============================================================================

/// Wait for a condition with timeout - condition-based, not time-based
pub async fn wait_for<F>(check: F, interval: Duration, max_wait: Duration) -> bool
where
    F: Fn() -> bool,
{
    let start = Instant::now();
    while start.elapsed() < max_wait {
        if check() {
            return true;
        }
        tokio::time::sleep(interval).await;
    }
    false
}

/// Wait for an atomic counter to reach a target value
pub async fn wait_for_count(counter: &AtomicU32, target: u32, max_wait: Duration) -> bool {
    wait_for(
        || counter.load(Ordering::SeqCst) >= target,
        DEFAULT_CHECK_INTERVAL,
        max_wait,
    )
    .await
}

// ============================================================================
// OSC decoding oracle
// ============================================================================

/// Decode a datagram that must hold exactly one single-argument message
pub fn decode_single(bytes: &[u8]) -> (String, OscType) {
    let (rest, packet) = rosc::decoder::decode_udp(bytes).expect("rosc failed to decode");
    assert!(rest.is_empty(), "trailing bytes after message");
    match packet {
        OscPacket::Message(mut msg) => {
            assert_eq!(msg.args.len(), 1, "expected exactly one argument");
            (msg.addr, msg.args.remove(0))
        }
        OscPacket::Bundle(_) => panic!("Expected message, got bundle"),
    }
}

// ============================================================================
// UDP capture
// ============================================================================

/// A loopback UDP socket that collects datagrams sent to it
pub struct OscCapture {
    socket: UdpSocket,
}

impl OscCapture {
    /// Bind to an ephemeral loopback port
    pub async fn bind() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0")
            .await
            .expect("capture bind failed");
        Self { socket }
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.socket.local_addr().unwrap()
    }

    /// Destination pointing at this capture
    pub fn destination(&self) -> Destination {
        Destination::from(self.local_addr())
    }

    /// Receive one raw datagram, or `None` on timeout
    pub async fn recv_raw(&self, max_wait: Duration) -> Option<(Vec<u8>, SocketAddr)> {
        let mut buf = vec![0u8; 65536];
        match timeout(max_wait, self.socket.recv_from(&mut buf)).await {
            Ok(Ok((len, from))) => {
                buf.truncate(len);
                Some((buf, from))
            }
            _ => None,
        }
    }

    /// Receive and decode one message, or `None` on timeout
    pub async fn recv(&self, max_wait: Duration) -> Option<(String, OscType)> {
        self.recv_raw(max_wait)
            .await
            .map(|(bytes, _)| decode_single(&bytes))
    }
}

// ============================================================================
// Recording transmitter
// ============================================================================

/// A transmitter that records datagrams instead of sending them
#[derive(Default)]
pub struct RecordingTransmitter {
    sent: Mutex<Vec<(Destination, Bytes)>>,
    attempts: AtomicU32,
    fail_with: Option<String>,
    delay: Option<Duration>,
}

impl RecordingTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every transmit fails with a `Transmit` error carrying `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_with: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Every transmit sleeps for `delay` before recording
    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    /// Datagrams recorded so far
    pub fn sent(&self) -> Vec<(Destination, Bytes)> {
        self.sent.lock().clone()
    }

    /// Number of transmit calls, including failed ones
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn attempt_counter(&self) -> &AtomicU32 {
        &self.attempts
    }
}

#[async_trait]
impl DatagramTransmitter for RecordingTransmitter {
    async fn transmit(&self, destination: &Destination, payload: Bytes) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(reason) = &self.fail_with {
            return Err(TransportError::Transmit(reason.clone()));
        }

        self.sent.lock().push((destination.clone(), payload));
        Ok(())
    }
}
