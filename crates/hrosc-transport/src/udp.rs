//! UDP transmitter implementation

use async_trait::async_trait;
use bytes::Bytes;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, trace};

use crate::destination::Destination;
use crate::error::{Result, TransportError};
use crate::traits::DatagramTransmitter;

/// UDP configuration
#[derive(Debug, Clone)]
pub struct UdpConfig {
    /// Maximum datagram payload
    pub max_packet_size: usize,
    /// Allow sending to broadcast addresses
    pub broadcast: bool,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            max_packet_size: 65507, // Max UDP payload
            broadcast: false,
        }
    }
}

/// Connectionless UDP transmitter
///
/// Each transmit resolves the destination, opens its own ephemeral socket,
/// sends one datagram and drops the socket. Nothing is shared between calls.
#[derive(Debug, Clone, Default)]
pub struct UdpTransmitter {
    config: UdpConfig,
}

impl UdpTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UdpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UdpConfig {
        &self.config
    }

    /// Bind a fresh socket in the same address family as `target`
    async fn open_socket(&self, target: SocketAddr) -> Result<UdpSocket> {
        let local = match target {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };

        let socket = UdpSocket::bind(local)
            .await
            .map_err(|e| TransportError::Transmit(format!("socket allocation failed: {}", e)))?;

        if self.config.broadcast {
            socket
                .set_broadcast(true)
                .map_err(|e| TransportError::Transmit(format!("cannot enable broadcast: {}", e)))?;
        }

        Ok(socket)
    }
}

#[async_trait]
impl DatagramTransmitter for UdpTransmitter {
    async fn transmit(&self, destination: &Destination, payload: Bytes) -> Result<()> {
        if payload.len() > self.config.max_packet_size {
            return Err(TransportError::Transmit(format!(
                "datagram of {} bytes exceeds limit of {}",
                payload.len(),
                self.config.max_packet_size
            )));
        }

        let target = destination.resolve().await?;
        trace!("Resolved {} to {}", destination, target);

        let socket = self.open_socket(target).await?;

        let sent = socket
            .send_to(&payload, target)
            .await
            .map_err(|e| TransportError::Transmit(e.to_string()))?;

        if sent != payload.len() {
            return Err(TransportError::Transmit(format!(
                "short write: {} of {} bytes",
                sent,
                payload.len()
            )));
        }

        debug!("UDP sent {} bytes to {}", sent, target);
        Ok(())
    }
}
