//! Datagram destinations

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::lookup_host;

use crate::error::{Result, TransportError};

/// Where a message is sent: a host name or IP literal plus a UDP port
///
/// Nothing is cached; the host is resolved again on every send.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    host: String,
    port: u16,
}

impl Destination {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Resolve to the first socket address the system returns
    pub async fn resolve(&self) -> Result<SocketAddr> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(TransportError::resolution(&self.host, "empty host"));
        }

        let mut addrs = lookup_host((host, self.port))
            .await
            .map_err(|e| TransportError::resolution(host, e))?;

        addrs
            .next()
            .ok_or_else(|| TransportError::resolution(host, "no addresses found"))
    }
}

impl From<SocketAddr> for Destination {
    fn from(addr: SocketAddr) -> Self {
        Self {
            host: addr.ip().to_string(),
            port: addr.port(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Parses `host:port`, `ip:port` or `[ipv6]:port`
impl FromStr for Destination {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| TransportError::resolution(s, "expected host:port"))?;

        let port: u16 = port
            .parse()
            .map_err(|e| TransportError::resolution(s, format!("invalid port: {}", e)))?;

        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if host.is_empty() {
            return Err(TransportError::resolution(s, "empty host"));
        }

        Ok(Self::new(host, port))
    }
}
