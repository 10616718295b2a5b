//! OSC sender: the entry point used by sample producers
//!
//! Every call runs validate -> encode -> transmit. Validation failures are
//! returned before the trace hook runs and before any socket is touched.

use bytes::Bytes;
use hrosc_core::codec::hex_dump;
use hrosc_core::{OscArgument, OscMessage};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use crate::destination::Destination;
use crate::error::Result;
use crate::traits::DatagramTransmitter;
use crate::udp::UdpTransmitter;

/// Observer called with each message and its final wire bytes
pub type TraceHook = Arc<dyn Fn(&OscMessage, &[u8]) + Send + Sync>;

/// Validates, encodes and transmits single-argument OSC messages
pub struct OscSender<T = UdpTransmitter> {
    transmitter: Arc<T>,
    trace_hook: Option<TraceHook>,
}

impl OscSender<UdpTransmitter> {
    /// Sender over plain UDP with default configuration
    pub fn udp() -> Self {
        Self::new(UdpTransmitter::new())
    }
}

impl Default for OscSender<UdpTransmitter> {
    fn default() -> Self {
        Self::udp()
    }
}

impl<T> Clone for OscSender<T> {
    fn clone(&self) -> Self {
        Self {
            transmitter: self.transmitter.clone(),
            trace_hook: self.trace_hook.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for OscSender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OscSender")
            .field("transmitter", &self.transmitter)
            .field("trace_hook", &self.trace_hook.is_some())
            .finish()
    }
}

impl<T: DatagramTransmitter> OscSender<T> {
    pub fn new(transmitter: T) -> Self {
        Self {
            transmitter: Arc::new(transmitter),
            trace_hook: None,
        }
    }

    /// Install a hook that sees every encoded datagram before it is sent
    pub fn with_trace_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&OscMessage, &[u8]) + Send + Sync + 'static,
    {
        self.trace_hook = Some(Arc::new(hook));
        self
    }

    pub fn transmitter(&self) -> &T {
        &self.transmitter
    }

    /// Send a float argument with type tag `,f`
    pub async fn send_float(
        &self,
        destination: &Destination,
        address: &str,
        value: f32,
    ) -> Result<()> {
        self.send(destination, address, value).await
    }

    /// Send an int argument with type tag `,i`
    pub async fn send_int(
        &self,
        destination: &Destination,
        address: &str,
        value: i32,
    ) -> Result<()> {
        self.send(destination, address, value).await
    }

    /// Send one argument; the type tag is derived from its variant
    pub async fn send(
        &self,
        destination: &Destination,
        address: &str,
        argument: impl Into<OscArgument>,
    ) -> Result<()> {
        let message = OscMessage::for_argument(address, argument)?;
        self.send_message(destination, &message).await
    }

    /// Send one argument under an explicit type tag, which must match it
    pub async fn send_tagged(
        &self,
        destination: &Destination,
        address: &str,
        type_tag: &str,
        argument: OscArgument,
    ) -> Result<()> {
        let message = OscMessage::new(address, type_tag, argument)?;
        self.send_message(destination, &message).await
    }

    pub async fn send_message(
        &self,
        destination: &Destination,
        message: &OscMessage,
    ) -> Result<()> {
        let payload = self.encode(message);
        self.transmitter.transmit(destination, payload).await
    }

    fn encode(&self, message: &OscMessage) -> Bytes {
        let payload = message.encode();
        trace!(
            "OSC {} {} {} -> [{}]",
            message.address(),
            message.type_tag(),
            message.argument(),
            hex_dump(&payload)
        );
        if let Some(hook) = &self.trace_hook {
            hook(message, &payload);
        }
        payload
    }
}

impl<T: DatagramTransmitter + 'static> OscSender<T> {
    /// Validate now, then send a float on a background task
    ///
    /// Must be called from within a tokio runtime. Failures of the send
    /// itself are logged and returned through the handle.
    pub fn spawn_float(
        &self,
        destination: Destination,
        address: &str,
        value: f32,
    ) -> Result<JoinHandle<Result<()>>> {
        Ok(self.spawn(destination, OscMessage::for_argument(address, value)?))
    }

    /// Validate now, then send an int on a background task
    pub fn spawn_int(
        &self,
        destination: Destination,
        address: &str,
        value: i32,
    ) -> Result<JoinHandle<Result<()>>> {
        Ok(self.spawn(destination, OscMessage::for_argument(address, value)?))
    }

    fn spawn(&self, destination: Destination, message: OscMessage) -> JoinHandle<Result<()>> {
        let sender = self.clone();
        tokio::spawn(async move {
            let result = sender.send_message(&destination, &message).await;
            if let Err(ref e) = result {
                warn!("OSC send to {} failed: {}", destination, e);
            }
            result
        })
    }
}
