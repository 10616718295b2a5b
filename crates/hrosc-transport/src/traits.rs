//! Transport trait definitions

use async_trait::async_trait;
use bytes::Bytes;

use crate::destination::Destination;
use crate::error::Result;

/// Hands one datagram to the network
///
/// Implementations keep no per-destination state: every call stands alone,
/// and concurrent calls must not block one another.
#[async_trait]
pub trait DatagramTransmitter: Send + Sync {
    /// Send `payload` as a single datagram to `destination`
    async fn transmit(&self, destination: &Destination, payload: Bytes) -> Result<()>;
}

#[async_trait]
impl<T: DatagramTransmitter + ?Sized> DatagramTransmitter for std::sync::Arc<T> {
    async fn transmit(&self, destination: &Destination, payload: Bytes) -> Result<()> {
        (**self).transmit(destination, payload).await
    }
}
