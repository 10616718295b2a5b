//! HROSC Transport Layer
//!
//! Sends encoded OSC messages as single UDP datagrams:
//! - [`Destination`]: host + port, resolved on every send
//! - [`DatagramTransmitter`]: the send seam, implemented by [`UdpTransmitter`]
//! - [`OscSender`]: validate, encode and send in one call

pub mod destination;
pub mod error;
pub mod sender;
pub mod traits;
pub mod udp;

pub use destination::Destination;
pub use error::{Result, TransportError};
pub use sender::{OscSender, TraceHook};
pub use traits::DatagramTransmitter;
pub use udp::{UdpConfig, UdpTransmitter};
