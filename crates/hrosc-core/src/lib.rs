//! HROSC Core
//!
//! OSC 1.0 message types and encoding for heart-rate telemetry.
//!
//! This crate provides:
//! - Message data model ([`OscAddressPattern`], [`OscTypeTag`], [`OscArgument`], [`OscMessage`])
//! - Bit-exact OSC encoding ([`codec`])
//! - Validation errors ([`Error`])
//!
//! Only single-argument messages with an `i` (int32) or `f` (float32) argument
//! are supported. Bundles are not.

pub mod codec;
pub mod error;
pub mod types;

pub use codec::{encode, encode_message, pad_string};
pub use error::{Error, Result};
pub use types::{OscAddressPattern, OscArgument, OscMessage, OscTypeTag};

/// OSC strings and arguments are aligned to this many bytes
pub const OSC_ALIGNMENT: usize = 4;

/// Size of the single numeric argument on the wire
pub const ARGUMENT_SIZE: usize = 4;

/// Address pattern used when none is configured
pub const DEFAULT_ADDRESS: &str = "/hrtest";
