//! OSC 1.0 message encoding
//!
//! Wire layout of a single-argument message:
//!
//! ```text
//! [address pattern bytes][NUL padding to %4==0]
//! [',' + type char     ][NUL padding to %4==0]
//! [4 bytes big-endian argument]
//! ```
//!
//! Strings always carry at least one NUL terminator. A string whose length is
//! already a multiple of 4 therefore gains a full block of four zero bytes.
//! There is no length prefix; UDP datagram boundaries frame the message.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Write;

use crate::types::{OscArgument, OscMessage};
use crate::{Error, Result, OSC_ALIGNMENT};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Encoded length of an OSC string of `len` bytes: `ceil((len + 1) / 4) * 4`
#[inline]
pub const fn padded_len(len: usize) -> usize {
    (len / OSC_ALIGNMENT + 1) * OSC_ALIGNMENT
}

/// NUL-terminate and pad a string to the next 4-byte boundary
pub fn pad_string(s: &str) -> Result<Bytes> {
    validate_osc_string("string", s)?;
    let mut buf = BytesMut::with_capacity(padded_len(s.len()));
    put_padded(&mut buf, s);
    Ok(buf.freeze())
}

/// Encode an address, a type tag and one argument into OSC wire bytes
///
/// Fails with [`Error::InvalidAddress`], [`Error::InvalidTypeTag`] or
/// [`Error::InvalidEncoding`]; nothing is produced for an invalid message.
pub fn encode(address: &str, type_tag: &str, value: OscArgument) -> Result<Bytes> {
    let message = OscMessage::new(address, type_tag, value)?;
    Ok(encode_message(&message))
}

/// Encode an already validated message
#[inline]
pub fn encode_message(message: &OscMessage) -> Bytes {
    let mut buf = BytesMut::with_capacity(message.encoded_len());
    put_padded(&mut buf, message.address().as_str());
    put_padded(&mut buf, message.type_tag().as_str());
    buf.put_slice(&message.argument().to_be_bytes());
    buf.freeze()
}

/// Render bytes as space separated uppercase hex (`2F 68 72 ...`)
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", b);
    }
    out
}

// ============================================================================
// INTERNALS
// ============================================================================

/// Check that a string can travel as an OSC string: ASCII with no NUL inside
pub(crate) fn validate_osc_string(field: &str, s: &str) -> Result<()> {
    if let Some(pos) = s.bytes().position(|b| !b.is_ascii()) {
        return Err(Error::InvalidEncoding(format!(
            "non-ASCII byte in {} at offset {}: {:?}",
            field, pos, s
        )));
    }

    if let Some(pos) = s.bytes().position(|b| b == 0) {
        return Err(Error::InvalidEncoding(format!(
            "NUL byte in {} at offset {}",
            field, pos
        )));
    }

    Ok(())
}

#[inline]
fn put_padded(buf: &mut BytesMut, s: &str) {
    buf.put_slice(s.as_bytes());
    buf.put_bytes(0, padded_len(s.len()) - s.len());
}
