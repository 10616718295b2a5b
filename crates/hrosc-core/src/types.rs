//! OSC message data model
//!
//! Every type here is validated on construction, so a built [`OscMessage`]
//! always encodes successfully.

use bytes::Bytes;
use std::fmt;

use crate::codec::{self, validate_osc_string};
use crate::{Error, Result};

/// An OSC address pattern such as `/avatar/parameters/Heartrate`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OscAddressPattern(String);

impl OscAddressPattern {
    /// Parse an address pattern string
    pub fn parse(s: &str) -> Result<Self> {
        Self::check_prefix(s)?;
        validate_osc_string("address", s)?;

        Ok(Self(s.to_string()))
    }

    fn check_prefix(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".to_string()));
        }

        if !s.starts_with('/') {
            return Err(Error::InvalidAddress(format!(
                "address must start with '/': {}",
                s
            )));
        }

        Ok(())
    }

    /// Get the raw address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OscAddressPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for OscAddressPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// OSC type tag for a single-argument message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OscTypeTag {
    /// `,i`
    Int32,
    /// `,f`
    Float32,
}

impl OscTypeTag {
    /// Parse a type tag string (`,i` or `,f`)
    pub fn parse(s: &str) -> Result<Self> {
        let Some(types) = s.strip_prefix(',') else {
            return Err(Error::InvalidTypeTag(format!(
                "type tag must start with ',': {}",
                s
            )));
        };

        match types {
            "i" => Ok(OscTypeTag::Int32),
            "f" => Ok(OscTypeTag::Float32),
            "" => Err(Error::InvalidTypeTag(
                "type tag names no argument".to_string(),
            )),
            other if other.chars().count() > 1 => Err(Error::InvalidTypeTag(format!(
                "only single-argument messages are supported: {}",
                s
            ))),
            other => Err(Error::InvalidTypeTag(format!(
                "unsupported type '{}'",
                other
            ))),
        }
    }

    /// Tag matching an argument
    pub fn for_argument(argument: &OscArgument) -> Self {
        match argument {
            OscArgument::Int32(_) => OscTypeTag::Int32,
            OscArgument::Float32(_) => OscTypeTag::Float32,
        }
    }

    /// Wire form of the tag, including the leading comma
    pub fn as_str(&self) -> &'static str {
        match self {
            OscTypeTag::Int32 => ",i",
            OscTypeTag::Float32 => ",f",
        }
    }

    /// Check if an argument can be carried under this tag
    pub fn matches(&self, argument: &OscArgument) -> bool {
        *self == Self::for_argument(argument)
    }
}

impl fmt::Display for OscTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OscTypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The single numeric payload of a message
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OscArgument {
    Int32(i32),
    Float32(f32),
}

impl OscArgument {
    /// Big-endian wire bytes (two's complement or IEEE-754 binary32)
    pub fn to_be_bytes(&self) -> [u8; 4] {
        match self {
            OscArgument::Int32(i) => i.to_be_bytes(),
            OscArgument::Float32(f) => f.to_be_bytes(),
        }
    }

    pub fn type_tag(&self) -> OscTypeTag {
        OscTypeTag::for_argument(self)
    }
}

impl From<i32> for OscArgument {
    fn from(value: i32) -> Self {
        OscArgument::Int32(value)
    }
}

impl From<f32> for OscArgument {
    fn from(value: f32) -> Self {
        OscArgument::Float32(value)
    }
}

impl fmt::Display for OscArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OscArgument::Int32(i) => write!(f, "{}i", i),
            OscArgument::Float32(v) => write!(f, "{}f", v),
        }
    }
}

/// A validated single-argument OSC message
#[derive(Debug, Clone, PartialEq)]
pub struct OscMessage {
    address: OscAddressPattern,
    type_tag: OscTypeTag,
    argument: OscArgument,
}

impl OscMessage {
    /// Build a message from raw parts, checking that the tag matches the argument
    ///
    /// Checks run address prefix, then type tag, then string encoding, so an
    /// input with several faults reports the first of these.
    pub fn new(address: &str, type_tag: &str, argument: OscArgument) -> Result<Self> {
        OscAddressPattern::check_prefix(address)?;
        let type_tag = OscTypeTag::parse(type_tag)?;

        if !type_tag.matches(&argument) {
            return Err(Error::InvalidTypeTag(format!(
                "type tag {} does not match argument {}",
                type_tag, argument
            )));
        }

        Ok(Self {
            address: OscAddressPattern::parse(address)?,
            type_tag,
            argument,
        })
    }

    /// Build a message whose type tag is derived from the argument
    pub fn for_argument(address: &str, argument: impl Into<OscArgument>) -> Result<Self> {
        let argument = argument.into();
        Ok(Self {
            address: OscAddressPattern::parse(address)?,
            type_tag: argument.type_tag(),
            argument,
        })
    }

    pub fn address(&self) -> &OscAddressPattern {
        &self.address
    }

    pub fn type_tag(&self) -> OscTypeTag {
        self.type_tag
    }

    pub fn argument(&self) -> OscArgument {
        self.argument
    }

    /// Encoded size in bytes
    pub fn encoded_len(&self) -> usize {
        codec::padded_len(self.address.as_str().len())
            + codec::padded_len(self.type_tag.as_str().len())
            + crate::ARGUMENT_SIZE
    }

    /// Encode to OSC wire bytes
    pub fn encode(&self) -> Bytes {
        codec::encode_message(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parse() {
        let addr = OscAddressPattern::parse("/avatar/parameters/Heartrate").unwrap();
        assert_eq!(addr.as_str(), "/avatar/parameters/Heartrate");

        assert!(matches!(
            OscAddressPattern::parse("hrtest"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            OscAddressPattern::parse(""),
            Err(Error::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_address_non_ascii() {
        assert!(matches!(
            OscAddressPattern::parse("/herz/schläge"),
            Err(Error::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_type_tag_parse() {
        assert_eq!(OscTypeTag::parse(",i").unwrap(), OscTypeTag::Int32);
        assert_eq!(OscTypeTag::parse(",f").unwrap(), OscTypeTag::Float32);

        for bad in ["f", "", ",", ",s", ",if", ",ff", ",é"] {
            assert!(
                matches!(OscTypeTag::parse(bad), Err(Error::InvalidTypeTag(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_mismatched_tag() {
        let err = OscMessage::new("/hrtest", ",i", OscArgument::Float32(72.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidTypeTag(_)));

        let err = OscMessage::new("/hrtest", ",f", OscArgument::Int32(72)).unwrap_err();
        assert!(matches!(err, Error::InvalidTypeTag(_)));
    }

    #[test]
    fn test_for_argument() {
        let msg = OscMessage::for_argument("/hrtest", 72).unwrap();
        assert_eq!(msg.type_tag(), OscTypeTag::Int32);
        assert_eq!(msg.argument(), OscArgument::Int32(72));

        let msg = OscMessage::for_argument("/hrtest", 72.5f32).unwrap();
        assert_eq!(msg.type_tag().as_str(), ",f");
    }

    #[test]
    fn test_encoded_len_matches_encoding() {
        for addr in ["/a", "/abc", "/hrtest", "/avatar/parameters/Heartrate"] {
            let msg = OscMessage::for_argument(addr, 1.0f32).unwrap();
            assert_eq!(msg.encoded_len(), msg.encode().len());
        }
    }
}
