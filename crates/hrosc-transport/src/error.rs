//! Transport error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum TransportError {
    /// Message failed validation; nothing was sent
    #[error(transparent)]
    Codec(#[from] hrosc_core::Error),

    #[error("cannot resolve {host}: {reason}")]
    AddressResolution { host: String, reason: String },

    #[error("transmit failed: {0}")]
    Transmit(String),
}

impl TransportError {
    /// Check if this error was raised before any network attempt
    pub fn is_validation(&self) -> bool {
        matches!(self, TransportError::Codec(_))
    }

    pub(crate) fn resolution(host: &str, reason: impl ToString) -> Self {
        TransportError::AddressResolution {
            host: host.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_is_validation() {
        let err: TransportError = hrosc_core::Error::InvalidAddress("x".into()).into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "invalid address: x");

        assert!(!TransportError::Transmit("down".into()).is_validation());
        assert!(!TransportError::resolution("nowhere", "no such host").is_validation());
    }

    #[test]
    fn test_resolution_display() {
        let err = TransportError::resolution("watch.local", "no addresses found");
        assert_eq!(
            err.to_string(),
            "cannot resolve watch.local: no addresses found"
        );
    }
}
