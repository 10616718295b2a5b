//! Error types for HROSC

use thiserror::Error;

/// Result type alias for HROSC encoding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Validation errors raised before any byte leaves the process
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Address pattern does not start with `/`
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Type tag does not start with `,` or names an unsupported/mismatched type
    #[error("invalid type tag: {0}")]
    InvalidTypeTag(String),

    /// A string field contains a byte that cannot be sent as an OSC string
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}
