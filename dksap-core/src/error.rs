//! Error types for DKSAP.
//!
//! Every fallible operation in the workspace returns [`DksapError`]. Derivations
//! fail fast: the first invalid scalar or point aborts the whole computation and
//! no partial output is produced.

use thiserror::Error;

/// Result type alias using `DksapError`.
pub type Result<T> = std::result::Result<T, DksapError>;

/// Main error type for all DKSAP operations.
#[derive(Debug, Error)]
pub enum DksapError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CRYPTOGRAPHIC ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Scalar is zero, not below the group order, or malformed.
    #[error("Invalid scalar: {0}")]
    InvalidScalar(String),

    /// Point is off-curve, the point at infinity, or malformed.
    #[error("Invalid point: {0}")]
    InvalidPoint(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // ENCODING ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Hashing, hex, or Base58 encoding/decoding failed.
    #[error("Encoding failure: {0}")]
    EncodingFailure(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Key or ephemeral record could not be stored or loaded.
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<hex::FromHexError> for DksapError {
    fn from(err: hex::FromHexError) -> Self {
        DksapError::EncodingFailure(format!("invalid hex: {err}"))
    }
}

impl DksapError {
    /// Returns true if this error comes from scalar or point validation.
    pub fn is_crypto_error(&self) -> bool {
        matches!(self, DksapError::InvalidScalar(_) | DksapError::InvalidPoint(_))
    }

    /// Returns true if this is an encoding error.
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            DksapError::EncodingFailure(_) | DksapError::JsonError(_)
        )
    }

    /// Returns true if this error came from the storage layer.
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            DksapError::PersistenceFailure(_) | DksapError::IoError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DksapError::InvalidScalar("scalar is zero".into());
        assert_eq!(err.to_string(), "Invalid scalar: scalar is zero");

        let err = DksapError::PersistenceFailure("missing line 2".into());
        assert!(err.to_string().contains("missing line 2"));
    }

    #[test]
    fn test_error_classification() {
        assert!(DksapError::InvalidScalar("x".into()).is_crypto_error());
        assert!(DksapError::InvalidPoint("x".into()).is_crypto_error());
        assert!(!DksapError::EncodingFailure("x".into()).is_crypto_error());

        assert!(DksapError::EncodingFailure("x".into()).is_encoding_error());
        assert!(!DksapError::ConfigError("x".into()).is_encoding_error());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(DksapError::from(io).is_persistence_error());
        assert!(DksapError::PersistenceFailure("x".into()).is_persistence_error());
    }

    #[test]
    fn test_hex_error_conversion() {
        let result: Result<Vec<u8>> = hex::decode("zz").map_err(DksapError::from);
        assert!(matches!(result, Err(DksapError::EncodingFailure(_))));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("invalid");
        let result: Result<serde_json::Value> = json_result.map_err(DksapError::from);
        assert!(matches!(result, Err(DksapError::JsonError(_))));
    }
}
