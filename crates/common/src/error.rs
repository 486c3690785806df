//! Common error types shared across crates.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Which of the two shared secrets an [`EcPayError::InvalidKey`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    /// The AES key (`HashKey`).
    HashKey,
    /// The CBC initialisation vector (`HashIV`).
    HashIv,
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretKind::HashKey => f.write_str("HashKey"),
            SecretKind::HashIv => f.write_str("HashIV"),
        }
    }
}

/// Field-level validation failure raised by a command before anything is
/// encrypted or sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the offending vendor field, when the failure is tied to one.
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Build an error tied to `field`.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// The field is mandatory but empty.
    pub fn required(field: &str) -> Self {
        Self::new(field, format!("{field} cannot be empty."))
    }

    /// The field value is malformed.
    pub fn invalid(field: &str, reason: &str) -> Self {
        if reason.is_empty() {
            Self::new(field, format!("{field} is invalid."))
        } else {
            Self::new(field, format!("{field} is invalid: {reason}"))
        }
    }

    /// The field value exceeds `max` characters.
    pub fn too_long(field: &str, max: usize) -> Self {
        Self::new(field, format!("{field} cannot exceed {max} characters."))
    }

    /// The field value is not one of `allowed`.
    pub fn not_in_range(field: &str, allowed: &[&str]) -> Self {
        Self::new(
            field,
            format!("{field} must be one of: {}", allowed.join(", ")),
        )
    }
}

/// Coarse category of an [`EcPayError`], matching the protocol's error
/// taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Validation,
    PayloadStructure,
    PayloadData,
    Encryption,
    Decryption,
    InvalidResponse,
    Transport,
    Api,
}

/// Top-level client error type.
///
/// Everything except [`EcPayError::Api`] is a protocol or infrastructure
/// fault and is returned straight to the caller; the client never retries.
/// [`EcPayError::Api`] is only produced when the caller opts in through
/// `Response::raise_if_error`.
#[derive(Debug, Error)]
pub enum EcPayError {
    /// Client settings are missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A shared secret is empty or has the wrong length.
    #[error("{which} is empty or invalid: {reason}")]
    InvalidKey { which: SecretKind, reason: String },

    /// A command rejected its own field values.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The domain payload is not shaped like `{..., "Data": {...}}`.
    #[error("payload structure invalid: {0}")]
    PayloadStructure(String),

    /// The domain payload could not be serialised to JSON.
    #[error("payload data invalid: {0}")]
    PayloadData(String),

    /// The cipher refused to encrypt.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Bad base64, bad block length or bad padding on decrypt.
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Decrypted bytes or the reply body are not the JSON we expect.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Network failure, timeout, or a non-2xx HTTP status.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when a response was received at all.
        status: Option<u16>,
        message: String,
        /// Raw response body, kept for diagnostics.
        body: Option<String>,
    },

    /// The vendor answered with a non-success return code.
    #[error("api error {code}: {message}")]
    Api {
        code: i64,
        message: String,
        data: Value,
    },
}

impl EcPayError {
    /// Returns the taxonomy category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EcPayError::Configuration(_) | EcPayError::InvalidKey { .. } => {
                ErrorKind::Configuration
            }
            EcPayError::Validation(_) => ErrorKind::Validation,
            EcPayError::PayloadStructure(_) => ErrorKind::PayloadStructure,
            EcPayError::PayloadData(_) => ErrorKind::PayloadData,
            EcPayError::Encryption(_) => ErrorKind::Encryption,
            EcPayError::Decryption(_) => ErrorKind::Decryption,
            EcPayError::InvalidResponse(_) => ErrorKind::InvalidResponse,
            EcPayError::Transport { .. } => ErrorKind::Transport,
            EcPayError::Api { .. } => ErrorKind::Api,
        }
    }

    /// Shorthand for a transport failure that never produced a response.
    pub fn transport(message: impl Into<String>) -> Self {
        EcPayError::Transport {
            status: None,
            message: message.into(),
            body: None,
        }
    }
}
