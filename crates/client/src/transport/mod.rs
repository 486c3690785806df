//! The seam between the protocol core and the network.
//!
//! The dispatcher only ever calls [`Transport::post_json`]. Connection
//! pooling, TLS and timeouts live behind it, so tests can swap in a mock and
//! callers can plug in their own client.

pub mod https;
pub mod tls;

use async_trait::async_trait;
use einvoice_common::EcPayError;

pub use https::HttpsTransport;
pub use tls::TlsOptions;

/// Sends one JSON body and returns the raw reply bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `url` with `Content-Type: application/json`.
    ///
    /// # Errors
    ///
    /// Implementations return [`EcPayError::Transport`] on network failure,
    /// timeout, or a non-2xx status (keeping the body when one was read).
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, EcPayError>;
}
