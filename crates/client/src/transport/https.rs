//! HTTP/1.1 transport over hyper with a rustls connector.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use einvoice_common::EcPayError;
use http_body_util::{BodyExt, Full};
use hyper::header::{CONTENT_TYPE, USER_AGENT};
use hyper::{Method, Request};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use super::tls::{build_client_config, TlsOptions};
use super::Transport;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const AGENT: &str = concat!("einvoice-b2b/", env!("CARGO_PKG_VERSION"));

/// Pooled HTTPS client. Plain `http://` URLs are accepted as well.
#[derive(Clone)]
pub struct HttpsTransport {
    client: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
}

impl std::fmt::Debug for HttpsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpsTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpsTransport {
    /// Build a transport with its own TLS configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::Configuration`] if the TLS configuration is
    /// rejected or `timeout` is zero.
    pub fn new(tls: &TlsOptions, timeout: Duration) -> Result<Self, EcPayError> {
        if timeout.is_zero() {
            return Err(EcPayError::Configuration("timeout must be > 0".into()));
        }
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(build_client_config(tls)?)
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client, timeout })
    }

    /// Per-request deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn round_trip(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, EcPayError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, AGENT)
            .body(Full::new(Bytes::from(body)))
            .map_err(|e| EcPayError::transport(format!("invalid request: {e}")))?;

        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| EcPayError::transport(format!("request failed: {e}")))?;

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .map_err(|e| EcPayError::Transport {
                status: Some(status.as_u16()),
                message: format!("failed to read response body: {e}"),
                body: None,
            })?
            .to_bytes();

        if !status.is_success() {
            return Err(EcPayError::Transport {
                status: Some(status.as_u16()),
                message: format!("HTTP {status}"),
                body: Some(String::from_utf8_lossy(&bytes).into_owned()),
            });
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpsTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, EcPayError> {
        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.round_trip(url, body))
            .await
            .map_err(|_| {
                EcPayError::transport(format!("request timed out after {:?}", self.timeout))
            })?;

        tracing::debug!(
            url,
            ok = result.is_ok(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "vendor round trip"
        );
        result
    }
}
