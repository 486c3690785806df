//! Client settings: server URL, shared secrets and TLS behaviour.
//!
//! Validated once when the client is built, never per call.

use std::time::Duration;

use einvoice_common::EcPayError;
use serde::Deserialize;

use crate::transport::TlsOptions;

/// Settings consumed by [`crate::EcPayClient::new`].
#[derive(Clone, Deserialize)]
pub struct ClientSettings {
    /// Base server URL, without the operation path.
    #[serde(default = "default_server")]
    pub server: String,

    /// Merchant HashKey. **Required.**
    pub hash_key: String,

    /// Merchant HashIV. **Required.**
    pub hash_iv: String,

    /// Verify the server certificate.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional PEM bundle of extra trusted roots.
    #[serde(default)]
    pub ca_bundle_path: Option<String>,
}

fn default_server() -> String {
    "https://einvoice-stage.ecpay.com.tw".into()
}
fn default_verify_ssl() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSettings")
            .field("server", &self.server)
            .field("hash_key", &"[REDACTED]")
            .field("hash_iv", &"[REDACTED]")
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout_secs", &self.timeout_secs)
            .field("ca_bundle_path", &self.ca_bundle_path)
            .finish()
    }
}

impl ClientSettings {
    /// Settings for `server` with the default TLS and timeout behaviour.
    pub fn new(server: &str, hash_key: &str, hash_iv: &str) -> Self {
        Self {
            server: server.to_owned(),
            hash_key: hash_key.to_owned(),
            hash_iv: hash_iv.to_owned(),
            verify_ssl: default_verify_ssl(),
            timeout_secs: default_timeout_secs(),
            ca_bundle_path: None,
        }
    }

    /// Check the fields that can be checked without touching the network.
    ///
    /// Secret lengths are checked by the cipher itself.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::Configuration`] on the first failure.
    pub fn validate(&self) -> Result<(), EcPayError> {
        let server = self.server.trim();
        if server.is_empty() {
            return Err(EcPayError::Configuration("server is required".into()));
        }
        if !(server.starts_with("https://") || server.starts_with("http://")) {
            return Err(EcPayError::Configuration(format!(
                "server must be an http(s) URL, got {server:?}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(EcPayError::Configuration("timeout_secs must be > 0".into()));
        }
        Ok(())
    }

    /// `timeout_secs` as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// TLS options, reading the CA bundle from disk when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::Configuration`] if the bundle cannot be read.
    pub fn tls_options(&self) -> Result<TlsOptions, EcPayError> {
        let extra_roots_pem = match self.ca_bundle_path.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(path) => Some(std::fs::read(path).map_err(|e| {
                EcPayError::Configuration(format!("failed to read CA bundle {path}: {e}"))
            })?),
        };
        Ok(TlsOptions {
            verify: self.verify_ssl,
            extra_roots_pem,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use einvoice_common::ErrorKind;

    fn settings() -> ClientSettings {
        ClientSettings::new(
            "https://einvoice-stage.ecpay.com.tw",
            "ejCk326UnaZWKisg",
            "q9jcZX8Ib9LM8wYk",
        )
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_server(), "https://einvoice-stage.ecpay.com.tw");
        assert!(default_verify_ssl());
        assert_eq!(default_timeout_secs(), 30);
    }

    #[test]
    fn deserialises_with_defaults() {
        let s: ClientSettings =
            serde_json::from_str(r#"{"hash_key":"k","hash_iv":"i"}"#).unwrap();
        assert_eq!(s.server, default_server());
        assert!(s.verify_ssl);
        assert_eq!(s.timeout(), Duration::from_secs(30));
        assert!(s.ca_bundle_path.is_none());
    }

    #[test]
    fn valid_settings_pass() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn bad_server_rejected() {
        let mut s = settings();
        s.server = "  ".into();
        assert_eq!(s.validate().unwrap_err().kind(), ErrorKind::Configuration);
        s.server = "ftp://example.com".into();
        assert!(s.validate().is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut s = settings();
        s.timeout_secs = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let out = format!("{:?}", settings());
        assert!(out.contains("[REDACTED]"));
        assert!(!out.contains("ejCk326UnaZWKisg"));
    }

    #[test]
    fn missing_bundle_is_configuration_error() {
        let mut s = settings();
        s.ca_bundle_path = Some("/nonexistent/ca.pem".into());
        assert_eq!(s.tls_options().unwrap_err().kind(), ErrorKind::Configuration);

        s.ca_bundle_path = Some(String::new());
        let tls = s.tls_options().unwrap();
        assert!(tls.verify);
        assert!(tls.extra_roots_pem.is_none());
    }
}
