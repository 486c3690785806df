//! Configuration loading and validation for the `einvoice-b2b` command.
//!
//! Every value comes from an `ECPAY_EINVOICE_B2B_*` environment variable.

use anyhow::{Context, Result};
use einvoice_b2b::ClientSettings;
use serde::Deserialize;

const ENV_PREFIX: &str = "ECPAY_EINVOICE_B2B";

/// Validated command configuration.
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Base server URL.
    #[serde(default = "default_server")]
    pub server: String,

    /// Merchant identifier sent with every request. **Required.**
    pub merchant_id: String,

    /// Merchant HashKey, 16 bytes. **Required.**
    pub hash_key: String,

    /// Merchant HashIV, 16 bytes. **Required.**
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

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
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
fn default_log_level() -> String {
    "warn".into()
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("merchant_id", &self.merchant_id)
            .field("hash_key", &"[REDACTED]")
            .field("hash_iv", &"[REDACTED]")
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout_secs", &self.timeout_secs)
            .field("ca_bundle_path", &self.ca_bundle_path)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build einvoice-b2b configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise einvoice-b2b configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.server, "SERVER")?;
        ensure_non_empty(&self.merchant_id, "MERCHANT_ID")?;
        ensure_non_empty(&self.hash_key, "HASH_KEY")?;
        ensure_non_empty(&self.hash_iv, "HASH_IV")?;
        if self.timeout_secs == 0 {
            anyhow::bail!("{ENV_PREFIX}_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }

    /// Client settings derived from this configuration.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            server: self.server.clone(),
            hash_key: self.hash_key.clone(),
            hash_iv: self.hash_iv.clone(),
            verify_ssl: self.verify_ssl,
            timeout_secs: self.timeout_secs,
            ca_bundle_path: self.ca_bundle_path.clone(),
        }
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{ENV_PREFIX}_{name} is required and must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: default_server(),
            merchant_id: "2000132".into(),
            hash_key: "ejCk326UnaZWKisg".into(),
            hash_iv: "q9jcZX8Ib9LM8wYk".into(),
            verify_ssl: true,
            timeout_secs: 30,
            ca_bundle_path: None,
            log_level: "warn".into(),
        }
    }

    #[test]
    fn defaults() {
        assert_eq!(default_server(), "https://einvoice-stage.ecpay.com.tw");
        assert!(default_verify_ssl());
        assert_eq!(default_timeout_secs(), 30);
        assert_eq!(default_log_level(), "warn");
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_merchant_id() {
        let cfg = Config {
            merchant_id: "  ".into(),
            ..config()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("ECPAY_EINVOICE_B2B_MERCHANT_ID"));
    }

    #[test]
    fn validate_rejects_empty_secrets() {
        let cfg = Config {
            hash_iv: String::new(),
            ..config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let cfg = Config {
            timeout_secs: 0,
            ..config()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn debug_redacts_secrets() {
        let out = format!("{:?}", config());
        assert!(!out.contains("ejCk326UnaZWKisg"));
        assert!(out.contains("2000132"));
    }

    #[test]
    fn client_settings_carry_over() {
        let cfg = Config {
            verify_ssl: false,
            ca_bundle_path: Some("/etc/ssl/extra.pem".into()),
            ..config()
        };
        let s = cfg.client_settings();
        assert!(!s.verify_ssl);
        assert_eq!(s.hash_key, "ejCk326UnaZWKisg");
        assert_eq!(s.ca_bundle_path.as_deref(), Some("/etc/ssl/extra.pem"));
    }
}
