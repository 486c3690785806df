//! rustls client configuration for the vendor endpoint.
//!
//! Trust anchors come from the bundled Mozilla root set, optionally extended
//! with extra PEM roots (e.g. a corporate proxy CA). Certificate verification
//! can be switched off per transport instance for staging hosts with broken
//! chains; handshake signatures are still checked in that mode.

use std::io::BufReader;
use std::sync::Arc;

use einvoice_common::EcPayError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};

/// TLS settings owned by a single transport.
#[derive(Debug, Clone)]
pub struct TlsOptions {
    /// Verify the server certificate chain and hostname.
    pub verify: bool,
    /// Additional PEM-encoded trust anchors.
    pub extra_roots_pem: Option<Vec<u8>>,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            verify: true,
            extra_roots_pem: None,
        }
    }
}

/// Build a [`rustls::ClientConfig`] from `options`.
///
/// # Errors
///
/// Returns [`EcPayError::Configuration`] if the extra roots cannot be parsed
/// or rustls rejects the configuration.
pub fn build_client_config(options: &TlsOptions) -> Result<ClientConfig, EcPayError> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()
        .map_err(|e| EcPayError::Configuration(format!("TLS protocol versions: {e}")))?;

    let config = if options.verify {
        builder
            .with_root_certificates(root_store(options.extra_roots_pem.as_deref())?)
            .with_no_client_auth()
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert { provider }))
            .with_no_client_auth()
    };
    Ok(config)
}

fn root_store(extra_pem: Option<&[u8]>) -> Result<RootCertStore, EcPayError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    if let Some(pem) = extra_pem {
        let certs = rustls_pemfile::certs(&mut BufReader::new(pem))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EcPayError::Configuration(format!("failed to parse CA bundle: {e}")))?;
        if certs.is_empty() {
            return Err(EcPayError::Configuration(
                "CA bundle contains no certificates".into(),
            ));
        }
        for cert in certs {
            roots
                .add(cert)
                .map_err(|e| EcPayError::Configuration(format!("rejected CA certificate: {e}")))?;
        }
    }
    Ok(roots)
}

/// Accepts any server certificate; signatures are still verified.
#[derive(Debug)]
struct AcceptAnyServerCert {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyServerCert {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
