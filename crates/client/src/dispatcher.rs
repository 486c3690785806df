//! One round trip per call: payload, envelope, transport, reply, response.
//!
//! The client holds nothing but the base URL, the envelope (shared secrets)
//! and the transport, all read-only after construction, so a single instance
//! can be shared across tasks.

use einvoice_common::protocol::TransportReply;
use einvoice_common::EcPayError;
use serde_json::Value;
use tracing::debug;

use crate::command::Command;
use crate::envelope::PayloadEnvelope;
use crate::response::Response;
use crate::settings::ClientSettings;
use crate::transport::{HttpsTransport, Transport};

/// Sends [`Command`]s to the vendor and decodes the replies.
#[derive(Debug, Clone)]
pub struct EcPayClient<T = HttpsTransport> {
    base_url: String,
    envelope: PayloadEnvelope,
    transport: T,
}

impl EcPayClient<HttpsTransport> {
    /// Build a client with the bundled HTTPS transport.
    ///
    /// # Errors
    ///
    /// - [`EcPayError::Configuration`] if the settings are incomplete or the
    ///   TLS configuration cannot be built.
    /// - [`EcPayError::InvalidKey`] if HashKey or HashIV is unusable.
    pub fn new(settings: &ClientSettings) -> Result<Self, EcPayError> {
        settings.validate()?;
        let transport = HttpsTransport::new(&settings.tls_options()?, settings.timeout())?;
        Self::with_transport(
            &settings.server,
            &settings.hash_key,
            &settings.hash_iv,
            transport,
        )
    }
}

impl<T: Transport> EcPayClient<T> {
    /// Build a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// - [`EcPayError::Configuration`] if `base_url` is empty.
    /// - [`EcPayError::InvalidKey`] if HashKey or HashIV is unusable.
    pub fn with_transport(
        base_url: &str,
        hash_key: &str,
        hash_iv: &str,
        transport: T,
    ) -> Result<Self, EcPayError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(EcPayError::Configuration("server is required".into()));
        }
        Ok(Self {
            base_url: base_url.to_owned(),
            envelope: PayloadEnvelope::from_secrets(hash_key, hash_iv)?,
            transport,
        })
    }

    /// Server URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The envelope holding this merchant's cipher.
    pub fn envelope(&self) -> &PayloadEnvelope {
        &self.envelope
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn url_for(&self, path: &str) -> String {
        let path = path.trim();
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send `command` and decode the reply.
    ///
    /// A vendor-side business failure is not an error here; inspect
    /// [`Response::is_success`] or call [`Response::raise_if_error`].
    ///
    /// # Errors
    ///
    /// - [`EcPayError::Validation`] if the command rejects its own fields.
    /// - [`EcPayError::PayloadStructure`] / [`EcPayError::PayloadData`] /
    ///   [`EcPayError::Encryption`] while building the envelope.
    /// - [`EcPayError::Transport`] from the transport.
    /// - [`EcPayError::InvalidResponse`] if the reply body is not the
    ///   expected JSON, or [`EcPayError::Decryption`] if its `Data` does not
    ///   decrypt.
    pub async fn send<C>(&self, command: &C) -> Result<Response, EcPayError>
    where
        C: Command + ?Sized,
    {
        let payload = command.payload()?;
        let path = command.transport_path();
        let url = self.url_for(path);

        let envelope = self.envelope.encode_payload(&payload)?;
        let body = serde_json::to_vec(&envelope)
            .map_err(|e| EcPayError::PayloadData(e.to_string()))?;

        let raw = self.transport.post_json(&url, body).await?;
        let reply: TransportReply = serde_json::from_slice(&raw)
            .map_err(|e| EcPayError::InvalidResponse(format!("reply body: {e}")))?;

        debug!(
            path,
            trans_code = reply.trans_code,
            encrypted = reply.encrypted_data().is_some(),
            "vendor reply received"
        );

        match reply.encrypted_data() {
            Some(data) => Ok(Response::new(self.envelope.decode_data(data)?)),
            None => Ok(Response::from_status(
                reply.trans_code.unwrap_or(0),
                reply.trans_msg.unwrap_or_default(),
            )),
        }
    }

    /// See [`PayloadEnvelope::verify_response`].
    pub fn verify_response(&self, reply: &Value) -> bool {
        self.envelope.verify_response(reply)
    }
}
