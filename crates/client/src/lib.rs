//! ECPay B2B e-invoice client.
//!
//! ```text
//! Command ─► PayloadBuilder ─► PayloadEnvelope ─► Transport ─► PayloadEnvelope ─► Response
//!            {MerchantID,       encrypt Data       POST JSON     decrypt Data
//!             RqHeader, Data}
//! ```
//!
//! [`EcPayClient::send`] drives one round trip. Operations live in
//! [`command`]; the cipher and the URL-encoding fix-ups live in [`crypto`]
//! and [`encoding`].

pub mod command;
pub mod crypto;
pub mod dispatcher;
pub mod encoding;
pub mod envelope;
pub mod response;
pub mod settings;
pub mod transport;

pub use crypto::CipherService;
pub use dispatcher::EcPayClient;
pub use einvoice_common::protocol::{RqHeader, TransportReply};
pub use einvoice_common::{EcPayError, ErrorKind, SecretKind, ValidationError};
pub use envelope::PayloadEnvelope;
pub use response::Response;
pub use settings::ClientSettings;
pub use transport::{HttpsTransport, TlsOptions, Transport};
