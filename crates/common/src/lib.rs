//! Shared error taxonomy and wire types for the ECPay B2B e-invoice crates.

pub mod error;
pub mod protocol;

pub use error::{EcPayError, ErrorKind, SecretKind, ValidationError};
