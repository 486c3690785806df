//! AES-128-CBC payload encryption primitives.
//!
//! This module is free of HTTP and JSON concerns. It provides the low-level
//! encrypt/decrypt operations used by the envelope layer.
//!
//! # Ciphertext format
//!
//! ```text
//! base64-standard(aes-128-cbc-pkcs7(plaintext, HashKey, HashIV))
//! ```

pub mod cipher;

pub use cipher::{CipherService, KEY_LEN};
