//! AES-128-CBC/PKCS#7 encryption keyed by the merchant's HashKey/HashIV.
//!
//! **Algorithm choice is not ours:** the vendor mandates AES-128 in CBC mode
//! with PKCS#7 padding, and uses the shared HashIV as a fixed IV. Output is
//! therefore deterministic for a given (plaintext, key, iv).
//!
//! A fresh cipher instance is built for every call, so a [`CipherService`]
//! holds no mutable state and can be shared freely across tasks.

use aes::Aes128;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use einvoice_common::{EcPayError, SecretKind};
use thiserror::Error;

/// Byte length of an AES-128 key (16 bytes = 128 bits).
pub const KEY_LEN: usize = 16;

/// Byte length of the CBC IV (one AES block).
pub const IV_LEN: usize = 16;

/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Key or IV is not usable by the block cipher.
    #[error("invalid key or iv length")]
    InvalidKeyLength,

    /// Decrypt input was empty.
    #[error("data is empty")]
    Empty,

    /// Decrypt input was not strict standard base64.
    #[error("base64 decoding failed")]
    Base64,

    /// Ciphertext length is not a whole number of blocks.
    #[error("ciphertext length {0} is not a multiple of {BLOCK_LEN}")]
    BlockLength(usize),

    /// PKCS#7 padding did not validate after decryption.
    #[error("aes decryption failed")]
    Padding,
}

/// Fixed-size secret buffer.
///
/// Zeroed on drop; never printed, not even by `Debug`.
#[derive(Clone)]
struct SecretBytes([u8; KEY_LEN]);

impl Drop for SecretBytes {
    fn drop(&mut self) {
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretBytes([REDACTED])")
    }
}

/// Symmetric encrypt/decrypt with the merchant's shared secrets.
#[derive(Clone, Debug)]
pub struct CipherService {
    key: SecretBytes,
    iv: SecretBytes,
}

impl CipherService {
    /// Build a cipher service from the merchant's HashKey and HashIV.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::InvalidKey`] if either secret is empty or is not
    /// exactly 16 bytes.
    pub fn new(hash_key: impl AsRef<[u8]>, hash_iv: impl AsRef<[u8]>) -> Result<Self, EcPayError> {
        Ok(Self {
            key: secret(hash_key.as_ref(), SecretKind::HashKey)?,
            iv: secret(hash_iv.as_ref(), SecretKind::HashIv)?,
        })
    }

    /// Encrypt `plaintext` and return the base64 of the raw ciphertext.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::Encryption`] if the cipher cannot be initialised.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String, EcPayError> {
        let cipher = Aes128CbcEnc::new_from_slices(&self.key.0, &self.iv.0)
            .map_err(|_| EcPayError::Encryption(CipherError::InvalidKeyLength.to_string()))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
        Ok(STANDARD.encode(ciphertext))
    }

    /// Decode base64 `text` and decrypt it back to plaintext bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::Decryption`] on empty input, malformed base64
    /// (decoding is strict), a ciphertext that is not block-aligned, or a
    /// padding failure (typically a key/IV mismatch or tampering).
    pub fn decrypt(&self, text: &str) -> Result<Vec<u8>, EcPayError> {
        self.decrypt_raw(text)
            .map_err(|e| EcPayError::Decryption(e.to_string()))
    }

    fn decrypt_raw(&self, text: &str) -> Result<Vec<u8>, CipherError> {
        if text.is_empty() {
            return Err(CipherError::Empty);
        }
        let ciphertext = STANDARD.decode(text).map_err(|_| CipherError::Base64)?;
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CipherError::BlockLength(ciphertext.len()));
        }
        let cipher = Aes128CbcDec::new_from_slices(&self.key.0, &self.iv.0)
            .map_err(|_| CipherError::InvalidKeyLength)?;
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CipherError::Padding)
    }
}

fn secret(bytes: &[u8], which: SecretKind) -> Result<SecretBytes, EcPayError> {
    if bytes.is_empty() {
        return Err(EcPayError::InvalidKey {
            which,
            reason: "must not be empty".into(),
        });
    }
    let buf: [u8; KEY_LEN] = bytes.try_into().map_err(|_| EcPayError::InvalidKey {
        which,
        reason: format!("expected {KEY_LEN} bytes, got {}", bytes.len()),
    })?;
    Ok(SecretBytes(buf))
}
