//! Bidirectional bridge between domain payloads and the wire envelope.
//!
//! # Encode
//!
//! ```text
//! Data (JSON object) ─► compact JSON ─► url_escape ─► to_net_compatible ─► AES ─► base64
//! ```
//!
//! # Decode
//!
//! ```text
//! base64 ─► AES ─► url_unescape ─► JSON validity check ─► object
//! ```
//!
//! The validity check runs before parsing into a map. A key/IV mismatch that
//! happens to pass the padding check yields garbage bytes, and those must
//! surface as [`EcPayError::InvalidResponse`] rather than as misleading
//! field values.

use einvoice_common::protocol::DATA_KEY;
use einvoice_common::EcPayError;
use serde::de::IgnoredAny;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::crypto::CipherService;
use crate::encoding::{to_net_compatible, url_escape, url_unescape};

/// Encodes outbound payloads and decodes inbound `Data` fields.
#[derive(Clone, Debug)]
pub struct PayloadEnvelope {
    cipher: CipherService,
}

impl PayloadEnvelope {
    /// Construct a [`PayloadEnvelope`] around an existing cipher.
    pub fn new(cipher: CipherService) -> Self {
        Self { cipher }
    }

    /// Build an envelope straight from the merchant's HashKey and HashIV.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::InvalidKey`] if either secret is unusable.
    pub fn from_secrets(hash_key: &str, hash_iv: &str) -> Result<Self, EcPayError> {
        Ok(Self::new(CipherService::new(hash_key, hash_iv)?))
    }

    /// Turn a domain payload into its wire form.
    ///
    /// Every top-level field is kept as is, except `Data`, which is replaced
    /// by its encrypted string.
    ///
    /// # Errors
    ///
    /// - [`EcPayError::PayloadData`] if the payload cannot be represented as JSON.
    /// - [`EcPayError::PayloadStructure`] if it is not an object, or has no
    ///   (or a null) `Data` block.
    /// - [`EcPayError::Encryption`] if the cipher fails.
    pub fn encode_payload<T>(&self, payload: &T) -> Result<Map<String, Value>, EcPayError>
    where
        T: Serialize + ?Sized,
    {
        let value =
            serde_json::to_value(payload).map_err(|e| EcPayError::PayloadData(e.to_string()))?;
        let Value::Object(mut envelope) = value else {
            return Err(EcPayError::PayloadStructure(
                "payload must be a JSON object".into(),
            ));
        };

        let data = match envelope.get(DATA_KEY) {
            Some(Value::Null) | None => {
                return Err(EcPayError::PayloadStructure("missing Data block".into()))
            }
            Some(data) => data,
        };

        let json =
            serde_json::to_string(data).map_err(|e| EcPayError::PayloadData(e.to_string()))?;
        let escaped = to_net_compatible(&url_escape(&json));
        let ciphertext = self.cipher.encrypt(escaped.as_bytes())?;

        envelope.insert(DATA_KEY.to_owned(), Value::String(ciphertext));
        Ok(envelope)
    }

    /// Decrypt an inbound `Data` string back into its JSON object.
    ///
    /// # Errors
    ///
    /// - [`EcPayError::Decryption`] on malformed base64 or a cipher/padding failure.
    /// - [`EcPayError::InvalidResponse`] if the decrypted text is not valid
    ///   JSON, or is valid JSON but not an object.
    pub fn decode_data(&self, ciphertext: &str) -> Result<Map<String, Value>, EcPayError> {
        let decrypted = self.cipher.decrypt(ciphertext)?;
        let json = url_unescape(&decrypted);

        if serde_json::from_slice::<IgnoredAny>(&json).is_err() {
            return Err(EcPayError::InvalidResponse(
                "response JSON malformed".into(),
            ));
        }

        match serde_json::from_slice::<Value>(&json) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(EcPayError::InvalidResponse(
                "response JSON is not an object".into(),
            )),
            Err(e) => Err(EcPayError::InvalidResponse(e.to_string())),
        }
    }

    /// Returns `true` if `reply` carries a `Data` string that decodes cleanly.
    pub fn verify_response(&self, reply: &Value) -> bool {
        reply
            .get(DATA_KEY)
            .and_then(Value::as_str)
            .is_some_and(|data| self.decode_data(data).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use einvoice_common::ErrorKind;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;

    const HASH_KEY: &str = "ejCk326UnaZWKisg";
    const HASH_IV: &str = "q9jcZX8Ib9LM8wYk";

    fn envelope() -> PayloadEnvelope {
        PayloadEnvelope::from_secrets(HASH_KEY, HASH_IV).unwrap()
    }

    fn round_trip(data: Value) -> Map<String, Value> {
        let env = envelope();
        let encoded = env
            .encode_payload(&json!({"MerchantID": "2000132", "Data": data}))
            .unwrap();
        env.decode_data(encoded["Data"].as_str().unwrap()).unwrap()
    }

    #[test]
    fn success_round_trip() {
        let env = envelope();
        let payload = json!({
            "MerchantID": "2000132",
            "Data": {"MerchantID": "2000132", "RelateNumber": "TEST1"}
        });
        let encoded = env.encode_payload(&payload).unwrap();
        let data = encoded["Data"].as_str().unwrap();
        assert!(!data.is_empty());
        assert!(STANDARD.decode(data).is_ok());

        let decoded = env.decode_data(data).unwrap();
        assert_eq!(
            Value::Object(decoded),
            json!({"MerchantID": "2000132", "RelateNumber": "TEST1"})
        );
    }

    #[test]
    fn matches_vendor_ciphertext() {
        let payload = json!({
            "MerchantID": "2000132",
            "Data": {"MerchantID": "2000132", "RelateNumber": "TEST1"}
        });
        let encoded = envelope().encode_payload(&payload).unwrap();
        assert_eq!(
            encoded["Data"],
            "XeEOdHpTRvxKEqs/JD9RSd16s7VtpyWVCN6AV44pKTV7XoPByaStato0iqOI39rIzxWPsZM6abp21UZQ+Zle22NAWkbqudqpnvaR+4TuO8M="
        );
    }

    #[test]
    fn other_top_level_fields_untouched() {
        let env = envelope();
        let payload = json!({
            "MerchantID": "2000132",
            "RqHeader": {"Timestamp": 1_700_000_000},
            "Data": {"RelateNumber": "X"}
        });
        let encoded = env.encode_payload(&payload).unwrap();
        assert_eq!(encoded["MerchantID"], "2000132");
        assert_eq!(encoded["RqHeader"], json!({"Timestamp": 1_700_000_000}));
        let keys: Vec<&str> = encoded.keys().map(String::as_str).collect();
        assert_eq!(keys, ["MerchantID", "RqHeader", "Data"]);
    }

    #[test]
    fn empty_data_round_trips() {
        assert!(round_trip(json!({})).is_empty());
    }

    #[test]
    fn cjk_and_reserved_characters_round_trip() {
        let data = json!({
            "Buyer_Name": "綠界科技股份有限公司",
            "MainRemark": "a-b_c.d!e*f(g)h +%&=?/\\\"",
            "Items": [{"ItemName": "測試商品", "ItemPrice": 100.5, "ItemCount": 2}]
        });
        assert_eq!(Value::Object(round_trip(data.clone())), data);
    }

    #[test]
    fn deterministic_for_same_input() {
        let env = envelope();
        let payload = json!({"Data": {"a": 1}});
        assert_eq!(
            env.encode_payload(&payload).unwrap(),
            env.encode_payload(&payload).unwrap()
        );
    }

    #[test]
    fn missing_data_is_structure_error() {
        let err = envelope()
            .encode_payload(&json!({"MerchantID": "2000132"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadStructure);
        assert!(err.to_string().contains("missing Data block"));
    }

    #[test]
    fn null_data_is_structure_error() {
        let err = envelope()
            .encode_payload(&json!({"Data": null}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadStructure);
    }

    #[test]
    fn non_object_payload_is_structure_error() {
        let err = envelope().encode_payload(&json!(["Data"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadStructure);
    }

    #[test]
    fn unserialisable_payload_is_data_error() {
        let mut bad = HashMap::new();
        bad.insert((1u8, 2u8), "tuple keys cannot be JSON object keys");
        let mut payload = HashMap::new();
        payload.insert("Data", bad);
        let err = envelope().encode_payload(&payload).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadData);
    }

    #[test]
    fn malformed_base64_is_decryption_error() {
        let err = envelope().decode_data("not-valid-base64!!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decryption);
    }

    #[test]
    fn non_json_plaintext_is_invalid_response() {
        let cipher = CipherService::new(HASH_KEY, HASH_IV).unwrap();
        let ciphertext = cipher.encrypt(b"%7Btruncated").unwrap();
        let err = envelope().decode_data(&ciphertext).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn json_scalar_is_invalid_response() {
        let cipher = CipherService::new(HASH_KEY, HASH_IV).unwrap();
        let ciphertext = cipher.encrypt(b"123").unwrap();
        let err = envelope().decode_data(&ciphertext).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidResponse);
    }

    #[test]
    fn tampering_never_yields_a_mapping() {
        let env = envelope();
        let encoded = env
            .encode_payload(&json!({"Data": {
                "MerchantID": "2000132",
                "RelateNumber": "TEST1",
                "InvoiceDate": "2024-01-15"
            }}))
            .unwrap();
        let sent = encoded["Data"].as_str().unwrap().to_owned();
        let mut raw = STANDARD.decode(&sent).unwrap();

        for i in 0..raw.len() {
            raw[i] ^= 0x01;
            let tampered = STANDARD.encode(&raw);
            raw[i] ^= 0x01;

            let err = env.decode_data(&tampered).unwrap_err();
            assert!(
                matches!(err.kind(), ErrorKind::Decryption | ErrorKind::InvalidResponse),
                "byte {i}: unexpected {err:?}"
            );
        }
    }

    #[test]
    fn verify_response_checks_data() {
        let env = envelope();
        let encoded = env.encode_payload(&json!({"Data": {"RtnCode": 1}})).unwrap();
        assert!(env.verify_response(&json!({"Data": encoded["Data"]})));
        assert!(!env.verify_response(&json!({"Data": "invalid_encrypted_data"})));
        assert!(!env.verify_response(&json!({"Data": null})));
        assert!(!env.verify_response(&json!({})));
    }

    proptest! {
        #[test]
        fn string_mappings_round_trip(
            fields in proptest::collection::hash_map(any::<String>(), any::<String>(), 0..8)
        ) {
            let data: Map<String, Value> = fields
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            prop_assert_eq!(round_trip(Value::Object(data.clone())), data);
        }
    }
}
