//! Wire types exchanged with the ECPay B2B e-invoice endpoints.
//!
//! Request envelope (HTTP POST body, `Content-Type: application/json`):
//!
//! ```text
//! {
//!   "MerchantID": "<plain identifier>",
//!   "RqHeader":   { "Timestamp": <unix-seconds> },
//!   "Data":       "<base64 ciphertext>"
//! }
//! ```
//!
//! The reply is either a transport-level rejection carrying
//! `TransCode`/`TransMsg`, or an encrypted `Data` string.

use serde::{Deserialize, Serialize};

/// Top-level key holding the merchant identifier.
pub const MERCHANT_ID_KEY: &str = "MerchantID";
/// Top-level key holding the request header.
pub const HEADER_KEY: &str = "RqHeader";
/// Top-level key holding the business payload (plain before encoding,
/// ciphertext after).
pub const DATA_KEY: &str = "Data";
/// Return code key inside a decrypted reply.
pub const RTN_CODE_KEY: &str = "RtnCode";
/// Return message key inside a decrypted reply.
pub const RTN_MSG_KEY: &str = "RtnMsg";

/// The single return code the vendor defines as success.
pub const SUCCESS_CODE: i64 = 1;

// ---------------------------------------------------------------------------
// Request header
// ---------------------------------------------------------------------------

/// Per-request header. The timestamp is a freshness marker, not a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RqHeader {
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
}

impl RqHeader {
    /// Header stamped with the given UNIX time in seconds.
    pub fn at(timestamp: i64) -> Self {
        Self { timestamp }
    }
}

impl From<RqHeader> for serde_json::Value {
    fn from(header: RqHeader) -> Self {
        serde_json::json!({ "Timestamp": header.timestamp })
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// Raw reply body as returned by the vendor, before any decryption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportReply {
    #[serde(rename = "TransCode", default, skip_serializing_if = "Option::is_none")]
    pub trans_code: Option<i64>,

    #[serde(rename = "TransMsg", default, skip_serializing_if = "Option::is_none")]
    pub trans_msg: Option<String>,

    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl TransportReply {
    /// The encrypted payload, if the reply carries a non-empty one.
    pub fn encrypted_data(&self) -> Option<&str> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_serialises_with_vendor_key() {
        let v = serde_json::to_value(RqHeader::at(1_700_000_000)).unwrap();
        assert_eq!(v, json!({"Timestamp": 1_700_000_000}));
        assert_eq!(serde_json::Value::from(RqHeader::at(1_700_000_000)), v);
    }

    #[test]
    fn rejection_reply_has_no_data() {
        let reply: TransportReply =
            serde_json::from_value(json!({"TransCode": 999, "TransMsg": "bad merchant"})).unwrap();
        assert_eq!(reply.trans_code, Some(999));
        assert!(reply.encrypted_data().is_none());
    }

    #[test]
    fn empty_and_null_data_are_absent() {
        let reply: TransportReply =
            serde_json::from_value(json!({"TransCode": 1, "Data": ""})).unwrap();
        assert!(reply.encrypted_data().is_none());

        let reply: TransportReply = serde_json::from_value(json!({"Data": null})).unwrap();
        assert!(reply.encrypted_data().is_none());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let reply: TransportReply = serde_json::from_value(json!({
            "MerchantID": "2000132",
            "RpHeader": {"Timestamp": 1},
            "TransCode": 1,
            "TransMsg": "Success",
            "Data": "abc="
        }))
        .unwrap();
        assert_eq!(reply.encrypted_data(), Some("abc="));
    }
}
