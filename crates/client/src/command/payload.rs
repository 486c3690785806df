//! The domain payload every command wraps.

use chrono::Utc;
use einvoice_common::protocol::{RqHeader, DATA_KEY, HEADER_KEY, MERCHANT_ID_KEY};
use einvoice_common::ValidationError;
use serde_json::{Map, Value};

/// Ordered `{MerchantID, RqHeader, Data}` payload under construction.
///
/// Commands write their fields into `Data` through [`PayloadBuilder::set`]
/// and read them back when validating. The merchant identifier is mirrored
/// into `Data.MerchantID`, as the vendor requires it on both levels.
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadBuilder {
    merchant_id: String,
    data: Map<String, Value>,
    header: Option<RqHeader>,
}

impl PayloadBuilder {
    /// Construct a [`PayloadBuilder`] whose `Data` starts with `MerchantID`.
    pub fn new(merchant_id: &str) -> Self {
        let merchant_id = merchant_id.trim().to_owned();
        let mut data = Map::new();
        data.insert(
            MERCHANT_ID_KEY.to_owned(),
            Value::String(merchant_id.clone()),
        );
        Self {
            merchant_id,
            data,
            header: None,
        }
    }

    /// Trimmed merchant identifier.
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Insert or overwrite a `Data` field. Insertion order is kept.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(key.to_owned(), value.into());
    }

    /// Raw value of a `Data` field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// String value of a `Data` field; empty when absent or not a string.
    pub fn str(&self, key: &str) -> &str {
        self.data.get(key).and_then(Value::as_str).unwrap_or_default()
    }

    /// `true` when the field is absent, null, an empty string or an empty
    /// array. Numeric zero is a value, not blank.
    pub fn is_blank(&self, key: &str) -> bool {
        match self.data.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(Value::Array(a)) => a.is_empty(),
            Some(_) => false,
        }
    }

    /// Fail with `<key> cannot be empty.` if the field is blank.
    pub fn require(&self, key: &str) -> Result<(), ValidationError> {
        if self.is_blank(key) {
            return Err(ValidationError::required(key));
        }
        Ok(())
    }

    /// Check the merchant identifier is present on both levels.
    pub fn require_merchant(&self) -> Result<(), ValidationError> {
        if self.merchant_id.is_empty() || self.is_blank(MERCHANT_ID_KEY) {
            return Err(ValidationError::required(MERCHANT_ID_KEY));
        }
        Ok(())
    }

    /// Pin the request header instead of stamping the current time.
    pub fn pin_header(&mut self, header: RqHeader) {
        self.header = Some(header);
    }

    /// The `Data` block built so far.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Assemble the full payload. The timestamp is taken now unless a header
    /// was pinned.
    pub fn build(&self) -> Map<String, Value> {
        let header = self
            .header
            .unwrap_or_else(|| RqHeader::at(Utc::now().timestamp()));
        let mut payload = Map::new();
        payload.insert(
            MERCHANT_ID_KEY.to_owned(),
            Value::String(self.merchant_id.clone()),
        );
        payload.insert(HEADER_KEY.to_owned(), header.into());
        payload.insert(DATA_KEY.to_owned(), Value::Object(self.data.clone()));
        payload
    }
}
