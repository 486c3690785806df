use einvoice_common::protocol::{RqHeader, MERCHANT_ID_KEY};
use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use super::{Command, PayloadBuilder};

/// Any endpoint, with a caller-supplied `Data` object.
///
/// No field rules are applied beyond the merchant identifier. Used by the
/// command-line tool and for endpoints without a typed command.
#[derive(Debug, Clone)]
pub struct RawCommand {
    path: String,
    builder: PayloadBuilder,
}

impl RawCommand {
    /// `path` gets a leading `/` if it lacks one. `MerchantID` inside `data`
    /// is overwritten with `merchant_id`.
    pub fn new(merchant_id: &str, path: &str, data: Map<String, Value>) -> Self {
        let path = path.trim();
        let path = if path.starts_with('/') {
            path.to_owned()
        } else {
            format!("/{path}")
        };
        let mut builder = PayloadBuilder::new(merchant_id);
        for (key, value) in data {
            if key != MERCHANT_ID_KEY {
                builder.set(&key, value);
            }
        }
        Self { path, builder }
    }

    /// Parse `data` from JSON text; it must be an object.
    pub fn from_json(merchant_id: &str, path: &str, data: &str) -> Result<Self, ValidationError> {
        match serde_json::from_str::<Value>(data) {
            Ok(Value::Object(map)) => Ok(Self::new(merchant_id, path, map)),
            Ok(_) => Err(ValidationError::invalid("Data", "must be a JSON object")),
            Err(e) => Err(ValidationError::invalid("Data", &e.to_string())),
        }
    }

    /// Send `header` instead of a fresh timestamp.
    pub fn with_header(mut self, header: RqHeader) -> Self {
        self.builder.pin_header(header);
        self
    }
}

impl Command for RawCommand {
    fn transport_path(&self) -> &str {
        &self.path
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        if self.path.len() <= 1 {
            return Err(ValidationError::required("path"));
        }
        self.builder.require_merchant()?;
        Ok(self.builder.build())
    }
}
