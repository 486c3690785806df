//! Uniform result of one vendor round trip.

use einvoice_common::protocol::{RTN_CODE_KEY, RTN_MSG_KEY, SUCCESS_CODE};
use einvoice_common::EcPayError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Decoded vendor reply.
///
/// A non-success code is a plain value here, not an error. Callers either
/// branch on [`Response::is_success`] or opt into an error with
/// [`Response::raise_if_error`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Response {
    data: Map<String, Value>,
}

impl Response {
    /// Construct a [`Response`] from a decoded `Data` object.
    pub fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Build a reply from a bare code and message (no business payload).
    pub fn from_status(code: i64, message: impl Into<String>) -> Self {
        let mut data = Map::new();
        data.insert(RTN_CODE_KEY.to_owned(), Value::from(code));
        data.insert(RTN_MSG_KEY.to_owned(), Value::String(message.into()));
        Self { data }
    }

    /// `true` iff the return code equals the vendor's success sentinel.
    pub fn is_success(&self) -> bool {
        self.code() == SUCCESS_CODE
    }

    /// Numeric return code. Numeric strings are accepted; a missing or
    /// unparsable code reads as `0`.
    pub fn code(&self) -> i64 {
        match self.data.get(RTN_CODE_KEY) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Return message, empty when absent.
    pub fn message(&self) -> &str {
        self.data
            .get(RTN_MSG_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The whole decoded reply.
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Look up a single field of the decoded reply.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Consume the response, returning the decoded reply.
    pub fn into_data(self) -> Map<String, Value> {
        self.data
    }

    /// Return `self` on success, otherwise an [`EcPayError::Api`] carrying
    /// the code, message and raw data.
    ///
    /// # Errors
    ///
    /// Returns [`EcPayError::Api`] when [`Response::is_success`] is false.
    pub fn raise_if_error(self) -> Result<Self, EcPayError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(EcPayError::Api {
            code: self.code(),
            message: self.message().to_owned(),
            data: Value::Object(self.data),
        })
    }
}

impl From<Map<String, Value>> for Response {
    fn from(data: Map<String, Value>) -> Self {
        Self::new(data)
    }
}
