use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use super::{validate, Command, PayloadBuilder};

const PATH: &str = "/B2BInvoice/DownloadB2BPdf";

/// Fetch the printable PDF of an invoice.
#[derive(Debug, Clone)]
pub struct DownloadB2BPdf {
    builder: PayloadBuilder,
}

impl DownloadB2BPdf {
    /// Construct a [`DownloadB2BPdf`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceNumber", "");
        builder.set("InvoiceDate", "");
        Self { builder }
    }

    /// Set `InvoiceNumber`, two letters and eight digits.
    pub fn invoice_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::invoice_number("InvoiceNumber", value)?;
        self.builder.set("InvoiceNumber", value);
        Ok(self)
    }

    /// Set `InvoiceDate` (`yyyy-MM-dd`).
    pub fn invoice_date(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::date("InvoiceDate", value)?;
        self.builder.set("InvoiceDate", value);
        Ok(self)
    }
}

impl Command for DownloadB2BPdf {
    fn transport_path(&self) -> &str {
        PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        self.builder.require_merchant()?;
        self.builder.require("InvoiceNumber")?;
        self.builder.require("InvoiceDate")?;
        Ok(self.builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_payload() {
        let cmd = DownloadB2BPdf::new("2000132")
            .invoice_number("AB12345678")
            .unwrap()
            .invoice_date("2024-01-15")
            .unwrap();
        assert_eq!(cmd.transport_path(), "/B2BInvoice/DownloadB2BPdf");
        let payload = cmd.payload().unwrap();
        assert_eq!(payload["Data"]["InvoiceNumber"], "AB12345678");
    }

    #[test]
    fn requires_date() {
        let err = DownloadB2BPdf::new("2000132")
            .invoice_number("AB12345678")
            .unwrap()
            .payload()
            .unwrap_err();
        assert_eq!(err.field.as_deref(), Some("InvoiceDate"));
    }
}
