use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use crate::command::params::B2BInvoiceCategory;
use crate::command::{validate, Command, PayloadBuilder};

const PATH: &str = "/B2BInvoice/Reject";

/// Reject a received invoice.
#[derive(Debug, Clone)]
pub struct Reject {
    builder: PayloadBuilder,
}

impl Reject {
    /// Construct a [`Reject`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceCategory", B2BInvoiceCategory::Sales);
        builder.set("InvoiceNumber", "");
        builder.set("InvoiceDate", "");
        builder.set("RejectReason", "");
        Self { builder }
    }

    /// Set `InvoiceCategory`.
    pub fn invoice_category(mut self, category: B2BInvoiceCategory) -> Self {
        self.builder.set("InvoiceCategory", category);
        self
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

    /// Set `RejectReason`.
    pub fn reject_reason(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::required("RejectReason", value)?;
        let value = validate::max_chars("RejectReason", &value, 200)?;
        self.builder.set("RejectReason", value);
        Ok(self)
    }
}

impl Command for Reject {
    fn transport_path(&self) -> &str {
        PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("InvoiceNumber")?;
        b.require("InvoiceDate")?;
        b.require("RejectReason")?;
        Ok(b.build())
    }
}
