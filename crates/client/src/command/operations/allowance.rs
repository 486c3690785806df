use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use crate::command::params::B2BInvoiceCategory;
use crate::command::{validate, Command, InvoiceItem, PayloadBuilder};

const ALLOWANCE_PATH: &str = "/B2BInvoice/Allowance";
const ALLOWANCE_INVALID_PATH: &str = "/B2BInvoice/AllowanceInvalid";

/// Issue an allowance (credit note) against an invoice.
#[derive(Debug, Clone)]
pub struct Allowance {
    builder: PayloadBuilder,
    items: Vec<InvoiceItem>,
}

impl Allowance {
    /// Construct an [`Allowance`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        for key in [
            "RelateNumber",
            "AllowanceDate",
            "InvoiceNumber",
            "InvoiceDate",
            "Buyer_Identifier",
            "Buyer_Name",
        ] {
            builder.set(key, "");
        }
        builder.set("AllowanceAmount", 0);
        builder.set("TaxAmount", 0);
        builder.set("Items", Value::Array(Vec::new()));
        Self {
            builder,
            items: Vec::new(),
        }
    }

    /// Set `RelateNumber`.
    pub fn relate_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::relate_number("RelateNumber", value, 30)?;
        self.builder.set("RelateNumber", value);
        Ok(self)
    }

    /// Set `AllowanceDate` (`yyyy-MM-dd`).
    pub fn allowance_date(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::date("AllowanceDate", value)?;
        self.builder.set("AllowanceDate", value);
        Ok(self)
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

    /// Set `Buyer_Identifier`, eight digits.
    pub fn buyer_identifier(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::identifier("Buyer_Identifier", value)?;
        self.builder.set("Buyer_Identifier", value);
        Ok(self)
    }

    /// Set `Buyer_Name`.
    pub fn buyer_name(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::required("Buyer_Name", value)?;
        let value = validate::max_chars("Buyer_Name", &value, 60)?;
        self.builder.set("Buyer_Name", value);
        Ok(self)
    }

    /// Set `AllowanceAmount`.
    pub fn allowance_amount(mut self, amount: i64) -> Result<Self, ValidationError> {
        if amount <= 0 {
            return Err(ValidationError::invalid("AllowanceAmount", "must be greater than 0"));
        }
        self.builder.set("AllowanceAmount", amount);
        Ok(self)
    }

    /// Set `TaxAmount`.
    pub fn tax_amount(mut self, amount: i64) -> Result<Self, ValidationError> {
        if amount < 0 {
            return Err(ValidationError::invalid("TaxAmount", "cannot be negative"));
        }
        self.builder.set("TaxAmount", amount);
        Ok(self)
    }

    /// Append a line item.
    pub fn add_item(mut self, item: InvoiceItem) -> Self {
        self.items.push(item);
        self
    }
}

impl Command for Allowance {
    fn transport_path(&self) -> &str {
        ALLOWANCE_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        for key in [
            "RelateNumber",
            "AllowanceDate",
            "InvoiceNumber",
            "InvoiceDate",
            "Buyer_Identifier",
            "Buyer_Name",
        ] {
            b.require(key)?;
        }
        if b.get("AllowanceAmount").and_then(Value::as_i64).unwrap_or(0) <= 0 {
            return Err(ValidationError::invalid("AllowanceAmount", "must be greater than 0"));
        }
        if self.items.is_empty() {
            return Err(ValidationError::new("Items", "At least one item is required."));
        }

        let items = serde_json::to_value(&self.items)
            .map_err(|e| ValidationError::invalid("Items", &e.to_string()))?;
        let mut builder = b.clone();
        builder.set("Items", items);
        Ok(builder.build())
    }
}

/// Void a previously issued allowance.
#[derive(Debug, Clone)]
pub struct AllowanceInvalid {
    builder: PayloadBuilder,
}

impl AllowanceInvalid {
    /// Construct an [`AllowanceInvalid`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceCategory", B2BInvoiceCategory::Sales);
        builder.set("AllowanceNumber", "");
        builder.set("AllowanceDate", "");
        builder.set("InvalidReason", "");
        Self { builder }
    }

    /// Set `InvoiceCategory`.
    pub fn invoice_category(mut self, category: B2BInvoiceCategory) -> Self {
        self.builder.set("InvoiceCategory", category);
        self
    }

    /// Set `AllowanceNumber`, two letters and twelve digits.
    pub fn allowance_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::allowance_number("AllowanceNumber", value)?;
        self.builder.set("AllowanceNumber", value);
        Ok(self)
    }

    /// Set `AllowanceDate` (`yyyy-MM-dd`).
    pub fn allowance_date(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::date("AllowanceDate", value)?;
        self.builder.set("AllowanceDate", value);
        Ok(self)
    }

    /// Set `InvalidReason`.
    pub fn invalid_reason(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::required("InvalidReason", value)?;
        let value = validate::max_chars("InvalidReason", &value, 200)?;
        self.builder.set("InvalidReason", value);
        Ok(self)
    }
}

impl Command for AllowanceInvalid {
    fn transport_path(&self) -> &str {
        ALLOWANCE_INVALID_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("AllowanceNumber")?;
        b.require("AllowanceDate")?;
        b.require("InvalidReason")?;
        Ok(b.build())
    }
}
