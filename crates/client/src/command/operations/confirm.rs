//! Buyer-side confirmations of allowances and invoice voids.

use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use crate::command::params::ConfirmAction;
use crate::command::{validate, Command, PayloadBuilder};

const ALLOWANCE_CONFIRM_PATH: &str = "/B2BInvoice/AllowanceConfirm";
const INVALID_CONFIRM_PATH: &str = "/B2BInvoice/InvalidConfirm";

fn set_reject_reason(builder: &mut PayloadBuilder, value: &str) -> Result<(), ValidationError> {
    let value = validate::max_chars("RejectReason", value, 200)?;
    builder.set("RejectReason", value);
    Ok(())
}

/// Confirm or send back an allowance.
#[derive(Debug, Clone)]
pub struct AllowanceConfirm {
    builder: PayloadBuilder,
}

impl AllowanceConfirm {
    /// Construct an [`AllowanceConfirm`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("AllowanceNumber", "");
        builder.set("AllowanceDate", "");
        builder.set("ConfirmAction", ConfirmAction::Confirm);
        builder.set("RejectReason", "");
        Self { builder }
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

    /// Accept the counterpart's request.
    pub fn confirm(mut self) -> Self {
        self.builder.set("ConfirmAction", ConfirmAction::Confirm);
        self
    }

    /// Send the allowance back; the reason is optional.
    pub fn reject(mut self, reason: &str) -> Result<Self, ValidationError> {
        self.builder.set("ConfirmAction", ConfirmAction::Reject);
        set_reject_reason(&mut self.builder, reason)?;
        Ok(self)
    }
}

impl Command for AllowanceConfirm {
    fn transport_path(&self) -> &str {
        ALLOWANCE_CONFIRM_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("AllowanceNumber")?;
        b.require("AllowanceDate")?;
        Ok(b.build())
    }
}

/// Confirm or send back the void of a received invoice.
#[derive(Debug, Clone)]
pub struct InvalidConfirm {
    builder: PayloadBuilder,
}

impl InvalidConfirm {
    /// Construct an [`InvalidConfirm`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceNumber", "");
        builder.set("InvoiceDate", "");
        builder.set("ConfirmAction", ConfirmAction::Confirm);
        builder.set("RejectReason", "");
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

    /// Accept the counterpart's request.
    pub fn confirm(mut self) -> Self {
        self.builder.set("ConfirmAction", ConfirmAction::Confirm);
        self
    }

    /// Refuse the request; `reason` is at most 200 characters.
    pub fn reject(mut self, reason: &str) -> Result<Self, ValidationError> {
        self.builder.set("ConfirmAction", ConfirmAction::Reject);
        set_reject_reason(&mut self.builder, reason)?;
        Ok(self)
    }
}

impl Command for InvalidConfirm {
    fn transport_path(&self) -> &str {
        INVALID_CONFIRM_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("InvoiceNumber")?;
        b.require("InvoiceDate")?;
        Ok(b.build())
    }
}
