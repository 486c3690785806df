//! Read-only lookups.
//!
//! Invoice and allowance lookups identify the document either by number
//! (which then also needs its date) or by the merchant's own relate number.
//! Word-setting lookups take a ROC year from last year to next year.

use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use super::params::{B2BInvoiceCategory, ExchangeMode, InvType, InvoiceTerm, UseStatus};
use super::{validate, Command, PayloadBuilder};

const GET_INVALID_PATH: &str = "/B2BInvoice/GetInvalid";
const GET_ISSUE_CONFIRM_PATH: &str = "/B2BInvoice/GetIssueConfirm";
const GET_ALLOWANCE_INVALID_CONFIRM_PATH: &str = "/B2BInvoice/GetAllowanceInvalidConfirm";
const GET_INVOICE_WORD_SETTING_PATH: &str = "/B2BInvoice/GetInvoiceWordSetting";
const GET_GOV_INVOICE_WORD_SETTING_PATH: &str = "/B2BInvoice/GetGovInvoiceWordSetting";
/// `InvoiceCategory` for B2B tracks.
const B2B_CATEGORY: i64 = 2;

fn optional_invoice_number(value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    validate::invoice_number("InvoiceNumber", value)
}

fn optional_date(field: &str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    validate::date(field, value)
}

fn optional_digits(field: &str, value: &str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Ok(String::new());
    }
    validate::eight_digits(field, value)
}

fn optional_code(field: &str, value: &str, allowed: &[&str]) -> Result<String, ValidationError> {
    let value = value.trim();
    if !value.is_empty() && !allowed.contains(&value) {
        return Err(ValidationError::not_in_range(field, allowed));
    }
    Ok(value.to_owned())
}

/// Category, then either `number_key` (with `date_key`) or `RelateNumber`.
fn check_lookup(b: &PayloadBuilder, number_key: &str, date_key: &str) -> Result<(), ValidationError> {
    b.require_merchant()?;
    b.require("InvoiceCategory")?;
    if b.is_blank(number_key) && b.is_blank("RelateNumber") {
        return Err(ValidationError::new(
            number_key,
            format!("Either {number_key} or RelateNumber must be provided."),
        ));
    }
    if !b.is_blank(number_key) && b.is_blank(date_key) {
        return Err(ValidationError::new(
            date_key,
            format!("{date_key} is required when {number_key} is provided."),
        ));
    }
    Ok(())
}

/// Word-setting lookups may target last, current or next year.
fn lookup_year(value: &str) -> Result<String, ValidationError> {
    let current = validate::current_roc_year();
    validate::roc_year("InvoiceYear", value, current - 1, current + 1)
}

/// Look up the void record of an invoice.
#[derive(Debug, Clone)]
pub struct GetInvalid {
    builder: PayloadBuilder,
}

impl GetInvalid {
    /// Construct a [`GetInvalid`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        for key in ["InvoiceCategory", "InvoiceNumber", "InvoiceDate", "RelateNumber"] {
            builder.set(key, "");
        }
        Self { builder }
    }

    /// Set `InvoiceCategory`.
    pub fn invoice_category(mut self, category: B2BInvoiceCategory) -> Self {
        self.builder.set("InvoiceCategory", category);
        self
    }

    /// Set `InvoiceNumber`; empty clears it.
    pub fn invoice_number(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder.set("InvoiceNumber", optional_invoice_number(value)?);
        Ok(self)
    }

    /// Set `InvoiceDate`; empty clears it.
    pub fn invoice_date(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder.set("InvoiceDate", optional_date("InvoiceDate", value)?);
        Ok(self)
    }

    /// Set `RelateNumber`, at most 50 bytes.
    pub fn relate_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("RelateNumber", value, 50)?;
        self.builder.set("RelateNumber", value);
        Ok(self)
    }
}

impl Command for GetInvalid {
    fn transport_path(&self) -> &str {
        GET_INVALID_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        check_lookup(&self.builder, "InvoiceNumber", "InvoiceDate")?;
        Ok(self.builder.build())
    }
}

/// Look up invoices pending or past the buyer's issue confirmation.
#[derive(Debug, Clone)]
pub struct GetIssueConfirm {
    builder: PayloadBuilder,
}

impl GetIssueConfirm {
    /// Construct a [`GetIssueConfirm`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        for key in [
            "InvoiceCategory",
            "InvoiceNumber",
            "InvoiceDate",
            "RelateNumber",
            "Seller_Identifier",
            "Buyer_Identifier",
            "InvoiceDateBegin",
            "InvoiceDateEnd",
            "InvoiceNumberBegin",
            "InvoiceNumberEnd",
            "Issue_Status",
            "Invalid_Status",
            "ExchangeMode",
            "ExchangeStatus",
            "Upload_Status",
        ] {
            builder.set(key, "");
        }
        Self { builder }
    }

    /// Set `InvoiceCategory`.
    pub fn invoice_category(mut self, category: B2BInvoiceCategory) -> Self {
        self.builder.set("InvoiceCategory", category);
        self
    }

    /// Set `InvoiceNumber`; empty clears it.
    pub fn invoice_number(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder.set("InvoiceNumber", optional_invoice_number(value)?);
        Ok(self)
    }

    /// Set `InvoiceDate`; empty clears it.
    pub fn invoice_date(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder.set("InvoiceDate", optional_date("InvoiceDate", value)?);
        Ok(self)
    }

    /// Set `RelateNumber`, at most 20 bytes.
    pub fn relate_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("RelateNumber", value, 20)?;
        self.builder.set("RelateNumber", value);
        Ok(self)
    }

    /// Set `Seller_Identifier`; empty clears it.
    pub fn seller_identifier(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder
            .set("Seller_Identifier", optional_digits("Seller_Identifier", value)?);
        Ok(self)
    }

    /// Set `Buyer_Identifier`; empty clears it.
    pub fn buyer_identifier(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder
            .set("Buyer_Identifier", optional_digits("Buyer_Identifier", value)?);
        Ok(self)
    }

    /// Restrict to invoices dated between `begin` and `end`, either may be empty.
    pub fn invoice_date_range(mut self, begin: &str, end: &str) -> Result<Self, ValidationError> {
        let begin = optional_date("InvoiceDateBegin", begin)?;
        let end = optional_date("InvoiceDateEnd", end)?;
        self.builder.set("InvoiceDateBegin", begin);
        self.builder.set("InvoiceDateEnd", end);
        Ok(self)
    }

    /// Numeric part only: eight digits each.
    pub fn invoice_number_range(mut self, begin: &str, end: &str) -> Result<Self, ValidationError> {
        let begin = optional_digits("InvoiceNumberBegin", begin)?;
        let end = optional_digits("InvoiceNumberEnd", end)?;
        self.builder.set("InvoiceNumberBegin", begin);
        self.builder.set("InvoiceNumberEnd", end);
        Ok(self)
    }

    /// `0` sent back, `1` issued.
    pub fn issue_status(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder
            .set("Issue_Status", optional_code("Issue_Status", value, &["0", "1"])?);
        Ok(self)
    }

    /// `0` not voided, `1` voided.
    pub fn invalid_status(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder
            .set("Invalid_Status", optional_code("Invalid_Status", value, &["0", "1"])?);
        Ok(self)
    }

    /// Set `ExchangeMode`.
    pub fn exchange_mode(mut self, mode: ExchangeMode) -> Self {
        self.builder.set("ExchangeMode", mode);
        self
    }

    /// Set `ExchangeStatus`; empty clears it.
    pub fn exchange_status(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder
            .set("ExchangeStatus", optional_code("ExchangeStatus", value, &["0", "1"])?);
        Ok(self)
    }

    /// `0` not uploaded, `1` uploaded, `2` upload failed.
    pub fn upload_status(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder.set(
            "Upload_Status",
            optional_code("Upload_Status", value, &["0", "1", "2"])?,
        );
        Ok(self)
    }
}

impl Command for GetIssueConfirm {
    fn transport_path(&self) -> &str {
        GET_ISSUE_CONFIRM_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        check_lookup(&self.builder, "InvoiceNumber", "InvoiceDate")?;
        Ok(self.builder.build())
    }
}

/// Look up the buyer's confirmation of an allowance void.
#[derive(Debug, Clone)]
pub struct GetAllowanceInvalidConfirm {
    builder: PayloadBuilder,
}

impl GetAllowanceInvalidConfirm {
    /// Construct a [`GetAllowanceInvalidConfirm`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        for key in ["InvoiceCategory", "AllowanceNumber", "AllowanceDate", "RelateNumber"] {
            builder.set(key, "");
        }
        Self { builder }
    }

    /// Set `InvoiceCategory`.
    pub fn invoice_category(mut self, category: B2BInvoiceCategory) -> Self {
        self.builder.set("InvoiceCategory", category);
        self
    }

    /// Set `AllowanceNumber`, two letters and twelve digits.
    pub fn allowance_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = if value.trim().is_empty() {
            String::new()
        } else {
            validate::allowance_number("AllowanceNumber", value)?
        };
        self.builder.set("AllowanceNumber", value);
        Ok(self)
    }

    /// Set `AllowanceDate`; empty clears it.
    pub fn allowance_date(mut self, value: &str) -> Result<Self, ValidationError> {
        self.builder
            .set("AllowanceDate", optional_date("AllowanceDate", value)?);
        Ok(self)
    }

    /// Set `RelateNumber`, at most 20 bytes.
    pub fn relate_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("RelateNumber", value, 20)?;
        self.builder.set("RelateNumber", value);
        Ok(self)
    }
}

impl Command for GetAllowanceInvalidConfirm {
    fn transport_path(&self) -> &str {
        GET_ALLOWANCE_INVALID_CONFIRM_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        check_lookup(&self.builder, "AllowanceNumber", "AllowanceDate")?;
        Ok(self.builder.build())
    }
}

/// List the merchant's invoice tracks.
#[derive(Debug, Clone)]
pub struct GetInvoiceWordSetting {
    builder: PayloadBuilder,
}

impl GetInvoiceWordSetting {
    /// Construct a [`GetInvoiceWordSetting`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceYear", "");
        builder.set("InvoiceTerm", 0);
        builder.set("UseStatus", UseStatus::All);
        builder.set("InvoiceCategory", B2B_CATEGORY);
        builder.set("InvType", "");
        builder.set("InvoiceHeader", "");
        Self { builder }
    }

    /// Three-digit ROC year or four-digit Gregorian year.
    pub fn invoice_year(mut self, year: &str) -> Result<Self, ValidationError> {
        self.builder.set("InvoiceYear", lookup_year(year)?);
        Ok(self)
    }

    /// `None` matches every term.
    pub fn invoice_term(mut self, term: Option<InvoiceTerm>) -> Self {
        self.builder.set("InvoiceTerm", term.map_or(0, InvoiceTerm::code));
        self
    }

    /// Set `UseStatus`.
    pub fn use_status(mut self, status: UseStatus) -> Self {
        self.builder.set("UseStatus", status);
        self
    }

    /// Set `InvType`.
    pub fn inv_type(mut self, inv_type: InvType) -> Self {
        self.builder.set("InvType", inv_type);
        self
    }

    /// Two letters, or empty for every header.
    pub fn invoice_header(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = if value.trim().is_empty() {
            String::new()
        } else {
            validate::track_header("InvoiceHeader", value)?
        };
        self.builder.set("InvoiceHeader", value);
        Ok(self)
    }
}

impl Command for GetInvoiceWordSetting {
    fn transport_path(&self) -> &str {
        GET_INVOICE_WORD_SETTING_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        self.builder.require_merchant()?;
        self.builder.require("InvoiceYear")?;
        Ok(self.builder.build())
    }
}

/// Look up the track ranges the tax authority assigned to the merchant.
#[derive(Debug, Clone)]
pub struct GetGovInvoiceWordSetting {
    builder: PayloadBuilder,
}

impl GetGovInvoiceWordSetting {
    /// Construct a [`GetGovInvoiceWordSetting`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceYear", "");
        Self { builder }
    }

    /// Set `InvoiceYear`.
    pub fn invoice_year(mut self, year: &str) -> Result<Self, ValidationError> {
        self.builder.set("InvoiceYear", lookup_year(year)?);
        Ok(self)
    }
}

impl Command for GetGovInvoiceWordSetting {
    fn transport_path(&self) -> &str {
        GET_GOV_INVOICE_WORD_SETTING_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        self.builder.require_merchant()?;
        self.builder.require("InvoiceYear")?;
        Ok(self.builder.build())
    }
}
