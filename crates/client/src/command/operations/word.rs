//! Invoice track ("word") allocation and status.

use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use crate::command::params::{InvType, InvoiceTerm, InvoiceWordStatus};
use crate::command::{validate, Command, PayloadBuilder};

const ADD_PATH: &str = "/B2BInvoice/AddInvoiceWordSetting";
const UPDATE_STATUS_PATH: &str = "/B2BInvoice/UpdateInvoiceWordStatus";

/// `InvoiceCategory` for B2B tracks.
const B2B_CATEGORY: &str = "2";

/// Register a range of invoice numbers for a track.
#[derive(Debug, Clone)]
pub struct AddInvoiceWordSetting {
    builder: PayloadBuilder,
}

impl AddInvoiceWordSetting {
    /// Construct an [`AddInvoiceWordSetting`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceTerm", "");
        builder.set("InvoiceYear", "");
        builder.set("InvType", InvType::General);
        builder.set("InvoiceCategory", B2B_CATEGORY);
        builder.set("InvoiceHeader", "");
        builder.set("InvoiceStart", "");
        builder.set("InvoiceEnd", "");
        Self { builder }
    }

    /// Set `InvoiceTerm`.
    pub fn invoice_term(mut self, term: InvoiceTerm) -> Self {
        self.builder.set("InvoiceTerm", term);
        self
    }

    /// Accepts a three-digit ROC year or a four-digit Gregorian year. Only
    /// the current and the next year are allowed.
    pub fn invoice_year(mut self, year: &str) -> Result<Self, ValidationError> {
        let current = validate::current_roc_year();
        let year = validate::roc_year("InvoiceYear", year, current, current + 1)?;
        self.builder.set("InvoiceYear", year);
        Ok(self)
    }

    /// Set `InvType`.
    pub fn inv_type(mut self, inv_type: InvType) -> Self {
        self.builder.set("InvType", inv_type);
        self
    }

    /// Set `InvoiceHeader`.
    pub fn invoice_header(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::track_header("InvoiceHeader", value)?;
        self.builder.set("InvoiceHeader", value);
        Ok(self)
    }

    /// Numbers run in blocks of fifty: `xx00..xx49` or `xx50..xx99`.
    pub fn invoice_range(mut self, start: &str, end: &str) -> Result<Self, ValidationError> {
        let start = range_bound("InvoiceStart", start, &["00", "50"])?;
        let end = range_bound("InvoiceEnd", end, &["49", "99"])?;
        self.builder.set("InvoiceStart", start);
        self.builder.set("InvoiceEnd", end);
        Ok(self)
    }
}

impl Command for AddInvoiceWordSetting {
    fn transport_path(&self) -> &str {
        ADD_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("InvoiceTerm")?;
        b.require("InvoiceYear")?;
        b.require("InvoiceHeader")?;
        b.require("InvoiceStart")?;
        b.require("InvoiceEnd")?;
        check_range(b.str("InvoiceStart"), b.str("InvoiceEnd"))?;
        Ok(b.build())
    }
}

fn range_bound(field: &str, value: &str, suffixes: &[&str]) -> Result<String, ValidationError> {
    let value = validate::eight_digits(field, value)?;
    if !suffixes.iter().any(|s| value.ends_with(s)) {
        return Err(ValidationError::invalid(
            field,
            &format!("must end with {}", suffixes.join(" or ")),
        ));
    }
    Ok(value)
}

fn check_range(start: &str, end: &str) -> Result<(), ValidationError> {
    let start = range_bound("InvoiceStart", start, &["00", "50"])?;
    let end = range_bound("InvoiceEnd", end, &["49", "99"])?;
    // Both are eight ASCII digits at this point.
    let (s, e): (u32, u32) = (
        start.parse().unwrap_or_default(),
        end.parse().unwrap_or_default(),
    );
    if e <= s {
        return Err(ValidationError::invalid(
            "InvoiceEnd",
            "must be greater than InvoiceStart",
        ));
    }
    let paired = matches!((&start[6..], &end[6..]), ("00", "49") | ("50", "99"));
    if !paired {
        return Err(ValidationError::invalid(
            "InvoiceEnd",
            "range must be a 00-49 or 50-99 pair",
        ));
    }
    Ok(())
}

/// Enable, suspend or disable an invoice track.
#[derive(Debug, Clone)]
pub struct UpdateInvoiceWordStatus {
    builder: PayloadBuilder,
}

impl UpdateInvoiceWordStatus {
    /// Construct an [`UpdateInvoiceWordStatus`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("TrackID", "");
        builder.set("InvoiceStatus", InvoiceWordStatus::Enabled);
        Self { builder }
    }

    /// Set `TrackID`.
    pub fn track_id(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::track_id("TrackID", value)?;
        self.builder.set("TrackID", value);
        Ok(self)
    }

    /// Set `InvoiceStatus`.
    pub fn status(mut self, status: InvoiceWordStatus) -> Self {
        self.builder.set("InvoiceStatus", status);
        self
    }

    /// Enable the track.
    pub fn enable(self) -> Self {
        self.status(InvoiceWordStatus::Enabled)
    }

    /// Suspend the track.
    pub fn suspend(self) -> Self {
        self.status(InvoiceWordStatus::Suspended)
    }

    /// Disable the track.
    pub fn disable(self) -> Self {
        self.status(InvoiceWordStatus::Disabled)
    }
}

impl Command for UpdateInvoiceWordStatus {
    fn transport_path(&self) -> &str {
        UPDATE_STATUS_PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        self.builder.require_merchant()?;
        self.builder.require("TrackID")?;
        Ok(self.builder.build())
    }
}
