use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use super::params::{InvoiceTag, NotifyTarget};
use super::{validate, Command, PayloadBuilder};

const PATH: &str = "/B2BInvoice/Notify";
const NOTIFY_MAIL_MAX: usize = 200;
const ALLOWANCE_NO_LEN: usize = 16;

/// Ask the vendor to e-mail an invoice event.
#[derive(Debug, Clone)]
pub struct Notify {
    builder: PayloadBuilder,
}

impl Notify {
    /// Construct a [`Notify`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("InvoiceDate", "");
        builder.set("InvoiceNumber", "");
        builder.set("AllowanceNo", "");
        builder.set("NotifyMail", "");
        builder.set("InvoiceTag", "");
        builder.set("Notified", NotifyTarget::All);
        Self { builder }
    }

    /// Set `InvoiceDate` (`yyyy-MM-dd`).
    pub fn invoice_date(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::date("InvoiceDate", value)?;
        self.builder.set("InvoiceDate", value);
        Ok(self)
    }

    /// Set `InvoiceNumber`, two letters and eight digits.
    pub fn invoice_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::invoice_number("InvoiceNumber", value)?;
        self.builder.set("InvoiceNumber", value);
        Ok(self)
    }

    /// Empty, or exactly sixteen characters.
    pub fn allowance_no(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        check_allowance_no(value)?;
        self.builder.set("AllowanceNo", value);
        Ok(self)
    }

    /// One or more addresses separated by `;`.
    pub fn notify_mail(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::email_list("NotifyMail", value, NOTIFY_MAIL_MAX)?;
        self.builder.set("NotifyMail", value);
        Ok(self)
    }

    /// Recipients, joined with `;`.
    pub fn notify_mails<S: AsRef<str>>(self, addresses: &[S]) -> Result<Self, ValidationError> {
        let joined = addresses
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(";");
        self.notify_mail(&joined)
    }

    /// Set `InvoiceTag`.
    pub fn invoice_tag(mut self, tag: InvoiceTag) -> Self {
        self.builder.set("InvoiceTag", tag);
        self
    }

    /// Tag an allowance event, optionally naming the allowance.
    pub fn allowance_event(self, tag: InvoiceTag, allowance_no: &str) -> Result<Self, ValidationError> {
        if !tag.is_allowance() {
            return Err(ValidationError::invalid(
                "InvoiceTag",
                "is not an allowance event",
            ));
        }
        let this = self.invoice_tag(tag);
        if allowance_no.trim().is_empty() {
            Ok(this)
        } else {
            this.allowance_no(allowance_no)
        }
    }

    /// Set `Notified`.
    pub fn notified(mut self, target: NotifyTarget) -> Self {
        self.builder.set("Notified", target);
        self
    }
}

fn check_allowance_no(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.len() != ALLOWANCE_NO_LEN {
        return Err(ValidationError::invalid(
            "AllowanceNo",
            "must be exactly 16 characters",
        ));
    }
    Ok(())
}

impl Command for Notify {
    fn transport_path(&self) -> &str {
        PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("InvoiceDate")?;
        b.require("InvoiceNumber")?;
        b.require("NotifyMail")?;
        b.require("InvoiceTag")?;
        check_allowance_no(b.str("AllowanceNo"))?;
        Ok(b.build())
    }
}
