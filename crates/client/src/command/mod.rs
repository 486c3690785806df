//! Vendor operations.
//!
//! Every operation wraps a [`PayloadBuilder`], validates its fields with the
//! free functions in [`validate`], and exposes itself to the dispatcher via
//! [`Command`].

pub mod items;
pub mod notify;
pub mod operations;
pub mod params;
pub mod payload;
pub mod print;
pub mod queries;
pub mod raw;
pub mod validate;

use einvoice_common::ValidationError;
use serde_json::{Map, Value};

pub use items::InvoiceItem;
pub use notify::Notify;
pub use operations::{
    AddInvoiceWordSetting, Allowance, AllowanceConfirm, AllowanceInvalid, InvalidConfirm, Issue,
    MaintainMerchantCustomerData, Reject, UpdateInvoiceWordStatus,
};
pub use payload::PayloadBuilder;
pub use print::DownloadB2BPdf;
pub use queries::{
    GetAllowanceInvalidConfirm, GetGovInvoiceWordSetting, GetInvalid, GetInvoiceWordSetting,
    GetIssueConfirm,
};
pub use raw::RawCommand;

/// One vendor operation, ready to be sent.
pub trait Command: Send + Sync {
    /// Path appended to the server URL, e.g. `/B2BInvoice/Issue`.
    fn transport_path(&self) -> &str;

    /// Validate the fields and build `{MerchantID, RqHeader, Data}`.
    fn payload(&self) -> Result<Map<String, Value>, ValidationError>;
}
