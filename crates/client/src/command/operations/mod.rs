//! Operations that create or change invoices, allowances, tracks and
//! trading partners.

mod allowance;
mod confirm;
mod customer;
mod issue;
mod reject;
mod word;

pub use allowance::{Allowance, AllowanceInvalid};
pub use confirm::{AllowanceConfirm, InvalidConfirm};
pub use customer::MaintainMerchantCustomerData;
pub use issue::Issue;
pub use reject::Reject;
pub use word::{AddInvoiceWordSetting, UpdateInvoiceWordStatus};
