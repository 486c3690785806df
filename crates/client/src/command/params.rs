//! Vendor parameter codes.
//!
//! Each enum maps onto the exact code the vendor expects in `Data`. Some
//! fields carry string codes (`"07"`, `"C"`), others carry JSON integers;
//! [`serde_json::Value`] conversions keep that distinction.

use std::fmt;
use std::str::FromStr;

use einvoice_common::ValidationError;
use serde_json::Value;

macro_rules! string_codes {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every accepted code, in vendor order.
            pub const CODES: &'static [&'static str] = &[$($code),+];

            /// Code sent on the wire.
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(ValidationError::not_in_range($field, Self::CODES)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Value {
                Value::String(v.code().to_owned())
            }
        }
    };
}

macro_rules! int_codes {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every accepted code, in vendor order.
            pub const CODES: &'static [&'static str] = &[$(stringify!($code)),+];

            /// Numeric code sent on the wire.
            pub fn code(self) -> i64 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Look up a variant by its numeric code.
            pub fn from_code(code: i64) -> Result<Self, ValidationError> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(ValidationError::not_in_range($field, Self::CODES)),
                }
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map_err(|_| ValidationError::not_in_range($field, Self::CODES))
                    .and_then(Self::from_code)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Value {
                Value::from(v.code())
            }
        }
    };
}

string_codes! {
    /// Invoice track type.
    InvType, "InvType" {
        General => "07",
        Special => "08",
    }
}

string_codes! {
    /// Archive (`0`) or exchange (`1`) mode.
    ExchangeMode, "ExchangeMode" {
        Archive => "0",
        Exchange => "1",
    }
}

string_codes! {
    TaxType, "TaxType" {
        Taxable => "1",
        ZeroTax => "2",
        TaxFree => "3",
        SpecialTax => "4",
    }
}

string_codes! {
    /// Reason for a zero tax rate.
    ZeroTaxRate, "ZeroTaxRateReason" {
        NonCustomsExport => "1",
        CustomsExport => "2",
    }
}

string_codes! {
    SpecialTaxType, "SpecialTaxType" {
        Nightclub25 => "1",
        Golf10 => "2",
        Bowling15 => "3",
        Billiards15 => "4",
        Financial2 => "5",
    }
}

string_codes! {
    ConfirmAction, "ConfirmAction" {
        Confirm => "1",
        Reject => "2",
    }
}

string_codes! {
    /// What kind of event a notification is about.
    InvoiceTag, "InvoiceTag" {
        Issue => "1",
        Invalid => "2",
        Reject => "3",
        Allowance => "4",
        AllowanceInvalid => "5",
        IssueConfirm => "6",
        InvalidConfirm => "7",
        RejectConfirm => "8",
        AllowanceConfirm => "9",
        AllowanceInvalidConfirm => "10",
    }
}

string_codes! {
    /// Who receives a notification: customer, merchant, or all.
    NotifyTarget, "Notified" {
        Customer => "C",
        Merchant => "M",
        All => "A",
    }
}

int_codes! {
    /// Sales (`0`) or purchase (`1`) side of a B2B invoice.
    B2BInvoiceCategory, "InvoiceCategory" {
        Sales => 0,
        Purchase => 1,
    }
}

int_codes! {
    /// Two-month invoice period.
    InvoiceTerm, "InvoiceTerm" {
        JanFeb => 1,
        MarApr => 2,
        MayJun => 3,
        JulAug => 4,
        SepOct => 5,
        NovDec => 6,
    }
}

int_codes! {
    InvoiceWordStatus, "InvoiceStatus" {
        Disabled => 0,
        Suspended => 1,
        Enabled => 2,
    }
}

int_codes! {
    /// Track usage filter for word-setting lookups.
    UseStatus, "UseStatus" {
        All => 0,
        NotActivated => 1,
        InUse => 2,
        Disabled => 3,
        Suspended => 4,
        PendingReview => 5,
        ReviewRejected => 6,
    }
}

string_codes! {
    /// Role of a trading partner in the merchant's customer list.
    CustomerType, "type" {
        Buyer => "1",
        Seller => "2",
        Both => "3",
    }
}

string_codes! {
    MaintainAction, "Action" {
        Add => "Add",
        Update => "Update",
        Delete => "Delete",
    }
}

impl TaxType {
    /// Whether this tax type may be used with the given track type.
    pub fn allowed_for(self, inv_type: InvType) -> bool {
        match inv_type {
            InvType::General => matches!(self, Self::Taxable | Self::ZeroTax | Self::TaxFree),
            InvType::Special => matches!(self, Self::TaxFree | Self::SpecialTax),
        }
    }
}

impl InvoiceTag {
    /// Tags that refer to an allowance rather than an invoice.
    pub fn is_allowance(self) -> bool {
        matches!(
            self,
            Self::Allowance
                | Self::AllowanceInvalid
                | Self::AllowanceConfirm
                | Self::AllowanceInvalidConfirm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_codes_parse_and_render() {
        assert_eq!("07".parse::<InvType>().unwrap(), InvType::General);
        assert_eq!(InvType::Special.code(), "08");
        assert_eq!(Value::from(NotifyTarget::All), Value::String("A".into()));
        assert_eq!(InvoiceTag::AllowanceInvalidConfirm.to_string(), "10");
    }

    #[test]
    fn int_codes_render_as_numbers() {
        assert_eq!(Value::from(B2BInvoiceCategory::Purchase), Value::from(1));
        assert_eq!(Value::from(InvoiceWordStatus::Enabled), Value::from(2));
        assert_eq!(" 3 ".parse::<InvoiceTerm>().unwrap(), InvoiceTerm::MayJun);
    }

    #[test]
    fn unknown_codes_name_the_field() {
        let err = "9".parse::<TaxType>().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("TaxType"));
        assert!(err.message.contains("1, 2, 3, 4"));

        let err = InvoiceTerm::from_code(0).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("InvoiceTerm"));
        assert!("x".parse::<InvoiceWordStatus>().is_err());
    }

    #[test]
    fn tax_type_pairs_with_track_type() {
        assert!(TaxType::ZeroTax.allowed_for(InvType::General));
        assert!(!TaxType::SpecialTax.allowed_for(InvType::General));
        assert!(TaxType::TaxFree.allowed_for(InvType::Special));
        assert!(!TaxType::Taxable.allowed_for(InvType::Special));
    }

    #[test]
    fn allowance_tags() {
        assert!(InvoiceTag::AllowanceConfirm.is_allowance());
        assert!(!InvoiceTag::IssueConfirm.is_allowance());
    }

    #[test]
    fn word_codes_are_case_sensitive() {
        assert_eq!("Add".parse::<MaintainAction>().unwrap(), MaintainAction::Add);
        assert!("add".parse::<MaintainAction>().is_err());
        assert_eq!(Value::from(UseStatus::All), Value::from(0));
        assert_eq!(Value::from(CustomerType::Both), Value::from("3"));
    }
}
