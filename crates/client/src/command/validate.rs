//! Field validators shared by every command.
//!
//! Each function trims its input, checks it, and returns the normalised
//! value to store. `field` is the vendor field name used in the error.

use std::sync::LazyLock;

use chrono::{Datelike, Local, NaiveDate};
use einvoice_common::ValidationError;
use regex::Regex;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The Republic of China calendar starts in 1912.
pub const ROC_OFFSET: i32 = 1911;

static INVOICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{8}$").expect("static regex"));
static ALLOWANCE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{12}$").expect("static regex"));
static EIGHT_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("static regex"));
static TWO_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}$").expect("static regex"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("static regex")
});

/// Non-empty after trimming.
pub fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(value.to_owned())
}

/// At most `max` bytes of UTF-8.
pub fn max_bytes(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.len() > max {
        return Err(ValidationError::too_long(field, max));
    }
    Ok(value.to_owned())
}

/// At most `max` characters (Unicode scalar values).
pub fn max_chars(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(ValidationError::too_long(field, max));
    }
    Ok(value.to_owned())
}

/// ASCII letters and digits only. Empty is accepted.
pub fn alphanumeric(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ValidationError::invalid(
            field,
            "must not contain special characters",
        ));
    }
    Ok(value.to_owned())
}

/// Merchant-side serial number: alphanumeric, at most `max` bytes.
pub fn relate_number(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = max_bytes(field, value, max)?;
    alphanumeric(field, &value)
}

/// A real calendar date written exactly as `yyyy-mm-dd`.
pub fn date(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    let parsed = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::invalid(field, "must be in yyyy-mm-dd format"))?;
    // chrono accepts unpadded fields ("2024-1-5"); the vendor does not.
    if parsed.format(DATE_FORMAT).to_string() != value {
        return Err(ValidationError::invalid(field, "must be in yyyy-mm-dd format"));
    }
    Ok(value.to_owned())
}

/// Two letters followed by eight digits, upper-cased (e.g. `AB12345678`).
pub fn invoice_number(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim().to_ascii_uppercase();
    if !INVOICE_NUMBER.is_match(&value) {
        return Err(ValidationError::invalid(
            field,
            "must be 2 letters followed by 8 digits (e.g. AB12345678)",
        ));
    }
    Ok(value)
}

/// Invoice number plus a four-digit sequence (e.g. `AB123456780001`).
pub fn allowance_number(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim().to_ascii_uppercase();
    if !ALLOWANCE_NUMBER.is_match(&value) {
        return Err(ValidationError::invalid(
            field,
            "must be 14 characters (e.g. AB123456780001)",
        ));
    }
    Ok(value)
}

/// Eight-digit business identifier.
pub fn identifier(field: &str, value: &str) -> Result<String, ValidationError> {
    eight_digits(field, value)
}

/// Exactly eight ASCII digits.
pub fn eight_digits(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if !EIGHT_DIGITS.is_match(value) {
        return Err(ValidationError::invalid(field, "must be exactly 8 digits"));
    }
    Ok(value.to_owned())
}

/// Two-letter invoice track header, upper-cased.
pub fn track_header(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim().to_ascii_uppercase();
    if !TWO_LETTERS.is_match(&value) {
        return Err(ValidationError::invalid(
            field,
            "must contain exactly two letters",
        ));
    }
    Ok(value)
}

/// A single e-mail address.
pub fn email(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if !EMAIL.is_match(value) {
        return Err(ValidationError::invalid(field, "invalid email format"));
    }
    Ok(value.to_owned())
}

/// Semicolon-separated e-mail list. Empty segments are skipped.
pub fn email_list(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    let value = max_bytes(field, &value, max)?;
    for address in value.split(';').map(str::trim).filter(|a| !a.is_empty()) {
        if !EMAIL.is_match(address) {
            return Err(ValidationError::invalid(
                field,
                &format!("invalid email format: {address}"),
            ));
        }
    }
    Ok(value)
}

/// Invoice track identifier: non-empty, at most 10 bytes.
pub fn track_id(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    max_bytes(field, &value, 10)
}

/// Current year in the ROC calendar, local time.
pub fn current_roc_year() -> i32 {
    Local::now().year() - ROC_OFFSET
}

/// Three-digit ROC year within `min..=max`. Four-digit input is read as a
/// Gregorian year and converted.
pub fn roc_year(field: &str, value: &str, min: i32, max: i32) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::invalid(field, "must be numeric"));
    }
    let mut year: i32 = value
        .parse()
        .map_err(|_| ValidationError::invalid(field, "must be numeric"))?;
    if value.len() == 4 {
        year -= ROC_OFFSET;
        if year <= 0 {
            return Err(ValidationError::invalid(
                field,
                "Gregorian year must be greater than 1911",
            ));
        }
    } else if value.len() > 3 {
        return Err(ValidationError::invalid(field, "must be 3 digits in ROC format"));
    }
    if year < min || year > max {
        return Err(ValidationError::invalid(
            field,
            &format!("must be between {min:03} and {max:03}"),
        ));
    }
    Ok(format!("{year:03}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_patterns_compile() {
        for pattern in [
            &INVOICE_NUMBER,
            &ALLOWANCE_NUMBER,
            &EIGHT_DIGITS,
            &TWO_LETTERS,
            &EMAIL,
        ] {
            assert!(!LazyLock::force(pattern).as_str().is_empty());
        }
    }

    #[test]
    fn required_trims() {
        assert_eq!(required("Buyer_Name", "  ACME  ").unwrap(), "ACME");
        let err = required("Buyer_Name", "   ").unwrap_err();
        assert_eq!(err.message, "Buyer_Name cannot be empty.");
    }

    #[test]
    fn bytes_versus_chars() {
        // Four CJK characters are twelve bytes.
        assert!(max_chars("Buyer_Name", "綠界科技", 4).is_ok());
        assert!(max_bytes("Buyer_Name", "綠界科技", 4).is_err());
        assert!(max_bytes("Buyer_Name", "綠界科技", 12).is_ok());
    }

    #[test]
    fn relate_number_rules() {
        assert_eq!(relate_number("RelateNumber", " TEST1 ", 30).unwrap(), "TEST1");
        assert!(relate_number("RelateNumber", "TEST-1", 30).is_err());
        assert!(relate_number("RelateNumber", &"A".repeat(31), 30).is_err());
        assert!(relate_number("RelateNumber", "", 30).is_ok());
    }

    #[test]
    fn dates() {
        assert_eq!(date("InvoiceDate", "2024-01-15").unwrap(), "2024-01-15");
        assert!(date("InvoiceDate", "2024-02-29").is_ok());
        assert!(date("InvoiceDate", "2023-02-29").is_err());
        assert!(date("InvoiceDate", "2024-1-5").is_err());
        assert!(date("InvoiceDate", "2024/01/15").is_err());
        assert!(date("InvoiceDate", "2024-01-15 10:00:00").is_err());
        assert!(date("InvoiceDate", "").is_err());
    }

    #[test]
    fn invoice_numbers() {
        assert_eq!(invoice_number("InvoiceNumber", " ab12345678 ").unwrap(), "AB12345678");
        assert!(invoice_number("InvoiceNumber", "AB1234567").is_err());
        assert!(invoice_number("InvoiceNumber", "A112345678").is_err());
    }

    #[test]
    fn allowance_numbers() {
        assert_eq!(
            allowance_number("AllowanceNumber", "ab123456780001").unwrap(),
            "AB123456780001"
        );
        assert!(allowance_number("AllowanceNumber", "AB12345678").is_err());
    }

    #[test]
    fn identifiers() {
        assert!(identifier("Buyer_Identifier", "97025978").is_ok());
        assert!(identifier("Buyer_Identifier", "9702597").is_err());
        assert!(identifier("Buyer_Identifier", "9702597A").is_err());
    }

    #[test]
    fn track_headers() {
        assert_eq!(track_header("InvoiceHeader", "tw").unwrap(), "TW");
        assert!(track_header("InvoiceHeader", "T1").is_err());
    }

    #[test]
    fn emails() {
        assert!(email("Buyer_EmailAddress", "buyer@example.com").is_ok());
        assert!(email("Buyer_EmailAddress", "buyer@").is_err());
        assert!(email("Buyer_EmailAddress", "no-at-sign").is_err());
    }

    #[test]
    fn email_lists() {
        let list = email_list("NotifyMail", "a@example.com; b@example.com;", 200).unwrap();
        assert_eq!(list, "a@example.com; b@example.com;");
        let err = email_list("NotifyMail", "a@example.com;oops", 200).unwrap_err();
        assert!(err.message.contains("oops"));
        assert!(email_list("NotifyMail", "", 200).is_err());
    }

    #[test]
    fn track_ids() {
        assert!(track_id("TrackID", "1234567890").is_ok());
        assert!(track_id("TrackID", "12345678901").is_err());
        assert!(track_id("TrackID", " ").is_err());
    }

    #[test]
    fn roc_years() {
        assert_eq!(roc_year("InvoiceYear", "2025", 114, 115).unwrap(), "114");
        assert_eq!(roc_year("InvoiceYear", "115", 114, 115).unwrap(), "115");
        assert_eq!(roc_year("InvoiceYear", "99", 98, 100).unwrap(), "099");
        assert!(roc_year("InvoiceYear", "113", 114, 115).is_err());
        assert!(roc_year("InvoiceYear", "116", 114, 115).is_err());
        assert!(roc_year("InvoiceYear", "1900", 114, 115).is_err());
        assert!(roc_year("InvoiceYear", "11a", 114, 115).is_err());
        assert!(roc_year("InvoiceYear", "00114", 114, 115).is_err());
        assert!(roc_year("InvoiceYear", "", 114, 115).is_err());
    }
}
