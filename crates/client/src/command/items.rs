//! Line items for invoices and allowances.

use einvoice_common::ValidationError;
use serde::Serialize;

use super::validate;

const NAME_MAX_CHARS: usize = 256;
const WORD_MAX_CHARS: usize = 6;

/// One line of an invoice or allowance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItem {
    #[serde(rename = "ItemName")]
    name: String,
    #[serde(rename = "ItemCount")]
    count: f64,
    /// Unit of measure (e.g. 個, 件, 箱).
    #[serde(rename = "ItemWord")]
    word: String,
    #[serde(rename = "ItemPrice")]
    price: f64,
    #[serde(rename = "ItemAmount")]
    amount: i64,
    /// Left out when the vendor should compute it.
    #[serde(rename = "ItemTax", skip_serializing_if = "Option::is_none")]
    tax: Option<i64>,
}

impl InvoiceItem {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or unit is empty or too
    /// long, or the count is not positive.
    pub fn new(
        name: &str,
        count: f64,
        word: &str,
        price: f64,
        amount: i64,
    ) -> Result<Self, ValidationError> {
        let name = validate::required("ItemName", name)?;
        let name = validate::max_chars("ItemName", &name, NAME_MAX_CHARS)?;
        let word = validate::required("ItemWord", word)?;
        let word = validate::max_chars("ItemWord", &word, WORD_MAX_CHARS)?;
        if count.is_nan() || count <= 0.0 {
            return Err(ValidationError::invalid("ItemCount", "must be greater than 0"));
        }
        Ok(Self {
            name,
            count,
            word,
            price,
            amount,
            tax: None,
        })
    }

    /// Set the line tax explicitly (use `0` on special-tax invoices).
    pub fn with_tax(mut self, tax: i64) -> Self {
        self.tax = Some(tax);
        self
    }

    /// Item name as sent.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Line amount.
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// Line tax, if set.
    pub fn tax(&self) -> Option<i64> {
        self.tax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_with_vendor_keys() {
        let item = InvoiceItem::new("測試商品", 2.0, "個", 100.0, 200).unwrap();
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "ItemName": "測試商品",
                "ItemCount": 2.0,
                "ItemWord": "個",
                "ItemPrice": 100.0,
                "ItemAmount": 200
            })
        );
    }

    #[test]
    fn tax_is_included_when_set() {
        let item = InvoiceItem::new("Widget", 1.0, "pcs", 50.0, 50)
            .unwrap()
            .with_tax(3);
        assert_eq!(serde_json::to_value(&item).unwrap()["ItemTax"], 3);
    }

    #[test]
    fn name_rules() {
        assert!(InvoiceItem::new("  ", 1.0, "個", 1.0, 1).is_err());
        assert!(InvoiceItem::new(&"品".repeat(256), 1.0, "個", 1.0, 1).is_ok());
        assert!(InvoiceItem::new(&"品".repeat(257), 1.0, "個", 1.0, 1).is_err());
    }

    #[test]
    fn word_rules() {
        assert!(InvoiceItem::new("Widget", 1.0, "", 1.0, 1).is_err());
        assert!(InvoiceItem::new("Widget", 1.0, "abcdefg", 1.0, 1).is_err());
    }

    #[test]
    fn count_must_be_positive() {
        assert!(InvoiceItem::new("Widget", 0.0, "個", 1.0, 1).is_err());
        assert!(InvoiceItem::new("Widget", -1.0, "個", 1.0, 1).is_err());
        assert!(InvoiceItem::new("Widget", f64::NAN, "個", 1.0, 1).is_err());
        assert!(InvoiceItem::new("Widget", 0.5, "個", 1.0, 1).is_ok());
    }
}
