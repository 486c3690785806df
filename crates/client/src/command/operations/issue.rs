use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use crate::command::params::{ExchangeMode, InvType, SpecialTaxType, TaxType, ZeroTaxRate};
use crate::command::{validate, Command, InvoiceItem, PayloadBuilder};

const PATH: &str = "/B2BInvoice/Issue";

/// Issue a B2B invoice.
#[derive(Debug, Clone)]
pub struct Issue {
    builder: PayloadBuilder,
    inv_type: InvType,
    tax_type: TaxType,
    items: Vec<InvoiceItem>,
}

impl Issue {
    /// Construct an [`Issue`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        builder.set("RelateNumber", "");
        builder.set("InvoiceDate", "");
        builder.set("InvType", InvType::General);
        builder.set("ExchangeMode", ExchangeMode::Exchange);
        for key in [
            "Buyer_Identifier",
            "Buyer_Name",
            "Buyer_Address",
            "Buyer_TelephoneNumber",
            "Buyer_FacsimileNumber",
            "Buyer_EmailAddress",
            "Buyer_CustomerNumber",
            "Buyer_RoleRemark",
            "Seller_CustomerNumber",
            "Seller_RoleRemark",
        ] {
            builder.set(key, "");
        }
        builder.set("TaxType", TaxType::Taxable);
        builder.set("ZeroTaxRateReason", "");
        builder.set("SpecialTaxType", "");
        builder.set("TaxRate", "");
        builder.set("SalesAmount", 0);
        builder.set("TaxAmount", 0);
        builder.set("TotalAmount", 0);
        builder.set("MainRemark", "");
        builder.set("Items", Value::Array(Vec::new()));
        Self {
            builder,
            inv_type: InvType::General,
            tax_type: TaxType::Taxable,
            items: Vec::new(),
        }
    }

    /// Set `RelateNumber`.
    pub fn relate_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::relate_number("RelateNumber", value, 30)?;
        self.builder.set("RelateNumber", value);
        Ok(self)
    }

    /// Set `InvoiceDate` (`yyyy-MM-dd`).
    pub fn invoice_date(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::date("InvoiceDate", value)?;
        self.builder.set("InvoiceDate", value);
        Ok(self)
    }

    /// Set `InvType`.
    pub fn inv_type(mut self, inv_type: InvType) -> Self {
        self.inv_type = inv_type;
        self.builder.set("InvType", inv_type);
        self
    }

    /// Set `ExchangeMode`.
    pub fn exchange_mode(mut self, mode: ExchangeMode) -> Self {
        self.builder.set("ExchangeMode", mode);
        self
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

    /// Set `Buyer_Address`.
    pub fn buyer_address(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_chars("Buyer_Address", value, 100)?;
        self.builder.set("Buyer_Address", value);
        Ok(self)
    }

    /// Set `Buyer_TelephoneNumber`, at most 26 bytes.
    pub fn buyer_telephone(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("Buyer_TelephoneNumber", value, 26)?;
        self.builder.set("Buyer_TelephoneNumber", value);
        Ok(self)
    }

    /// Set `Buyer_FacsimileNumber`, at most 26 bytes.
    pub fn buyer_fax(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("Buyer_FacsimileNumber", value, 26)?;
        self.builder.set("Buyer_FacsimileNumber", value);
        Ok(self)
    }

    /// Empty clears the address.
    pub fn buyer_email(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        if !value.is_empty() {
            validate::email("Buyer_EmailAddress", value)?;
        }
        let value = validate::max_bytes("Buyer_EmailAddress", value, 80)?;
        self.builder.set("Buyer_EmailAddress", value);
        Ok(self)
    }

    /// Set `Buyer_CustomerNumber`, at most 20 bytes.
    pub fn buyer_customer_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("Buyer_CustomerNumber", value, 20)?;
        self.builder.set("Buyer_CustomerNumber", value);
        Ok(self)
    }

    /// Set `Buyer_RoleRemark`.
    pub fn buyer_role_remark(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_chars("Buyer_RoleRemark", value, 40)?;
        self.builder.set("Buyer_RoleRemark", value);
        Ok(self)
    }

    /// Set `Seller_CustomerNumber`, at most 20 bytes.
    pub fn seller_customer_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("Seller_CustomerNumber", value, 20)?;
        self.builder.set("Seller_CustomerNumber", value);
        Ok(self)
    }

    /// Set `Seller_RoleRemark`.
    pub fn seller_role_remark(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_chars("Seller_RoleRemark", value, 40)?;
        self.builder.set("Seller_RoleRemark", value);
        Ok(self)
    }

    /// Set `TaxType`.
    pub fn tax_type(mut self, tax_type: TaxType) -> Self {
        self.tax_type = tax_type;
        self.builder.set("TaxType", tax_type);
        self
    }

    /// Shorthand for [`TaxType::Taxable`].
    pub fn taxable(self) -> Self {
        self.tax_type(TaxType::Taxable)
    }

    /// Shorthand for [`TaxType::TaxFree`].
    pub fn tax_free(self) -> Self {
        self.tax_type(TaxType::TaxFree)
    }

    /// Zero-rated, with the mandatory reason.
    pub fn zero_tax(mut self, reason: ZeroTaxRate) -> Self {
        self.builder.set("ZeroTaxRateReason", reason);
        self.tax_type(TaxType::ZeroTax)
    }

    /// Special tax, with the mandatory category.
    pub fn special_tax(mut self, kind: SpecialTaxType) -> Self {
        self.builder.set("SpecialTaxType", kind);
        self.tax_type(TaxType::SpecialTax)
    }

    /// Set `TaxRate` as a fraction, e.g. `0.05`.
    pub fn tax_rate(mut self, rate: f64) -> Self {
        self.builder.set("TaxRate", rate);
        self
    }

    /// Sales, tax and total amounts; none may be negative.
    pub fn amounts(mut self, sales: i64, tax: i64, total: i64) -> Result<Self, ValidationError> {
        for (field, amount) in [("SalesAmount", sales), ("TaxAmount", tax), ("TotalAmount", total)] {
            if amount < 0 {
                return Err(ValidationError::invalid(field, "cannot be negative"));
            }
            self.builder.set(field, amount);
        }
        Ok(self)
    }

    /// Set `MainRemark`.
    pub fn main_remark(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_chars("MainRemark", value, 200)?;
        self.builder.set("MainRemark", value);
        Ok(self)
    }

    /// Append a line item.
    pub fn add_item(mut self, item: InvoiceItem) -> Self {
        self.items.push(item);
        self
    }

    /// Line items added so far.
    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("RelateNumber")?;
        b.require("InvoiceDate")?;
        b.require("Buyer_Identifier")?;
        b.require("Buyer_Name")?;

        if !self.tax_type.allowed_for(self.inv_type) {
            let allowed = match self.inv_type {
                InvType::General => "1, 2 or 3",
                InvType::Special => "3 or 4",
            };
            return Err(ValidationError::invalid(
                "TaxType",
                &format!("must be {allowed} for InvType {}", self.inv_type),
            ));
        }
        if self.tax_type == TaxType::ZeroTax && b.is_blank("ZeroTaxRateReason") {
            return Err(ValidationError::new(
                "ZeroTaxRateReason",
                "ZeroTaxRateReason is required when TaxType is 2.",
            ));
        }
        if self.tax_type == TaxType::SpecialTax && b.is_blank("SpecialTaxType") {
            return Err(ValidationError::new(
                "SpecialTaxType",
                "SpecialTaxType is required when TaxType is 4.",
            ));
        }
        if b.get("TotalAmount").and_then(Value::as_i64).unwrap_or(0) <= 0 {
            return Err(ValidationError::invalid("TotalAmount", "must be greater than 0"));
        }
        if self.items.is_empty() {
            return Err(ValidationError::new("Items", "At least one item is required."));
        }
        Ok(())
    }
}

impl Command for Issue {
    fn transport_path(&self) -> &str {
        PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        self.validate()?;
        let items = serde_json::to_value(&self.items)
            .map_err(|e| ValidationError::invalid("Items", &e.to_string()))?;
        let mut builder = self.builder.clone();
        builder.set("Items", items);
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> Issue {
        Issue::new("2000132")
            .relate_number("TEST1")
            .unwrap()
            .invoice_date("2024-01-15")
            .unwrap()
            .buyer_identifier("97025978")
            .unwrap()
            .buyer_name("綠界科技股份有限公司")
            .unwrap()
            .amounts(100, 5, 105)
            .unwrap()
            .add_item(InvoiceItem::new("測試商品", 1.0, "個", 100.0, 100).unwrap())
    }

    #[test]
    fn builds_payload() {
        let payload = ready().payload().unwrap();
        let data = &payload["Data"];
        assert_eq!(payload["MerchantID"], "2000132");
        assert_eq!(data["MerchantID"], "2000132");
        assert_eq!(data["InvType"], "07");
        assert_eq!(data["ExchangeMode"], "1");
        assert_eq!(data["TaxType"], "1");
        assert_eq!(data["TotalAmount"], 105);
        assert_eq!(data["Items"][0]["ItemName"], "測試商品");
        assert!(payload["RqHeader"]["Timestamp"].is_i64());
    }

    #[test]
    fn path() {
        assert_eq!(Issue::new("2000132").transport_path(), "/B2BInvoice/Issue");
    }

    #[test]
    fn relate_number_rejects_symbols() {
        assert!(Issue::new("2000132").relate_number("TEST-1").is_err());
    }

    #[test]
    fn requires_items() {
        let issue = Issue::new("2000132")
            .relate_number("TEST1")
            .unwrap()
            .invoice_date("2024-01-15")
            .unwrap()
            .buyer_identifier("97025978")
            .unwrap()
            .buyer_name("ACME")
            .unwrap()
            .amounts(100, 5, 105)
            .unwrap();
        assert_eq!(issue.payload().unwrap_err().field.as_deref(), Some("Items"));
    }

    #[test]
    fn requires_relate_number() {
        let err = Issue::new("2000132").payload().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("RelateNumber"));
    }

    #[test]
    fn requires_positive_total() {
        let err = ready().amounts(0, 0, 0).unwrap().payload().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("TotalAmount"));
        assert!(ready().amounts(-1, 0, 1).is_err());
    }

    #[test]
    fn special_invoice_needs_matching_tax_type() {
        let err = ready().inv_type(InvType::Special).payload().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("TaxType"));

        let payload = ready()
            .inv_type(InvType::Special)
            .special_tax(SpecialTaxType::Golf10)
            .payload()
            .unwrap();
        assert_eq!(payload["Data"]["TaxType"], "4");
        assert_eq!(payload["Data"]["SpecialTaxType"], "2");
    }

    #[test]
    fn zero_tax_carries_reason() {
        let payload = ready()
            .zero_tax(ZeroTaxRate::CustomsExport)
            .payload()
            .unwrap();
        assert_eq!(payload["Data"]["TaxType"], "2");
        assert_eq!(payload["Data"]["ZeroTaxRateReason"], "2");

        let err = ready().tax_type(TaxType::ZeroTax).payload().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("ZeroTaxRateReason"));
    }

    #[test]
    fn buyer_email_rules() {
        assert!(ready().buyer_email("").is_ok());
        assert!(ready().buyer_email("buyer@example.com").is_ok());
        assert!(ready().buyer_email("not-an-email").is_err());
    }

    #[test]
    fn missing_merchant() {
        let err = Issue::new("").payload().unwrap_err();
        assert_eq!(err.field.as_deref(), Some("MerchantID"));
    }
}
