//! The merchant's list of trading partners.

use einvoice_common::ValidationError;
use serde_json::{Map, Value};

use crate::command::params::{CustomerType, ExchangeMode, MaintainAction};
use crate::command::{validate, Command, PayloadBuilder};

const PATH: &str = "/B2BInvoice/MaintainMerchantCustomerData";

/// Add, update or delete a trading partner.
#[derive(Debug, Clone)]
pub struct MaintainMerchantCustomerData {
    builder: PayloadBuilder,
}

impl MaintainMerchantCustomerData {
    /// Construct a [`MaintainMerchantCustomerData`] for `merchant_id`.
    pub fn new(merchant_id: &str) -> Self {
        let mut builder = PayloadBuilder::new(merchant_id);
        for key in [
            "Action",
            "CustomerNumber",
            "Identifier",
            "type",
            "CompanyName",
            "Address",
            "TelephoneNumber",
            "TradingSlang",
            "ExchangeMode",
            "EmailAddress",
            "SalesName",
            "ContactAddress",
        ] {
            builder.set(key, "");
        }
        Self { builder }
    }

    /// Set `Action`.
    pub fn action(mut self, action: MaintainAction) -> Self {
        self.builder.set("Action", action);
        self
    }

    /// Add a new trading partner.
    pub fn add(self) -> Self {
        self.action(MaintainAction::Add)
    }

    /// Update an existing trading partner.
    pub fn update(self) -> Self {
        self.action(MaintainAction::Update)
    }

    /// Remove a trading partner.
    pub fn delete(self) -> Self {
        self.action(MaintainAction::Delete)
    }

    /// Set `CustomerNumber`, at most 20 bytes.
    pub fn customer_number(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("CustomerNumber", value, 20)?;
        self.builder.set("CustomerNumber", value);
        Ok(self)
    }

    /// Set `Identifier`, eight digits.
    pub fn identifier(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::identifier("Identifier", value)?;
        self.builder.set("Identifier", value);
        Ok(self)
    }

    /// Set `type`.
    pub fn customer_type(mut self, kind: CustomerType) -> Self {
        self.builder.set("type", kind);
        self
    }

    /// Set `CompanyName`.
    pub fn company_name(mut self, value: &str) -> Self {
        self.builder.set("CompanyName", value.trim());
        self
    }

    /// Set `Address`.
    pub fn address(mut self, value: &str) -> Self {
        self.builder.set("Address", value.trim());
        self
    }

    /// Set `TelephoneNumber`.
    pub fn telephone_number(mut self, value: &str) -> Self {
        self.builder.set("TelephoneNumber", value.trim());
        self
    }

    /// Short name used on the trading floor.
    pub fn trading_slang(mut self, value: &str) -> Self {
        self.builder.set("TradingSlang", value.trim());
        self
    }

    /// Set `ExchangeMode`.
    pub fn exchange_mode(mut self, mode: ExchangeMode) -> Self {
        self.builder.set("ExchangeMode", mode);
        self
    }

    /// One or more addresses separated by `;`, at most 200 bytes in total.
    pub fn email_address(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::email_list("EmailAddress", value, 200)?;
        self.builder.set("EmailAddress", value);
        Ok(self)
    }

    /// Set `SalesName`, at most 20 bytes.
    pub fn sales_name(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("SalesName", value, 20)?;
        self.builder.set("SalesName", value);
        Ok(self)
    }

    /// Set `ContactAddress`, at most 100 bytes.
    pub fn contact_address(mut self, value: &str) -> Result<Self, ValidationError> {
        let value = validate::max_bytes("ContactAddress", value, 100)?;
        self.builder.set("ContactAddress", value);
        Ok(self)
    }
}

impl Command for MaintainMerchantCustomerData {
    fn transport_path(&self) -> &str {
        PATH
    }

    fn payload(&self) -> Result<Map<String, Value>, ValidationError> {
        let b = &self.builder;
        b.require_merchant()?;
        b.require("Action")?;
        b.require("Identifier")?;
        b.require("type")?;
        b.require("EmailAddress")?;
        if b.str("Action") == MaintainAction::Add.code() && b.is_blank("ExchangeMode") {
            return Err(ValidationError::new(
                "ExchangeMode",
                "ExchangeMode cannot be empty when adding.",
            ));
        }
        Ok(b.build())
    }
}
