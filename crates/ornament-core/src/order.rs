//! Marketplace order models
//!
//! These are read-only snapshots of what the order source returned for a
//! run. Nothing in the workspace mutates them after fetch.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One free-text personalization choice on a line item
/// (e.g. "Choose the Center Piece" = "Flake w/2024").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationField {
    pub name: String,
    pub value: String,
}

impl CustomizationField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A price with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (dollars, not cents).
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency_code: String,
}

impl Money {
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Build from the marketplace's `{amount, divisor}` pair
    /// (`2500 / 100` -> `25.00`). A zero divisor keeps the raw amount.
    pub fn from_minor(amount: i64, divisor: i64, currency_code: impl Into<String>) -> Self {
        let raw = Decimal::from(amount);
        let amount = raw.checked_div(Decimal::from(divisor)).unwrap_or(raw);
        Self::new(amount, currency_code)
    }

    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    fn symbol(&self) -> &str {
        match self.currency_code.as_str() {
            "USD" | "CAD" | "AUD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            _ => "",
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.symbol();
        if symbol.is_empty() {
            write!(f, "{:.2} {}", self.amount, self.currency_code)
        } else {
            write!(f, "{}{:.2}", symbol, self.amount)
        }
    }
}

/// A single purchased item with its personalization choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub sku: String,
    pub quantity: u32,
    pub price: Money,
    #[serde(default)]
    pub customizations: Vec<CustomizationField>,
}

impl OrderLineItem {
    pub fn new(sku: impl Into<String>, customizations: Vec<CustomizationField>) -> Self {
        Self {
            sku: sku.into(),
            quantity: 1,
            price: Money::zero("USD"),
            customizations,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_price(mut self, price: Money) -> Self {
        self.price = price;
        self
    }
}

/// A marketplace order (receipt) and its line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub receipt_id: String,
    pub buyer_name: String,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_message: Option<String>,
    #[serde(default)]
    pub line_items: Vec<OrderLineItem>,
}

impl Order {
    /// Anything the marketplace has not marked completed is still open.
    pub fn is_open(&self) -> bool {
        !self.status.trim().eq_ignore_ascii_case("completed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_minor() {
        let price = Money::from_minor(2500, 100, "USD");
        assert_eq!(price.amount, Decimal::new(2500, 2));
        assert_eq!(price.to_string(), "$25.00");
    }

    #[test]
    fn test_money_zero_divisor() {
        let price = Money::from_minor(12, 0, "USD");
        assert_eq!(price.amount, Decimal::from(12));
    }

    #[test]
    fn test_money_unknown_currency_display() {
        let price = Money::from_minor(1999, 100, "JPY");
        assert_eq!(price.to_string(), "19.99 JPY");
    }

    #[test]
    fn test_order_is_open() {
        let mut order = Order {
            receipt_id: "1".to_string(),
            buyer_name: "Jane".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            status: "Paid".to_string(),
            buyer_message: None,
            line_items: Vec::new(),
        };
        assert!(order.is_open());

        order.status = "Completed".to_string();
        assert!(!order.is_open());
    }
}
