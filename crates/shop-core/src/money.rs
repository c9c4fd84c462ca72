//! # Money Types
//!
//! Currency and price handling. Amounts are carried in the smallest
//! currency unit (pence, cents) and only converted to decimals for display.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    GBP,
    USD,
    EUR,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::GBP => "gbp",
            Currency::USD => "usd",
            Currency::EUR => "eur",
        }
    }

    /// Display symbol prefixed to formatted amounts
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::GBP => "£",
            Currency::USD => "$",
            Currency::EUR => "€",
        }
    }

    /// Convert a decimal amount to the smallest currency unit, rounding
    /// to the nearest unit
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        amount as f64 / 100.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::GBP
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (pence for GBP)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a new price from decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from smallest unit (pence)
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Format for display (e.g., "£10.00")
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency.symbol(), self.as_decimal())
    }
}
