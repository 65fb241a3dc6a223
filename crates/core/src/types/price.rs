//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., đồng, not hào).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Create a VND price from a whole-đồng amount.
    #[must_use]
    pub fn vnd(amount: i64) -> Self {
        Self {
            amount: Decimal::from(amount),
            currency: CurrencyCode::VND,
        }
    }

    /// Format for display (e.g., `15.000đ`, `$4.99`).
    #[must_use]
    pub fn display(&self) -> String {
        match self.currency {
            CurrencyCode::VND => {
                let whole = self.amount.round().to_i64().unwrap_or(0);
                format!("{}{}", group_thousands(whole), self.currency.symbol())
            }
            CurrencyCode::USD => format!("{}{:.2}", self.currency.symbol(), self.amount),
        }
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Vietnamese đồng, the platform's default currency.
    #[default]
    VND,
    USD,
}

impl CurrencyCode {
    /// Currency symbol for display.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::VND => "đ",
            Self::USD => "$",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::VND => "VND",
            Self::USD => "USD",
        }
    }
}

/// Group a whole number with `.` thousands separators (Vietnamese convention).
fn group_thousands(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vnd_display() {
        assert_eq!(Price::vnd(15000).display(), "15.000đ");
        assert_eq!(Price::vnd(500).display(), "500đ");
        assert_eq!(Price::vnd(1_250_000).display(), "1.250.000đ");
        assert_eq!(Price::vnd(0).display(), "0đ");
    }

    #[test]
    fn test_usd_display() {
        let price = Price::new(Decimal::new(499, 2), CurrencyCode::USD);
        assert_eq!(price.display(), "$4.99");
    }

    #[test]
    fn test_group_thousands_negative() {
        assert_eq!(group_thousands(-15000), "-15.000");
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(CurrencyCode::VND.code(), "VND");
        assert_eq!(CurrencyCode::default(), CurrencyCode::VND);
    }
}
