//! Fixed-point helpers for currency amounts.

use crate::core::error::{DonateError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Number of fractional digits every amount is carried with.
pub const CENT_SCALE: u32 = 2;

/// One cent.
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, CENT_SCALE);

/// Rounds to whole cents, halves away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders an amount with exactly two fractional digits, e.g. `3.30`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_cents(amount))
}

/// Parses a user supplied amount. Blank or non-numeric text is rejected, sign
/// is left for the caller to check.
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DonateError::InvalidInput("amount is required".to_string()));
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| DonateError::InvalidInput(format!("'{trimmed}' is not a number")))
}

pub mod serde_cents {
    //! Serializes a `Decimal` as a fixed two digit string.
    use super::format_amount;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_amount(*amount))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let text = String::deserialize(deserializer)?;
        Decimal::from_str(&text).map_err(D::Error::custom)
    }
}
