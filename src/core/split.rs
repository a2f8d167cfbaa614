//! Splits a donation across the charities that support an application.
use crate::core::error::{DonateError, Result};
use crate::core::money::{self, CENT};
use crate::core::records::Charity;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single payment line item handed to the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receiver {
    pub email: String,
    #[serde(with = "money::serde_cents")]
    pub amount: Decimal,
}

/// Divides `total_amount` evenly across `charities`, reconciled to the cent.
///
/// Each receiver gets `round(total / count, 2)`. Whatever drift that rounding
/// leaves is handed out one cent at a time in list order, so with the usual
/// single cent of drift only the first charity is adjusted. The returned
/// amounts always sum to `total_amount` rounded to cents.
pub fn split(total_amount: Decimal, charities: &[Charity]) -> Result<Vec<Receiver>> {
    if charities.is_empty() {
        return Err(DonateError::InvalidInput(
            "at least one charity is required to split a donation".to_string(),
        ));
    }

    let count = Decimal::from(charities.len());
    let base = money::round_cents(total_amount / count);
    let residual = base * count;
    let step = if residual > total_amount { -CENT } else { CENT };
    // the payout is reconciled to the total as it will be charged, in cents
    let total = money::round_cents(total_amount);
    let drift = total - residual;
    // |total / count - base| <= 0.005, so at most `count` cents ever need to move
    let mut pending = (drift / CENT).abs();

    debug!(%total, %base, %residual, %drift, "Splitting donation across {} charities", charities.len());

    let receivers = charities
        .iter()
        .map(|charity| {
            let mut amount = base;
            if pending > Decimal::ZERO {
                amount += step;
                pending -= Decimal::ONE;
            }
            Receiver {
                email: charity.email.clone(),
                amount,
            }
        })
        .collect();

    Ok(receivers)
}
