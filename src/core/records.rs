use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A charity that can receive part of a donation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Charity {
    pub id: u32,
    pub name: String,
    /// Payment receiver address
    pub email: String,
}

/// A fundraising goal owned by a user.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Application {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub goal_value: u32,
    pub goal_units_singular: String,
    pub goal_units_plural: String,
    pub charities: Vec<u32>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub is_active: bool,
}

impl Application {
    /// Lowercased name with spaces turned into dashes.
    pub fn slug_for(name: &str) -> String {
        name.replace(' ', "-").to_lowercase()
    }

    pub fn goal_units(&self, value: Decimal) -> &str {
        if value == Decimal::ONE {
            &self.goal_units_singular
        } else {
            &self.goal_units_plural
        }
    }
}

/// A donation for an application, keyed by the provider's payKey.
///
/// Stays inactive until the provider redirects back after a completed payment.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Donation {
    pub pay_key: String,
    pub application: String,
    pub amount: Decimal,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub application: String,
    pub value: Decimal,
    pub created: DateTime<Utc>,
}
