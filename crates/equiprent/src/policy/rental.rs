use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::PolicyError;
use super::money::Money;

/// Billing periods a supplier can price a listing by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalDuration {
    Daily,
    Weekly,
    Monthly,
}

impl RentalDuration {
    pub const ALL: [RentalDuration; 3] = [
        RentalDuration::Daily,
        RentalDuration::Weekly,
        RentalDuration::Monthly,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            RentalDuration::Daily => "daily",
            RentalDuration::Weekly => "weekly",
            RentalDuration::Monthly => "monthly",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|duration| duration.key() == key.trim())
    }
}

/// One selectable period and the flat rate charged for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationOption {
    pub key: String,
    pub rate_per_unit: Money,
}

impl DurationOption {
    pub fn new(duration: RentalDuration, rate_per_unit: Money) -> Self {
        Self {
            key: duration.key().to_string(),
            rate_per_unit,
        }
    }
}

/// Daily, weekly, and monthly options in the order checkout presents them.
pub fn standard_duration_options(daily: Money, weekly: Money, monthly: Money) -> Vec<DurationOption> {
    vec![
        DurationOption::new(RentalDuration::Daily, daily),
        DurationOption::new(RentalDuration::Weekly, weekly),
        DurationOption::new(RentalDuration::Monthly, monthly),
    ]
}

/// Total charged for the selected period.
///
/// The selected option's rate is the total; periods are flat-priced rather than
/// prorated by day count. Nothing selected yields zero so checkout can recompute
/// while the form is incomplete.
pub fn compute_rental_total(
    options: &[DurationOption],
    selected: Option<&str>,
) -> Result<Money, PolicyError> {
    let key = match selected.map(str::trim) {
        Some(key) if !key.is_empty() => key,
        _ => return Ok(Money::ZERO),
    };

    options
        .iter()
        .find(|option| option.key == key)
        .map(|option| option.rate_per_unit)
        .ok_or_else(|| {
            debug!(key, "rental duration not offered");
            PolicyError::UnknownDuration {
                key: key.to_string(),
            }
        })
}
