use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::PolicyError;
use super::money::{Money, DISPLAY_SCALE};

/// Threshold of hours-before-start mapped to the share of the booking refunded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefundPolicyTier {
    pub min_hours: f64,
    pub refund_percentage: u8,
}

impl RefundPolicyTier {
    pub const fn new(min_hours: f64, refund_percentage: u8) -> Self {
        Self {
            min_hours,
            refund_percentage,
        }
    }

    /// Marketplace cancellation table applied when a supplier has not configured one.
    pub fn default_tiers() -> Vec<RefundPolicyTier> {
        vec![
            RefundPolicyTier::new(72.0, 100),
            RefundPolicyTier::new(48.0, 90),
            RefundPolicyTier::new(24.0, 75),
            RefundPolicyTier::new(0.0, 50),
        ]
    }
}

/// Booking being cancelled and how far away its start is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CancellationContext {
    pub total_amount: Money,
    pub hours_until_start: f64,
}

impl CancellationContext {
    pub fn new(total_amount: Money, hours_until_start: f64) -> Self {
        Self {
            total_amount,
            hours_until_start,
        }
    }

    /// Derive the lead time from the booking start and the moment of cancellation.
    pub fn from_schedule(
        total_amount: Money,
        starts_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, PolicyError> {
        let remaining = starts_at.signed_duration_since(now);
        if remaining < chrono::Duration::zero() {
            return Err(PolicyError::invalid(
                "starts_at",
                format!("rental started at {starts_at}, cancellation requested at {now}"),
            ));
        }

        // Millisecond counts stay exact in f64 for lead times under ~285,000 years.
        let hours = remaining.num_milliseconds() as f64 / 3_600_000.0;
        Ok(Self::new(total_amount, hours))
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if !self.hours_until_start.is_finite() {
            return Err(PolicyError::invalid(
                "hours_until_start",
                "must be a finite number",
            ));
        }
        if self.hours_until_start < 0.0 {
            return Err(PolicyError::invalid(
                "hours_until_start",
                format!("{} is negative", self.hours_until_start),
            ));
        }
        Ok(())
    }
}

/// Breakdown returned to the customer when a booking is cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundResult {
    pub refund_percentage: u8,
    pub cancellation_fee: Money,
    pub refund_amount: Money,
    pub policy_label: String,
}

/// Apply a tiered cancellation policy to a booking.
///
/// Tiers are evaluated from the highest `min_hours` down; equal thresholds keep their
/// declared order. When no threshold is reached, the lowest-percentage tier applies.
/// The total is first rounded half-to-even to cents. The refund is then rounded the
/// same way and the fee absorbs the remainder, so `cancellation_fee + refund_amount`
/// equals the cent-rounded booking total.
pub fn compute_refund(
    context: &CancellationContext,
    tiers: &[RefundPolicyTier],
) -> Result<RefundResult, PolicyError> {
    context.validate()?;
    validate_tiers(tiers)?;

    let ordered = ordered_by_threshold(tiers);
    let (tier, policy_label) = match ordered
        .iter()
        .position(|tier| context.hours_until_start >= tier.min_hours)
    {
        Some(index) => (ordered[index], tier_label(&ordered, index)),
        None => {
            // Non-empty tiers were validated above.
            let fallback = tiers
                .iter()
                .min_by_key(|tier| tier.refund_percentage)
                .ok_or_else(|| PolicyError::invalid("tiers", "no refund tiers configured"))?;
            let lowest = ordered
                .last()
                .map(|tier| tier.min_hours)
                .unwrap_or_default();
            (fallback, format!("Less than {lowest} hours before start"))
        }
    };

    // Split a cent-rounded total so both parts land on whole cents.
    let total = context.total_amount.rounded().amount();
    let refund = (total * Decimal::from(tier.refund_percentage) / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointNearestEven);
    let fee = total - refund;

    debug!(
        hours_until_start = context.hours_until_start,
        refund_percentage = tier.refund_percentage,
        %policy_label,
        "refund tier selected"
    );

    Ok(RefundResult {
        refund_percentage: tier.refund_percentage,
        cancellation_fee: Money::new(fee)?,
        refund_amount: Money::new(refund)?,
        policy_label,
    })
}

fn validate_tiers(tiers: &[RefundPolicyTier]) -> Result<(), PolicyError> {
    if tiers.is_empty() {
        return Err(PolicyError::invalid("tiers", "no refund tiers configured"));
    }

    for tier in tiers {
        if !tier.min_hours.is_finite() || tier.min_hours < 0.0 {
            return Err(PolicyError::invalid(
                "tiers",
                format!("threshold {} must be a finite, non-negative hour count", tier.min_hours),
            ));
        }
        if tier.refund_percentage > 100 {
            return Err(PolicyError::invalid(
                "tiers",
                format!("refund percentage {} exceeds 100", tier.refund_percentage),
            ));
        }
    }

    Ok(())
}

fn ordered_by_threshold(tiers: &[RefundPolicyTier]) -> Vec<&RefundPolicyTier> {
    let mut ordered: Vec<&RefundPolicyTier> = tiers.iter().collect();
    // Stable: tiers sharing a threshold stay in declared order.
    ordered.sort_by(|a, b| b.min_hours.total_cmp(&a.min_hours));
    ordered
}

fn tier_label(ordered: &[&RefundPolicyTier], index: usize) -> String {
    let tier = ordered[index];
    let upper = ordered[..index]
        .iter()
        .rev()
        .map(|candidate| candidate.min_hours)
        .find(|hours| *hours > tier.min_hours);

    match (tier.min_hours > 0.0, upper) {
        (true, None) => format!("{}+ hours before start", tier.min_hours),
        (true, Some(upper)) => format!("{}-{} hours before start", tier.min_hours, upper),
        (false, Some(upper)) => format!("Less than {upper} hours before start"),
        (false, None) => "Any time before start".to_string(),
    }
}
