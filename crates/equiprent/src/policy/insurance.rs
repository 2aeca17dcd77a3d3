use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::PolicyError;
use super::money::Money;

/// Days treated as one month when scaling monthly rates.
const DAYS_PER_MONTH: u32 = 30;

/// Damage protection plan priced as a monthly share of equipment value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePlan {
    pub id: String,
    pub name: String,
    pub monthly_rate_percent: Decimal,
    pub deductible: Money,
    pub max_coverage: Money,
}

impl InsurancePlan {
    pub fn covers(&self, equipment_value: Money) -> bool {
        equipment_value <= self.max_coverage
    }
}

/// Optional coverage bolted onto a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnCoverage {
    pub id: String,
    pub name: String,
    pub cost_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumQuoteInput {
    pub equipment_value: Money,
    pub rental_duration_days: u32,
    pub plan: InsurancePlan,
    pub add_ons: Vec<AddOnCoverage>,
}

/// Premium components at full precision; call [`PremiumQuoteResult::rounded`] to present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumQuoteResult {
    pub base_premium: Money,
    pub add_on_premium: Money,
    pub total_premium: Money,
}

impl PremiumQuoteResult {
    pub fn rounded(&self) -> Self {
        Self {
            base_premium: self.base_premium.rounded(),
            add_on_premium: self.add_on_premium.rounded(),
            total_premium: self.total_premium.rounded(),
        }
    }
}

/// Quote the premium for insuring equipment over a rental.
///
/// A zero equipment value or duration returns an all-zero quote so a partially
/// filled form can be re-quoted on every change. The plan is taken as given; each
/// premium component is clamped to `0..=Money::MAX`.
pub fn compute_premium_quote(input: &PremiumQuoteInput) -> PremiumQuoteResult {
    if input.equipment_value.is_zero() || input.rental_duration_days == 0 {
        debug!(
            equipment_value = %input.equipment_value,
            rental_duration_days = input.rental_duration_days,
            "premium inputs incomplete, returning zero quote"
        );
        return PremiumQuoteResult::default();
    }

    let value = input.equipment_value.amount();
    let months = Decimal::from(input.rental_duration_days) / Decimal::from(DAYS_PER_MONTH);
    let premium_for = |percent: Decimal| {
        let premium = value
            .checked_mul(percent)
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|amount| amount.checked_mul(months))
            .unwrap_or(if percent.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            });
        Money::saturating(premium)
    };

    let base_premium = premium_for(input.plan.monthly_rate_percent);
    let add_on_premium: Money = input
        .add_ons
        .iter()
        .map(|add_on| premium_for(add_on.cost_percent))
        .sum();

    PremiumQuoteResult {
        base_premium,
        add_on_premium,
        total_premium: base_premium + add_on_premium,
    }
}

/// Canonical plans and add-ons offered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceCatalog {
    pub plans: Vec<InsurancePlan>,
    pub add_ons: Vec<AddOnCoverage>,
}

impl Default for InsuranceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl InsuranceCatalog {
    pub fn standard() -> Self {
        Self {
            plans: vec![
                plan("basic", "Basic Protection", Decimal::new(25, 1), 5_000, 250_000),
                plan("standard", "Standard Protection", Decimal::new(40, 1), 2_500, 500_000),
                plan("premium", "Premium Protection", Decimal::new(60, 1), 1_000, 1_000_000),
            ],
            add_ons: vec![
                add_on("theft", "Theft & Vandalism", Decimal::new(15, 1)),
                add_on("operator", "Operator Liability", Decimal::new(10, 1)),
                add_on("transit", "Transit Coverage", Decimal::new(75, 2)),
            ],
        }
    }

    pub fn plan(&self, id: &str) -> Result<&InsurancePlan, PolicyError> {
        self.plans
            .iter()
            .find(|plan| plan.id == id)
            .ok_or_else(|| PolicyError::UnknownPlan { id: id.to_string() })
    }

    pub fn add_on(&self, id: &str) -> Result<&AddOnCoverage, PolicyError> {
        self.add_ons
            .iter()
            .find(|add_on| add_on.id == id)
            .ok_or_else(|| PolicyError::UnknownAddOn { id: id.to_string() })
    }

    /// Resolve plan and add-on ids against the catalog, then quote.
    pub fn quote<S: AsRef<str>>(
        &self,
        equipment_value: Money,
        rental_duration_days: u32,
        plan_id: &str,
        add_on_ids: &[S],
    ) -> Result<PremiumQuoteResult, PolicyError> {
        let plan = self.plan(plan_id)?.clone();
        let add_ons = add_on_ids
            .iter()
            .map(|id| self.add_on(id.as_ref()).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(compute_premium_quote(&PremiumQuoteInput {
            equipment_value,
            rental_duration_days,
            plan,
            add_ons,
        }))
    }
}

fn plan(id: &str, name: &str, rate: Decimal, deductible: u64, max_coverage: u64) -> InsurancePlan {
    InsurancePlan {
        id: id.to_string(),
        name: name.to_string(),
        monthly_rate_percent: rate,
        deductible: Money::whole(deductible),
        max_coverage: Money::whole(max_coverage),
    }
}

fn add_on(id: &str, name: &str, cost_percent: Decimal) -> AddOnCoverage {
    AddOnCoverage {
        id: id.to_string(),
        name: name.to_string(),
        cost_percent,
    }
}
