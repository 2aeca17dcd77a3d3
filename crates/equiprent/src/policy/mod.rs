//! Pricing, cancellation, insurance, and catalog rules behind booking and checkout.
//!
//! Every rule is a pure function over plain input records. [`RentalPolicyEngine`] bundles
//! the configured refund table and insurance catalog so callers do not have to thread
//! them through each call.

pub mod catalog;
mod errors;
pub mod insurance;
pub mod money;
pub mod refund;
pub mod rental;
pub mod router;

#[cfg(test)]
mod tests;

pub use catalog::{
    filter_catalog, search_catalog, Availability, CatalogImportError, CatalogImporter,
    EquipmentListing, PriceRange, SearchCriteria, SortKey,
};
pub use errors::PolicyError;
pub use insurance::{
    compute_premium_quote, AddOnCoverage, InsuranceCatalog, InsurancePlan, PremiumQuoteInput,
    PremiumQuoteResult,
};
pub use money::Money;
pub use refund::{compute_refund, CancellationContext, RefundPolicyTier, RefundResult};
pub use rental::{compute_rental_total, standard_duration_options, DurationOption, RentalDuration};
pub use router::{policy_router, MarketplaceContext};

/// Settings a deployment can tune without code changes.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyConfig {
    pub refund_tiers: Vec<RefundPolicyTier>,
    pub insurance: InsuranceCatalog,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            refund_tiers: RefundPolicyTier::default_tiers(),
            insurance: InsuranceCatalog::standard(),
        }
    }
}

/// Stateless facade applying the configured tables to each request.
#[derive(Debug, Clone, Default)]
pub struct RentalPolicyEngine {
    config: PolicyConfig,
}

impl RentalPolicyEngine {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn refund(&self, context: &CancellationContext) -> Result<RefundResult, PolicyError> {
        compute_refund(context, &self.config.refund_tiers)
    }

    pub fn rental_total(
        &self,
        options: &[DurationOption],
        selected: Option<&str>,
    ) -> Result<Money, PolicyError> {
        compute_rental_total(options, selected)
    }

    pub fn premium_quote(&self, input: &PremiumQuoteInput) -> PremiumQuoteResult {
        compute_premium_quote(input)
    }

    pub fn insurance_quote<S: AsRef<str>>(
        &self,
        equipment_value: Money,
        rental_duration_days: u32,
        plan_id: &str,
        add_on_ids: &[S],
    ) -> Result<PremiumQuoteResult, PolicyError> {
        self.config
            .insurance
            .quote(equipment_value, rental_duration_days, plan_id, add_on_ids)
    }

    pub fn search(
        &self,
        listings: &[EquipmentListing],
        criteria: &SearchCriteria,
        sort: Option<SortKey>,
    ) -> Vec<EquipmentListing> {
        search_catalog(listings, criteria, sort)
    }
}
