mod import;

pub use import::{CatalogImportError, CatalogImporter};

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::money::Money;

/// Whether a listing can currently be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Booked,
}

impl Availability {
    pub const fn label(self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Booked => "Booked",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "booked" => Some(Self::Booked),
            _ => None,
        }
    }
}

/// Read-only catalog entry published by a supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentListing {
    pub id: String,
    pub name: String,
    pub category: String,
    pub location: String,
    pub price_per_day: Money,
    pub rating: f32,
    pub availability: Availability,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Inclusive bounds on the daily price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Money,
    pub max: Money,
}

impl PriceRange {
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: Money) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: Money::ZERO,
            max: Money::MAX,
        }
    }
}

/// Filters selected on the search page. Every populated filter must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchCriteria {
    pub text: Option<String>,
    pub categories: BTreeSet<String>,
    pub price_range: PriceRange,
    pub min_rating: Option<f32>,
    pub location: Option<String>,
    pub available_only: bool,
}

/// Result ordering offered alongside search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
}

impl SortKey {
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "relevance" => Some(Self::Relevance),
            "price_asc" => Some(Self::PriceAsc),
            "price_desc" => Some(Self::PriceDesc),
            "rating_desc" => Some(Self::RatingDesc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct CriteriaMatcher<'a> {
    criteria: &'a SearchCriteria,
    text: Option<String>,
    location: Option<String>,
}

impl<'a> CriteriaMatcher<'a> {
    fn new(criteria: &'a SearchCriteria) -> Self {
        Self {
            criteria,
            text: normalized_needle(criteria.text.as_deref()),
            location: normalized_needle(criteria.location.as_deref()),
        }
    }

    fn matches(&self, listing: &EquipmentListing) -> bool {
        let text_matches = self.text.as_deref().map_or(true, |needle| {
            listing.name.to_lowercase().contains(needle)
                || listing.category.to_lowercase().contains(needle)
        });
        let category_matches = self.criteria.categories.is_empty()
            || self.criteria.categories.contains(&listing.category);
        let rating_matches = self
            .criteria
            .min_rating
            .map_or(true, |minimum| listing.rating >= minimum);
        let location_matches = self.location.as_deref().map_or(true, |needle| {
            listing.location.to_lowercase().contains(needle)
        });
        let availability_matches =
            !self.criteria.available_only || listing.availability == Availability::Available;

        text_matches
            && category_matches
            && self.criteria.price_range.contains(listing.price_per_day)
            && rating_matches
            && location_matches
            && availability_matches
    }
}

fn normalized_needle(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

/// Lazily yield the listings matching `criteria`, in catalog order.
///
/// The iterator borrows its inputs and can be cloned to restart the scan.
pub fn filter_catalog<'a>(
    listings: &'a [EquipmentListing],
    criteria: &'a SearchCriteria,
) -> impl Iterator<Item = &'a EquipmentListing> + Clone + 'a {
    let matcher = CriteriaMatcher::new(criteria);
    listings
        .iter()
        .filter(move |listing| matcher.matches(listing))
}

/// Filter and then order a catalog. Sorting is stable; `None` keeps catalog order.
pub fn search_catalog(
    listings: &[EquipmentListing],
    criteria: &SearchCriteria,
    sort: Option<SortKey>,
) -> Vec<EquipmentListing> {
    let mut results: Vec<EquipmentListing> = filter_catalog(listings, criteria).cloned().collect();

    match sort.unwrap_or_default() {
        SortKey::Relevance => {}
        SortKey::PriceAsc => results.sort_by(|a, b| a.price_per_day.cmp(&b.price_per_day)),
        SortKey::PriceDesc => results.sort_by(|a, b| b.price_per_day.cmp(&a.price_per_day)),
        SortKey::RatingDesc => results.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
    }

    results
}
