use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::{Availability, EquipmentListing};
use crate::policy::money::Money;

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

/// Loads supplier listings from a CSV export.
///
/// Expected header: `id,name,category,location,price_per_day,rating,availability,tags`
/// where `tags` is a `;` separated list and may be empty.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<EquipmentListing>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<EquipmentListing>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();

        for record in csv_reader.deserialize::<CatalogRow>() {
            let row = record?;
            listings.push(row.into_listing(listings.len() as u64 + 2)?);
        }

        debug!(count = listings.len(), "catalog imported");
        Ok(listings)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    name: String,
    category: String,
    location: String,
    price_per_day: String,
    rating: f32,
    availability: String,
    #[serde(default, deserialize_with = "split_tags")]
    tags: Vec<String>,
}

impl CatalogRow {
    fn into_listing(self, line: u64) -> Result<EquipmentListing, CatalogImportError> {
        let invalid = |reason: String| CatalogImportError::InvalidRow { line, reason };

        let price = self
            .price_per_day
            .parse::<Decimal>()
            .map_err(|err| invalid(format!("price_per_day '{}': {err}", self.price_per_day)))?;
        let price_per_day = Money::new(price).map_err(|err| invalid(err.to_string()))?;

        if !(0.0..=5.0).contains(&self.rating) {
            return Err(invalid(format!("rating {} outside 0-5", self.rating)));
        }

        let availability = Availability::from_label(&self.availability)
            .ok_or_else(|| invalid(format!("unknown availability '{}'", self.availability)))?;

        Ok(EquipmentListing {
            id: self.id,
            name: self.name,
            category: self.category,
            location: self.location,
            price_per_day,
            rating: self.rating,
            availability,
            tags: self.tags,
        })
    }
}

fn split_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect())
}
