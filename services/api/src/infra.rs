use chrono::{DateTime, NaiveDateTime, Utc};
use equiprent::error::AppError;
use equiprent::policy::{CatalogImporter, EquipmentListing, Money, RentalDuration, SortKey};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

const SAMPLE_CATALOG: &str = include_str!("../data/sample_catalog.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Listings from a supplier CSV export, or the bundled sample catalog.
pub(crate) fn load_catalog(path: Option<&Path>) -> Result<Vec<EquipmentListing>, AppError> {
    let listings = match path {
        Some(path) => {
            let listings = CatalogImporter::from_path(path)?;
            info!(path = %path.display(), count = listings.len(), "catalog loaded from csv");
            listings
        }
        None => CatalogImporter::from_reader(Cursor::new(SAMPLE_CATALOG))?,
    };
    Ok(listings)
}

pub(crate) fn parse_money(raw: &str) -> Result<Money, String> {
    let amount = raw
        .trim()
        .trim_start_matches('$')
        .replace(',', "")
        .parse::<Decimal>()
        .map_err(|err| format!("failed to parse '{raw}' as an amount ({err})"))?;
    Money::new(amount).map_err(|err| err.to_string())
}

pub(crate) fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|err| {
            format!("failed to parse '{raw}' as RFC 3339 or YYYY-MM-DD HH:MM ({err})")
        })
}

pub(crate) fn parse_duration(raw: &str) -> Result<RentalDuration, String> {
    RentalDuration::from_key(raw)
        .ok_or_else(|| format!("unknown rental duration '{raw}' (daily, weekly, monthly)"))
}

pub(crate) fn parse_sort(raw: &str) -> Result<SortKey, String> {
    SortKey::from_label(raw).ok_or_else(|| {
        format!("unknown sort '{raw}' (relevance, price_asc, price_desc, rating_desc)")
    })
}
