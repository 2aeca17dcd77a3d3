use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::catalog::{EquipmentListing, SearchCriteria, SortKey};
use super::insurance::InsuranceCatalog;
use super::money::Money;
use super::refund::{compute_refund, CancellationContext, RefundPolicyTier, RefundResult};
use super::rental::DurationOption;
use super::RentalPolicyEngine;
use crate::error::AppError;

/// Engine plus the listings searches run against, shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceContext {
    pub engine: RentalPolicyEngine,
    pub catalog: Vec<EquipmentListing>,
}

impl MarketplaceContext {
    pub fn new(engine: RentalPolicyEngine, catalog: Vec<EquipmentListing>) -> Self {
        Self { engine, catalog }
    }
}

/// Router builder exposing the booking, insurance, and catalog rules as JSON endpoints.
pub fn policy_router(context: Arc<MarketplaceContext>) -> Router {
    Router::new()
        .route("/api/v1/bookings/refund", post(refund_handler))
        .route("/api/v1/bookings/total", post(rental_total_handler))
        .route("/api/v1/insurance/plans", get(insurance_plans_handler))
        .route("/api/v1/insurance/quote", post(insurance_quote_handler))
        .route("/api/v1/catalog/search", post(catalog_search_handler))
        .with_state(context)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    pub total_amount: Money,
    pub hours_until_start: f64,
    /// Supplier-specific table; the configured marketplace table applies when absent.
    #[serde(default)]
    pub tiers: Option<Vec<RefundPolicyTier>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalTotalRequest {
    pub duration_options: Vec<DurationOption>,
    #[serde(default)]
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalTotalResponse {
    pub selected: Option<String>,
    pub total: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceQuoteRequest {
    #[serde(default)]
    pub equipment_value: Money,
    #[serde(default)]
    pub rental_duration_days: u32,
    pub plan_id: String,
    #[serde(default)]
    pub add_on_ids: Vec<String>,
}

/// Presentation copy of a premium quote, rounded to cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceQuoteView {
    pub plan_id: String,
    pub base_premium: Money,
    pub add_on_premium: Money,
    pub total_premium: Money,
    pub deductible: Money,
    pub within_coverage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSearchRequest {
    #[serde(flatten)]
    pub criteria: SearchCriteria,
    #[serde(default)]
    pub sort: Option<SortKey>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSearchResponse {
    pub count: usize,
    pub listings: Vec<EquipmentListing>,
}

pub(crate) async fn refund_handler(
    State(context): State<Arc<MarketplaceContext>>,
    Json(request): Json<RefundRequest>,
) -> Result<Json<RefundResult>, AppError> {
    let booking = CancellationContext::new(request.total_amount, request.hours_until_start);
    let result = match request.tiers.as_deref() {
        Some(tiers) => compute_refund(&booking, tiers)?,
        None => context.engine.refund(&booking)?,
    };
    Ok(Json(result))
}

pub(crate) async fn rental_total_handler(
    State(context): State<Arc<MarketplaceContext>>,
    Json(request): Json<RentalTotalRequest>,
) -> Result<Json<RentalTotalResponse>, AppError> {
    let total = context
        .engine
        .rental_total(&request.duration_options, request.selected.as_deref())?;
    Ok(Json(RentalTotalResponse {
        selected: request.selected,
        total,
    }))
}

pub(crate) async fn insurance_plans_handler(
    State(context): State<Arc<MarketplaceContext>>,
) -> Json<InsuranceCatalog> {
    Json(context.engine.config().insurance.clone())
}

pub(crate) async fn insurance_quote_handler(
    State(context): State<Arc<MarketplaceContext>>,
    Json(request): Json<InsuranceQuoteRequest>,
) -> Result<Json<InsuranceQuoteView>, AppError> {
    let plan = context.engine.config().insurance.plan(&request.plan_id)?;
    let quote = context
        .engine
        .insurance_quote(
            request.equipment_value,
            request.rental_duration_days,
            &request.plan_id,
            request.add_on_ids.as_slice(),
        )?
        .rounded();

    Ok(Json(InsuranceQuoteView {
        plan_id: plan.id.clone(),
        base_premium: quote.base_premium,
        add_on_premium: quote.add_on_premium,
        total_premium: quote.total_premium,
        deductible: plan.deductible,
        within_coverage: plan.covers(request.equipment_value),
    }))
}

pub(crate) async fn catalog_search_handler(
    State(context): State<Arc<MarketplaceContext>>,
    Json(request): Json<CatalogSearchRequest>,
) -> Json<CatalogSearchResponse> {
    let listings = context
        .engine
        .search(&context.catalog, &request.criteria, request.sort);
    Json(CatalogSearchResponse {
        count: listings.len(),
        listings,
    })
}
