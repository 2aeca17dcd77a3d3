use std::sync::Arc;

use axum::response::Response;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::policy::{
    policy_router, Availability, CancellationContext, EquipmentListing, InsurancePlan, Money,
    MarketplaceContext, RentalPolicyEngine,
};

pub(super) fn money(amount: Decimal) -> Money {
    Money::new(amount).expect("non-negative amount")
}

pub(super) fn booking(total: u64, hours_until_start: f64) -> CancellationContext {
    CancellationContext::new(Money::whole(total), hours_until_start)
}

pub(super) fn plan_with_rate(monthly_rate_percent: Decimal) -> InsurancePlan {
    InsurancePlan {
        id: "custom".to_string(),
        name: "Custom Protection".to_string(),
        monthly_rate_percent,
        deductible: Money::whole(2_500),
        max_coverage: Money::whole(500_000),
    }
}

fn listing(
    id: &str,
    name: &str,
    category: &str,
    location: &str,
    price_per_day: u64,
    rating: f32,
    availability: Availability,
) -> EquipmentListing {
    EquipmentListing {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        location: location.to_string(),
        price_per_day: Money::whole(price_per_day),
        rating,
        availability,
        tags: Vec::new(),
    }
}

pub(super) fn listings() -> Vec<EquipmentListing> {
    vec![
        listing(
            "eq-101",
            "CAT 320 Excavator",
            "Excavator",
            "Houston, TX",
            1_250,
            4.8,
            Availability::Available,
        ),
        listing(
            "eq-102",
            "Liebherr LTM 1100 Mobile Crane",
            "Crane",
            "Dallas, TX",
            5_200,
            4.9,
            Availability::Available,
        ),
        listing(
            "eq-103",
            "Kubota KX040 Mini Excavator",
            "Excavator",
            "Austin, TX",
            420,
            4.5,
            Availability::Booked,
        ),
        listing(
            "eq-104",
            "Genie S-65 Telescopic Boom",
            "Aerial Lift",
            "Houston, TX",
            380,
            4.5,
            Availability::Available,
        ),
        listing(
            "eq-105",
            "Grove RT890E Rough Terrain Crane",
            "Crane",
            "San Antonio, TX",
            2_800,
            4.6,
            Availability::Available,
        ),
        listing(
            "eq-106",
            "Bobcat T770 Track Loader",
            "Loader",
            "Dallas, TX",
            520,
            4.2,
            Availability::Booked,
        ),
    ]
}

pub(super) fn ids(listings: &[EquipmentListing]) -> Vec<&str> {
    listings.iter().map(|listing| listing.id.as_str()).collect()
}

pub(super) fn router() -> axum::Router {
    let context = MarketplaceContext::new(RentalPolicyEngine::default(), listings());
    policy_router(Arc::new(context))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn post_json(uri: &str, payload: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&payload).expect("serialize payload"),
        ))
        .expect("request builds")
}
