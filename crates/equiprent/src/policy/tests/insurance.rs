use super::common::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::policy::{
    compute_premium_quote, AddOnCoverage, Money, PremiumQuoteInput, PremiumQuoteResult,
    RentalPolicyEngine,
};

fn theft_cover() -> AddOnCoverage {
    AddOnCoverage {
        id: "theft".to_string(),
        name: "Theft & Vandalism".to_string(),
        cost_percent: dec!(1.5),
    }
}

#[test]
fn thirty_day_rental_charges_one_month_of_plan_rate() {
    let quote = compute_premium_quote(&PremiumQuoteInput {
        equipment_value: Money::whole(50_000),
        rental_duration_days: 30,
        plan: plan_with_rate(dec!(4.0)),
        add_ons: Vec::new(),
    });

    assert_eq!(quote.base_premium.amount(), dec!(2000.00));
    assert!(quote.add_on_premium.is_zero());
    assert_eq!(quote.total_premium.amount(), dec!(2000.00));
}

#[test]
fn add_ons_scale_with_duration() {
    let quote = compute_premium_quote(&PremiumQuoteInput {
        equipment_value: Money::whole(50_000),
        rental_duration_days: 15,
        plan: plan_with_rate(dec!(4.0)),
        add_ons: vec![theft_cover()],
    });

    assert_eq!(quote.base_premium.amount(), dec!(1000.00));
    assert_eq!(quote.add_on_premium.amount(), dec!(375.00));
    assert_eq!(quote.total_premium.amount(), dec!(1375.00));
}

#[test]
fn incomplete_inputs_quote_zero() {
    let missing_value = compute_premium_quote(&PremiumQuoteInput {
        equipment_value: Money::ZERO,
        rental_duration_days: 15,
        plan: plan_with_rate(dec!(4.0)),
        add_ons: vec![theft_cover()],
    });
    let missing_days = compute_premium_quote(&PremiumQuoteInput {
        equipment_value: Money::whole(50_000),
        rental_duration_days: 0,
        plan: plan_with_rate(dec!(4.0)),
        add_ons: vec![theft_cover()],
    });

    assert_eq!(missing_value, PremiumQuoteResult::default());
    assert_eq!(missing_days, PremiumQuoteResult::default());
}

#[test]
fn rounding_happens_once_after_accumulation() {
    let cent_fraction = AddOnCoverage {
        id: "tiny".to_string(),
        name: "Tiny cover".to_string(),
        cost_percent: dec!(0.001),
    };
    let quote = compute_premium_quote(&PremiumQuoteInput {
        equipment_value: money(dec!(300)),
        rental_duration_days: 30,
        plan: plan_with_rate(dec!(0)),
        add_ons: vec![cent_fraction.clone(), cent_fraction.clone(), cent_fraction],
    });

    // Each add-on is 0.003; rounding them individually would yield zero.
    assert_eq!(quote.add_on_premium.amount(), dec!(0.009));
    assert_eq!(quote.rounded().total_premium.amount(), dec!(0.01));
}

#[test]
fn engine_resolves_catalog_ids() {
    let engine = RentalPolicyEngine::default();
    let quote = engine
        .insurance_quote(Money::whole(50_000), 15, "standard", &["theft"])
        .expect("catalog ids resolve");

    assert_eq!(quote.total_premium.amount(), dec!(1375));
}

#[test]
fn ceiling_equipment_value_quotes_without_overflow() {
    let engine = RentalPolicyEngine::default();
    let quote = engine
        .insurance_quote(Money::MAX, 30, "premium", &["theft", "operator", "transit"])
        .expect("catalog ids resolve");

    // 6% plus 1.5 + 1.0 + 0.75 percent of 10^15 for one month
    assert_eq!(quote.base_premium.amount(), dec!(60000000000000));
    assert_eq!(quote.add_on_premium.amount(), dec!(32500000000000));
    assert_eq!(quote.total_premium.amount(), dec!(92500000000000));

    let longest = engine
        .insurance_quote(Money::MAX, u32::MAX, "premium", &["theft"])
        .expect("catalog ids resolve");
    assert_eq!(longest.base_premium, Money::MAX);
    assert_eq!(longest.total_premium, Money::MAX);
}

#[test]
fn extreme_rates_clamp_instead_of_overflowing() {
    let quote_at = |rate| {
        compute_premium_quote(&PremiumQuoteInput {
            equipment_value: Money::MAX,
            rental_duration_days: 365,
            plan: plan_with_rate(rate),
            add_ons: Vec::new(),
        })
    };

    assert_eq!(quote_at(Decimal::MAX).total_premium, Money::MAX);
    assert!(quote_at(Decimal::MIN).total_premium.is_zero());
}
