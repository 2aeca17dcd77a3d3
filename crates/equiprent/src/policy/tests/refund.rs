use super::common::*;
use rust_decimal_macros::dec;

use crate::policy::{
    compute_refund, CancellationContext, Money, PolicyError, RefundPolicyTier,
    RentalPolicyEngine,
};

#[test]
fn refund_at_48_hours_returns_ninety_percent() {
    let result = compute_refund(&booking(2_500, 48.0), &RefundPolicyTier::default_tiers())
        .expect("refund computes");

    assert_eq!(result.refund_percentage, 90);
    assert_eq!(result.cancellation_fee.amount(), dec!(250));
    assert_eq!(result.refund_amount.amount(), dec!(2250));
    assert_eq!(result.policy_label, "48-72 hours before start");
}

#[test]
fn refund_inside_a_day_returns_half() {
    let result = compute_refund(&booking(2_500, 10.0), &RefundPolicyTier::default_tiers())
        .expect("refund computes");

    assert_eq!(result.refund_percentage, 50);
    assert_eq!(result.cancellation_fee.amount(), dec!(1250));
    assert_eq!(result.refund_amount.amount(), dec!(1250));
}

#[test]
fn tier_boundaries_are_inclusive_at_threshold() {
    let tiers = RefundPolicyTier::default_tiers();
    let percentage = |hours| {
        compute_refund(&booking(1_000, hours), &tiers)
            .expect("refund computes")
            .refund_percentage
    };

    assert_eq!(percentage(72.0), 100);
    assert_eq!(percentage(71.99), 90);
    assert_eq!(percentage(24.0), 75);
    assert_eq!(percentage(23.99), 50);
    assert_eq!(percentage(0.0), 50);
}

#[test]
fn fee_and_refund_always_sum_to_total() {
    let tiers = vec![
        RefundPolicyTier::new(96.0, 100),
        RefundPolicyTier::new(36.0, 67),
        RefundPolicyTier::new(12.0, 33),
        RefundPolicyTier::new(0.0, 0),
    ];
    let totals = [dec!(0), dec!(0.01), dec!(19.99), dec!(333.33), dec!(12457.87)];

    for total in totals {
        for hours in [0.0, 11.5, 12.0, 40.0, 200.0] {
            let context = CancellationContext::new(money(total), hours);
            let result = compute_refund(&context, &tiers).expect("refund computes");
            assert_eq!(
                result.cancellation_fee.amount() + result.refund_amount.amount(),
                total,
                "total {total} at {hours}h"
            );
        }
    }
}

#[test]
fn unmatched_hours_fall_back_to_lowest_percentage_tier() {
    let tiers = vec![
        RefundPolicyTier::new(48.0, 80),
        RefundPolicyTier::new(12.0, 25),
        RefundPolicyTier::new(24.0, 40),
    ];

    let result = compute_refund(&booking(400, 6.0), &tiers).expect("refund computes");
    assert_eq!(result.refund_percentage, 25);
    assert_eq!(result.refund_amount.amount(), dec!(100));
    assert_eq!(result.policy_label, "Less than 12 hours before start");
}

#[test]
fn tiers_are_evaluated_highest_threshold_first_regardless_of_order() {
    let tiers = vec![
        RefundPolicyTier::new(0.0, 50),
        RefundPolicyTier::new(72.0, 100),
        RefundPolicyTier::new(24.0, 75),
    ];

    let result = compute_refund(&booking(800, 80.0), &tiers).expect("refund computes");
    assert_eq!(result.refund_percentage, 100);

    let result = compute_refund(&booking(800, 30.0), &tiers).expect("refund computes");
    assert_eq!(result.refund_percentage, 75);
}

#[test]
fn shared_threshold_uses_first_declared_tier() {
    let tiers = vec![
        RefundPolicyTier::new(24.0, 60),
        RefundPolicyTier::new(24.0, 90),
        RefundPolicyTier::new(0.0, 10),
    ];

    let result = compute_refund(&booking(100, 30.0), &tiers).expect("refund computes");
    assert_eq!(result.refund_percentage, 60);
}

#[test]
fn invalid_hours_are_rejected() {
    let tiers = RefundPolicyTier::default_tiers();

    for hours in [-0.5, f64::NAN, f64::INFINITY] {
        let err = compute_refund(&booking(100, hours), &tiers).expect_err("invalid hours");
        assert!(
            matches!(
                err,
                PolicyError::InvalidInput {
                    field: "hours_until_start",
                    ..
                }
            ),
            "unexpected error for {hours}: {err:?}"
        );
    }
}

#[test]
fn malformed_tables_are_rejected() {
    let context = booking(100, 10.0);

    assert!(matches!(
        compute_refund(&context, &[]),
        Err(PolicyError::InvalidInput { field: "tiers", .. })
    ));
    assert!(matches!(
        compute_refund(&context, &[RefundPolicyTier::new(0.0, 120)]),
        Err(PolicyError::InvalidInput { field: "tiers", .. })
    ));
    assert!(matches!(
        compute_refund(&context, &[RefundPolicyTier::new(f64::NAN, 50)]),
        Err(PolicyError::InvalidInput { field: "tiers", .. })
    ));
}

#[test]
fn engine_applies_configured_table() {
    let engine = RentalPolicyEngine::default();
    let direct = compute_refund(&booking(2_500, 48.0), &RefundPolicyTier::default_tiers());

    assert_eq!(engine.refund(&booking(2_500, 48.0)), direct);
}

#[test]
fn ceiling_total_splits_without_overflow() {
    let tiers = RefundPolicyTier::default_tiers();

    let full = compute_refund(&CancellationContext::new(Money::MAX, 100.0), &tiers)
        .expect("refund computes");
    assert_eq!(full.refund_amount, Money::MAX);
    assert!(full.cancellation_fee.is_zero());

    let half = compute_refund(&CancellationContext::new(Money::MAX, 10.0), &tiers)
        .expect("refund computes");
    assert_eq!(half.refund_amount.amount(), dec!(500000000000000));
    assert_eq!(half.cancellation_fee.amount(), dec!(500000000000000));
}

#[test]
fn sub_cent_totals_are_split_on_whole_cents() {
    let tiers = RefundPolicyTier::default_tiers();
    let split = |total, hours| {
        let result = compute_refund(&CancellationContext::new(money(total), hours), &tiers)
            .expect("refund computes");
        (result.refund_amount.amount(), result.cancellation_fee.amount())
    };

    // Half-cent totals round to the even cent before the split.
    assert_eq!(split(dec!(0.005), 100.0), (dec!(0.00), dec!(0.00)));
    assert_eq!(split(dec!(0.015), 100.0), (dec!(0.02), dec!(0.00)));
    assert_eq!(split(dec!(10.125), 10.0), (dec!(5.06), dec!(5.06)));

    for total in [dec!(0.005), dec!(0.015), dec!(19.999), dec!(1234.5678)] {
        for hours in [0.0, 30.0, 50.0, 80.0] {
            let (refund, fee) = split(total, hours);
            assert!(refund.scale() <= 2 && fee.scale() <= 2, "{total} at {hours}h");
            assert!((refund + fee - total).abs() <= dec!(0.005), "{total} at {hours}h");
        }
    }
}
