use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::errors::PolicyError;

/// Places kept when an amount is presented to a customer.
pub const DISPLAY_SCALE: u32 = 2;

/// Non-negative amount in the marketplace currency, capped at [`Money::MAX`].
///
/// Full precision is carried through arithmetic; [`Money::rounded`] applies the
/// round-half-even presentation rule. The cap keeps every product the engine forms
/// well inside `Decimal` range.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    /// One quadrillion (10^15) currency units.
    pub const MAX: Money = Money(Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0));

    pub fn new(amount: Decimal) -> Result<Self, PolicyError> {
        if amount < Decimal::ZERO {
            return Err(PolicyError::invalid(
                "amount",
                format!("{amount} is negative"),
            ));
        }
        if amount > Self::MAX.0 {
            return Err(PolicyError::invalid(
                "amount",
                format!("{amount} exceeds the {} ceiling", Self::MAX.0),
            ));
        }
        Ok(Self(amount))
    }

    /// Whole currency units, e.g. a catalog price of 4200. Clamped to [`Money::MAX`].
    pub fn whole(units: u64) -> Self {
        Self::saturating(Decimal::from(units))
    }

    /// Clamps intermediates into `0..=Money::MAX`.
    pub(crate) fn saturating(amount: Decimal) -> Self {
        Self(amount.clamp(Decimal::ZERO, Self::MAX.0))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn rounded(&self) -> Money {
        Self(
            self.0
                .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointNearestEven),
        )
    }
}

impl TryFrom<Decimal> for Money {
    type Error = PolicyError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::saturating(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money::saturating(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.rounded().0;
        value.rescale(DISPLAY_SCALE);
        write!(f, "{value}")
    }
}
