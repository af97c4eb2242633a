use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Requested discount: a percentage or a fixed amount, never both.
///
/// A zero in either field means that mode is unused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountSpec {
    #[serde(default)]
    pub percentage: Decimal,
    #[serde(default)]
    pub fixed_amount: Decimal,
}

impl DiscountSpec {
    pub fn percentage(percentage: Decimal) -> Self {
        Self {
            percentage,
            fixed_amount: Decimal::ZERO,
        }
    }

    pub fn fixed(amount: Decimal) -> Self {
        Self {
            percentage: Decimal::ZERO,
            fixed_amount: amount,
        }
    }
}

/// Effect of a discount on a given subtotal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountOutcome {
    pub subtotal: Decimal,
    pub discounted_total: Decimal,
    pub discount_value: Decimal,
}
