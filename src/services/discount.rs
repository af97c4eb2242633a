//! Discount calculation over an undiscounted subtotal.
//!
//! The calculator is pure. Callers always pass the bill's undiscounted
//! subtotal, so a second discount supersedes the first instead of stacking.

use crate::{
    errors::ServiceError,
    models::{round_money, DiscountOutcome, DiscountSpec},
};
use rust_decimal::Decimal;

/// Applies `spec` to `subtotal`.
///
/// Checks run in this order: negative values, both modes at once, fixed
/// amount above the subtotal. The discounted total is rounded to cents and
/// never goes below zero.
pub fn apply(subtotal: Decimal, spec: &DiscountSpec) -> Result<DiscountOutcome, ServiceError> {
    if spec.percentage < Decimal::ZERO || spec.fixed_amount < Decimal::ZERO {
        return Err(ServiceError::NegativeDiscount);
    }

    if spec.percentage > Decimal::ZERO && spec.fixed_amount > Decimal::ZERO {
        return Err(ServiceError::AmbiguousDiscountMode);
    }

    if spec.fixed_amount > subtotal {
        return Err(ServiceError::DiscountExceedsTotal {
            amount: spec.fixed_amount,
            subtotal,
        });
    }

    let discounted = if spec.percentage > Decimal::ZERO {
        subtotal * (Decimal::ONE - spec.percentage / Decimal::ONE_HUNDRED)
    } else {
        subtotal - spec.fixed_amount
    };
    let discounted_total = round_money(discounted.max(Decimal::ZERO));

    Ok(DiscountOutcome {
        subtotal,
        discounted_total,
        discount_value: subtotal - discounted_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn ten_percent_of_a_thousand() {
        let outcome = apply(dec!(1000), &DiscountSpec::percentage(dec!(10))).unwrap();
        assert_eq!(outcome.discounted_total, dec!(900.00));
        assert_eq!(outcome.discount_value, dec!(100.00));
    }

    #[test]
    fn fixed_amount_is_subtracted() {
        let outcome = apply(dec!(500), &DiscountSpec::fixed(dec!(75.50))).unwrap();
        assert_eq!(outcome.discounted_total, dec!(424.50));
        assert_eq!(outcome.discount_value, dec!(75.50));
    }

    #[test]
    fn fixed_amount_above_subtotal_is_rejected() {
        let err = apply(dec!(500), &DiscountSpec::fixed(dec!(600))).unwrap_err();
        assert_matches!(
            err,
            ServiceError::DiscountExceedsTotal { amount, subtotal }
                if amount == dec!(600) && subtotal == dec!(500)
        );
    }

    #[test]
    fn both_modes_at_once_are_rejected() {
        let spec = DiscountSpec {
            percentage: dec!(10),
            fixed_amount: dec!(50),
        };
        assert_matches!(
            apply(dec!(500), &spec),
            Err(ServiceError::AmbiguousDiscountMode)
        );
    }

    #[test]
    fn negative_values_are_rejected_before_anything_else() {
        let spec = DiscountSpec {
            percentage: dec!(-5),
            fixed_amount: dec!(50),
        };
        assert_matches!(apply(dec!(10), &spec), Err(ServiceError::NegativeDiscount));
        assert_matches!(
            apply(dec!(10), &DiscountSpec::fixed(dec!(-1))),
            Err(ServiceError::NegativeDiscount)
        );
    }

    #[test]
    fn zero_spec_means_no_discount() {
        let outcome = apply(dec!(250), &DiscountSpec::default()).unwrap();
        assert_eq!(outcome.discounted_total, dec!(250));
        assert_eq!(outcome.discount_value, Decimal::ZERO);
    }

    #[test]
    fn percentage_above_hundred_floors_at_zero() {
        let outcome = apply(dec!(80), &DiscountSpec::percentage(dec!(150))).unwrap();
        assert_eq!(outcome.discounted_total, Decimal::ZERO);
        assert_eq!(outcome.discount_value, dec!(80));
    }

    #[test]
    fn percentage_result_is_rounded_to_cents() {
        let outcome = apply(dec!(99.99), &DiscountSpec::percentage(dec!(15))).unwrap();
        // 99.99 * 0.85 = 84.9915
        assert_eq!(outcome.discounted_total, dec!(84.99));
        assert_eq!(outcome.discount_value, dec!(15.00));
    }
}
