//! Discounts
//!
//! Turns a coupon and a subtotal into the discount amount the cart shows.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use thiserror::Error;

use crate::coupons::{Coupon, CouponDiscount};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be represented in whole units.
    #[error("percentage conversion overflowed")]
    PercentConversion,
}

/// Calculate `percent` of `amount`, rounding halves up to a whole unit.
///
/// `percent` is in percent points, so `10` means 10%.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the result overflows or is negative.
pub fn percent_of(percent: Decimal, amount: u64) -> Result<u64, DiscountError> {
    Decimal::from(amount)
        .checked_mul(percent)
        .and_then(|applied| applied.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(DiscountError::PercentConversion)
}

/// Discount a coupon gives on `subtotal`.
///
/// Zero when there is no coupon or the subtotal is below its minimum purchase.
/// Fixed discounts are returned as-is, even when larger than the subtotal; the
/// total is floored separately.
pub fn discount_amount(coupon: Option<&Coupon>, subtotal: u64) -> u64 {
    let Some(coupon) = coupon else {
        return 0;
    };

    if !coupon.is_eligible(subtotal) {
        return 0;
    }

    match coupon.discount {
        CouponDiscount::Percentage(percent) => {
            let percent = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

            // Bounded by `subtotal` once clamped, so the fallback is never taken.
            percent_of(percent, subtotal).unwrap_or(subtotal)
        }
        CouponDiscount::Fixed(amount) => amount,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::coupons::{CouponCode, CouponError};

    use super::*;

    fn coupon(discount: CouponDiscount, min_purchase: u64) -> Result<Coupon, CouponError> {
        Coupon::new("TEST", discount, min_purchase)
    }

    #[test]
    fn percent_of_rounds_half_up() -> TestResult {
        assert_eq!(percent_of(Decimal::TEN, 1398)?, 140);
        assert_eq!(percent_of(Decimal::TEN, 1395)?, 140);
        assert_eq!(percent_of(Decimal::TEN, 1394)?, 139);

        Ok(())
    }

    #[test]
    fn percent_of_handles_fractional_percentages() -> TestResult {
        let percent = Decimal::new(125, 1);

        assert_eq!(percent_of(percent, 1000)?, 125);

        Ok(())
    }

    #[test]
    fn percent_of_negative_returns_error() {
        let result = percent_of(Decimal::NEGATIVE_ONE, 100);

        assert_eq!(result, Err(DiscountError::PercentConversion));
    }

    #[test]
    fn percent_of_overflow_returns_error() {
        let result = percent_of(Decimal::MAX, u64::MAX);

        assert_eq!(result, Err(DiscountError::PercentConversion));
    }

    #[test]
    fn no_coupon_gives_nothing() {
        assert_eq!(discount_amount(None, 1000), 0);
    }

    #[test]
    fn below_min_purchase_gives_nothing() -> TestResult {
        let coupon = coupon(CouponDiscount::fixed(100), 500)?;

        assert_eq!(discount_amount(Some(&coupon), 300), 0);
        assert_eq!(discount_amount(Some(&coupon), 500), 100);

        Ok(())
    }

    #[test]
    fn fixed_discount_is_not_capped() -> TestResult {
        let coupon = coupon(CouponDiscount::fixed(1000), 0)?;

        assert_eq!(discount_amount(Some(&coupon), 499), 1000);

        Ok(())
    }

    #[test]
    fn out_of_range_percentage_is_clamped() -> TestResult {
        let coupon = Coupon {
            code: CouponCode::parse("WILD")?,
            discount: CouponDiscount::Percentage(Decimal::from(250)),
            min_purchase: 0,
        };

        assert_eq!(discount_amount(Some(&coupon), 400), 400);

        Ok(())
    }
}
