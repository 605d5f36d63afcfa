//! Coupons

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod book;
pub mod validation;

/// Errors raised while constructing a coupon.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The code was empty after trimming.
    #[error("coupon code cannot be empty")]
    EmptyCode,

    /// Percentage value outside `[0, 100]`.
    #[error("percentage must be between 0 and 100, got {0}")]
    PercentageOutOfRange(Decimal),
}

/// Coupon code, trimmed and upper-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalise a submitted code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] if nothing is left after trimming.
    pub fn parse(code: &str) -> Result<Self, CouponError> {
        let code = code.trim();

        if code.is_empty() {
            return Err(CouponError::EmptyCode);
        }

        Ok(Self(code.to_uppercase()))
    }

    /// Borrow the normalised code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

/// How a coupon reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CouponDiscount {
    /// Percentage of the subtotal, in `[0, 100]` (e.g. `10` for "10% off")
    Percentage(Decimal),

    /// Fixed amount off, in whole currency units (e.g. "₹100 off")
    Fixed(u64),
}

impl CouponDiscount {
    /// Create a percentage discount.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::PercentageOutOfRange`] unless `0 <= percent <= 100`.
    pub fn percentage(percent: impl Into<Decimal>) -> Result<Self, CouponError> {
        let percent = percent.into();

        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(CouponError::PercentageOutOfRange(percent));
        }

        Ok(Self::Percentage(percent))
    }

    /// Create a fixed-amount discount.
    pub fn fixed(amount: u64) -> Self {
        Self::Fixed(amount)
    }
}

impl fmt::Display for CouponDiscount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage(percent) => write!(f, "{}% off", percent.normalize()),
            Self::Fixed(amount) => write!(f, "{amount} off"),
        }
    }
}

/// A coupon descriptor as attached to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    /// Normalised code
    pub code: CouponCode,

    /// Discount rule
    pub discount: CouponDiscount,

    /// Subtotal below which the coupon gives nothing, in whole currency units
    #[serde(default)]
    pub min_purchase: u64,
}

impl Coupon {
    /// Create a coupon from a raw code.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError::EmptyCode`] if the code is blank.
    pub fn new(code: &str, discount: CouponDiscount, min_purchase: u64) -> Result<Self, CouponError> {
        Ok(Self {
            code: CouponCode::parse(code)?,
            discount,
            min_purchase,
        })
    }

    /// Whether `subtotal` reaches the minimum purchase.
    pub fn is_eligible(&self, subtotal: u64) -> bool {
        subtotal >= self.min_purchase
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn code_is_trimmed_and_upper_cased() -> TestResult {
        let code = CouponCode::parse("  save10 ")?;

        assert_eq!(code.as_str(), "SAVE10");

        Ok(())
    }

    #[test]
    fn blank_code_is_rejected() {
        assert_eq!(CouponCode::parse("   "), Err(CouponError::EmptyCode));
    }

    #[test]
    fn percentage_bounds_are_inclusive() -> TestResult {
        CouponDiscount::percentage(0)?;
        CouponDiscount::percentage(100)?;

        assert_eq!(
            CouponDiscount::percentage(101),
            Err(CouponError::PercentageOutOfRange(Decimal::from(101)))
        );
        assert_eq!(
            CouponDiscount::percentage(-1),
            Err(CouponError::PercentageOutOfRange(Decimal::from(-1)))
        );

        Ok(())
    }

    #[test]
    fn eligibility_uses_min_purchase() -> TestResult {
        let coupon = Coupon::new("BIG", CouponDiscount::fixed(100), 500)?;

        assert!(!coupon.is_eligible(499));
        assert!(coupon.is_eligible(500));

        Ok(())
    }

    #[test]
    fn serialized_code_is_normalised_on_read() -> TestResult {
        let json = r#"{"code":"save10","discount":{"type":"percentage","value":"10"},"min_purchase":0}"#;

        let coupon: Coupon = serde_json::from_str(json)?;

        assert_eq!(coupon.code.as_str(), "SAVE10");
        assert_eq!(coupon.discount, CouponDiscount::Percentage(Decimal::TEN));

        Ok(())
    }

    #[test]
    fn discount_display() -> TestResult {
        assert_eq!(CouponDiscount::percentage(10)?.to_string(), "10% off");
        assert_eq!(CouponDiscount::fixed(250).to_string(), "250 off");

        Ok(())
    }
}
