//! Coupon book
//!
//! In-process coupon administration and validation.

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{
    Coupon, CouponCode,
    validation::{CouponRejection, CouponValidator},
};

/// Coupon administration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponBookError {
    /// A coupon with this code already exists.
    #[error("coupon {0} already exists")]
    AlreadyExists(CouponCode),

    /// No coupon has this code.
    #[error("coupon {0} not found")]
    NotFound(CouponCode),
}

/// A coupon with its administrative state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    /// The coupon descriptor handed to carts
    #[serde(flatten)]
    pub coupon: Coupon,

    /// Whether the coupon may be redeemed
    #[serde(default = "default_active")]
    pub active: bool,

    /// When the coupon stops being redeemable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

fn default_active() -> bool {
    true
}

impl CouponRecord {
    /// An active coupon with no expiry.
    pub fn new(coupon: Coupon) -> Self {
        Self {
            coupon,
            active: true,
            expires_at: None,
        }
    }

    /// Set the expiry.
    #[must_use]
    pub fn expiring_at(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Coupons keyed by normalised code.
#[derive(Debug, Clone, Default)]
pub struct CouponBook {
    records: FxHashMap<CouponCode, CouponRecord>,
}

impl CouponBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book from records.
    ///
    /// # Errors
    ///
    /// Returns [`CouponBookError::AlreadyExists`] if two records share a code.
    pub fn with_records(
        records: impl IntoIterator<Item = CouponRecord>,
    ) -> Result<Self, CouponBookError> {
        let mut book = Self::new();

        for record in records {
            book.create_coupon(record)?;
        }

        Ok(book)
    }

    /// Add a coupon.
    ///
    /// # Errors
    ///
    /// Returns [`CouponBookError::AlreadyExists`] if the code is taken.
    pub fn create_coupon(&mut self, record: CouponRecord) -> Result<(), CouponBookError> {
        let code = record.coupon.code.clone();

        if self.records.contains_key(&code) {
            return Err(CouponBookError::AlreadyExists(code));
        }

        self.records.insert(code, record);

        Ok(())
    }

    /// Switch a coupon off without deleting it.
    ///
    /// # Errors
    ///
    /// Returns [`CouponBookError::NotFound`] if no coupon has the code.
    pub fn deactivate(&mut self, code: &CouponCode) -> Result<(), CouponBookError> {
        let record = self
            .records
            .get_mut(code)
            .ok_or_else(|| CouponBookError::NotFound(code.clone()))?;

        record.active = false;

        Ok(())
    }

    /// Delete a coupon, returning it if it existed.
    pub fn remove_coupon(&mut self, code: &CouponCode) -> Option<CouponRecord> {
        self.records.remove(code)
    }

    /// Every coupon, ordered by code.
    pub fn list(&self) -> Vec<&CouponRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.coupon.code.cmp(&b.coupon.code));

        records
    }

    /// Validate `code` for a cart at `subtotal` as of `now`.
    ///
    /// # Errors
    ///
    /// Returns the [`CouponRejection`] explaining why the code is not usable.
    pub fn validate_at(
        &self,
        code: &str,
        subtotal: u64,
        now: Timestamp,
    ) -> Result<Coupon, CouponRejection> {
        let code = CouponCode::parse(code).map_err(|_err| CouponRejection::Empty)?;
        let record = self.records.get(&code).ok_or(CouponRejection::Invalid)?;

        if !record.active {
            return Err(CouponRejection::Inactive);
        }

        if record.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(CouponRejection::Expired);
        }

        if !record.coupon.is_eligible(subtotal) {
            return Err(CouponRejection::MinimumPurchaseNotMet {
                min_purchase: record.coupon.min_purchase,
            });
        }

        debug!(coupon_code = %code, subtotal, "coupon accepted");

        Ok(record.coupon.clone())
    }
}

#[async_trait]
impl CouponValidator for CouponBook {
    async fn validate(&self, code: &str, subtotal: u64) -> Result<Coupon, CouponRejection> {
        self.validate_at(code, subtotal, Timestamp::now())
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::coupons::CouponDiscount;

    use super::*;

    fn book() -> Result<CouponBook, Box<dyn std::error::Error>> {
        Ok(CouponBook::with_records([
            CouponRecord::new(Coupon::new("SAVE10", CouponDiscount::percentage(10)?, 0)?),
            CouponRecord::new(Coupon::new("FLAT200", CouponDiscount::fixed(200), 1000)?),
        ])?)
    }

    #[test]
    fn matches_case_insensitively() -> TestResult {
        let coupon = book()?.validate_at(" save10 ", 500, Timestamp::now())?;

        assert_eq!(coupon.code.as_str(), "SAVE10");

        Ok(())
    }

    #[test]
    fn unknown_code_is_invalid() -> TestResult {
        let result = book()?.validate_at("NOPE", 500, Timestamp::now());

        assert_eq!(result, Err(CouponRejection::Invalid));

        Ok(())
    }

    #[test]
    fn blank_code_is_empty() -> TestResult {
        let result = book()?.validate_at("  ", 500, Timestamp::now());

        assert_eq!(result, Err(CouponRejection::Empty));

        Ok(())
    }

    #[test]
    fn below_minimum_is_rejected_with_threshold() -> TestResult {
        let result = book()?.validate_at("FLAT200", 999, Timestamp::now());

        assert_eq!(
            result,
            Err(CouponRejection::MinimumPurchaseNotMet { min_purchase: 1000 })
        );
        assert_eq!(
            result.map_err(|rejection| rejection.to_string()),
            Err("Minimum purchase not met".to_string())
        );

        Ok(())
    }

    #[test]
    fn deactivated_coupon_is_inactive() -> TestResult {
        let mut book = book()?;

        book.deactivate(&CouponCode::parse("SAVE10")?)?;

        assert_eq!(
            book.validate_at("SAVE10", 500, Timestamp::now()),
            Err(CouponRejection::Inactive)
        );

        Ok(())
    }

    #[test]
    fn expired_coupon_is_rejected() -> TestResult {
        let now = Timestamp::now();
        let coupon = Coupon::new("SUMMER", CouponDiscount::fixed(50), 0)?;
        let book =
            CouponBook::with_records([CouponRecord::new(coupon).expiring_at(now - 1.hour())])?;

        assert_eq!(
            book.validate_at("SUMMER", 500, now),
            Err(CouponRejection::Expired)
        );
        assert!(
            book.validate_at("SUMMER", 500, now - 2.hours()).is_ok(),
            "coupon should be valid before expiry"
        );

        Ok(())
    }

    #[test]
    fn create_rejects_duplicate_codes() -> TestResult {
        let mut book = book()?;

        let result = book.create_coupon(CouponRecord::new(Coupon::new(
            "save10",
            CouponDiscount::fixed(5),
            0,
        )?));

        assert_eq!(
            result,
            Err(CouponBookError::AlreadyExists(CouponCode::parse("SAVE10")?))
        );

        Ok(())
    }

    #[test]
    fn list_is_sorted_by_code() -> TestResult {
        let book = book()?;

        let codes: Vec<_> = book
            .list()
            .into_iter()
            .map(|record| record.coupon.code.as_str())
            .collect();

        assert_eq!(codes, ["FLAT200", "SAVE10"]);

        Ok(())
    }

    #[test]
    fn remove_then_validate_is_invalid() -> TestResult {
        let mut book = book()?;

        let removed = book.remove_coupon(&CouponCode::parse("SAVE10")?);

        assert!(removed.is_some(), "SAVE10 should have been removed");
        assert_eq!(
            book.validate_at("SAVE10", 500, Timestamp::now()),
            Err(CouponRejection::Invalid)
        );

        Ok(())
    }

    #[tokio::test]
    async fn validator_trait_uses_current_time() -> TestResult {
        let book = book()?;

        let coupon = book.validate("save10", 100).await?;

        assert_eq!(coupon.min_purchase, 0);

        Ok(())
    }
}
