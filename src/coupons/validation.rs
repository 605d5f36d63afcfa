//! Coupon validation protocol

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use super::Coupon;

/// Why a submitted coupon code was not accepted.
///
/// The messages are shown to customers as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CouponRejection {
    /// Nothing was entered.
    #[error("Enter a coupon code")]
    Empty,

    /// No coupon matches the code.
    #[error("Invalid coupon")]
    Invalid,

    /// The coupon exists but has been switched off.
    #[error("Coupon is no longer active")]
    Inactive,

    /// The coupon's expiry has passed.
    #[error("Coupon has expired")]
    Expired,

    /// The subtotal is below the coupon's threshold.
    #[error("Minimum purchase not met")]
    MinimumPurchaseNotMet {
        /// Threshold the subtotal must reach
        min_purchase: u64,
    },

    /// The validator could not be reached or failed.
    #[error("Coupon check unavailable: {0}")]
    Unavailable(String),
}

/// Validates submitted coupon codes.
#[automock]
#[async_trait]
pub trait CouponValidator: Send + Sync {
    /// Look up `code` (case-insensitively) for a cart at `subtotal`.
    async fn validate(&self, code: &str, subtotal: u64) -> Result<Coupon, CouponRejection>;
}
