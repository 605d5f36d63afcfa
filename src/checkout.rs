//! Checkout
//!
//! Caller-side glue between the cart ledger and its collaborators. The
//! collaborators are awaited here; the ledger is only touched once a verdict
//! has arrived, so abandoning a pending future leaves the cart as it was.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    coupons::{
        Coupon,
        validation::{CouponRejection, CouponValidator},
    },
    ledger::{CartLedger, LedgerError},
    orders::{
        DeliveryAddress, OrderConfirmation, OrderRejection, OrderRequest, OrderSubmitter,
        PaymentMethod,
    },
    storage::KeyValueStore,
};

/// Errors raised while applying a coupon code.
#[derive(Debug, Error)]
pub enum ApplyCouponError {
    /// The validator did not accept the code; the cart is unchanged.
    #[error(transparent)]
    Rejected(#[from] CouponRejection),

    /// The accepted coupon could not be persisted.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// A required address field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The order endpoint refused or failed; the cart is kept for a retry.
    #[error(transparent)]
    Rejected(#[from] OrderRejection),
}

/// Details collected on the checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutDetails {
    /// Service address and contact
    pub address: DeliveryAddress,

    /// Payment method
    pub payment: PaymentMethod,
}

/// Validate `code` against the current subtotal and apply it on success.
///
/// On rejection the applied coupon, if any, is left in place.
///
/// # Errors
///
/// - [`ApplyCouponError::Rejected`]: the validator's reason, for display.
/// - [`ApplyCouponError::Ledger`]: the coupon was applied but not persisted.
pub async fn apply_coupon_code<S, V>(
    ledger: &mut CartLedger<S>,
    validator: &V,
    code: &str,
) -> Result<Coupon, ApplyCouponError>
where
    S: KeyValueStore,
    V: CouponValidator + ?Sized,
{
    if code.trim().is_empty() {
        return Err(CouponRejection::Empty.into());
    }

    let coupon = match validator.validate(code, ledger.subtotal()).await {
        Ok(coupon) => coupon,
        Err(rejection) => {
            info!(reason = %rejection, "coupon rejected");
            return Err(rejection.into());
        }
    };

    ledger.apply_coupon(coupon.clone())?;

    Ok(coupon)
}

/// Submit the cart as an order and clear it once the order is confirmed.
///
/// The submitter is called at most once. If it fails, the cart is kept so
/// the customer can retry. If the order is confirmed but the emptied cart
/// cannot be persisted, the confirmation is still returned.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`]: nothing was submitted.
/// - [`CheckoutError::MissingField`]: nothing was submitted.
/// - [`CheckoutError::Rejected`]: the submitter's reason; the cart is unchanged.
pub async fn place_order<S, O>(
    ledger: &mut CartLedger<S>,
    submitter: &O,
    details: CheckoutDetails,
) -> Result<OrderConfirmation, CheckoutError>
where
    S: KeyValueStore,
    O: OrderSubmitter + ?Sized,
{
    if ledger.cart().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    if let Some(field) = details.address.first_missing_field() {
        return Err(CheckoutError::MissingField(field));
    }

    let request = OrderRequest::from_cart(ledger.cart(), details.address, details.payment);

    let confirmation = match submitter.submit(request).await {
        Ok(confirmation) => confirmation,
        Err(rejection) => {
            warn!(reason = %rejection, "order submission failed; cart kept");
            return Err(rejection.into());
        }
    };

    if let Err(source) = ledger.clear_cart() {
        error!(
            order_id = %confirmation.order_id,
            error = %source,
            "order placed but the cleared cart could not be saved"
        );
    }

    Ok(confirmation)
}
