//! Cart ledger
//!
//! [`CartLedger`] owns a [`Cart`], writes it to a [`KeyValueStore`] after every
//! effective mutation, and tells subscribed observers what changed. It is the
//! single writer for a session's cart: mutations take `&mut self` and complete
//! synchronously, so every read reflects the last mutation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartSummary},
    coupons::Coupon,
    services::{ServiceId, ServiceItem},
    storage::{KeyValueStore, StorageError},
};

mod observers;

pub use observers::{CartChange, CartObserver, SubscriptionId};

use observers::Observers;

/// Storage key holding the persisted cart.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Current persisted layout version.
pub const CART_RECORD_VERSION: u32 = 1;

/// Errors raised while loading or persisting the cart.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Storage backend failure.
    #[error("cart storage failed")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("cart could not be encoded")]
    Encode(#[source] serde_json::Error),
}

/// Persisted cart layout.
///
/// The visibility flag is intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRecord {
    /// Layout version
    pub version: u32,

    /// Line-items in insertion order
    pub items: Vec<ServiceItem>,

    /// Applied coupon
    pub coupon: Option<Coupon>,
}

impl From<&Cart> for CartRecord {
    fn from(cart: &Cart) -> Self {
        Self {
            version: CART_RECORD_VERSION,
            items: cart.items().to_vec(),
            coupon: cart.coupon().cloned(),
        }
    }
}

impl From<CartRecord> for Cart {
    fn from(record: CartRecord) -> Self {
        Cart::from_parts(record.items, record.coupon)
    }
}

/// Owned cart state with save-on-mutation persistence and change observers.
pub struct CartLedger<S: KeyValueStore> {
    cart: Cart,
    store: S,
    observers: Observers,
}

impl<S: KeyValueStore> std::fmt::Debug for CartLedger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartLedger")
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> CartLedger<S> {
    /// Load the cart persisted in `store`, or start empty.
    ///
    /// A record that cannot be decoded, or that has an unknown version, is
    /// discarded with a warning and the ledger starts from an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Storage`] if the store cannot be read.
    pub fn load(store: S) -> Result<Self, LedgerError> {
        let cart = match store.get(CART_STORAGE_KEY)? {
            None => Cart::new(),
            Some(raw) => decode_record(&raw),
        };

        Ok(Self {
            cart,
            store,
            observers: Observers::default(),
        })
    }

    /// Current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the ledger and return its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Register an observer; it runs after each effective mutation.
    pub fn subscribe(&mut self, observer: impl CartObserver + 'static) -> SubscriptionId {
        self.observers.insert(Box::new(observer))
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    /// Add `item` unless a service with the same id is already present.
    ///
    /// Returns whether the item was inserted; a duplicate is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the updated cart cannot be persisted. The
    /// in-memory cart keeps the new item either way.
    pub fn add_item(&mut self, item: ServiceItem) -> Result<bool, LedgerError> {
        let id = item.id.clone();

        if !self.cart.add_item(item) {
            debug!(item_id = %id, "service already in cart");
            return Ok(false);
        }

        debug!(item_id = %id, "added service to cart");
        self.commit(&CartChange::ItemAdded(id))?;

        Ok(true)
    }

    /// Remove the item with `id`; absent ids are a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the updated cart cannot be persisted.
    pub fn remove_item(&mut self, id: &ServiceId) -> Result<Option<ServiceItem>, LedgerError> {
        let Some(removed) = self.cart.remove_item(id) else {
            return Ok(None);
        };

        debug!(item_id = %id, "removed service from cart");
        self.commit(&CartChange::ItemRemoved(id.clone()))?;

        Ok(Some(removed))
    }

    /// Replace the applied coupon. No business validation happens here.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the updated cart cannot be persisted.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> Result<Option<Coupon>, LedgerError> {
        let code = coupon.code.clone();
        let previous = self.cart.apply_coupon(coupon);

        debug!(coupon_code = %code, replaced = previous.is_some(), "applied coupon");
        self.commit(&CartChange::CouponApplied(code))?;

        Ok(previous)
    }

    /// Clear the applied coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the updated cart cannot be persisted.
    pub fn remove_coupon(&mut self) -> Result<Option<Coupon>, LedgerError> {
        let Some(removed) = self.cart.remove_coupon() else {
            return Ok(None);
        };

        debug!(coupon_code = %removed.code, "removed coupon");
        self.commit(&CartChange::CouponRemoved(removed.code.clone()))?;

        Ok(Some(removed))
    }

    /// Empty the cart and drop the coupon in a single transition.
    ///
    /// # Errors
    ///
    /// Returns a [`LedgerError`] if the emptied cart cannot be persisted.
    pub fn clear_cart(&mut self) -> Result<(), LedgerError> {
        self.cart.clear();

        debug!("cleared cart");
        self.commit(&CartChange::Cleared)
    }

    /// Flip the visibility flag. Nothing is persisted.
    pub fn toggle_visibility(&mut self) -> bool {
        let is_open = self.cart.toggle_visibility();

        self.observers
            .notify(&self.cart, &CartChange::VisibilityToggled(is_open));

        is_open
    }

    /// Whether the cart is shown.
    pub fn is_open(&self) -> bool {
        self.cart.is_open()
    }

    /// Sum of line-item prices.
    pub fn subtotal(&self) -> u64 {
        self.cart.subtotal()
    }

    /// Discount from the applied coupon at the current subtotal.
    pub fn discount_amount(&self) -> u64 {
        self.cart.discount_amount()
    }

    /// Subtotal minus discount, floored at zero.
    pub fn final_total(&self) -> u64 {
        self.cart.final_total()
    }

    /// All monetary figures from one read.
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    fn commit(&mut self, change: &CartChange) -> Result<(), LedgerError> {
        let persisted = self.persist();

        self.observers.notify(&self.cart, change);

        persisted
    }

    fn persist(&mut self) -> Result<(), LedgerError> {
        let record = CartRecord::from(&self.cart);
        let encoded = serde_json::to_string(&record).map_err(LedgerError::Encode)?;

        self.store.set(CART_STORAGE_KEY, &encoded)?;

        Ok(())
    }
}

fn decode_record(raw: &str) -> Cart {
    match serde_json::from_str::<CartRecord>(raw) {
        Ok(record) if record.version == CART_RECORD_VERSION => record.into(),
        Ok(record) => {
            warn!(
                version = record.version,
                "discarding persisted cart with unknown layout version"
            );
            Cart::new()
        }
        Err(source) => {
            warn!(error = %source, "discarding unreadable persisted cart");
            Cart::new()
        }
    }
}
