//! Cart

use crate::{
    coupons::Coupon,
    discounts,
    pricing,
    services::{ServiceId, ServiceItem},
};

/// Selected services and the applied coupon.
///
/// Items keep insertion order and each service id appears at most once. Every
/// monetary figure is derived from the current items and coupon on each call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<ServiceItem>,
    coupon: Option<Coupon>,
    is_open: bool,
}

/// Monetary figures for one view of the cart, read from a single state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    /// Number of line-items
    pub item_count: usize,

    /// Sum of line-item prices
    pub subtotal: u64,

    /// Discount from the applied coupon, uncapped
    pub discount: u64,

    /// Subtotal minus discount, floored at zero
    pub total: u64,

    /// Discount actually realised (`subtotal - total`)
    pub savings: u64,

    /// Applied coupon, if any
    pub coupon: Option<Coupon>,
}

impl Cart {
    /// Create an empty, closed cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from persisted parts.
    ///
    /// Duplicate service ids are dropped, keeping the first occurrence. The
    /// cart starts closed.
    pub fn from_parts(
        items: impl IntoIterator<Item = ServiceItem>,
        coupon: Option<Coupon>,
    ) -> Self {
        let mut cart = Self {
            items: Vec::new(),
            coupon,
            is_open: false,
        };

        for item in items {
            if !cart.contains(&item.id) {
                cart.items.push(item);
            }
        }

        cart
    }

    /// Append an item unless its id is already present.
    ///
    /// Opens the cart when the item is inserted. Returns whether it was.
    pub fn add_item(&mut self, item: ServiceItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }

        self.items.push(item);
        self.is_open = true;

        true
    }

    /// Remove the item with `id`, if present.
    pub fn remove_item(&mut self, id: &ServiceId) -> Option<ServiceItem> {
        let position = self.items.iter().position(|item| &item.id == id)?;

        Some(self.items.remove(position))
    }

    /// Replace the applied coupon, returning the previous one.
    pub fn apply_coupon(&mut self, coupon: Coupon) -> Option<Coupon> {
        self.coupon.replace(coupon)
    }

    /// Clear the applied coupon, returning it.
    pub fn remove_coupon(&mut self) -> Option<Coupon> {
        self.coupon.take()
    }

    /// Remove every item and the coupon.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon = None;
    }

    /// Flip the visibility flag and return the new value.
    pub fn toggle_visibility(&mut self) -> bool {
        self.is_open = !self.is_open;
        self.is_open
    }

    /// Whether the cart is shown.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Line-items in insertion order.
    pub fn items(&self) -> &[ServiceItem] {
        &self.items
    }

    /// Iterate over line-items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceItem> {
        self.items.iter()
    }

    /// Applied coupon.
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Whether an item with `id` is in the cart.
    pub fn contains(&self, id: &ServiceId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Get the number of items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line-item prices.
    pub fn subtotal(&self) -> u64 {
        pricing::subtotal(&self.items)
    }

    /// Discount from the applied coupon at the current subtotal.
    pub fn discount_amount(&self) -> u64 {
        discounts::discount_amount(self.coupon.as_ref(), self.subtotal())
    }

    /// Subtotal minus discount, never below zero.
    pub fn final_total(&self) -> u64 {
        let subtotal = self.subtotal();
        let discount = discounts::discount_amount(self.coupon.as_ref(), subtotal);

        pricing::final_total(subtotal, discount)
    }

    /// Savings against the items' reference prices.
    pub fn reference_savings(&self) -> u64 {
        pricing::reference_savings(&self.items)
    }

    /// All monetary figures at once.
    pub fn summary(&self) -> CartSummary {
        let subtotal = self.subtotal();
        let discount = discounts::discount_amount(self.coupon.as_ref(), subtotal);
        let total = pricing::final_total(subtotal, discount);

        CartSummary {
            item_count: self.items.len(),
            subtotal,
            discount,
            total,
            savings: subtotal - total,
            coupon: self.coupon.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a ServiceItem;
    type IntoIter = std::slice::Iter<'a, ServiceItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
