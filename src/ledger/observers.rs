//! Cart observers

use crate::{cart::Cart, coupons::CouponCode, services::ServiceId};

/// What an effective ledger mutation changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A service was appended.
    ItemAdded(ServiceId),

    /// A service was removed.
    ItemRemoved(ServiceId),

    /// A coupon was applied, replacing any previous one.
    CouponApplied(CouponCode),

    /// The applied coupon was cleared.
    CouponRemoved(CouponCode),

    /// Items and coupon were cleared together.
    Cleared,

    /// The visibility flag changed to the contained value.
    VisibilityToggled(bool),
}

/// Receives the cart after each effective mutation.
pub trait CartObserver {
    /// Called with the updated cart and the change that produced it.
    fn cart_changed(&mut self, cart: &Cart, change: &CartChange);
}

impl<F> CartObserver for F
where
    F: FnMut(&Cart, &CartChange),
{
    fn cart_changed(&mut self, cart: &Cart, change: &CartChange) {
        self(cart, change);
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(super) struct Observers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Box<dyn CartObserver>)>,
}

impl Observers {
    pub(super) fn insert(&mut self, observer: Box<dyn CartObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));

        id
    }

    pub(super) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);

        self.entries.len() != before
    }

    pub(super) fn notify(&mut self, cart: &Cart, change: &CartChange) {
        for (_, observer) in &mut self.entries {
            observer.cart_changed(cart, change);
        }
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut observers = Observers::default();

        let first = observers.insert(Box::new(|_cart: &Cart, _change: &CartChange| {}));
        observers.remove(first);
        let second = observers.insert(Box::new(|_cart: &Cart, _change: &CartChange| {}));

        assert_ne!(first, second);
        assert_eq!(observers.len(), 1);
    }

    #[test]
    fn notify_reaches_every_observer() {
        let calls = Rc::new(Cell::new(0_u8));
        let mut observers = Observers::default();

        for _ in 0..2 {
            let calls = Rc::clone(&calls);
            observers.insert(Box::new(move |_cart: &Cart, _change: &CartChange| {
                calls.set(calls.get() + 1);
            }));
        }

        observers.notify(&Cart::new(), &CartChange::Cleared);

        assert_eq!(calls.get(), 2);
    }
}
