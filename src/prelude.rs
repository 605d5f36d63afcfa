//! Spruce prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartSummary},
    catalog::{CatalogError, CatalogSource, ServiceCatalog},
    checkout::{ApplyCouponError, CheckoutDetails, CheckoutError, apply_coupon_code, place_order},
    context::{Storefront, StorefrontError},
    coupons::{
        Coupon, CouponCode, CouponDiscount, CouponError,
        book::{CouponBook, CouponBookError, CouponRecord},
        validation::{CouponRejection, CouponValidator},
    },
    discounts::{DiscountError, discount_amount},
    fixtures::{FixtureError, StorefrontFixture, YamlCatalog},
    ledger::{CartChange, CartLedger, CartObserver, CartRecord, LedgerError, SubscriptionId},
    money::{CurrencyError, find_currency, format_amount},
    orders::{
        Booking, BookingStatus, DeliveryAddress, OrderBook, OrderBookError, OrderConfirmation,
        OrderLine, OrderRejection, OrderRequest, OrderSubmitter, PaymentMethod,
    },
    receipt::ReceiptError,
    services::{ServiceId, ServiceItem},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError},
};
