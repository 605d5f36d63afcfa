//! Spruce
//!
//! Spruce is the cart, coupon and checkout core of a room-cleaning service
//! storefront: a persisted cart ledger with coupon pricing, a service catalog,
//! and the collaborator contracts for coupon validation and order submission.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod context;
pub mod coupons;
pub mod discounts;
pub mod fixtures;
pub mod ledger;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod services;
pub mod storage;
