//! Orders
//!
//! The order-submission contract and a store-backed order book.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::{
    cart::Cart,
    coupons::CouponCode,
    services::{ServiceId, ServiceItem},
    storage::{KeyValueStore, StorageError},
};

/// Storage key holding placed orders.
pub const ORDERS_STORAGE_KEY: &str = "orders";

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Pay through the online gateway
    Online,

    /// Pay the professional on the day
    Cash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Cash => f.write_str("cash"),
        }
    }
}

/// Where the service takes place and who to contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    /// Customer name
    pub name: String,

    /// Contact phone number
    pub phone: String,

    /// Optional contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Street address
    pub street: String,

    /// City
    pub city: String,

    /// Postal code
    pub zip: String,
}

impl DeliveryAddress {
    /// Name of the first required field that is blank.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("zip", &self.zip),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// One booked service, priced at the time of booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Booked service
    pub service_id: ServiceId,

    /// Service name at booking time
    pub name: String,

    /// Price at booking time, in whole currency units
    pub price_at_booking: u64,

    /// Number booked; carts hold each service once
    pub quantity: u32,
}

impl From<&ServiceItem> for OrderLine {
    fn from(item: &ServiceItem) -> Self {
        Self {
            service_id: item.id.clone(),
            name: item.name.clone(),
            price_at_booking: item.price,
            quantity: 1,
        }
    }
}

/// Snapshot of a cart submitted for booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Booked services in cart order
    pub lines: Vec<OrderLine>,

    /// Applied coupon code
    pub coupon_code: Option<CouponCode>,

    /// Sum of line prices
    pub subtotal: u64,

    /// Coupon discount, uncapped
    pub discount: u64,

    /// Amount payable
    pub total: u64,

    /// Service address
    pub address: DeliveryAddress,

    /// Payment method
    pub payment: PaymentMethod,
}

impl OrderRequest {
    /// Snapshot `cart` with its current totals.
    pub fn from_cart(cart: &Cart, address: DeliveryAddress, payment: PaymentMethod) -> Self {
        let summary = cart.summary();

        Self {
            lines: cart.iter().map(OrderLine::from).collect(),
            coupon_code: summary.coupon.map(|coupon| coupon.code),
            subtotal: summary.subtotal,
            discount: summary.discount,
            total: summary.total,
            address,
            payment,
        }
    }
}

/// Booking lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting confirmation
    Pending,

    /// Confirmed with a professional
    Confirmed,

    /// Service delivered
    Completed,

    /// Cancelled
    Cancelled,
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };

        f.write_str(status)
    }
}

/// Accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Order identifier
    pub order_id: Uuid,

    /// Initial status
    pub status: BookingStatus,

    /// Amount payable
    pub total: u64,

    /// When the order was accepted
    pub placed_at: Timestamp,
}

/// Why an order was not accepted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderRejection {
    /// The chosen payment method cannot be used.
    #[error("{0} payment is not available yet")]
    PaymentUnavailable(PaymentMethod),

    /// The order was malformed.
    #[error("order rejected: {0}")]
    Invalid(String),

    /// The order endpoint failed.
    #[error("order submission failed: {0}")]
    Unavailable(String),
}

/// Accepts orders for booking. Called once per checkout attempt.
#[automock]
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Submit `order`.
    async fn submit(&self, order: OrderRequest) -> Result<OrderConfirmation, OrderRejection>;
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Order identifier
    pub id: Uuid,

    /// Current status
    pub status: BookingStatus,

    /// When the order was placed
    pub placed_at: Timestamp,

    /// What was ordered
    pub request: OrderRequest,
}

/// Errors reading the order history.
#[derive(Debug, Error)]
pub enum OrderBookError {
    /// Storage backend failure.
    #[error("order storage failed")]
    Storage(#[from] StorageError),

    /// Stored orders could not be decoded or encoded.
    #[error("order history is unreadable")]
    Codec(#[from] serde_json::Error),
}

/// Order submitter that records bookings in a [`KeyValueStore`].
///
/// Only cash-on-service orders are accepted.
#[derive(Debug)]
pub struct OrderBook<S: KeyValueStore> {
    store: Mutex<S>,
}

impl<S: KeyValueStore + Send> OrderBook<S> {
    /// Create an order book over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Placed orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an [`OrderBookError`] if the history cannot be read.
    pub async fn history(&self) -> Result<Vec<Booking>, OrderBookError> {
        let store = self.store.lock().await;

        read_bookings(&*store)
    }

    /// Consume the order book and return its store.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    async fn record(&self, request: OrderRequest) -> Result<Booking, OrderBookError> {
        let mut store = self.store.lock().await;
        let mut bookings = read_bookings(&*store)?;

        let booking = Booking {
            id: Uuid::now_v7(),
            status: BookingStatus::Pending,
            placed_at: Timestamp::now(),
            request,
        };

        bookings.push(booking.clone());
        store.set(ORDERS_STORAGE_KEY, &serde_json::to_string(&bookings)?)?;

        Ok(booking)
    }
}

fn read_bookings<S: KeyValueStore>(store: &S) -> Result<Vec<Booking>, OrderBookError> {
    match store.get(ORDERS_STORAGE_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

#[async_trait]
impl<S: KeyValueStore + Send> OrderSubmitter for OrderBook<S> {
    async fn submit(&self, order: OrderRequest) -> Result<OrderConfirmation, OrderRejection> {
        if order.payment == PaymentMethod::Online {
            return Err(OrderRejection::PaymentUnavailable(PaymentMethod::Online));
        }

        if order.lines.is_empty() {
            return Err(OrderRejection::Invalid("no services selected".to_string()));
        }

        let booking = self
            .record(order)
            .await
            .map_err(|error| OrderRejection::Unavailable(error.to_string()))?;

        info!(
            order_id = %booking.id,
            total = booking.request.total,
            "order placed"
        );

        Ok(OrderConfirmation {
            order_id: booking.id,
            status: booking.status,
            total: booking.request.total,
            placed_at: booking.placed_at,
        })
    }
}
