//! Money
//!
//! Amounts are carried as whole currency units (`u64`) and only become
//! [`Money`] values for display.

use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "INR";

/// Errors converting amounts for display.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// No ISO currency has this code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The amount does not fit a signed money value.
    #[error("amount {0} is too large to display")]
    Overflow(u64),
}

/// Look up an ISO currency by code, ignoring case.
///
/// # Errors
///
/// Returns [`CurrencyError::UnknownCurrency`] for unrecognised codes.
pub fn find_currency(code: &str) -> Result<&'static Currency, CurrencyError> {
    let normalized = code.trim().to_ascii_uppercase();

    Currency::find(&normalized).ok_or_else(|| CurrencyError::UnknownCurrency(code.to_string()))
}

/// Convert whole currency units into a [`Money`] value.
///
/// # Errors
///
/// Returns [`CurrencyError::Overflow`] if `amount` exceeds `i64::MAX`.
pub fn to_money(amount: u64, currency: &Currency) -> Result<Money<'_, Currency>, CurrencyError> {
    let major = i64::try_from(amount).map_err(|_err| CurrencyError::Overflow(amount))?;

    Ok(Money::from_major(major, currency))
}

/// Format whole currency units with the currency's symbol and separators.
///
/// # Errors
///
/// Returns [`CurrencyError::Overflow`] if `amount` exceeds `i64::MAX`.
pub fn format_amount(amount: u64, currency: &Currency) -> Result<String, CurrencyError> {
    Ok(to_money(amount, currency)?.to_string())
}
