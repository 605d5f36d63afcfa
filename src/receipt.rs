//! Receipt
//!
//! Terminal rendering of the catalog, the cart and placed orders.

use std::{fmt::Write, io, ops::Range};

use humanize_duration::{Truncate, prelude::DurationExt};
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    catalog::ServiceCatalog,
    money::{CurrencyError, format_amount},
    orders::Booking,
    services::ServiceItem,
};

/// Errors that can occur when rendering.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Amount could not be formatted.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Render every service in `catalog`.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if an amount cannot be formatted or written.
pub fn write_catalog(
    mut out: impl io::Write,
    catalog: &ServiceCatalog,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Id", "Service", "Category", "Duration", "Was", "Price"]);

    for service in catalog.iter() {
        builder.push_record([
            service.id.to_string(),
            service.name.clone(),
            service.category.clone().unwrap_or_default(),
            duration_label(service),
            was_price(service, currency)?,
            format_amount(service.price, currency)?,
        ]);
    }

    write_table(&mut out, builder, 3..6)
}

/// Render the cart's line-items followed by its totals.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if an amount cannot be formatted or written.
pub fn write_cart(mut out: impl io::Write, cart: &Cart, currency: &Currency) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        return writeln!(out, "\nYour cart is empty.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["", "Service", "Duration", "Was", "Price"]);

    for (idx, service) in cart.iter().enumerate() {
        builder.push_record([
            format!("#{:<3}", idx + 1),
            service.name.clone(),
            duration_label(service),
            was_price(service, currency)?,
            format_amount(service.price, currency)?,
        ]);
    }

    write_table(&mut out, builder, 2..5)?;
    write_cart_summary(&mut out, cart, currency)
}

/// Render placed orders, oldest first.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if an amount cannot be formatted or written.
pub fn write_bookings(
    mut out: impl io::Write,
    bookings: &[Booking],
    currency: &Currency,
) -> Result<(), ReceiptError> {
    if bookings.is_empty() {
        return writeln!(out, "\nNo orders yet.\n").map_err(|_err| ReceiptError::IO);
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Placed", "Services", "Payment", "Status", "Total"]);

    for booking in bookings {
        let services: Vec<&str> = booking
            .request
            .lines
            .iter()
            .map(|line| line.name.as_str())
            .collect();

        builder.push_record([
            booking.id.to_string(),
            booking.placed_at.strftime("%Y-%m-%d %H:%M").to_string(),
            services.join("\n"),
            booking.request.payment.to_string(),
            booking.status.to_string(),
            format_amount(booking.request.total, currency)?,
        ]);
    }

    write_table(&mut out, builder, 5..6)
}

fn duration_label(service: &ServiceItem) -> String {
    format!("{}", service.duration().human(Truncate::Nano))
}

fn was_price(service: &ServiceItem, currency: &Currency) -> Result<String, ReceiptError> {
    match service.original_price {
        Some(original) if original > service.price => Ok(format_amount(original, currency)?),
        _ => Ok(String::new()),
    }
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    amount_columns: Range<usize>,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(amount_columns), Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| ReceiptError::IO)
}

fn write_cart_summary(
    out: &mut impl io::Write,
    cart: &Cart,
    currency: &Currency,
) -> Result<(), ReceiptError> {
    let summary = cart.summary();

    let discount_label = match &summary.coupon {
        Some(coupon) if summary.discount > 0 => format!(" Discount ({}):", coupon.code),
        Some(coupon) => format!(" Discount ({}, not eligible):", coupon.code),
        None => " Discount:".to_string(),
    };

    let mut lines = vec![
        (
            " Subtotal:".to_string(),
            format!("{}  ", format_amount(summary.subtotal, currency)?),
        ),
        (
            discount_label,
            format!("-{}  ", format_amount(summary.discount, currency)?),
        ),
        (
            " \x1b[1mTotal:\x1b[0m".to_string(),
            format!("\x1b[1m{}\x1b[0m  ", format_amount(summary.total, currency)?),
        ),
    ];

    let list_savings = cart.reference_savings();

    if list_savings > 0 {
        lines.push((
            " You save vs. list price:".to_string(),
            format!("{}  ", format_amount(list_savings, currency)?),
        ));
    }

    let label_width = lines
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    let value_width = lines
        .iter()
        .map(|(_, value)| visible_width(value))
        .max()
        .unwrap_or_default();

    for (label, value) in &lines {
        write_summary_line(out, label, value, label_width, value_width)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), ReceiptError> {
    let label_pad = label_col_width.saturating_sub(visible_width(label));
    let value_pad = value_col_width.saturating_sub(visible_width(value));

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| ReceiptError::IO)
}
