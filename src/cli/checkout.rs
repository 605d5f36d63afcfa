use std::time::Instant;

use clap::Args;
use humanize_duration::{Truncate, prelude::DurationExt};
use spruce::{
    checkout::{CheckoutDetails, place_order},
    context::Storefront,
    money::format_amount,
    orders::{DeliveryAddress, PaymentMethod},
};

use super::write_line;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Contact phone number
    #[arg(long)]
    phone: String,

    /// Contact email
    #[arg(long)]
    email: Option<String>,

    /// Street address
    #[arg(long)]
    street: String,

    /// City
    #[arg(long)]
    city: String,

    /// Postal code
    #[arg(long)]
    zip: String,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentMethod::Cash)]
    payment: PaymentMethod,
}

impl From<CheckoutArgs> for CheckoutDetails {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            address: DeliveryAddress {
                name: args.name,
                phone: args.phone,
                email: args.email,
                street: args.street,
                city: args.city,
                zip: args.zip,
            },
            payment: args.payment,
        }
    }
}

pub(crate) async fn run(storefront: &Storefront, args: CheckoutArgs) -> Result<(), String> {
    let mut ledger = storefront.ledger().map_err(|error| error.to_string())?;
    let orders = storefront.order_book().map_err(|error| error.to_string())?;

    let started = Instant::now();

    let confirmation = place_order(&mut ledger, &orders, args.into())
        .await
        .map_err(|error| error.to_string())?;

    let total =
        format_amount(confirmation.total, storefront.currency).map_err(|error| error.to_string())?;

    write_line(format_args!("Order {} placed", confirmation.order_id))?;
    write_line(format_args!("Status: {}", confirmation.status))?;
    write_line(format_args!("Total: {total}"))?;
    write_line(format_args!(
        "Processed in {}",
        started.elapsed().human(Truncate::Nano)
    ))
}
