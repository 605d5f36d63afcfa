use std::io;

use clap::{Args, Subcommand};
use spruce::{context::Storefront, money::format_amount, receipt::write_cart, services::ServiceId};

use super::write_line;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show items and totals
    Show,

    /// Add a service by id
    Add(ServiceArgs),

    /// Remove a service by id
    Remove(ServiceArgs),

    /// Empty the cart and drop the coupon
    Clear,
}

#[derive(Debug, Args)]
struct ServiceArgs {
    /// Service id, as listed by `spruce services`
    id: String,
}

pub(crate) fn run(storefront: &Storefront, command: CartCommand) -> Result<(), String> {
    let mut ledger = storefront.ledger().map_err(|error| error.to_string())?;

    match command.command {
        CartSubcommand::Show => {
            return write_cart(io::stdout().lock(), ledger.cart(), storefront.currency)
                .map_err(|error| format!("failed to render cart: {error}"));
        }
        CartSubcommand::Add(args) => {
            let id = ServiceId::new(args.id);
            let item = storefront
                .catalog
                .snapshot(&id)
                .ok_or_else(|| format!("unknown service: {id}"))?;

            let name = item.name.clone();
            let added = ledger.add_item(item).map_err(|error| error.to_string())?;

            if added {
                write_line(format_args!("Added {name}"))?;
            } else {
                write_line(format_args!("{name} is already in your cart"))?;
            }
        }
        CartSubcommand::Remove(args) => {
            let id = ServiceId::new(args.id);

            match ledger.remove_item(&id).map_err(|error| error.to_string())? {
                Some(item) => write_line(format_args!("Removed {}", item.name))?,
                None => write_line(format_args!("{id} is not in your cart"))?,
            }
        }
        CartSubcommand::Clear => {
            ledger.clear_cart().map_err(|error| error.to_string())?;
            write_line("Cart cleared")?;
        }
    }

    let total = format_amount(ledger.final_total(), storefront.currency)
        .map_err(|error| error.to_string())?;

    write_line(format_args!("{} item(s), total {total}", ledger.cart().len()))
}
