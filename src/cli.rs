use std::io::{self, Write};

use clap::{Parser, Subcommand};
use spruce::{context::Storefront, money::find_currency};

use crate::config::{LoggingConfig, StorageConfig};

mod cart;
mod checkout;
mod coupon;
mod orders;
mod services;

#[derive(Debug, Parser)]
#[command(name = "spruce", about = "Room-cleaning storefront cart", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    #[command(flatten)]
    storage: StorageConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List services available for booking
    Services,

    /// Inspect or change the cart
    Cart(cart::CartCommand),

    /// Apply or remove a coupon
    Coupon(coupon::CouponCommand),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),

    /// List placed orders
    Orders,
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let storefront = open_storefront(&self.storage).await?;

        match self.command {
            Commands::Services => services::run(&storefront),
            Commands::Cart(command) => cart::run(&storefront, command),
            Commands::Coupon(command) => coupon::run(&storefront, command).await,
            Commands::Checkout(args) => checkout::run(&storefront, args).await,
            Commands::Orders => orders::run(&storefront).await,
        }
    }
}

async fn open_storefront(config: &StorageConfig) -> Result<Storefront, String> {
    let storefront = Storefront::open(&config.fixture, &config.data_dir)
        .await
        .map_err(|error| format!("{error}: {}", error_chain(&error)))?;

    match config.currency.as_deref() {
        Some(code) => {
            let currency = find_currency(code).map_err(|error| error.to_string())?;
            Ok(storefront.with_currency(currency))
        }
        None => Ok(storefront),
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut causes = Vec::new();
    let mut source = error.source();

    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }

    causes.join(": ")
}

fn write_line(line: impl std::fmt::Display) -> Result<(), String> {
    writeln!(io::stdout().lock(), "{line}").map_err(|error| format!("failed to write output: {error}"))
}
