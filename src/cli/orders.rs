use std::io;

use spruce::{context::Storefront, receipt::write_bookings};

pub(crate) async fn run(storefront: &Storefront) -> Result<(), String> {
    let orders = storefront.order_book().map_err(|error| error.to_string())?;

    let history = orders
        .history()
        .await
        .map_err(|error| format!("failed to read orders: {error}"))?;

    write_bookings(io::stdout().lock(), &history, storefront.currency)
        .map_err(|error| format!("failed to render orders: {error}"))
}
