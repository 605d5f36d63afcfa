use std::io;

use spruce::{context::Storefront, receipt::write_catalog};

pub(crate) fn run(storefront: &Storefront) -> Result<(), String> {
    write_catalog(io::stdout().lock(), &storefront.catalog, storefront.currency)
        .map_err(|error| format!("failed to render services: {error}"))
}
