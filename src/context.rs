//! Storefront context

use std::path::{Path, PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    catalog::{CatalogError, ServiceCatalog},
    coupons::book::CouponBook,
    fixtures::{FixtureError, StorefrontFixture, YamlCatalog},
    ledger::{CartLedger, LedgerError},
    orders::OrderBook,
    storage::{FileStore, StorageError},
};

/// Errors raised while opening the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The seed fixture could not be loaded.
    #[error("failed to load storefront fixture")]
    Fixture(#[from] FixtureError),

    /// The catalog could not be built.
    #[error("failed to load service catalog")]
    Catalog(#[from] CatalogError),

    /// The data directory could not be opened.
    #[error("failed to open data directory")]
    Storage(#[from] StorageError),

    /// The persisted cart could not be read.
    #[error("failed to load cart")]
    Ledger(#[from] LedgerError),
}

/// Everything a session needs: catalog, coupons, currency and the data
/// directory that holds the cart and placed orders.
#[derive(Debug)]
pub struct Storefront {
    /// Services available for booking
    pub catalog: ServiceCatalog,

    /// Coupon validator
    pub coupons: CouponBook,

    /// Display currency
    pub currency: &'static Currency,

    data_dir: PathBuf,
}

impl Storefront {
    /// Load the catalog and coupons from `fixture` and use `data_dir` for
    /// persisted state.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the fixture is unreadable or invalid.
    pub async fn open(
        fixture: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
    ) -> Result<Self, StorefrontError> {
        let source = YamlCatalog::new(fixture);
        let seed = StorefrontFixture::from_path(source.path())?;

        Ok(Self {
            catalog: ServiceCatalog::load_from(&source).await?,
            coupons: seed.coupon_book()?,
            currency: seed.currency()?,
            data_dir: data_dir.into(),
        })
    }

    /// Override the display currency.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Directory holding persisted state.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the data directory or cart cannot be read.
    pub fn ledger(&self) -> Result<CartLedger<FileStore>, StorefrontError> {
        Ok(CartLedger::load(FileStore::open(&self.data_dir)?)?)
    }

    /// Open the order history.
    ///
    /// # Errors
    ///
    /// Returns a [`StorefrontError`] if the data directory cannot be opened.
    pub fn order_book(&self) -> Result<OrderBook<FileStore>, StorefrontError> {
        Ok(OrderBook::new(FileStore::open(&self.data_dir)?))
    }
}
