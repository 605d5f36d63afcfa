//! Fixtures
//!
//! YAML storefront seed: the currency, the service catalog and the coupon book.

use std::{
    fs,
    num::NonZeroU32,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use jiff::Timestamp;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{CatalogError, CatalogSource},
    coupons::{
        Coupon, CouponDiscount, CouponError,
        book::{CouponBook, CouponBookError, CouponRecord},
    },
    money::{CurrencyError, DEFAULT_CURRENCY, find_currency},
    services::ServiceItem,
};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown currency code
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Service with a zero duration
    #[error("Service {0} has no duration")]
    InvalidDuration(String),

    /// Fixed coupon value that is not a whole amount
    #[error("Invalid fixed amount for coupon {0}")]
    InvalidAmount(String),

    /// Invalid coupon definition
    #[error("Invalid coupon {code}: {source}")]
    InvalidCoupon {
        /// Code as written in the fixture
        code: String,

        /// Why it was rejected
        source: CouponError,
    },

    /// Duplicate coupon codes
    #[error(transparent)]
    Coupons(#[from] CouponBookError),
}

/// Storefront seed file.
#[derive(Debug, Deserialize)]
pub struct StorefrontFixture {
    /// ISO currency code for every amount in the file
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Catalog entries in display order
    #[serde(default)]
    pub services: Vec<ServiceFixture>,

    /// Coupon definitions
    #[serde(default)]
    pub coupons: Vec<CouponFixture>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_active() -> bool {
    true
}

/// Service fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ServiceFixture {
    /// Service identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Price in whole currency units
    pub price: u64,

    /// Reference price
    #[serde(default)]
    pub original_price: Option<u64>,

    /// Duration in minutes
    pub duration_minutes: u32,

    /// Long description
    #[serde(default)]
    pub description: String,

    /// What the service covers
    #[serde(default)]
    pub inclusions: Vec<String>,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,

    /// Category label
    #[serde(default)]
    pub category: Option<String>,

    /// Whether the service is offered
    #[serde(default = "default_active")]
    pub active: bool,
}

impl TryFrom<ServiceFixture> for ServiceItem {
    type Error = FixtureError;

    fn try_from(fixture: ServiceFixture) -> Result<Self, Self::Error> {
        let duration = NonZeroU32::new(fixture.duration_minutes)
            .ok_or_else(|| FixtureError::InvalidDuration(fixture.id.clone()))?;

        let mut item = ServiceItem::new(fixture.id, fixture.name, fixture.price, duration)
            .with_description(fixture.description)
            .with_inclusions(fixture.inclusions);

        item.original_price = fixture.original_price;
        item.image = fixture.image;
        item.category = fixture.category;

        Ok(item)
    }
}

/// Coupon discount kind in YAML
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKindFixture {
    /// `value` is percent points
    Percentage,

    /// `value` is whole currency units
    Fixed,
}

/// Coupon fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Coupon code
    pub code: String,

    /// Discount kind
    #[serde(rename = "type")]
    pub kind: CouponKindFixture,

    /// Discount value
    pub value: Decimal,

    /// Minimum subtotal for the coupon to apply
    #[serde(default)]
    pub min_purchase: u64,

    /// Whether the coupon may be redeemed
    #[serde(default = "default_active")]
    pub active: bool,

    /// Expiry
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

impl TryFrom<&CouponFixture> for CouponRecord {
    type Error = FixtureError;

    fn try_from(fixture: &CouponFixture) -> Result<Self, Self::Error> {
        let invalid = |source| FixtureError::InvalidCoupon {
            code: fixture.code.clone(),
            source,
        };

        let discount = match fixture.kind {
            CouponKindFixture::Percentage => {
                CouponDiscount::percentage(fixture.value).map_err(invalid)?
            }
            CouponKindFixture::Fixed => {
                let amount = Some(fixture.value)
                    .filter(|value| value.fract().is_zero())
                    .and_then(|value| value.to_u64())
                    .ok_or_else(|| FixtureError::InvalidAmount(fixture.code.clone()))?;

                CouponDiscount::fixed(amount)
            }
        };

        let coupon = Coupon::new(&fixture.code, discount, fixture.min_purchase).map_err(invalid)?;

        Ok(CouponRecord {
            coupon,
            active: fixture.active,
            expires_at: fixture.expires_at,
        })
    }
}

impl StorefrontFixture {
    /// Load a storefront fixture from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse a storefront fixture from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// Currency for every amount in the fixture
    ///
    /// # Errors
    ///
    /// Returns an error if the currency code is unknown.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        Ok(find_currency(&self.currency)?)
    }

    /// Active services in fixture order
    ///
    /// # Errors
    ///
    /// Returns an error if a service definition is invalid.
    pub fn into_active_services(self) -> Result<Vec<ServiceItem>, FixtureError> {
        self.services
            .into_iter()
            .filter(|service| service.active)
            .map(ServiceItem::try_from)
            .collect()
    }

    /// Build a coupon book from every coupon, active or not
    ///
    /// # Errors
    ///
    /// Returns an error if a coupon is invalid or two coupons share a code.
    pub fn coupon_book(&self) -> Result<CouponBook, FixtureError> {
        let records = self
            .coupons
            .iter()
            .map(CouponRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CouponBook::with_records(records)?)
    }
}

/// [`CatalogSource`] backed by a storefront fixture file.
///
/// The file is re-read on every call, so edits show up on the next load.
#[derive(Debug, Clone)]
pub struct YamlCatalog {
    path: PathBuf,
}

impl YamlCatalog {
    /// Read services from the fixture at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fixture path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for YamlCatalog {
    async fn list_active_services(&self) -> Result<Vec<ServiceItem>, CatalogError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|error| CatalogError::Source(error.to_string()))?;

        let services = StorefrontFixture::from_yaml(&contents)
            .and_then(StorefrontFixture::into_active_services)
            .map_err(|error| CatalogError::Source(error.to_string()))?;

        debug!(path = %self.path.display(), count = services.len(), "read catalog fixture");

        Ok(services)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rusty_money::iso;
    use tempfile::NamedTempFile;
    use testresult::TestResult;

    use crate::{
        catalog::ServiceCatalog,
        coupons::{CouponCode, validation::CouponRejection},
    };

    use super::*;

    const STOREFRONT: &str = r"
currency: inr
services:
  - id: deep
    name: Deep Room Cleaning
    price: 899
    original_price: 1299
    duration_minutes: 120
    inclusions: [Dusting, Mopping]
  - id: basic
    name: Basic Room Cleaning
    price: 499
    duration_minutes: 60
  - id: carpet
    name: Carpet Cleaning
    price: 649
    duration_minutes: 75
    active: false
coupons:
  - code: save10
    type: percentage
    value: 10
  - code: FLAT200
    type: fixed
    value: 200
    min_purchase: 1000
  - code: OLD
    type: fixed
    value: 50
    active: false
";

    #[test]
    fn parses_services_in_order_and_skips_inactive() -> TestResult {
        let services = StorefrontFixture::from_yaml(STOREFRONT)?.into_active_services()?;

        let ids: Vec<_> = services.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, ["deep", "basic"]);
        assert_eq!(services.first().and_then(|s| s.original_price), Some(1299));
        assert_eq!(services.first().map(|s| s.inclusions.len()), Some(2));

        Ok(())
    }

    #[test]
    fn currency_is_case_insensitive() -> TestResult {
        let fixture = StorefrontFixture::from_yaml(STOREFRONT)?;

        assert_eq!(fixture.currency()?, iso::INR);

        Ok(())
    }

    #[test]
    fn coupon_book_holds_every_coupon() -> TestResult {
        let book = StorefrontFixture::from_yaml(STOREFRONT)?.coupon_book()?;
        let now = Timestamp::now();

        assert_eq!(book.list().len(), 3);
        assert_eq!(
            book.validate_at("SAVE10", 1398, now)?.code,
            CouponCode::parse("SAVE10")?
        );
        assert_eq!(
            book.validate_at("flat200", 899, now),
            Err(CouponRejection::MinimumPurchaseNotMet { min_purchase: 1000 })
        );
        assert_eq!(book.validate_at("old", 899, now), Err(CouponRejection::Inactive));

        Ok(())
    }

    #[test]
    fn zero_duration_is_rejected() -> TestResult {
        let fixture = StorefrontFixture::from_yaml(
            "services:\n  - id: x\n    name: X\n    price: 1\n    duration_minutes: 0\n",
        )?;

        let result = fixture.into_active_services();

        assert!(
            matches!(result, Err(FixtureError::InvalidDuration(ref id)) if id == "x"),
            "expected InvalidDuration, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn fractional_fixed_amount_is_rejected() -> TestResult {
        let fixture = StorefrontFixture::from_yaml(
            "coupons:\n  - code: HALF\n    type: fixed\n    value: 12.5\n",
        )?;

        let result = fixture.coupon_book();

        assert!(
            matches!(result, Err(FixtureError::InvalidAmount(_))),
            "expected InvalidAmount, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn out_of_range_percentage_is_rejected() -> TestResult {
        let fixture = StorefrontFixture::from_yaml(
            "coupons:\n  - code: HUGE\n    type: percentage\n    value: 150\n",
        )?;

        let result = fixture.coupon_book();

        assert!(
            matches!(result, Err(FixtureError::InvalidCoupon { .. })),
            "expected InvalidCoupon, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn yaml_catalog_loads_active_services() -> TestResult {
        let mut file = NamedTempFile::new()?;
        file.write_all(STOREFRONT.as_bytes())?;

        let catalog = ServiceCatalog::load_from(&YamlCatalog::new(file.path())).await?;

        assert_eq!(catalog.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn missing_fixture_is_a_source_error() {
        let source = YamlCatalog::new("does/not/exist.yml");

        let result = source.list_active_services().await;

        assert!(
            matches!(result, Err(CatalogError::Source(_))),
            "expected Source, got {result:?}"
        );
    }

    #[test]
    fn bundled_storefront_fixture_loads() -> TestResult {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/storefront.yml");
        let fixture = StorefrontFixture::from_path(path)?;

        assert_eq!(fixture.currency()?, iso::INR);
        assert_eq!(fixture.coupon_book()?.list().len(), 3);
        assert_eq!(fixture.into_active_services()?.len(), 3);

        Ok(())
    }
}
