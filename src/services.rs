//! Services

use std::{fmt, num::NonZeroU32, time::Duration};

use serde::{Deserialize, Serialize};

/// Service identifier, unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Create a new service identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ServiceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A bookable cleaning service.
///
/// The same shape is used for catalog entries and cart line-items. Carts hold
/// value copies, so editing a catalog entry never reprices a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Service identifier
    pub id: ServiceId,

    /// Display name
    pub name: String,

    /// Current price, in whole currency units
    pub price: u64,

    /// Reference price shown struck through, in whole currency units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,

    /// Duration in minutes
    pub duration: NonZeroU32,

    /// Long-form description
    #[serde(default)]
    pub description: String,

    /// What the service includes, in display order
    #[serde(default)]
    pub inclusions: Vec<String>,

    /// Image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Catalog category (e.g. "Cleaning", "Furniture")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ServiceItem {
    /// Create a service with the required fields; the rest start empty.
    pub fn new(
        id: impl Into<ServiceId>,
        name: impl Into<String>,
        price: u64,
        duration: NonZeroU32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            original_price: None,
            duration,
            description: String::new(),
            inclusions: Vec::new(),
            image: None,
            category: None,
        }
    }

    /// Set the struck-through reference price.
    #[must_use]
    pub fn with_original_price(mut self, original_price: u64) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the inclusions list.
    #[must_use]
    pub fn with_inclusions<I, S>(mut self, inclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusions = inclusions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the image URI.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// How long the service takes.
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration.get()) * 60)
    }

    /// Amount saved against the reference price, if the reference price is higher.
    pub fn reference_savings(&self) -> Option<u64> {
        self.original_price
            .and_then(|original| original.checked_sub(self.price))
            .filter(|savings| *savings > 0)
    }
}
