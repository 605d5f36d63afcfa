//! Service catalog

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::debug;

use crate::services::{ServiceId, ServiceItem};

/// Catalog management errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A service with this id is already listed.
    #[error("service {0} already exists")]
    AlreadyExists(ServiceId),

    /// No service with this id is listed.
    #[error("service {0} not found")]
    NotFound(ServiceId),

    /// A bulk replacement listed the same id twice.
    #[error("service {0} listed more than once")]
    DuplicateId(ServiceId),

    /// The catalog source could not be read.
    #[error("catalog source unavailable: {0}")]
    Source(String),
}

/// Source of the services offered for browsing.
#[automock]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// List every active service.
    async fn list_active_services(&self) -> Result<Vec<ServiceItem>, CatalogError>;
}

/// Ordered list of services available for browsing and admin management.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<ServiceItem>,
}

impl ServiceCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a list of services.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if an id appears twice.
    pub fn with_services(services: Vec<ServiceItem>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.set_services(services)?;

        Ok(catalog)
    }

    /// Populate a catalog from `source`.
    ///
    /// # Errors
    ///
    /// Returns the source's error, or [`CatalogError::DuplicateId`].
    pub async fn load_from(source: &dyn CatalogSource) -> Result<Self, CatalogError> {
        let services = source.list_active_services().await?;

        debug!(count = services.len(), "loaded service catalog");

        Self::with_services(services)
    }

    /// Append a new service.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::AlreadyExists`] if the id is taken.
    pub fn add_service(&mut self, service: ServiceItem) -> Result<(), CatalogError> {
        if self.get(&service.id).is_some() {
            return Err(CatalogError::AlreadyExists(service.id));
        }

        self.services.push(service);

        Ok(())
    }

    /// Replace the service that has the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no service has that id.
    pub fn update_service(&mut self, service: ServiceItem) -> Result<(), CatalogError> {
        let Some(slot) = self.services.iter_mut().find(|s| s.id == service.id) else {
            return Err(CatalogError::NotFound(service.id));
        };

        *slot = service;

        Ok(())
    }

    /// Remove the service with `id`, returning it if it was listed.
    pub fn remove_service(&mut self, id: &ServiceId) -> Option<ServiceItem> {
        let position = self.services.iter().position(|s| &s.id == id)?;

        Some(self.services.remove(position))
    }

    /// Replace every service.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if an id appears twice; the
    /// catalog is left unchanged.
    pub fn set_services(&mut self, services: Vec<ServiceItem>) -> Result<(), CatalogError> {
        for (idx, service) in services.iter().enumerate() {
            if services.iter().take(idx).any(|s| s.id == service.id) {
                return Err(CatalogError::DuplicateId(service.id.clone()));
            }
        }

        self.services = services;

        Ok(())
    }

    /// Look up a service.
    pub fn get(&self, id: &ServiceId) -> Option<&ServiceItem> {
        self.services.iter().find(|s| &s.id == id)
    }

    /// Owned copy of a service, for placing in a cart.
    pub fn snapshot(&self, id: &ServiceId) -> Option<ServiceItem> {
        self.get(id).cloned()
    }

    /// Iterate over services in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceItem> {
        self.services.iter()
    }

    /// Get the number of services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use testresult::TestResult;

    use crate::cart::Cart;

    use super::*;

    fn service(id: &str, price: u64) -> ServiceItem {
        ServiceItem::new(id, id, price, NonZeroU32::MIN)
    }

    fn catalog() -> Result<ServiceCatalog, CatalogError> {
        ServiceCatalog::with_services(vec![
            service("deep", 899),
            service("basic", 499),
            service("sofa", 799),
        ])
    }

    #[test]
    fn add_rejects_existing_id() -> TestResult {
        let mut catalog = catalog()?;

        let result = catalog.add_service(service("deep", 1));

        assert_eq!(result, Err(CatalogError::AlreadyExists(ServiceId::new("deep"))));
        assert_eq!(catalog.len(), 3);

        Ok(())
    }

    #[test]
    fn add_appends_in_order() -> TestResult {
        let mut catalog = catalog()?;

        catalog.add_service(service("windows", 299))?;

        let ids: Vec<_> = catalog.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, ["deep", "basic", "sofa", "windows"]);

        Ok(())
    }

    #[test]
    fn update_replaces_in_place() -> TestResult {
        let mut catalog = catalog()?;

        catalog.update_service(service("basic", 549))?;

        let ids: Vec<_> = catalog.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, ["deep", "basic", "sofa"]);
        assert_eq!(catalog.get(&ServiceId::new("basic")).map(|s| s.price), Some(549));

        Ok(())
    }

    #[test]
    fn update_unknown_id_is_not_found() -> TestResult {
        let mut catalog = catalog()?;

        let result = catalog.update_service(service("garden", 1));

        assert_eq!(result, Err(CatalogError::NotFound(ServiceId::new("garden"))));

        Ok(())
    }

    #[test]
    fn remove_returns_removed_service() -> TestResult {
        let mut catalog = catalog()?;

        let removed = catalog.remove_service(&ServiceId::new("sofa"));

        assert_eq!(removed.map(|s| s.price), Some(799));
        assert_eq!(catalog.remove_service(&ServiceId::new("sofa")), None);
        assert_eq!(catalog.len(), 2);

        Ok(())
    }

    #[test]
    fn set_services_rejects_duplicates_without_changing() -> TestResult {
        let mut catalog = catalog()?;

        let result = catalog.set_services(vec![service("a", 1), service("a", 2)]);

        assert_eq!(result, Err(CatalogError::DuplicateId(ServiceId::new("a"))));
        assert_eq!(catalog.len(), 3);

        Ok(())
    }

    #[test]
    fn catalog_edits_do_not_reprice_cart_items() -> TestResult {
        let mut catalog = catalog()?;
        let mut cart = Cart::new();

        if let Some(item) = catalog.snapshot(&ServiceId::new("deep")) {
            cart.add_item(item);
        }

        catalog.update_service(service("deep", 1299))?;

        assert_eq!(cart.subtotal(), 899);

        Ok(())
    }

    #[tokio::test]
    async fn load_from_source() -> TestResult {
        let mut source = MockCatalogSource::new();
        source
            .expect_list_active_services()
            .times(1)
            .returning(|| Ok(vec![service("deep", 899), service("basic", 499)]));

        let catalog = ServiceCatalog::load_from(&source).await?;

        assert_eq!(catalog.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn load_from_failing_source() {
        let mut source = MockCatalogSource::new();
        source
            .expect_list_active_services()
            .returning(|| Err(CatalogError::Source("timeout".to_string())));

        let result = ServiceCatalog::load_from(&source).await;

        assert_eq!(result, Err(CatalogError::Source("timeout".to_string())));
    }
}
