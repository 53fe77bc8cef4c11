//! Session catalog: loaded once, read many times.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::error::LoadError;
use crate::group::ProductGroup;
use crate::product::Product;
use crate::source::CatalogSource;

/// Load progress, for loading and error views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    NotLoaded,
    /// A load is suspended waiting on the source. Do not assume data is present.
    Loading,
    Loaded { count: usize },
    Failed { error: LoadError },
}

#[derive(Debug)]
struct Inner {
    products: Arc<[Product]>,
    state: CatalogState,
}

/// Read-mostly holder of the session's product list.
///
/// The list is swapped in whole on a successful load, so readers see either
/// the previous snapshot or the new one, never a partial list. The lock is
/// never held across an await.
#[derive(Debug)]
pub struct CatalogStore {
    inner: RwLock<Inner>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                products: Arc::from(Vec::new()),
                state: CatalogState::NotLoaded,
            }),
        }
    }

    /// Fetch the catalog from `source` and replace the current one.
    ///
    /// On failure the store is left empty and the error is also recorded in
    /// [`CatalogStore::state`]. Nothing is retried. If the returned future is
    /// dropped before the source answers, the previous state is restored.
    pub async fn load<S>(&self, source: &S) -> Result<Arc<[Product]>, LoadError>
    where
        S: CatalogSource + ?Sized,
    {
        let previous = std::mem::replace(&mut self.write().state, CatalogState::Loading);
        let guard = LoadingGuard {
            store: self,
            previous: Some(previous),
        };
        info!(source = %source.describe(), "loading catalog");

        let fetched = source.fetch().await;
        guard.disarm();

        match fetched {
            Ok(products) => {
                debug!(
                    product_ids = ?products.iter().map(|p| p.id().as_str()).collect::<Vec<_>>(),
                    "catalog product ids"
                );
                let snapshot: Arc<[Product]> = Arc::from(products);
                let mut inner = self.write();
                inner.state = CatalogState::Loaded {
                    count: snapshot.len(),
                };
                inner.products = Arc::clone(&snapshot);
                info!(count = snapshot.len(), "catalog loaded");
                Ok(snapshot)
            }
            Err(error) => {
                warn!(%error, "catalog load failed");
                let mut inner = self.write();
                inner.products = Arc::from(Vec::new());
                inner.state = CatalogState::Failed {
                    error: error.clone(),
                };
                Err(error)
            }
        }
    }

    /// Snapshot of every product, in source order. Empty until loaded.
    pub fn all(&self) -> Arc<[Product]> {
        Arc::clone(&self.read().products)
    }

    pub fn state(&self) -> CatalogState {
        self.read().state.clone()
    }

    pub fn get(&self, product_id: &str) -> Option<Product> {
        self.read()
            .products
            .iter()
            .find(|p| p.id().as_str() == product_id)
            .cloned()
    }

    /// Distinct groups in the order they first appear in the catalog.
    pub fn groups(&self) -> Vec<ProductGroup> {
        let inner = self.read();
        let mut groups: Vec<ProductGroup> = Vec::new();
        for product in inner.products.iter() {
            if !groups.contains(product.group()) {
                groups.push(product.group().clone());
            }
        }
        groups
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Puts back the pre-load state when a load is abandoned mid-fetch.
struct LoadingGuard<'a> {
    store: &'a CatalogStore,
    previous: Option<CatalogState>,
}

impl LoadingGuard<'_> {
    fn disarm(mut self) {
        self.previous = None;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            debug!(?previous, "catalog load abandoned");
            self.store.write().state = previous;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Availability;
    use crate::source::InMemoryCatalogSource;
    use rust_decimal::Decimal;

    fn product(id: &str, group: &str) -> Product {
        Product::new(id, id, group, Decimal::new(10, 0), Decimal::new(8, 0), Availability::Available)
    }

    #[tokio::test]
    async fn load_replaces_catalog_and_reports_count() {
        let store = CatalogStore::new();
        assert_eq!(store.state(), CatalogState::NotLoaded);
        assert!(store.all().is_empty());

        let source = InMemoryCatalogSource::from_products(vec![product("a", "Laptop"), product("b", "Tablet")]);
        let loaded = store.load(&source).await.unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(store.all().len(), 2);
        assert_eq!(store.state(), CatalogState::Loaded { count: 2 });
        assert_eq!(store.get("b").map(|p| p.group().clone()), Some(ProductGroup::new("Tablet")));
    }

    #[tokio::test]
    async fn failed_load_leaves_store_empty() {
        let store = CatalogStore::new();
        store
            .load(&InMemoryCatalogSource::from_products(vec![product("a", "Laptop")]))
            .await
            .unwrap();

        let err = store
            .load(&InMemoryCatalogSource::failing(LoadError::Status(503)))
            .await
            .unwrap_err();

        assert_eq!(err, LoadError::Status(503));
        assert!(store.all().is_empty());
        assert_eq!(
            store.state(),
            CatalogState::Failed {
                error: LoadError::Status(503)
            }
        );
    }

    #[tokio::test]
    async fn earlier_snapshots_are_unaffected_by_reload() {
        let store = CatalogStore::new();
        store
            .load(&InMemoryCatalogSource::from_products(vec![product("a", "Laptop")]))
            .await
            .unwrap();
        let before = store.all();

        store
            .load(&InMemoryCatalogSource::from_products(vec![product("b", "Mobile"), product("c", "Mobile")]))
            .await
            .unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(store.all().len(), 2);
    }

    #[tokio::test]
    async fn groups_are_distinct_in_first_seen_order() {
        let store = CatalogStore::new();
        let source = InMemoryCatalogSource::from_products(vec![
            product("a", "Tablet"),
            product("b", "Laptop"),
            product("c", "Tablet"),
            product("d", "Accessory"),
        ]);
        store.load(&source).await.unwrap();

        let groups: Vec<String> = store.groups().iter().map(|g| g.to_string()).collect();
        assert_eq!(groups, vec!["Tablet", "Laptop", "Accessory"]);
    }

    /// Never answers, so a load against it only ends when it is dropped.
    struct StalledSource;

    #[async_trait::async_trait]
    impl CatalogSource for StalledSource {
        async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
            std::future::pending().await
        }

        fn describe(&self) -> String {
            "stalled".to_string()
        }
    }

    #[tokio::test]
    async fn abandoned_load_restores_previous_state() {
        let store = CatalogStore::new();
        let abandoned = tokio::time::timeout(std::time::Duration::from_millis(10), store.load(&StalledSource)).await;
        assert!(abandoned.is_err());
        assert_eq!(store.state(), CatalogState::NotLoaded);

        store
            .load(&InMemoryCatalogSource::from_products(vec![product("a", "Laptop")]))
            .await
            .unwrap();
        let abandoned = tokio::time::timeout(std::time::Duration::from_millis(10), store.load(&StalledSource)).await;
        assert!(abandoned.is_err());
        assert_eq!(store.state(), CatalogState::Loaded { count: 1 });
        assert_eq!(store.all().len(), 1);
    }
}
