//! The product store: CRUD over the catalog plus derived views.

use std::collections::HashSet;
use std::fmt;

use rust_decimal::Decimal;

use greensickle_core::{NewProduct, Product, ProductId, ProductUpdate};

use super::{LOW_STOCK_THRESHOLD, LoadError, STORAGE_KEY, load, seed_catalog};
use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, StorageError};

/// Number of products shown in the home page's featured section.
const DISPLAY_LIMIT: usize = 6;

/// Below this many featured products, the home page tops up with others.
const MIN_FEATURED_FOR_DISPLAY: usize = 3;

/// Summary figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_products: usize,
    pub featured_products: usize,
    pub units_in_stock: u64,
    /// Sum of price times units in stock.
    pub inventory_value: Decimal,
    pub low_stock_products: usize,
}

/// Owns the product catalog for the current session.
///
/// Every mutation writes the full list back to storage. Mutations on an
/// unknown ID are silent no-ops.
pub struct ProductStore {
    products: Vec<Product>,
    storage: Box<dyn KeyValueStore>,
}

impl fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductStore")
            .field("products", &self.products.len())
            .finish_non_exhaustive()
    }
}

impl ProductStore {
    /// Build the store from whatever is persisted in `storage`.
    ///
    /// Falls back to the seed catalog when nothing usable is stored. A
    /// missing or corrupt value is replaced on disk straight away. If the
    /// backend cannot be read, the seed is used in memory only and storage
    /// is left alone until the first edit.
    pub fn hydrate(storage: Box<dyn KeyValueStore>) -> Self {
        let (products, write_back) = match load(storage.as_ref()) {
            Ok(products) => {
                tracing::debug!(count = products.len(), "Loaded persisted catalog");
                (products, true)
            }
            Err(LoadError::Missing(_)) => {
                tracing::debug!("No persisted catalog, using seed catalog");
                (seed_catalog(), true)
            }
            Err(e @ LoadError::Corrupt(_)) => {
                tracing::warn!(error = %e, "Persisted catalog unusable, using seed catalog");
                (seed_catalog(), true)
            }
            Err(e @ LoadError::Storage(_)) => {
                tracing::warn!(error = %e, "Cannot read persisted catalog, using seed catalog until the next edit");
                (seed_catalog(), false)
            }
        };

        let mut store = Self { products, storage };
        if write_back {
            store.persist();
        }
        store
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a product with a freshly generated ID and return that ID.
    pub fn add_product(&mut self, product: NewProduct) -> ProductId {
        let mut id = ProductId::generate();
        while self.get(&id).is_some() {
            id = ProductId::generate();
        }

        tracing::info!(product_id = %id, name = %product.name, "Adding product");
        add_breadcrumb("catalog", "Product added", &[("product_id", id.as_str())]);
        self.products.push(product.with_id(id.clone()));
        self.persist();
        id
    }

    /// Merge `update` into the product with `id`.
    ///
    /// Returns false, leaving the catalog untouched, if no product has `id`.
    pub fn update_product(&mut self, id: &ProductId, update: ProductUpdate) -> bool {
        let Some(product) = self.products.iter_mut().find(|product| &product.id == id) else {
            tracing::debug!(product_id = %id, "Update for unknown product ignored");
            return false;
        };

        update.apply_to(product);
        tracing::info!(product_id = %id, "Updated product");
        add_breadcrumb("catalog", "Product updated", &[("product_id", id.as_str())]);
        self.persist();
        true
    }

    /// Remove the product with `id`, returning it if it existed.
    pub fn delete_product(&mut self, id: &ProductId) -> Option<Product> {
        let Some(index) = self.products.iter().position(|product| &product.id == id) else {
            tracing::debug!(product_id = %id, "Delete for unknown product ignored");
            return None;
        };

        let removed = self.products.remove(index);
        tracing::info!(product_id = %id, name = %removed.name, "Deleted product");
        add_breadcrumb("catalog", "Product deleted", &[("product_id", id.as_str())]);
        self.persist();
        Some(removed)
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Featured products in catalog order.
    #[must_use]
    pub fn featured_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|product| product.featured).collect()
    }

    /// Distinct categories in order of first appearance.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Products whose name or category contains `term`, ignoring case.
    ///
    /// The term is matched as typed; an empty term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.to_lowercase();
        self.products
            .iter()
            .filter(|product| product.matches_lowercase(&needle))
            .collect()
    }

    /// Products with fewer than `threshold` units in stock.
    #[must_use]
    pub fn low_stock(&self, threshold: u32) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| product.in_stock < threshold)
            .collect()
    }

    /// Products for the home page's featured section.
    ///
    /// With at least three featured products, shows up to six of them.
    /// Otherwise shows every featured product followed by the rest of the
    /// catalog, up to six in total.
    #[must_use]
    pub fn display_products(&self) -> Vec<&Product> {
        let featured = self.featured_products();
        if featured.len() >= MIN_FEATURED_FOR_DISPLAY {
            return featured.into_iter().take(DISPLAY_LIMIT).collect();
        }

        featured
            .into_iter()
            .chain(self.products.iter().filter(|product| !product.featured))
            .take(DISPLAY_LIMIT)
            .collect()
    }

    /// Dashboard summary figures.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total_products: self.products.len(),
            featured_products: self.products.iter().filter(|p| p.featured).count(),
            units_in_stock: self.products.iter().map(|p| u64::from(p.in_stock)).sum(),
            inventory_value: self
                .products
                .iter()
                .map(|p| p.price.amount() * Decimal::from(p.in_stock))
                .sum(),
            low_stock_products: self.low_stock(LOW_STOCK_THRESHOLD).len(),
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the catalog to storage.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the write fails.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.products)?;
        self.storage.set(STORAGE_KEY, &json)
    }

    /// Save, logging instead of failing. The in-memory catalog stays
    /// authoritative for the session either way.
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "Failed to persist catalog");
        }
    }
}
