//! Product catalog state.
//!
//! # Persistence
//!
//! The whole catalog is stored as one JSON array under [`STORAGE_KEY`] and
//! rewritten after every mutation. The in-memory list is authoritative; the
//! stored copy is a cache that lets the catalog survive a reload.
//!
//! [`load`] reports *why* a catalog could not be read. Callers that just want
//! a usable catalog go through [`ProductStore::hydrate`], which falls back
//! to [`seed_catalog`]. A backend that cannot be read is never overwritten
//! by that fallback until the catalog is edited.

mod seed;
mod store;

use std::collections::HashSet;

use thiserror::Error;

use greensickle_core::{Product, ProductId};

use crate::storage::{KeyValueStore, StorageError};

pub use seed::seed_catalog;
pub use store::{CatalogStats, ProductStore};

/// Local-storage key holding the serialized catalog.
pub const STORAGE_KEY: &str = "farm-products";

/// Products with fewer units than this appear in the dashboard's low-stock list.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Errors that can occur when loading a persisted catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Nothing has been stored yet.
    #[error("no catalog stored under {0:?}")]
    Missing(&'static str),

    /// The stored value is not a valid product list.
    #[error("stored catalog is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The storage backend failed.
    #[error("catalog storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Read the persisted catalog.
///
/// Catalogs written by the browser storefront used millisecond timestamps as
/// IDs, which can collide. Every record is kept; a repeated ID is replaced by
/// a fresh one on all but its first occurrence.
///
/// # Errors
///
/// Returns `LoadError::Missing` if nothing is stored, `LoadError::Corrupt`
/// if the stored value is not a product list, and `LoadError::Storage` if
/// the backend cannot be read.
pub fn load(storage: &dyn KeyValueStore) -> Result<Vec<Product>, LoadError> {
    let raw = storage
        .get(STORAGE_KEY)?
        .ok_or(LoadError::Missing(STORAGE_KEY))?;
    let mut products: Vec<Product> = serde_json::from_str(&raw)?;

    let mut taken: HashSet<ProductId> = products.iter().map(|p| p.id.clone()).collect();
    let mut seen = HashSet::with_capacity(products.len());
    for product in &mut products {
        if seen.insert(product.id.clone()) {
            continue;
        }

        let mut id = ProductId::generate();
        while !taken.insert(id.clone()) {
            id = ProductId::generate();
        }
        tracing::warn!(
            duplicate_id = %product.id,
            product_id = %id,
            name = %product.name,
            "Reassigned duplicate product id"
        );
        product.id = id;
    }

    Ok(products)
}
