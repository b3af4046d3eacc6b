//! Integration tests for catalog editing with file-backed persistence.
//!
//! Each test opens a fresh data directory, edits the catalog, and reopens
//! the directory to check what a reload would see.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use greensickle_core::{NewProduct, Price, ProductUpdate, StockStatus};
use greensickle_storefront::catalog::{self, LOW_STOCK_THRESHOLD, ProductStore, STORAGE_KEY};
use greensickle_storefront::storage::{FileStore, KeyValueStore};

fn open(dir: &Path) -> ProductStore {
    ProductStore::hydrate(Box::new(FileStore::open(dir).unwrap()))
}

fn honey() -> NewProduct {
    NewProduct {
        name: "Raw Honey".to_string(),
        description: "Unfiltered honey from Jos plateau hives".to_string(),
        price: Price::from_minor_units(650_000),
        image: "https://images.example.ng/honey.jpg".to_string(),
        category: "Honey".to_string(),
        in_stock: 4,
        featured: false,
        organic: true,
        seasonal: false,
    }
}

// ============================================================================
// First run
// ============================================================================

#[test]
fn test_first_run_seeds_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path());

    assert_eq!(store.len(), 7);
    let names: Vec<&str> = store.featured_products().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Maize", "Soybeans", "Mangoes"]);

    let storage = FileStore::open(dir.path()).unwrap();
    let persisted = catalog::load(&storage).unwrap();
    assert_eq!(persisted, store.products());
}

#[test]
fn test_corrupt_file_falls_back_to_seed() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = FileStore::open(dir.path()).unwrap();
    storage.set(STORAGE_KEY, "[{\"id\": 1}").unwrap();

    let store = open(dir.path());
    assert_eq!(store.products(), catalog::seed_catalog());

    // The seed replaces the corrupt value on disk.
    assert!(catalog::load(&FileStore::open(dir.path()).unwrap()).is_ok());
}

// ============================================================================
// Admin edits survive a reload
// ============================================================================

#[test]
fn test_add_update_delete_survive_reload() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = open(dir.path());
    let honey_id = store.add_product(honey());
    let maize_id = store.products()[0].id.clone();
    let cow_id = store.products()[2].id.clone();

    assert!(store.update_product(
        &maize_id,
        ProductUpdate {
            in_stock: Some(0),
            ..ProductUpdate::default()
        },
    ));
    assert!(store.delete_product(&cow_id).is_some());
    let before = store.products().to_vec();
    drop(store);

    let store = open(dir.path());
    assert_eq!(store.products(), before);
    assert_eq!(store.products().last().unwrap().id, honey_id);
    assert!(store.get(&cow_id).is_none());

    let maize = store.get(&maize_id).unwrap();
    assert_eq!(maize.stock_status(), StockStatus::OutOfStock);
    assert!(!maize.is_available());
}

#[test]
fn test_categories_follow_edits_across_reload() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = open(dir.path());
    store.add_product(honey());
    drop(store);

    let store = open(dir.path());
    assert_eq!(store.categories().last(), Some(&"Honey"));
    assert_eq!(store.search("HONEY").len(), 1);
}

// ============================================================================
// Dashboard figures
// ============================================================================

#[test]
fn test_dashboard_after_edits() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open(dir.path());

    let before = store.stats();
    store.add_product(honey());
    let after = store.stats();

    assert_eq!(after.total_products, before.total_products + 1);
    assert_eq!(after.units_in_stock, before.units_in_stock + 4);
    assert_eq!(after.low_stock_products, before.low_stock_products + 1);
    assert_eq!(
        after.inventory_value - before.inventory_value,
        Price::from_minor_units(2_600_000).amount()
    );

    let low: Vec<&str> = store
        .low_stock(LOW_STOCK_THRESHOLD)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert!(low.contains(&"Raw Honey"));
}
