//! Catalog product records.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, StockStatus};

/// A product listed in the storefront catalog.
///
/// Serialized with camelCase keys (`inStock`) to stay compatible with
/// catalogs persisted by the web storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique within a catalog. Assigned by the store, never by callers.
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    pub category: String,
    /// Units available.
    pub in_stock: u32,
    pub featured: bool,
    pub organic: bool,
    pub seasonal: bool,
}

impl Product {
    /// Stock label for this product's quantity.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::for_quantity(self.in_stock)
    }

    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.in_stock > 0
    }

    /// Case-insensitive substring match against name or category.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}

/// Fields for a product that has not been added to a catalog yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    pub in_stock: u32,
    pub featured: bool,
    pub organic: bool,
    pub seasonal: bool,
}

impl NewProduct {
    /// Attach an ID, producing a catalog record.
    #[must_use]
    pub fn with_id(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
            category: self.category,
            in_stock: self.in_stock,
            featured: self.featured,
            organic: self.organic,
            seasonal: self.seasonal,
        }
    }
}

/// A partial update. `None` fields are left untouched.
///
/// Has no ID field; a product keeps its ID for life.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<u32>,
    pub featured: Option<bool>,
    pub organic: Option<bool>,
    pub seasonal: Option<bool>,
}

impl ProductUpdate {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.in_stock.is_none()
            && self.featured.is_none()
            && self.organic.is_none()
            && self.seasonal.is_none()
    }

    /// Merge the provided fields into `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(in_stock) = self.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(organic) = self.organic {
            product.organic = organic;
        }
        if let Some(seasonal) = self.seasonal {
            product.seasonal = seasonal;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tomatoes() -> Product {
        NewProduct {
            name: "Tomatoes".to_string(),
            description: "Fresh and juicy tomatoes, grown organically.".to_string(),
            price: Price::from_minor_units(80_000),
            image: "https://example.com/tomatoes.jpeg".to_string(),
            category: "Vegetables".to_string(),
            in_stock: 150,
            featured: false,
            organic: true,
            seasonal: true,
        }
        .with_id(ProductId::new("6"))
    }

    #[test]
    fn test_apply_changes_only_given_fields() {
        let original = tomatoes();
        let mut updated = original.clone();

        ProductUpdate {
            price: Some(Price::from_minor_units(95_000)),
            ..ProductUpdate::default()
        }
        .apply_to(&mut updated);

        assert_eq!(updated.price, Price::from_minor_units(95_000));
        assert_eq!(
            Product {
                price: original.price,
                ..updated
            },
            original
        );
    }

    #[test]
    fn test_empty_update_is_noop() {
        let original = tomatoes();
        let mut updated = original.clone();
        let update = ProductUpdate::default();

        assert!(update.is_empty());
        update.apply_to(&mut updated);
        assert_eq!(updated, original);
    }

    #[test]
    fn test_matches_name_or_category() {
        let product = tomatoes();
        assert!(product.matches_lowercase("tomat"));
        assert!(product.matches_lowercase("veget"));
        assert!(!product.matches_lowercase("maize"));
    }

    #[test]
    fn test_stock_helpers() {
        let mut product = tomatoes();
        assert!(product.is_available());
        assert_eq!(product.stock_status(), StockStatus::InStock);

        product.in_stock = 0;
        assert!(!product.is_available());
        assert_eq!(product.stock_status(), StockStatus::OutOfStock);
    }

    #[test]
    fn test_reads_web_storefront_json() {
        let json = r#"{
            "id": "1",
            "name": "Maize",
            "description": "High-quality maize.",
            "price": 3500,
            "image": "https://example.com/maize.jpeg",
            "category": "Cereals",
            "inStock": 100,
            "featured": true,
            "organic": true,
            "seasonal": false
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "1");
        assert_eq!(product.in_stock, 100);
        assert_eq!(product.price, Price::from_minor_units(350_000));
    }

    #[test]
    fn test_rejects_negative_stock() {
        let json = r#"{"id":"1","name":"x","description":"","price":1,"image":"",
            "category":"c","inStock":-1,"featured":false,"organic":false,"seasonal":false}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_partial_update_from_json() {
        let update: ProductUpdate = serde_json::from_str(r#"{"inStock": 5}"#).unwrap();
        assert_eq!(update.in_stock, Some(5));
        assert!(update.name.is_none());
    }
}
