//! Seed catalog used when no persisted catalog can be loaded.

use greensickle_core::{NewProduct, Price, Product, ProductId};

const IMAGE_PARAMS: &str = "?auto=compress&cs=tinysrgb&w=500";

struct SeedProduct {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    naira: u64,
    image: &'static str,
    category: &'static str,
    in_stock: u32,
    featured: bool,
    organic: bool,
    seasonal: bool,
}

const SEED: [SeedProduct; 7] = [
    SeedProduct {
        id: "1",
        name: "Maize",
        description: "High-quality maize from Northern Nigeria, perfect for various meals.",
        naira: 3_500,
        image: "https://images.pexels.com/photos/255459/pexels-photo-255459.jpeg",
        category: "Cereals",
        in_stock: 100,
        featured: true,
        organic: true,
        seasonal: false,
    },
    SeedProduct {
        id: "2",
        name: "Soybeans",
        description: "Nutritious soybeans, a great source of protein.",
        naira: 4_500,
        image: "https://images.pexels.com/photos/158648/soy-beans-soy-soy-protein-158648.jpeg",
        category: "Legumes",
        in_stock: 80,
        featured: true,
        organic: true,
        seasonal: false,
    },
    SeedProduct {
        id: "3",
        name: "Live Cow",
        description: "Healthy and strong live cow, ideal for breeding or meat.",
        naira: 150_000,
        image: "https://images.pexels.com/photos/162240/bull-calf-heifer-ko-162240.jpeg",
        category: "Livestock",
        in_stock: 10,
        featured: false,
        organic: false,
        seasonal: false,
    },
    SeedProduct {
        id: "4",
        name: "Fresh Eggs",
        description: "Farm-fresh eggs from healthy chickens.",
        naira: 1_200,
        image: "https://images.pexels.com/photos/162712/egg-white-food-protein-162712.jpeg",
        category: "Poultry",
        in_stock: 200,
        featured: false,
        organic: true,
        seasonal: false,
    },
    SeedProduct {
        id: "5",
        name: "Teak Wood",
        description: "High-quality teak wood for furniture and construction.",
        naira: 50_000,
        image: "https://images.pexels.com/photos/139338/pexels-photo-139338.jpeg",
        category: "Forestry",
        in_stock: 15,
        featured: false,
        organic: false,
        seasonal: false,
    },
    SeedProduct {
        id: "6",
        name: "Tomatoes",
        description: "Fresh and juicy tomatoes, grown organically.",
        naira: 800,
        image: "https://images.pexels.com/photos/533280/pexels-photo-533280.jpeg",
        category: "Vegetables",
        in_stock: 150,
        featured: false,
        organic: true,
        seasonal: true,
    },
    SeedProduct {
        id: "7",
        name: "Mangoes",
        description: "Sweet and delicious mangoes, perfect for a healthy snack.",
        naira: 1_500,
        image: "https://images.pexels.com/photos/2294471/pexels-photo-2294471.jpeg",
        category: "Fruits",
        in_stock: 120,
        featured: true,
        organic: true,
        seasonal: true,
    },
];

/// The default catalog: seven agricultural products, three of them featured.
#[must_use]
pub fn seed_catalog() -> Vec<Product> {
    SEED.iter()
        .map(|seed| {
            NewProduct {
                name: seed.name.to_owned(),
                description: seed.description.to_owned(),
                price: Price::from_minor_units(seed.naira * 100),
                image: format!("{}{IMAGE_PARAMS}", seed.image),
                category: seed.category.to_owned(),
                in_stock: seed.in_stock,
                featured: seed.featured,
                organic: seed.organic,
                seasonal: seed.seasonal,
            }
            .with_id(ProductId::new(seed.id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_seed_shape() {
        let catalog = seed_catalog();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.iter().filter(|p| p.featured).count(), 3);

        let ids: HashSet<_> = catalog.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 7, "seed ids must be unique");
    }

    #[test]
    fn test_seed_prices() {
        let catalog = seed_catalog();
        let cow = catalog.iter().find(|p| p.name == "Live Cow");
        assert_eq!(
            cow.map(|p| p.price.display()).as_deref(),
            Some("₦150,000.00")
        );
    }
}
