//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Role of an authenticated admin-panel user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access to catalog management.
    #[default]
    Admin,
    /// Day-to-day catalog management.
    Manager,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Stock availability label shown on product cards and in the admin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// More than [`StockStatus::LOW_STOCK_LIMIT`] units.
    InStock,
    /// Between one and [`StockStatus::LOW_STOCK_LIMIT`] units.
    LowStock,
    /// No units left.
    OutOfStock,
}

impl StockStatus {
    /// Quantities at or below this are reported as low stock.
    pub const LOW_STOCK_LIMIT: u32 = 10;

    /// Classify a stock quantity.
    #[must_use]
    pub const fn for_quantity(quantity: u32) -> Self {
        if quantity > Self::LOW_STOCK_LIMIT {
            Self::InStock
        } else if quantity > 0 {
            Self::LowStock
        } else {
            Self::OutOfStock
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
