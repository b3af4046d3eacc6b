//! Core types for GreenSickle.
//!
//! This module provides type-safe wrappers and records for the catalog and
//! the admin session.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{NewProduct, Product, ProductUpdate};
pub use status::*;
pub use user::User;
