//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `email` - Contact form and newsletter delivery via `EmailJS`

pub mod email;
