//! Integration tests for the GreenSickle storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p greensickle-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Catalog edits persisted through a file-backed store
//! - `admin_session` - Admin login, reload, and logout across restarts
//! - `contact_mailer` - Contact and newsletter delivery outcomes
//!
//! The tests need no external services. Each one works in its own
//! temporary data directory.
