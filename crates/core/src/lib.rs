//! GreenSickle Core - Shared domain types.
//!
//! This crate provides the records shared by the storefront state containers:
//! - [`Product`], [`NewProduct`] and [`ProductUpdate`] for the catalog
//! - [`User`] and [`UserRole`] for the admin session
//! - Validated newtypes: [`Email`], [`Price`], [`ProductId`], [`UserId`]
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage
//! access, no HTTP clients. Persistence lives in `greensickle-storefront`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
