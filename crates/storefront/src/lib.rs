//! GreenSickle Agro storefront state.
//!
//! The storefront is a product catalog for a farm-produce business with a
//! small admin area. This crate holds the state behind it:
//!
//! - [`catalog::ProductStore`] - the product list, persisted after every edit
//! - [`auth::AuthStore`] - the admin session, persisted in cookies
//! - [`services::email::Mailer`] - contact form and newsletter delivery
//!
//! [`state::AppState`] wires them to the on-disk storage described by
//! [`config::StorefrontConfig`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod storage;
pub mod telemetry;
