//! Integration tests for the admin session across restarts.
//!
//! The session lives in the cookie file under the data directory, so a new
//! `AppState` over the same directory behaves like a page reload.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::Path;

use greensickle_core::UserRole;
use greensickle_storefront::auth::{AUTH_TOKEN_COOKIE, USER_DATA_COOKIE, hash_password};
use greensickle_storefront::config::StorefrontConfig;
use greensickle_storefront::state::{AppState, COOKIE_FILE};
use greensickle_storefront::storage::{CookieStore, FileCookieJar};

fn demo_config(dir: &Path) -> StorefrontConfig {
    config(dir, &[("GREENSICKLE_DEMO_MODE", "true")])
}

fn config(dir: &Path, vars: &[(&str, &str)]) -> StorefrontConfig {
    let mut map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    map.insert(
        "GREENSICKLE_DATA_DIR".to_string(),
        dir.to_string_lossy().into_owned(),
    );
    StorefrontConfig::from_vars(&map).unwrap()
}

// ============================================================================
// Demo account
// ============================================================================

#[test]
fn test_login_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = demo_config(dir.path());

    let mut state = AppState::new(&config).unwrap();
    assert!(state.auth_mut().login("admin@farmproducts.com", "admin123"));
    let user = state.auth().user().cloned().unwrap();
    drop(state);

    let state = AppState::new(&config).unwrap();
    assert_eq!(state.auth().user(), Some(&user));
    assert_eq!(user.role, UserRole::Admin);
}

#[test]
fn test_logout_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = demo_config(dir.path());

    let mut state = AppState::new(&config).unwrap();
    state.auth_mut().login("admin@farmproducts.com", "admin123");
    state.auth_mut().logout();
    drop(state);

    let state = AppState::new(&config).unwrap();
    assert!(!state.auth().is_authenticated());

    let jar = FileCookieJar::open(dir.path().join(COOKIE_FILE));
    assert!(jar.get(AUTH_TOKEN_COOKIE).is_none());
    assert!(jar.get(USER_DATA_COOKIE).is_none());
}

#[test]
fn test_rejected_login_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = demo_config(dir.path());

    let mut state = AppState::new(&config).unwrap();
    assert!(!state.auth_mut().login("admin@farmproducts.com", "admin1234"));
    drop(state);

    let jar = FileCookieJar::open(dir.path().join(COOKIE_FILE));
    assert!(jar.jar().is_empty());
}

#[test]
fn test_tampered_session_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let config = demo_config(dir.path());

    let mut state = AppState::new(&config).unwrap();
    state.auth_mut().login("admin@farmproducts.com", "admin123");
    drop(state);

    let cookie_path = dir.path().join(COOKIE_FILE);
    let mut raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&cookie_path).unwrap()).unwrap();
    raw[USER_DATA_COOKIE]["value"] = serde_json::Value::String("{\"id\":".to_string());
    std::fs::write(&cookie_path, raw.to_string()).unwrap();

    let state = AppState::new(&config).unwrap();
    assert!(!state.auth().is_authenticated());
    assert!(FileCookieJar::open(&cookie_path).jar().is_empty());
}

// ============================================================================
// Configured admin account
// ============================================================================

#[test]
fn test_configured_admin_account() {
    let dir = tempfile::tempdir().unwrap();
    let hash = hash_password("Harvest-Season-2024").unwrap();
    let config = config(
        dir.path(),
        &[
            ("ADMIN_EMAIL", "owner@greensickle.ng"),
            ("ADMIN_PASSWORD_HASH", hash.as_str()),
            ("ADMIN_NAME", "Farm Owner"),
            ("ADMIN_ROLE", "manager"),
        ],
    );

    let mut state = AppState::new(&config).unwrap();
    assert!(!state.auth_mut().login("admin@farmproducts.com", "admin123"));
    assert!(!state.auth_mut().login("owner@greensickle.ng", "harvest-season-2024"));
    assert!(state.auth_mut().login("owner@greensickle.ng", "Harvest-Season-2024"));
    drop(state);

    let state = AppState::new(&config).unwrap();
    let user = state.auth().user().unwrap();
    assert_eq!(user.name, "Farm Owner");
    assert_eq!(user.role, UserRole::Manager);
    assert_eq!(user.email.as_str(), "owner@greensickle.ng");
}
