//! Cookie storage for the admin session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{StorageError, write_atomic};

/// `SameSite` attribute of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

/// A stored cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    /// The cookie is invisible at and after this instant.
    pub expires: DateTime<Utc>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl Cookie {
    /// Create a secure, `SameSite=Strict` cookie that expires `ttl` from now.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expires: Utc::now() + ttl,
            secure: true,
            same_site: SameSite::Strict,
        }
    }

    /// Whether the cookie has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

/// A cookie store with browser semantics: expired cookies are never returned.
pub trait CookieStore {
    /// Value of the live cookie called `name`, if any.
    fn get(&self, name: &str) -> Option<String>;

    /// Store a cookie, replacing any cookie with the same name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&mut self, cookie: Cookie) -> Result<(), StorageError>;

    /// Remove the cookie called `name`. Removing a missing cookie is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&mut self, name: &str) -> Result<(), StorageError>;
}

/// In-memory cookie jar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieJar {
    cookies: BTreeMap<String, Cookie>,
}

impl CookieJar {
    /// Create an empty jar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the cookie called `name` if it is live at `now`.
    #[must_use]
    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        self.cookies
            .get(name)
            .filter(|cookie| !cookie.is_expired_at(now))
            .map(|cookie| cookie.value.clone())
    }

    /// The full cookie record, including expiry and flags, if present.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    /// Drop every cookie that has expired at `now`.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        self.cookies.retain(|_, cookie| !cookie.is_expired_at(now));
    }

    /// Number of stored cookies, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Whether the jar holds no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieStore for CookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.get_at(name, Utc::now())
    }

    fn set(&mut self, cookie: Cookie) -> Result<(), StorageError> {
        self.cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        self.cookies.remove(name);
        Ok(())
    }
}

/// Cookie jar persisted as a JSON file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileCookieJar {
    path: PathBuf,
    jar: CookieJar,
}

impl FileCookieJar {
    /// Open the jar at `path`.
    ///
    /// A missing file opens an empty jar. An unreadable or corrupt file is
    /// logged and also opens an empty jar; it is overwritten on the next change.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut jar = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Discarding corrupt cookie jar");
                CookieJar::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CookieJar::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read cookie jar");
                CookieJar::new()
            }
        };
        jar.purge_expired(Utc::now());
        Self { path, jar }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory view of the jar.
    #[must_use]
    pub const fn jar(&self) -> &CookieJar {
        &self.jar
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_vec_pretty(&self.jar)?;
        write_atomic(&self.path, &contents)?;
        Ok(())
    }
}

impl CookieStore for FileCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.get(name)
    }

    fn set(&mut self, cookie: Cookie) -> Result<(), StorageError> {
        self.jar.set(cookie)?;
        self.flush()
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        if self.jar.cookie(name).is_none() {
            return Ok(());
        }
        self.jar.remove(name)?;
        self.flush()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cookie_defaults_to_secure_strict() {
        let cookie = Cookie::new("auth-token", "abc", Duration::days(7));
        assert!(cookie.secure);
        assert_eq!(cookie.same_site, SameSite::Strict);
        assert!(cookie.expires > Utc::now() + Duration::days(6));
    }

    #[test]
    fn test_jar_hides_expired_cookies() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("auth-token", "abc", Duration::days(7)))
            .unwrap();

        let now = Utc::now();
        assert_eq!(jar.get_at("auth-token", now).as_deref(), Some("abc"));
        assert_eq!(jar.get_at("auth-token", now + Duration::days(8)), None);
    }

    #[test]
    fn test_jar_purge_expired() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("fresh", "1", Duration::days(1))).unwrap();
        jar.set(Cookie::new("stale", "2", Duration::days(-1))).unwrap();

        assert_eq!(jar.get("stale"), None);
        jar.purge_expired(Utc::now());
        assert_eq!(jar.len(), 1);
        assert!(jar.cookie("fresh").is_some());
    }

    #[test]
    fn test_jar_set_replaces_by_name() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("user-data", "old", Duration::days(1)))
            .unwrap();
        jar.set(Cookie::new("user-data", "new", Duration::days(1)))
            .unwrap();
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get("user-data").as_deref(), Some("new"));
    }

    #[test]
    fn test_file_jar_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let mut jar = FileCookieJar::open(&path);
        jar.set(Cookie::new("auth-token", "abc", Duration::days(7)))
            .unwrap();

        let reopened = FileCookieJar::open(&path);
        assert_eq!(reopened.get("auth-token").as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_jar_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        let mut jar = FileCookieJar::open(&path);
        jar.set(Cookie::new("auth-token", "abc", Duration::days(7)))
            .unwrap();
        jar.remove("auth-token").unwrap();

        assert!(FileCookieJar::open(&path).jar().is_empty());
    }

    #[test]
    fn test_file_jar_corrupt_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, "{not json").unwrap();

        let jar = FileCookieJar::open(&path);
        assert!(jar.jar().is_empty());
        assert_eq!(jar.path(), path.as_path());
    }
}
