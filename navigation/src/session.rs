use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{error::NavigationError, Result};

/// Session key holding the page to return to after login
pub const RETURN_URL_KEY: &str = "returnUrl";

/// Per-session key/value storage
#[derive(Debug, Default)]
pub struct SessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values().remove(key)
    }

    /// Remember where to send the user after login.
    ///
    /// Only site-relative paths are accepted, so the value can never point
    /// at another host.
    pub fn stash_return_url(&self, path: &str) -> Result<()> {
        if !is_site_relative(path) {
            warn!("Refusing to stash return URL {:?}", path);
            return Err(NavigationError::InvalidReturnUrl(path.to_string()));
        }
        debug!("Stashing return URL {}", path);
        self.set(RETURN_URL_KEY, path);
        Ok(())
    }

    /// The stashed return URL, removed on read
    pub fn take_return_url(&self) -> Option<String> {
        self.remove(RETURN_URL_KEY)
    }
}

fn is_site_relative(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}
