//! URL construction for the auth and delegated surfaces

use crate::constants::{API_PREFIX, AUTH_PREFIX, DEFAULT_HOST};

/// Base URLs for the two API surfaces.
///
/// Paths are appended verbatim: no encoding, no separator fix-up. Callers
/// pass paths with a leading `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    auth_base: String,
    api_base: String,
}

impl Endpoints {
    /// Derive both surfaces from a host such as `http://localhost:8000`.
    pub fn for_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            auth_base: format!("{host}{AUTH_PREFIX}"),
            api_base: format!("{host}{API_PREFIX}"),
        }
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}{path}", self.auth_base)
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::for_host(DEFAULT_HOST)
    }
}
