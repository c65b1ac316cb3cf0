//! Network-first asset cache.
//!
//! Counterpart of the service worker: every fetch goes to the network
//! first; a 200 same-origin response is copied into a fixed cache
//! namespace, and on transport failure the last cached copy is served if
//! present. Cross-origin and non-200 responses pass through uncached.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

/// Fixed cache namespace. Bump to invalidate every stored asset.
pub const CACHE_NAMESPACE: &str = "evo-persona-v1";

#[derive(Debug, Error)]
pub enum AssetError {
    /// Network fetch failed and no cached copy exists for the request.
    #[error("asset unavailable: {url} ({detail})")]
    Unavailable { url: String, detail: String },
}

/// Network-first fetch wrapper over a fixed origin.
pub struct AssetCache {
    client: reqwest::Client,
    origin: String,
    store: Mutex<HashMap<String, Vec<u8>>>,
}

impl AssetCache {
    /// `origin` is the scheme+authority all relative paths resolve against,
    /// e.g. `http://localhost:5000`.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        debug!(namespace = CACHE_NAMESPACE, origin = %origin, "asset cache ready");
        Self {
            client: reqwest::Client::new(),
            origin,
            store: Mutex::new(HashMap::new()),
        }
    }

    /// Seed the cache with a fixed asset list. Individual failures are
    /// ignored; the asset is simply not pre-cached.
    pub async fn precache(&self, paths: &[&str]) {
        for path in paths {
            if let Err(e) = self.fetch(path).await {
                debug!(error = %e, path = %path, "precache miss");
            }
        }
    }

    /// Network-first fetch. On a 200 same-origin response the body is
    /// copied into the cache before being returned. On transport failure
    /// the cached copy is served when present, otherwise the fetch fails.
    pub async fn fetch(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let url = self.resolve(path);
        match self.client.get(&url).send().await {
            Ok(resp) => {
                let status = resp.status();
                let body = resp.bytes().await.map_err(|e| AssetError::Unavailable {
                    url: url.clone(),
                    detail: e.to_string(),
                })?;
                let body = body.to_vec();
                if status.as_u16() == 200 && self.same_origin(&url) {
                    self.store.lock().expect("asset cache lock poisoned")
                        .insert(url, body.clone());
                }
                Ok(body)
            }
            Err(e) => match self.cached(path) {
                Some(body) => {
                    debug!(url = %url, "network fetch failed, serving cached copy");
                    Ok(body)
                }
                None => Err(AssetError::Unavailable { url, detail: e.to_string() }),
            },
        }
    }

    /// Cached copy for a path, if any.
    pub fn cached(&self, path: &str) -> Option<Vec<u8>> {
        let url = self.resolve(path);
        self.store.lock().expect("asset cache lock poisoned").get(&url).cloned()
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }

    fn same_origin(&self, url: &str) -> bool {
        url.starts_with(&self.origin)
    }

    #[cfg(test)]
    fn insert_for_test(&self, path: &str, body: Vec<u8>) {
        let url = self.resolve(path);
        self.store.lock().expect("asset cache lock poisoned").insert(url, body);
    }
}
