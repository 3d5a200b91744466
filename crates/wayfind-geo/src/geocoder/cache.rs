use std::sync::RwLock;

use ahash::AHashMap as HashMap;
use futures::{FutureExt, future::BoxFuture};
use tracing::debug;

use super::{Geocoder, GeocoderProvider, GeocodingResult, Result};

/// Memoises successful lookups of an inner geocoder, keyed by the lowercased,
/// trimmed address.
///
/// Misses and failures are never cached, so an address that was unresolvable
/// while the provider was down is retried on the next call. Call
/// [`CachingGeocoder::clear`] to invalidate.
///
/// A cache built with [`CachingGeocoder::new`] is unbounded and the caller owns
/// eviction. [`CachingGeocoder::with_max_entries`] caps it instead: inserting a
/// new address into a full cache flushes every entry first.
#[derive(Debug)]
pub struct CachingGeocoder<G> {
    inner: G,
    max_entries: Option<usize>,
    entries: RwLock<HashMap<String, GeocodingResult>>,
}

impl<G: Geocoder> CachingGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            max_entries: None,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Bounded cache holding at most `max_entries` addresses (at least one).
    pub fn with_max_entries(inner: G, max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries.max(1)),
            ..Self::new(inner)
        }
    }

    fn cache_key(address: &str) -> String {
        address.trim().to_lowercase()
    }

    fn cached(&self, key: &str) -> Option<GeocodingResult> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    async fn lookup(&self, address: &str) -> Result<GeocodingResult> {
        let key = Self::cache_key(address);
        if let Some(hit) = self.cached(&key) {
            debug!(address = key, "Geocode cache hit");
            return Ok(hit);
        }

        let result = self.inner.geocode(address).await?;
        if let Ok(mut entries) = self.entries.write() {
            let full = self
                .max_entries
                .is_some_and(|max| entries.len() >= max && !entries.contains_key(&key));
            if full {
                debug!(evicted = entries.len(), "Geocode cache full, flushing");
                entries.clear();
            }
            entries.insert(key, result.clone());
        }
        Ok(result)
    }
}

impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    fn geocode<'a>(&'a self, address: &'a str) -> BoxFuture<'a, Result<GeocodingResult>> {
        self.lookup(address).boxed()
    }

    fn provider(&self) -> Option<GeocoderProvider> {
        self.inner.provider()
    }
}
