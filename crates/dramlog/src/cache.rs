//! Decoded image cache.
//!
//! [`ImageCache`] keeps decoded photos keyed by a resource identifier (an entry key such as
//! `entry:<id>`, a URL, or a file path) so list cells do not decode or fetch the same image
//! twice in a session. It is bounded: once `capacity` images are held, the least recently
//! used one is evicted. Last write wins, and a `put` is visible to the next `get`.
//!
//! [`ImageCache::fetch`] loads images that are not cached yet. The read and the decode run
//! on tokio's blocking pool and the awaiting caller resumes on its own task. Concurrent
//! fetches of one source share a single load. A fetch cannot be cancelled once started;
//! dropping the future only stops waiting for it.

use image::DynamicImage;
use lru::LruCache;
use parking_lot::Mutex;
use reqwest::Url;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::error::{DiaryError, Result};

pub type CachedImage = Arc<DynamicImage>;

type PendingFetch = Arc<OnceCell<Option<CachedImage>>>;

/// Where a fetch reads its bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(Url),
    Local(PathBuf),
}

impl ImageSource {
    /// `http`/`https` URLs are remote, `file` URLs and anything that is not a URL are paths.
    pub fn parse(source: &str) -> Self {
        match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Self::Local(path),
                Err(()) => Self::Local(PathBuf::from(source)),
            },
            _ => Self::Local(PathBuf::from(source)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

pub struct ImageCache {
    images: Mutex<LruCache<String, CachedImage>>,
    pending: Mutex<HashMap<String, PendingFetch>>,
    client: reqwest::Client,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ImageCache {
    /// Creates a cache holding at most `capacity` images (at least one).
    pub fn new(capacity: usize, fetch_timeout: Duration) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        let client = reqwest::Client::builder().timeout(fetch_timeout).build()?;
        Ok(Self {
            images: Mutex::new(LruCache::new(capacity)),
            pending: Mutex::new(HashMap::new()),
            client,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    /// Stores `image` under `key`, replacing whatever was there.
    pub fn put(&self, key: impl Into<String>, image: CachedImage) {
        self.images.lock().put(key.into(), image);
    }

    pub fn get(&self, key: &str) -> Option<CachedImage> {
        let found = self.images.lock().get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    pub fn remove(&self, key: &str) -> Option<CachedImage> {
        self.images.lock().pop(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.images.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.images.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.images.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let images = self.images.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: images.len(),
            capacity: images.cap().get(),
        }
    }

    /// Decodes encoded bytes (JPEG or PNG) and caches the result under `key`.
    pub fn decode_and_put(&self, key: impl Into<String>, bytes: &[u8]) -> Result<CachedImage> {
        let image = Arc::new(image::load_from_memory(bytes)?);
        self.put(key, image.clone());
        Ok(image)
    }

    /// Returns the cached image for `source`, loading and caching it on a miss.
    ///
    /// Read or decode failures are logged and yield `None`.
    pub async fn fetch(&self, source: &str) -> Option<CachedImage> {
        if let Some(image) = self.get(source) {
            return Some(image);
        }

        let pending = self
            .pending
            .lock()
            .entry(source.to_string())
            .or_default()
            .clone();
        let image = pending.get_or_init(|| self.load(source)).await.clone();

        let mut inflight = self.pending.lock();
        if inflight
            .get(source)
            .is_some_and(|current| Arc::ptr_eq(current, &pending))
        {
            inflight.remove(source);
        }
        image
    }

    async fn load(&self, source: &str) -> Option<CachedImage> {
        let bytes = match self.read_source(source).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(source, error = %e, "failed to read image");
                return None;
            }
        };

        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;
        match decoded {
            Ok(Ok(image)) => {
                let image = Arc::new(image);
                self.put(source, image.clone());
                debug!(source, "image fetched and cached");
                Some(image)
            }
            Ok(Err(e)) => {
                warn!(source, error = %e, "failed to decode image");
                None
            }
            Err(e) => {
                warn!(source, error = %e, "image decode task failed");
                None
            }
        }
    }

    async fn read_source(&self, source: &str) -> Result<Vec<u8>> {
        match ImageSource::parse(source) {
            ImageSource::Remote(url) => {
                let response = self.client.get(url).send().await?.error_for_status()?;
                Ok(response.bytes().await?.to_vec())
            }
            ImageSource::Local(path) => tokio::task::spawn_blocking(move || std::fs::read(path))
                .await
                .map_err(|e| DiaryError::Store(format!("image read task failed: {}", e)))?
                .map_err(DiaryError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> ImageCache {
        ImageCache::new(capacity, Duration::from_secs(5)).unwrap()
    }

    fn pixel() -> CachedImage {
        Arc::new(DynamicImage::new_rgb8(1, 1))
    }

    #[test]
    fn put_then_get() {
        let cache = cache(4);
        let image = pixel();
        cache.put("a", image.clone());
        assert!(Arc::ptr_eq(&cache.get("a").unwrap(), &image));
        assert!(cache.get("b").is_none());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn last_write_wins() {
        let cache = cache(4);
        let first = pixel();
        let second = Arc::new(DynamicImage::new_rgb8(2, 2));
        cache.put("a", first);
        cache.put("a", second.clone());
        assert!(Arc::ptr_eq(&cache.get("a").unwrap(), &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = cache(2);
        cache.put("a", pixel());
        cache.put("b", pixel());
        cache.get("a");
        cache.put("c", pixel());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn zero_capacity_still_holds_one() {
        let cache = cache(0);
        cache.put("a", pixel());
        assert_eq!(cache.stats().capacity, 1);
        assert!(cache.contains("a"));
    }

    #[test]
    fn remove_and_clear() {
        let cache = cache(4);
        cache.put("a", pixel());
        cache.put("b", pixel());
        assert!(cache.remove("a").is_some());
        assert!(!cache.contains("a"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn decode_rejects_garbage() {
        let cache = cache(4);
        assert!(matches!(
            cache.decode_and_put("x", b"not an image"),
            Err(DiaryError::Image(_))
        ));
        assert!(!cache.contains("x"));
    }

    #[test]
    fn parses_sources() {
        assert!(matches!(
            ImageSource::parse("https://example.com/a.jpg"),
            ImageSource::Remote(_)
        ));
        assert_eq!(
            ImageSource::parse("file:///tmp/a.jpg"),
            ImageSource::Local(PathBuf::from("/tmp/a.jpg"))
        );
        assert_eq!(
            ImageSource::parse("photos/a.jpg"),
            ImageSource::Local(PathBuf::from("photos/a.jpg"))
        );
    }
}
