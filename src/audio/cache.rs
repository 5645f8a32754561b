//! In-memory cache of downloaded track audio.
//!
//! Each URL is downloaded at most once while it stays cached; the oldest
//! entries are dropped when the byte ceiling would be exceeded. Downloads run
//! on fetch threads, so the cache sits behind a mutex that is never held
//! across a download.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use reqwest::blocking::Client;

use crate::error::PlaybackError;

/// Downloads raw audio bytes for a URL.
pub trait BlobFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PlaybackError>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl BlobFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, PlaybackError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PlaybackError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaybackError::Fetch(format!("{url} answered {status}")));
        }

        let bytes = response
            .bytes()
            .map_err(|e| PlaybackError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// URL-keyed blobs with a byte ceiling.
pub struct AudioCache {
    entries: HashMap<String, Arc<[u8]>>,
    // Insertion order, oldest first.
    order: VecDeque<String>,
    total_bytes: u64,
    max_bytes: u64,
}

impl AudioCache {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            total_bytes: 0,
            max_bytes,
        }
    }

    pub fn get(&self, url: &str) -> Option<Arc<[u8]>> {
        self.entries.get(url).cloned()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Store `bytes` under `url`, evicting the oldest entries to make room.
    /// Blobs larger than the whole ceiling are not kept.
    pub fn insert(&mut self, url: String, bytes: Arc<[u8]>) {
        if self.entries.contains_key(&url) {
            return;
        }
        let size = bytes.len() as u64;
        if size > self.max_bytes {
            warn!("{url} ({size} bytes) exceeds the cache ceiling; not caching");
            return;
        }

        while self.total_bytes + size > self.max_bytes {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if let Some(evicted) = self.entries.remove(&oldest) {
                self.total_bytes -= evicted.len() as u64;
                debug!("evicted {oldest} from audio cache");
            }
        }

        self.total_bytes += size;
        self.order.push_back(url.clone());
        self.entries.insert(url, bytes);
    }
}

/// A fetcher and the cache it fills, cheap to clone into fetch threads.
pub struct BlobStore<F> {
    fetcher: Arc<F>,
    cache: Arc<Mutex<AudioCache>>,
}

impl<F> Clone for BlobStore<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<F: BlobFetcher> BlobStore<F> {
    pub fn new(fetcher: F, max_bytes: u64) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            cache: Arc::new(Mutex::new(AudioCache::new(max_bytes))),
        }
    }

    /// Return the cached bytes for `url`, downloading them on first use.
    ///
    /// Two threads asking for the same uncached URL both download it; the
    /// first to finish is kept.
    pub fn get_or_fetch(&self, url: &str) -> Result<Arc<[u8]>, PlaybackError> {
        if let Some(bytes) = self.lock()?.get(url) {
            return Ok(bytes);
        }

        debug!("downloading {url}");
        let bytes: Arc<[u8]> = self.fetcher.fetch(url)?.into();

        let mut cache = self.lock()?;
        cache.insert(url.to_string(), bytes.clone());
        debug!(
            "audio cache holds {} blobs, {} bytes",
            cache.len(),
            cache.total_bytes()
        );
        Ok(bytes)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.cache.lock().is_ok_and(|c| c.contains(url))
    }

    fn lock(&self) -> Result<MutexGuard<'_, AudioCache>, PlaybackError> {
        self.cache
            .lock()
            .map_err(|_| PlaybackError::Fetch("audio cache lock poisoned".to_string()))
    }
}
