//! Caching of code analysis, keyed by the keccak-256 digest of the code.
//!
//! The cache is a capability handed to [`Bytecode::with_cache`]; nothing in
//! this crate keeps global state. Analysis is pure, so two threads missing
//! on the same code at once both analyse it and store identical bitmaps.
//!
//! [`Bytecode::with_cache`]: crate::Bytecode::with_cache

use {
    crate::interpreter::{analysis::code_bitmap, CodeBitmap, H256},
    sha3::{Digest, Keccak256},
    std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicU64, Ordering},
            Arc, PoisonError, RwLock,
        },
    },
};

/// Keccak-256 digest of `code`, the same hash EXTCODEHASH reports.
pub fn code_hash(code: &[u8]) -> H256 {
    H256::from_slice(Keccak256::digest(code).as_slice())
}

/// Source of analysed code.
pub trait AnalysisCache {
    /// Returns the bitmap of `code`, analysing it if it isn't known yet.
    fn get_or_analyze(&self, code: &[u8]) -> Arc<CodeBitmap>;
}

impl<C: AnalysisCache + ?Sized> AnalysisCache for &C {
    fn get_or_analyze(&self, code: &[u8]) -> Arc<CodeBitmap> {
        (**self).get_or_analyze(code)
    }
}

impl<C: AnalysisCache + ?Sized> AnalysisCache for Arc<C> {
    fn get_or_analyze(&self, code: &[u8]) -> Arc<CodeBitmap> {
        (**self).get_or_analyze(code)
    }
}

/// Analyses on every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl AnalysisCache for NoCache {
    fn get_or_analyze(&self, code: &[u8]) -> Arc<CodeBitmap> {
        Arc::new(code_bitmap(code))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Thread safe analysis cache, shareable across concurrently executing
/// frames.
///
/// When a capacity is set and an insert would exceed it, the whole map is
/// dropped and filling starts over.
#[derive(Debug, Default)]
pub struct SharedAnalysisCache {
    entries: RwLock<HashMap<H256, Arc<CodeBitmap>>>,
    capacity: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SharedAnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity: Some(capacity), ..Self::default() }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Looks up the bitmap stored for `hash`.
    pub fn get(&self, hash: &H256) -> Option<Arc<CodeBitmap>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(hash).cloned()
    }

    /// Stores `bitmap` under `hash` unless another thread got there first,
    /// returning whichever bitmap ends up cached.
    pub fn insert(&self, hash: H256, bitmap: Arc<CodeBitmap>) -> Arc<CodeBitmap> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = entries.get(&hash) {
            return existing.clone();
        }
        if let Some(capacity) = self.capacity {
            if entries.len() >= capacity {
                log::debug!(target: "evm", "analysis cache full at {capacity} entries, resetting");
                entries.clear();
            }
        }
        if self.capacity != Some(0) {
            entries.insert(hash, bitmap.clone());
        }
        bitmap
    }
}

impl AnalysisCache for SharedAnalysisCache {
    fn get_or_analyze(&self, code: &[u8]) -> Arc<CodeBitmap> {
        let hash = code_hash(code);
        if let Some(bitmap) = self.get(&hash) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!(target: "evm", "analysis cache hit for {hash:?}");
            return bitmap;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        log::debug!(target: "evm", "analysis cache miss for {hash:?} ({} bytes)", code.len());
        // analyse without holding the lock
        let bitmap = Arc::new(code_bitmap(code));
        self.insert(hash, bitmap)
    }
}
