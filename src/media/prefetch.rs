// SPDX-License-Identifier: MPL-2.0
//! Preload cache for the images of the open sequence.
//!
//! # Design
//!
//! - **Index-keyed**: entries are addressed by position in the sequence
//! - **Request once**: an index is handed out for loading at most once while
//!   it is pending, cached or failed
//! - **Memory-bounded**: decoded images are evicted least-recently-used once
//!   the byte budget is exceeded; an evicted index may be requested again
//! - **Window pinned**: images inside the last planned window are never
//!   evicted, even when the window alone exceeds the budget
//! - **Failures remembered**: a failed index is not retried until the cache
//!   is cleared, so scrubbing back and forth never loops on a broken image
//!
//! # Usage
//!
//! ```ignore
//! let requests = cache.plan(current_index, sequence.len(), radius);
//! // spawn one load per index, then on completion:
//! cache.insert(index, image);
//! ```

use crate::diagnostics::{DiagnosticsHandle, StudyOperation};
use crate::domain::viewing::{CacheBudget, PrefetchRadius};
use crate::error::{Error, Result};
use crate::media::decoder::DecoderChain;
use crate::media::ImageData;
use crate::study::{ImageRef, StudyClient};
use lru::LruCache;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

/// Indices of the window around `current`, nearest first, clipped to the
/// sequence.
///
/// `current` itself comes first, then `current + 1`, `current - 1`,
/// `current + 2` and so on.
pub fn prefetch_window(
    current: usize,
    len: usize,
    radius: PrefetchRadius,
) -> impl Iterator<Item = usize> {
    let in_range = current < len;
    std::iter::once(Some(current))
        .chain((1..=radius.value()).flat_map(move |distance| {
            [current.checked_add(distance), current.checked_sub(distance)]
        }))
        .flatten()
        .filter(move |&index| in_range && index < len)
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchStats {
    pub image_count: usize,
    pub total_bytes: usize,
    pub requests: u64,
    pub insertions: u64,
    pub evictions: u64,
    pub failures: u64,
}

/// Sparse index → image store owned by one viewer.
pub struct PreloadCache {
    images: LruCache<usize, ImageData>,
    pending: HashSet<usize>,
    failed: HashMap<usize, String>,
    max_bytes: usize,
    current_bytes: usize,
    /// `(current, len, radius)` of the last [`PreloadCache::plan`] call.
    window: Option<(usize, usize, PrefetchRadius)>,
    stats: PrefetchStats,
}

impl PreloadCache {
    #[must_use]
    pub fn new(budget: CacheBudget) -> Self {
        Self {
            images: LruCache::unbounded(),
            pending: HashSet::new(),
            failed: HashMap::new(),
            max_bytes: budget.bytes(),
            current_bytes: 0,
            window: None,
            stats: PrefetchStats::default(),
        }
    }

    /// True if the index is pending, cached or failed.
    #[must_use]
    pub fn is_requested(&self, index: usize) -> bool {
        self.pending.contains(&index)
            || self.images.contains(&index)
            || self.failed.contains_key(&index)
    }

    #[must_use]
    pub fn is_pending(&self, index: usize) -> bool {
        self.pending.contains(&index)
    }

    /// Returns the indices of the window that still need loading and marks
    /// them pending.
    pub fn plan(&mut self, current: usize, len: usize, radius: PrefetchRadius) -> Vec<usize> {
        self.window = Some((current, len, radius));
        let requests: Vec<usize> = prefetch_window(current, len, radius)
            .filter(|&index| !self.is_requested(index))
            .collect();
        self.pending.extend(requests.iter().copied());
        self.stats.requests += requests.len() as u64;
        requests
    }

    /// True if `index` lies in the window of the last plan.
    fn is_pinned(&self, index: usize) -> bool {
        self.window.is_some_and(|(current, len, radius)| {
            index < len && index.abs_diff(current) <= radius.value()
        })
    }

    /// Stores a loaded image, evicting least recently used entries beyond
    /// the budget. Neither the image just inserted nor any image of the
    /// planned window is evicted.
    pub fn insert(&mut self, index: usize, image: ImageData) {
        self.pending.remove(&index);
        self.failed.remove(&index);

        if let Some(previous) = self.images.pop(&index) {
            self.current_bytes = self.current_bytes.saturating_sub(previous.size_bytes());
        }
        self.current_bytes += image.size_bytes();
        self.images.put(index, image);
        self.stats.insertions += 1;

        while self.current_bytes > self.max_bytes {
            // `iter` runs from most to least recently used
            let victim = self
                .images
                .iter()
                .rev()
                .map(|(&cached, _)| cached)
                .find(|&cached| cached != index && !self.is_pinned(cached));
            let Some(evicted) = victim.and_then(|victim| self.images.pop(&victim)) else {
                break;
            };
            self.current_bytes = self.current_bytes.saturating_sub(evicted.size_bytes());
            self.stats.evictions += 1;
        }

        self.stats.image_count = self.images.len();
        self.stats.total_bytes = self.current_bytes;
    }

    /// Records a failed load; the index will not be planned again.
    pub fn mark_failed(&mut self, index: usize, message: String) {
        self.pending.remove(&index);
        self.failed.insert(index, message);
        self.stats.failures += 1;
    }

    /// Failure message recorded for `index`, if any.
    #[must_use]
    pub fn failure(&self, index: usize) -> Option<&str> {
        self.failed.get(&index).map(String::as_str)
    }

    /// Returns the image and marks it most recently used.
    pub fn get(&mut self, index: usize) -> Option<&ImageData> {
        self.images.get(&index)
    }

    /// Returns the image without touching the LRU order.
    #[must_use]
    pub fn peek(&self, index: usize) -> Option<&ImageData> {
        self.images.peek(&index)
    }

    /// Drops every entry, pending request and failure.
    pub fn clear(&mut self) {
        self.images.clear();
        self.pending.clear();
        self.failed.clear();
        self.current_bytes = 0;
        self.window = None;
        self.stats.image_count = 0;
        self.stats.total_bytes = 0;
    }

    #[must_use]
    pub fn stats(&self) -> PrefetchStats {
        self.stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.current_bytes
    }
}

impl std::fmt::Debug for PreloadCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadCache")
            .field("image_count", &self.images.len())
            .field("pending", &self.pending.len())
            .field("failed", &self.failed.len())
            .field("memory_usage", &self.current_bytes)
            .field("max_bytes", &self.max_bytes)
            .field("window", &self.window)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Retrieves and decodes one image of the sequence.
///
/// Decoding runs on the blocking pool. Timing is reported through
/// `diagnostics`; failures are returned to the caller.
pub async fn load_image_for_prefetch(
    client: StudyClient,
    decoders: Arc<DecoderChain>,
    diagnostics: DiagnosticsHandle,
    index: usize,
    image: ImageRef,
) -> (usize, Result<ImageData>) {
    let started = Instant::now();
    let result = async {
        let bytes = client.fetch_bytes(&image).await?;
        tokio::task::spawn_blocking(move || decoders.decode(&bytes))
            .await
            .map_err(|err| Error::Decode(format!("decode task failed: {err}")))?
    }
    .await;

    #[allow(clippy::cast_possible_truncation)] // Duration in ms fits comfortably in u64
    let duration_ms = started.elapsed().as_millis() as u64;
    match &result {
        Ok(decoded) => diagnostics.log_operation(StudyOperation::LoadImage {
            index,
            size_bytes: decoded.encoded_bytes().len(),
            duration_ms,
        }),
        Err(err) => diagnostics.log_warning(format!("image {index} failed: {err}")),
    }

    (index, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_of_bytes(total: usize) -> ImageData {
        // 1x1 RGBA pixel plus padding in the encoded buffer
        ImageData::from_rgba(1, 1, vec![0; 4], vec![0; total.saturating_sub(4)])
    }

    fn radius(value: usize) -> PrefetchRadius {
        PrefetchRadius::new(value)
    }

    #[test]
    fn window_is_nearest_first_and_clipped() {
        let window: Vec<usize> = prefetch_window(1, 10, radius(3)).collect();
        assert_eq!(window, vec![1, 2, 0, 3, 4]);

        let window: Vec<usize> = prefetch_window(9, 10, radius(2)).collect();
        assert_eq!(window, vec![9, 8, 7]);
    }

    #[test]
    fn window_of_empty_sequence_is_empty() {
        assert_eq!(prefetch_window(0, 0, radius(3)).count(), 0);
    }

    #[test]
    fn each_index_is_planned_at_most_once() {
        let mut cache = PreloadCache::new(CacheBudget::default());
        let mut seen = Vec::new();
        seen.extend(cache.plan(2, 5, radius(2)));
        for current in [3, 4, 3, 2, 1, 0, 1, 2] {
            seen.extend(cache.plan(current, 5, radius(2)));
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn failed_index_is_not_planned_again() {
        let mut cache = PreloadCache::new(CacheBudget::default());
        assert_eq!(cache.plan(0, 1, radius(1)), vec![0]);
        cache.mark_failed(0, "404".into());
        assert!(cache.plan(0, 1, radius(1)).is_empty());
        assert_eq!(cache.failure(0), Some("404"));
        assert!(!cache.is_pending(0));
    }

    #[test]
    fn lru_eviction_on_byte_budget() {
        let mut cache = PreloadCache::new(CacheBudget::new(8));
        let five_mb = 5 * 1024 * 1024;
        cache.insert(0, image_of_bytes(five_mb));
        cache.insert(1, image_of_bytes(five_mb));

        assert_eq!(cache.len(), 1);
        assert!(cache.peek(0).is_none());
        assert!(cache.peek(1).is_some());
        assert_eq!(cache.stats().evictions, 1);
        assert!(cache.memory_usage() <= 8 * 1024 * 1024);
    }

    #[test]
    fn evicted_index_becomes_requestable_again() {
        let mut cache = PreloadCache::new(CacheBudget::new(8));
        let five_mb = 5 * 1024 * 1024;
        assert_eq!(cache.plan(0, 10, radius(1)), vec![0, 1]);
        cache.insert(0, image_of_bytes(five_mb));
        cache.insert(1, image_of_bytes(five_mb));

        assert_eq!(cache.plan(5, 10, radius(1)), vec![5, 6, 4]);
        cache.insert(5, image_of_bytes(five_mb));
        assert!(cache.peek(0).is_none());
        assert!(cache.peek(1).is_none());

        assert_eq!(cache.plan(0, 10, radius(1)), vec![0, 1]);
    }

    #[test]
    fn planned_window_is_never_evicted() {
        let mut cache = PreloadCache::new(CacheBudget::new(8));
        let five_mb = 5 * 1024 * 1024;
        let mut requested = cache.plan(1, 3, radius(1));
        for index in [1, 2, 0] {
            cache.insert(index, image_of_bytes(five_mb));
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.stats().evictions, 0);
        assert!(cache.memory_usage() > 8 * 1024 * 1024);
        for current in [2, 1, 0, 1, 2] {
            requested.extend(cache.plan(current, 3, radius(1)));
        }
        requested.sort_unstable();
        assert_eq!(requested, vec![0, 1, 2]);
    }

    #[test]
    fn get_refreshes_recency() {
        let mut cache = PreloadCache::new(CacheBudget::new(8));
        let three_mb = 3 * 1024 * 1024;
        cache.insert(0, image_of_bytes(three_mb));
        cache.insert(1, image_of_bytes(three_mb));
        assert!(cache.get(0).is_some());
        cache.insert(2, image_of_bytes(three_mb));

        assert!(cache.peek(0).is_some());
        assert!(cache.peek(1).is_none());
    }

    #[test]
    fn oversized_image_is_still_kept_alone() {
        let mut cache = PreloadCache::new(CacheBudget::new(8));
        cache.insert(3, image_of_bytes(20 * 1024 * 1024));
        assert!(cache.peek(3).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut cache = PreloadCache::new(CacheBudget::default());
        let _ = cache.plan(0, 3, radius(1));
        cache.insert(0, image_of_bytes(16));
        cache.mark_failed(1, "timeout".into());
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.memory_usage(), 0);
        assert!(!cache.is_requested(0));
        assert!(!cache.is_requested(1));
        assert!(cache.failure(1).is_none());
    }
}
