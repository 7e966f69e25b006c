//! Concurrent record cache with lazy expiry.
//!
//! Entries are keyed by (name, type, class) and expire after the
//! smallest TTL among the records stored under the key. Expired entries
//! are dropped on the read path rather than by a background sweeper, so
//! the map may transiently hold stale entries between lookups.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};
use stubdns_application::ports::{CacheKey, RecordCache};
use stubdns_domain::ResourceRecord;
use tracing::{debug, info};

struct CachedRecordSet {
    records: Vec<ResourceRecord>,
    expires_at: Instant,
    /// Monotonic insertion sequence, used to find the oldest entry
    /// when the cache is full.
    seq: u64,
}

#[derive(Default)]
struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
}

pub struct DnsRecordCache {
    entries: DashMap<CacheKey, CachedRecordSet, FxBuildHasher>,
    max_entries: usize,
    insert_seq: AtomicU64,
    metrics: CacheMetrics,
}

impl DnsRecordCache {
    pub fn new(max_entries: usize) -> Self {
        info!(max_entries, "initializing record cache");
        Self {
            entries: DashMap::with_capacity_and_hasher(max_entries, FxBuildHasher),
            max_entries,
            insert_seq: AtomicU64::new(0),
            metrics: CacheMetrics::default(),
        }
    }

    pub fn metrics(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.metrics.hits.load(AtomicOrdering::Relaxed),
            misses: self.metrics.misses.load(AtomicOrdering::Relaxed),
            insertions: self.metrics.insertions.load(AtomicOrdering::Relaxed),
            evictions: self.metrics.evictions.load(AtomicOrdering::Relaxed),
        }
    }

    /// Removes the entry with the smallest insertion sequence. Linear
    /// scan; fine at the entry counts this cache is configured for.
    fn evict_oldest(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().seq)
            .map(|entry| entry.key().clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.metrics.evictions.fetch_add(1, AtomicOrdering::Relaxed);
            debug!(name = %key.name, rtype = %key.rtype, "evicted oldest cache entry");
        }
    }
}

impl RecordCache for DnsRecordCache {
    fn get(&self, key: &CacheKey, now: Instant) -> Option<Vec<ResourceRecord>> {
        if let Some(entry) = self.entries.get(key) {
            let set = entry.value();

            if set.expires_at <= now {
                drop(entry);
                self.entries
                    .remove_if(key, |_, set| set.expires_at <= now);
                self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
                return None;
            }

            let remaining = set.expires_at.saturating_duration_since(now).as_secs() as u32;
            let records = set
                .records
                .iter()
                .map(|record| record.with_ttl(record.ttl.min(remaining)))
                .collect();

            self.metrics.hits.fetch_add(1, AtomicOrdering::Relaxed);
            return Some(records);
        }

        self.metrics.misses.fetch_add(1, AtomicOrdering::Relaxed);
        None
    }

    fn put(&self, key: CacheKey, records: Vec<ResourceRecord>, now: Instant) {
        let Some(min_ttl) = records.iter().map(|record| record.ttl).min() else {
            return;
        };
        if min_ttl == 0 {
            // A zero TTL means "do not cache"; the caller still relays
            // the records once.
            return;
        }

        if self.entries.len() >= self.max_entries && !self.entries.contains_key(&key) {
            self.evict_oldest();
        }

        let seq = self.insert_seq.fetch_add(1, AtomicOrdering::Relaxed);
        debug!(
            name = %key.name,
            rtype = %key.rtype,
            records = records.len(),
            ttl = min_ttl,
            "caching record set"
        );
        self.entries.insert(
            key,
            CachedRecordSet {
                records,
                expires_at: now + Duration::from_secs(u64::from(min_ttl)),
                seq,
            },
        );
        self.metrics
            .insertions
            .fetch_add(1, AtomicOrdering::Relaxed);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
