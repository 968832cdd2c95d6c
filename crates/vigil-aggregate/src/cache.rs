// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::aggregator::{Aggregation, AggregationOptions, aggregate};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use vigil_core::{Record, VigilError};
use xxhash_rust::xxh64::Xxh64;

pub const DEFAULT_CACHE_CAPACITY: usize = 16;

const FINGERPRINT_SEED: u64 = 0;

/// xxHash64 over every field of every record, in order.
///
/// Fields are length-prefixed and absent values tagged, so `None` and `""`
/// hash differently and field boundaries cannot shift.
pub fn fingerprint(records: &[Record]) -> u64 {
    let mut hasher = Xxh64::new(FINGERPRINT_SEED);
    hasher.update(&(records.len() as u64).to_le_bytes());
    for record in records {
        for field in [
            &record.timestamp,
            &record.region,
            &record.sub_region,
            &record.label,
            &record.source,
            &record.sentiment_label,
        ] {
            match field {
                Some(value) => {
                    hasher.update(&[1]);
                    hasher.update(&(value.len() as u64).to_le_bytes());
                    hasher.update(value.as_bytes());
                }
                None => hasher.update(&[0]),
            }
        }
        match record.sentiment_score {
            Some(score) => {
                hasher.update(&[1]);
                hasher.update(&score.to_bits().to_le_bytes());
            }
            None => hasher.update(&[0]),
        }
    }
    hasher.digest()
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: u64,
    options: AggregationOptions,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<CacheKey, Arc<Aggregation>>,
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Caller-owned memo of aggregation results.
///
/// Entries are keyed by the record fingerprint and the full options, so runs
/// with different selectors or filters never share a result. The oldest
/// entry is evicted once `capacity` is exceeded.
pub struct AggregationCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl AggregationCache {
    pub fn new(capacity: usize) -> Result<Self, VigilError> {
        if capacity == 0 {
            return Err(VigilError::invalid_config(
                "aggregation cache capacity must be >= 1; got 0",
            ));
        }
        Ok(Self {
            capacity,
            state: Mutex::new(CacheState::default()),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached aggregation for `(records, options)`, computing it
    /// on a miss. Aggregation runs outside the lock.
    pub fn get_or_aggregate(
        &self,
        records: &[Record],
        options: &AggregationOptions,
    ) -> Result<Arc<Aggregation>, VigilError> {
        let key = CacheKey {
            fingerprint: fingerprint(records),
            options: options.clone(),
        };

        {
            let mut state = self.state.lock();
            if let Some(hit) = state.entries.get(&key).cloned() {
                state.hits += 1;
                tracing::debug!(fingerprint = key.fingerprint, "aggregation cache hit");
                return Ok(hit);
            }
            state.misses += 1;
        }
        tracing::debug!(fingerprint = key.fingerprint, "aggregation cache miss");

        let computed = Arc::new(aggregate(records, options)?);

        let mut state = self.state.lock();
        if let Some(existing) = state.entries.get(&key) {
            return Ok(Arc::clone(existing));
        }
        state.order.push_back(key.clone());
        state.entries.insert(key, Arc::clone(&computed));
        while state.entries.len() > self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
        }
        Ok(computed)
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.entries.len(),
            hits: state.hits,
            misses: state.misses,
        }
    }
}

impl Default for AggregationCache {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            state: Mutex::new(CacheState::default()),
        }
    }
}

impl std::fmt::Debug for AggregationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationCache")
            .field("capacity", &self.capacity)
            .field("stats", &self.stats())
            .finish()
    }
}
