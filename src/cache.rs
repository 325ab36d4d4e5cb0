//! Per-parent child lookup cache
//!
//! One map per child level, keyed by parent code. An entry is computed by a
//! single scan of the child table and is never recomputed until [`LocationCache::clear`].
//!
//! A cache is bound to the dataset it scans, so sharing a cache means sharing
//! its tables too.

use crate::dataset::Dataset;
use crate::models::{Barangay, City, LocationNode, Province};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    /// Table scans performed; one per miss.
    pub scans: u64,
    pub province_entries: usize,
    pub city_entries: usize,
    pub barangay_entries: usize,
}

struct LevelCache<T> {
    entries: RwLock<HashMap<String, Arc<[T]>>>,
}

impl<T: LocationNode> LevelCache<T> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, parent_code: &str) -> Option<Arc<[T]>> {
        self.entries.read().get(parent_code).map(Arc::clone)
    }

    /// Concurrent misses for the same code may both scan; the first insert wins.
    fn insert(&self, parent_code: &str, children: Arc<[T]>) -> Arc<[T]> {
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(parent_code.to_string()).or_insert(children))
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

pub struct LocationCache {
    dataset: Arc<Dataset>,
    provinces: LevelCache<Province>,
    cities: LevelCache<City>,
    barangays: LevelCache<Barangay>,
    hits: AtomicU64,
    scans: AtomicU64,
}

impl LocationCache {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            provinces: LevelCache::new(),
            cities: LevelCache::new(),
            barangays: LevelCache::new(),
            hits: AtomicU64::new(0),
            scans: AtomicU64::new(0),
        }
    }

    /// The tables every entry was scanned from.
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn provinces_of(&self, region_code: &str) -> Arc<[Province]> {
        self.get_or_scan(&self.provinces, region_code, self.dataset.provinces())
    }

    pub fn cities_of(&self, province_code: &str) -> Arc<[City]> {
        self.get_or_scan(&self.cities, province_code, self.dataset.cities())
    }

    pub fn barangays_of(&self, city_code: &str) -> Arc<[Barangay]> {
        self.get_or_scan(&self.barangays, city_code, self.dataset.barangays())
    }

    fn get_or_scan<T: LocationNode>(
        &self,
        level: &LevelCache<T>,
        parent_code: &str,
        table: &[T],
    ) -> Arc<[T]> {
        if let Some(children) = level.get(parent_code) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return children;
        }

        self.scans.fetch_add(1, Ordering::Relaxed);
        let children: Arc<[T]> = table
            .iter()
            .filter(|node| node.parent_code() == Some(parent_code))
            .cloned()
            .collect();
        log::debug!(
            "Cached {} {} rows under {}",
            children.len(),
            T::LEVEL,
            parent_code
        );
        level.insert(parent_code, children)
    }

    /// Drop every cached entry. Counters are kept.
    pub fn clear(&self) {
        self.provinces.clear();
        self.cities.clear();
        self.barangays.clear();
        log::info!("Location lookup cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            province_entries: self.provinces.len(),
            city_entries: self.cities.len(),
            barangay_entries: self.barangays.len(),
        }
    }
}
