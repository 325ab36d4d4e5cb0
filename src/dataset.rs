//! Reference tables
//!
//! The PSGC tables ship inside the binary and are parsed once, on first access.
//! Alternative tables can be loaded from a directory holding the same four files.

use crate::error::LocationError;
use crate::models::{Barangay, City, Level, LocationNode, Province, Region};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const REGIONS_FILE: &str = "regions.json";
pub const PROVINCES_FILE: &str = "provinces.json";
pub const CITIES_FILE: &str = "cities.json";
pub const BARANGAYS_FILE: &str = "barangays.json";

static BUNDLED: Lazy<Arc<Dataset>> = Lazy::new(|| {
    let loaded = Dataset::from_json_strs(
        include_str!("../resources/regions.json"),
        include_str!("../resources/provinces.json"),
        include_str!("../resources/cities.json"),
        include_str!("../resources/barangays.json"),
    );
    match loaded {
        Ok(dataset) => Arc::new(dataset),
        Err(e) => {
            log::error!("Failed to parse bundled location tables: {}", e);
            Arc::new(Dataset::default())
        }
    }
});

/// Row counts per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetStats {
    pub regions: usize,
    pub provinces: usize,
    pub cities: usize,
    pub barangays: usize,
}

/// Referential problems found at load time. Orphans never surface in lookups,
/// since no parent code matches them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub orphan_provinces: Vec<String>,
    pub orphan_cities: Vec<String>,
    pub orphan_barangays: Vec<String>,
    pub duplicate_codes: Vec<(Level, String)>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_provinces.is_empty()
            && self.orphan_cities.is_empty()
            && self.orphan_barangays.is_empty()
            && self.duplicate_codes.is_empty()
    }
}

/// The four read-only tables, in stored order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    regions: Vec<Region>,
    provinces: Vec<Province>,
    cities: Vec<City>,
    barangays: Vec<Barangay>,
    by_code: [HashMap<String, usize>; 4],
}

impl Dataset {
    pub fn new(
        regions: Vec<Region>,
        provinces: Vec<Province>,
        cities: Vec<City>,
        barangays: Vec<Barangay>,
    ) -> Self {
        let by_code = [
            index_codes(&regions),
            index_codes(&provinces),
            index_codes(&cities),
            index_codes(&barangays),
        ];
        let dataset = Self {
            regions,
            provinces,
            cities,
            barangays,
            by_code,
        };

        let stats = dataset.stats();
        log::info!(
            "Loaded location tables: {} regions, {} provinces, {} cities, {} barangays",
            stats.regions,
            stats.provinces,
            stats.cities,
            stats.barangays
        );

        let report = dataset.integrity_report();
        if !report.is_clean() {
            log::warn!(
                "Location tables have integrity issues: {} orphan provinces, {} orphan cities, {} orphan barangays, {} duplicate codes",
                report.orphan_provinces.len(),
                report.orphan_cities.len(),
                report.orphan_barangays.len(),
                report.duplicate_codes.len()
            );
        }

        dataset
    }

    /// The tables embedded at compile time, shared process-wide.
    pub fn bundled() -> Arc<Dataset> {
        Arc::clone(&BUNDLED)
    }

    pub fn from_json_strs(
        regions: &str,
        provinces: &str,
        cities: &str,
        barangays: &str,
    ) -> Result<Self, LocationError> {
        Ok(Self::new(
            parse_table("regions", regions)?,
            parse_table("provinces", provinces)?,
            parse_table("cities", cities)?,
            parse_table("barangays", barangays)?,
        ))
    }

    /// Load the four tables from `dir` (`regions.json`, `provinces.json`, ...).
    pub fn from_dir(dir: &Path) -> Result<Self, LocationError> {
        let regions = read_table(dir, REGIONS_FILE)?;
        let provinces = read_table(dir, PROVINCES_FILE)?;
        let cities = read_table(dir, CITIES_FILE)?;
        let barangays = read_table(dir, BARANGAYS_FILE)?;
        Self::from_json_strs(&regions, &provinces, &cities, &barangays)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn barangays(&self) -> &[Barangay] {
        &self.barangays
    }

    pub fn region(&self, code: &str) -> Option<&Region> {
        self.position(Level::Region, code).map(|i| &self.regions[i])
    }

    pub fn province(&self, code: &str) -> Option<&Province> {
        self.position(Level::Province, code).map(|i| &self.provinces[i])
    }

    pub fn city(&self, code: &str) -> Option<&City> {
        self.position(Level::City, code).map(|i| &self.cities[i])
    }

    pub fn barangay(&self, code: &str) -> Option<&Barangay> {
        self.position(Level::Barangay, code).map(|i| &self.barangays[i])
    }

    fn position(&self, level: Level, code: &str) -> Option<usize> {
        self.by_code[level.index()].get(code).copied()
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            regions: self.regions.len(),
            provinces: self.provinces.len(),
            cities: self.cities.len(),
            barangays: self.barangays.len(),
        }
    }

    pub fn integrity_report(&self) -> IntegrityReport {
        IntegrityReport {
            orphan_provinces: orphans(&self.provinces, &self.by_code[Level::Region.index()]),
            orphan_cities: orphans(&self.cities, &self.by_code[Level::Province.index()]),
            orphan_barangays: orphans(&self.barangays, &self.by_code[Level::City.index()]),
            duplicate_codes: [
                duplicates(&self.regions),
                duplicates(&self.provinces),
                duplicates(&self.cities),
                duplicates(&self.barangays),
            ]
            .into_iter()
            .flatten()
            .collect(),
        }
    }
}

fn parse_table<T: DeserializeOwned>(table: &'static str, json: &str) -> Result<Vec<T>, LocationError> {
    serde_json::from_str(json).map_err(|source| LocationError::Parse { table, source })
}

fn read_table(dir: &Path, file: &str) -> Result<String, LocationError> {
    let path = dir.join(file);
    if !path.exists() {
        return Err(LocationError::MissingTable { path });
    }
    fs::read_to_string(&path).map_err(|source| LocationError::Io { path, source })
}

/// First occurrence wins when a code repeats.
fn index_codes<T: LocationNode>(nodes: &[T]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node.code().to_string()).or_insert(i);
    }
    index
}

fn orphans<T: LocationNode>(nodes: &[T], parents: &HashMap<String, usize>) -> Vec<String> {
    nodes
        .iter()
        .filter(|n| n.parent_code().map_or(true, |p| !parents.contains_key(p)))
        .map(|n| n.code().to_string())
        .collect()
}

fn duplicates<T: LocationNode>(nodes: &[T]) -> Vec<(Level, String)> {
    let mut seen = HashSet::new();
    let mut repeated = Vec::new();
    for node in nodes {
        if !seen.insert(node.code()) {
            repeated.push((T::LEVEL, node.code().to_string()));
        }
    }
    repeated
}
