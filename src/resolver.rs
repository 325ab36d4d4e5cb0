//! Hierarchical location resolver
//!
//! Read-only projections over a [`Dataset`], with child lookups memoized in a
//! [`LocationCache`] bound to that dataset.

use crate::cache::LocationCache;
use crate::config::PickerConfig;
use crate::dataset::Dataset;
use crate::error::LocationError;
use crate::models::{AnyNode, Barangay, City, Level, LocationNode, Province, Region, ResolvedAddress};
use crate::search::{name_matches, name_sort_key, normalize_query};
use std::sync::Arc;

/// Outcome of a child lookup that keeps "no parent selected" apart from
/// "parent selected but nothing to show".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<L> {
    NotApplicable,
    Empty,
    Results(L),
}

impl<T> Lookup<Arc<[T]>> {
    fn from_children(children: Arc<[T]>) -> Self {
        if children.is_empty() {
            Lookup::Empty
        } else {
            Lookup::Results(children)
        }
    }
}

impl<T> Lookup<Vec<T>> {
    /// Collapse to a plain list; both empty cases become `[]`.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Lookup::Results(list) => list,
            Lookup::NotApplicable | Lookup::Empty => Vec::new(),
        }
    }
}

impl<L> Lookup<L> {
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Lookup::NotApplicable)
    }
}

/// Treat `None`, `""` and whitespace as "nothing selected".
fn selected_code(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}

fn no_children<T>() -> Arc<[T]> {
    Arc::from(Vec::new())
}

pub struct Resolver {
    cache: Arc<LocationCache>,
}

impl Resolver {
    /// Resolver over `dataset` with a fresh cache.
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_cache(Arc::new(LocationCache::new(dataset)))
    }

    /// Share `cache`, and with it the dataset it was built over.
    pub fn with_cache(cache: Arc<LocationCache>) -> Self {
        Self { cache }
    }

    /// Bundled tables with a fresh cache.
    pub fn bundled() -> Self {
        Self::new(Dataset::bundled())
    }

    /// Bundled tables unless the config points at another table directory.
    pub fn from_config(config: &PickerConfig) -> Result<Self, LocationError> {
        let dataset = match &config.dataset_dir {
            Some(dir) => {
                log::info!("Loading location tables from {}", dir.display());
                Arc::new(Dataset::from_dir(dir)?)
            }
            None => Dataset::bundled(),
        };
        Ok(Self::new(dataset))
    }

    pub fn dataset(&self) -> &Dataset {
        self.cache.dataset()
    }

    pub fn cache(&self) -> &LocationCache {
        &self.cache
    }

    pub fn list_regions(&self) -> &[Region] {
        self.dataset().regions()
    }

    pub fn list_provinces_of(&self, region_code: Option<&str>) -> Arc<[Province]> {
        match selected_code(region_code) {
            Some(code) => self.cache.provinces_of(code),
            None => no_children(),
        }
    }

    pub fn list_cities_of(&self, province_code: Option<&str>) -> Arc<[City]> {
        match selected_code(province_code) {
            Some(code) => self.cache.cities_of(code),
            None => no_children(),
        }
    }

    pub fn list_barangays_of(&self, city_code: Option<&str>) -> Arc<[Barangay]> {
        match selected_code(city_code) {
            Some(code) => self.cache.barangays_of(code),
            None => no_children(),
        }
    }

    pub fn lookup_provinces_of(&self, region_code: Option<&str>) -> Lookup<Arc<[Province]>> {
        match selected_code(region_code) {
            Some(code) => Lookup::from_children(self.list_provinces_of(Some(code))),
            None => Lookup::NotApplicable,
        }
    }

    pub fn lookup_cities_of(&self, province_code: Option<&str>) -> Lookup<Arc<[City]>> {
        match selected_code(province_code) {
            Some(code) => Lookup::from_children(self.list_cities_of(Some(code))),
            None => Lookup::NotApplicable,
        }
    }

    pub fn lookup_barangays_of(&self, city_code: Option<&str>) -> Lookup<Arc<[Barangay]>> {
        match selected_code(city_code) {
            Some(code) => Lookup::from_children(self.list_barangays_of(Some(code))),
            None => Lookup::NotApplicable,
        }
    }

    /// Resolve a code at any level.
    pub fn find(&self, level: Level, code: &str) -> Option<AnyNode> {
        match level {
            Level::Region => self.dataset().region(code).cloned().map(AnyNode::from),
            Level::Province => self.dataset().province(code).cloned().map(AnyNode::from),
            Level::City => self.dataset().city(code).cloned().map(AnyNode::from),
            Level::Barangay => self.dataset().barangay(code).cloned().map(AnyNode::from),
        }
    }

    /// Walk a barangay up to its region. `None` if any link is missing.
    pub fn ancestry_of_barangay(&self, code: &str) -> Option<ResolvedAddress> {
        let barangay = self.dataset().barangay(code)?;
        let city = self.dataset().city(&barangay.city_code)?;
        let province = self.dataset().province(&city.province_code)?;
        let region = self.dataset().region(&province.region_code)?;
        Some(ResolvedAddress {
            region: region.clone(),
            province: province.clone(),
            city: city.clone(),
            barangay: barangay.clone(),
        })
    }

    /// Every barangay code at or below `node`, in dataset order.
    pub fn barangay_codes_under(&self, node: &AnyNode) -> Vec<String> {
        match node {
            AnyNode::Barangay(b) => vec![b.code.clone()],
            AnyNode::City(c) => self.barangay_codes_of_city(&c.code),
            AnyNode::Province(p) => self.barangay_codes_of_province(&p.code),
            AnyNode::Region(r) => self
                .list_provinces_of(Some(&r.code))
                .iter()
                .flat_map(|p| self.barangay_codes_of_province(&p.code))
                .collect(),
        }
    }

    fn barangay_codes_of_province(&self, province_code: &str) -> Vec<String> {
        self.list_cities_of(Some(province_code))
            .iter()
            .flat_map(|c| self.barangay_codes_of_city(&c.code))
            .collect()
    }

    fn barangay_codes_of_city(&self, city_code: &str) -> Vec<String> {
        self.list_barangays_of(Some(city_code))
            .iter()
            .map(|b| b.code.clone())
            .collect()
    }

    /// Name search across every level, for jumping straight to a place.
    ///
    /// Exact names rank above prefixes, prefixes above inner matches; then
    /// shallower levels first, then alphabetical.
    pub fn search_anywhere(&self, query: &str, cap: usize) -> Vec<AnyNode> {
        let q = match normalize_query(query) {
            Some(q) => q,
            None => return Vec::new(),
        };

        let mut hits: Vec<(u8, AnyNode)> = Vec::new();
        collect_hits(self.dataset().regions(), &q, &mut hits);
        collect_hits(self.dataset().provinces(), &q, &mut hits);
        collect_hits(self.dataset().cities(), &q, &mut hits);
        collect_hits(self.dataset().barangays(), &q, &mut hits);

        hits.sort_by_cached_key(|(score, node)| {
            (
                std::cmp::Reverse(*score),
                node.level(),
                name_sort_key(node.name()),
            )
        });
        hits.truncate(cap);
        log::debug!("search_anywhere({:?}) -> {} hits", query, hits.len());
        hits.into_iter().map(|(_, node)| node).collect()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn collect_hits<T>(table: &[T], q: &str, hits: &mut Vec<(u8, AnyNode)>)
where
    T: LocationNode + Into<AnyNode>,
{
    for node in table {
        if !name_matches(node.name(), q) {
            continue;
        }
        let lower = node.name().to_lowercase();
        let score = if lower == q {
            3
        } else if lower.starts_with(q) {
            2
        } else {
            1
        };
        hits.push((score, node.clone().into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_codes_are_not_selections() {
        let resolver = Resolver::bundled();
        assert!(resolver.list_provinces_of(None).is_empty());
        assert!(resolver.list_provinces_of(Some("")).is_empty());
        assert!(resolver.list_cities_of(Some("   ")).is_empty());
        assert_eq!(resolver.cache().stats().scans, 0);
        assert_eq!(resolver.lookup_barangays_of(None), Lookup::NotApplicable);
    }

    #[test]
    fn test_lookup_tri_state() {
        let resolver = Resolver::bundled();
        assert!(matches!(resolver.lookup_provinces_of(Some("13")), Lookup::Results(p) if p.len() == 4));
        assert_eq!(resolver.lookup_provinces_of(Some("99")), Lookup::Empty);
        assert!(resolver.lookup_cities_of(Some("1374")).is_applicable());
    }

    #[test]
    fn test_find_by_level() {
        let resolver = Resolver::bundled();
        let node = resolver.find(Level::City, "137404").unwrap();
        assert_eq!(node.level(), Level::City);
        assert_eq!(node.name(), "Quezon City");
        assert!(resolver.find(Level::Barangay, "137404").is_none());
    }
}
