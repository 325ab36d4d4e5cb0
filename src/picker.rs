//! Host-facing address picker
//!
//! Binds a [`Resolver`] to one form's [`SelectionMachine`]: the dropdown of each
//! level lists the children of the parent selected above it, narrowed by the
//! text typed into that level.

use crate::config::PickerConfig;
use crate::error::SelectionError;
use crate::models::{AnyNode, Level, LocationNode};
use crate::resolver::{Lookup, Resolver};
use crate::search::filter_and_rank;
use crate::selection::{AddressValue, PartialSelection, SelectionMachine, SelectionState};
use std::sync::Arc;

pub struct AddressPicker {
    resolver: Arc<Resolver>,
    machine: SelectionMachine,
    result_cap: usize,
}

impl AddressPicker {
    pub fn new(resolver: Arc<Resolver>, config: &PickerConfig) -> Self {
        Self {
            resolver,
            machine: SelectionMachine::new(config.typing_policy()),
            result_cap: config.result_cap,
        }
    }

    /// Mount with text-only initial values. Lookups below stay closed until the
    /// user selects a region.
    pub fn with_initial(
        resolver: Arc<Resolver>,
        config: &PickerConfig,
        initial: &PartialSelection,
    ) -> Self {
        Self {
            resolver,
            machine: SelectionMachine::seeded(config.typing_policy(), initial),
            result_cap: config.result_cap,
        }
    }

    pub fn on_change(mut self, listener: impl FnMut(&AddressValue) + Send + 'static) -> Self {
        self.machine.set_on_change(listener);
        self
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn state(&self) -> &SelectionState {
        self.machine.state()
    }

    pub fn value(&self) -> AddressValue {
        self.machine.state().value()
    }

    pub fn query(&self, level: Level) -> &str {
        self.machine.query(level)
    }

    /// Dropdown rows for `level`, keeping "nothing selected above" apart
    /// from "no match".
    pub fn candidates_lookup(&self, level: Level) -> Lookup<Vec<AnyNode>> {
        let state = self.machine.state();
        let query = self.machine.query(level);
        match level {
            Level::Region => self.rank(self.resolver.list_regions(), query),
            Level::Province => match state.region() {
                Some(region) => self.rank(&self.resolver.list_provinces_of(Some(&region.code)), query),
                None => Lookup::NotApplicable,
            },
            Level::City => match state.province() {
                Some(province) => self.rank(&self.resolver.list_cities_of(Some(&province.code)), query),
                None => Lookup::NotApplicable,
            },
            Level::Barangay => match state.city() {
                Some(city) => self.rank(&self.resolver.list_barangays_of(Some(&city.code)), query),
                None => Lookup::NotApplicable,
            },
        }
    }

    pub fn candidates(&self, level: Level) -> Vec<AnyNode> {
        self.candidates_lookup(level).into_vec()
    }

    fn rank<T>(&self, list: &[T], query: &str) -> Lookup<Vec<AnyNode>>
    where
        T: LocationNode + Into<AnyNode>,
    {
        let ranked = filter_and_rank(list, query, self.result_cap);
        if ranked.is_empty() {
            Lookup::Empty
        } else {
            Lookup::Results(ranked.into_iter().map(Into::into).collect())
        }
    }

    pub fn select(&mut self, node: AnyNode) -> Result<(), SelectionError> {
        self.machine.select(node)
    }

    /// Select by code, as when the host restores a saved choice.
    pub fn select_code(&mut self, level: Level, code: &str) -> Result<(), SelectionError> {
        let node = self
            .resolver
            .find(level, code)
            .ok_or_else(|| SelectionError::UnknownCode {
                level,
                code: code.to_string(),
            })?;
        self.machine.select(node)
    }

    pub fn type_text(&mut self, level: Level, text: &str) -> Result<(), SelectionError> {
        self.machine.type_text(level, text)
    }

    pub fn clear(&mut self, level: Level) {
        self.machine.clear(level);
    }

    pub fn clear_all(&mut self) {
        self.machine.clear_all();
    }
}
