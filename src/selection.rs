//! Per-form selection state
//!
//! Four slots (region, province, city, barangay), each holding the displayed
//! text and, once the user picked an entry, the resolved node. Selecting at one
//! level resets every deeper slot in the same transition, so a deeper slot is
//! never resolved against a parent that is no longer selected.

use crate::error::SelectionError;
use crate::models::{AnyNode, Barangay, City, Level, Province, Region};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What typing does to an already selected slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypingPolicy {
    /// Drop the slot's resolved node (and reset deeper slots) as soon as the
    /// typed text differs from its name. Off: the resolved node keeps scoping
    /// the next level until the user picks again.
    pub invalidate_on_type: bool,
}

/// Text-only initial values handed over by the host form. They never resolve
/// on their own: a slot becomes resolved only through [`SelectionState::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSelection {
    pub region: String,
    pub province: String,
    pub city: String,
    pub barangay: String,
}

impl PartialSelection {
    fn text(&self, level: Level) -> &str {
        match level {
            Level::Region => &self.region,
            Level::Province => &self.province,
            Level::City => &self.city,
            Level::Barangay => &self.barangay,
        }
    }
}

/// The consolidated display strings sent to the host after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValue {
    pub region: String,
    pub province: String,
    pub city: String,
    pub barangay: String,
}

impl From<AddressValue> for PartialSelection {
    fn from(value: AddressValue) -> Self {
        Self {
            region: value.region,
            province: value.province,
            city: value.city,
            barangay: value.barangay,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    text: String,
    resolved: Option<AnyNode>,
}

impl Slot {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn resolved(&self) -> Option<&AnyNode> {
        self.resolved.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    fn reset(&mut self) {
        self.text.clear();
        self.resolved = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    slots: [Slot; 4],
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state with text pre-filled from `initial`; nothing resolved.
    pub fn seeded(initial: &PartialSelection) -> Self {
        let mut state = Self::default();
        for level in Level::ALL {
            state.slots[level.index()].text = initial.text(level).to_string();
        }
        state
    }

    pub fn slot(&self, level: Level) -> &Slot {
        &self.slots[level.index()]
    }

    pub fn text(&self, level: Level) -> &str {
        self.slot(level).text()
    }

    pub fn resolved(&self, level: Level) -> Option<&AnyNode> {
        self.slot(level).resolved()
    }

    pub fn region(&self) -> Option<&Region> {
        match self.resolved(Level::Region) {
            Some(AnyNode::Region(region)) => Some(region),
            _ => None,
        }
    }

    pub fn province(&self) -> Option<&Province> {
        match self.resolved(Level::Province) {
            Some(AnyNode::Province(province)) => Some(province),
            _ => None,
        }
    }

    pub fn city(&self) -> Option<&City> {
        match self.resolved(Level::City) {
            Some(AnyNode::City(city)) => Some(city),
            _ => None,
        }
    }

    pub fn barangay(&self) -> Option<&Barangay> {
        match self.resolved(Level::Barangay) {
            Some(AnyNode::Barangay(barangay)) => Some(barangay),
            _ => None,
        }
    }

    pub fn value(&self) -> AddressValue {
        AddressValue {
            region: self.text(Level::Region).to_string(),
            province: self.text(Level::Province).to_string(),
            city: self.text(Level::City).to_string(),
            barangay: self.text(Level::Barangay).to_string(),
        }
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }

    /// First slot that is resolved or non-empty below an unresolved slot.
    ///
    /// Always `None` for states reached from [`SelectionState::new`]. A seeded
    /// state may report its seeded text until the seeded levels are selected
    /// or cleared.
    pub fn cascade_violation(&self) -> Option<Level> {
        let first_open = Level::ALL
            .into_iter()
            .find(|level| !self.slot(*level).is_resolved())?;
        first_open.deeper().find(|level| {
            let slot = self.slot(*level);
            slot.is_resolved() || !slot.text.is_empty()
        })
    }

    fn check_unlocked(&self, level: Level) -> Result<(), SelectionError> {
        match level.ancestors().find(|parent| !self.slot(*parent).is_resolved()) {
            Some(parent) => Err(SelectionError::LevelLocked { level, parent }),
            None => Ok(()),
        }
    }

    fn reset_below(&mut self, level: Level) {
        for deeper in level.deeper() {
            self.slots[deeper.index()].reset();
        }
    }

    /// Resolve the node's level to `node` and reset every deeper slot.
    ///
    /// The node must belong to the currently selected parent.
    pub fn select(&mut self, node: AnyNode) -> Result<(), SelectionError> {
        let level = node.level();
        self.check_unlocked(level)?;

        if let Some(parent) = level.parent() {
            let expected = self.resolved(parent).map(AnyNode::code);
            if node.parent_code() != expected {
                return Err(SelectionError::ParentMismatch {
                    level,
                    code: node.code().to_string(),
                    parent,
                    expected: expected.unwrap_or_default().to_string(),
                });
            }
        }

        let slot = &mut self.slots[level.index()];
        slot.text = node.name().to_string();
        slot.resolved = Some(node);
        self.reset_below(level);
        Ok(())
    }

    /// Replace the slot's text. Returns whether deeper slots were reset, which
    /// only happens under [`TypingPolicy::invalidate_on_type`].
    pub fn type_text(
        &mut self,
        level: Level,
        text: &str,
        policy: TypingPolicy,
    ) -> Result<bool, SelectionError> {
        self.check_unlocked(level)?;

        let slot = &mut self.slots[level.index()];
        slot.text = text.to_string();
        let stale = slot.resolved.as_ref().is_some_and(|node| node.name() != text);
        if policy.invalidate_on_type && stale {
            slot.resolved = None;
            self.reset_below(level);
            return Ok(true);
        }
        Ok(false)
    }

    /// Unresolve one level and everything below it.
    pub fn clear(&mut self, level: Level) {
        self.slots[level.index()].reset();
        self.reset_below(level);
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}

pub type ChangeListener = Box<dyn FnMut(&AddressValue) + Send>;

/// [`SelectionState`] plus the live search query of each level and the
/// host's change listener.
pub struct SelectionMachine {
    state: SelectionState,
    queries: [String; 4],
    policy: TypingPolicy,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for SelectionMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionMachine")
            .field("state", &self.state)
            .field("queries", &self.queries)
            .field("policy", &self.policy)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

impl SelectionMachine {
    pub fn new(policy: TypingPolicy) -> Self {
        Self::with_state(policy, SelectionState::new())
    }

    pub fn seeded(policy: TypingPolicy, initial: &PartialSelection) -> Self {
        Self::with_state(policy, SelectionState::seeded(initial))
    }

    fn with_state(policy: TypingPolicy, state: SelectionState) -> Self {
        Self {
            state,
            queries: Default::default(),
            policy,
            on_change: None,
        }
    }

    pub fn set_on_change(&mut self, listener: impl FnMut(&AddressValue) + Send + 'static) {
        self.on_change = Some(Box::new(listener));
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn policy(&self) -> TypingPolicy {
        self.policy
    }

    /// Live search query of `level`; follows what the user typed there.
    pub fn query(&self, level: Level) -> &str {
        &self.queries[level.index()]
    }

    pub fn select(&mut self, node: AnyNode) -> Result<(), SelectionError> {
        let level = node.level();
        log::debug!("select {} {} ({})", level, node.code(), node.name());
        self.state.select(node)?;
        self.clear_queries_from(level);
        self.emit();
        Ok(())
    }

    pub fn type_text(&mut self, level: Level, text: &str) -> Result<(), SelectionError> {
        let cascaded = self.state.type_text(level, text, self.policy)?;
        self.queries[level.index()] = text.to_string();
        if cascaded {
            log::debug!("typing invalidated the {} selection", level);
            for deeper in level.deeper() {
                self.queries[deeper.index()].clear();
            }
        }
        self.emit();
        Ok(())
    }

    pub fn clear(&mut self, level: Level) {
        self.state.clear(level);
        self.clear_queries_from(level);
        self.emit();
    }

    pub fn clear_all(&mut self) {
        self.state.clear_all();
        self.clear_queries_from(Level::Region);
        self.emit();
    }

    fn clear_queries_from(&mut self, level: Level) {
        for query in &mut self.queries[level.index()..] {
            query.clear();
        }
    }

    fn emit(&mut self) {
        let value = self.state.value();
        if let Some(listener) = self.on_change.as_mut() {
            listener(&value);
        }
    }
}
