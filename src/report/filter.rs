//! Level and free-text filtering of diagnostic entries.

use super::aggregate::{CollapseState, aggregate};
use super::types::Aggregation;
use crate::severity::Level;
use crate::types::Entry;
use serde::Serialize;
use std::collections::BTreeSet;

/// A filter toggle: the `all` pill or one severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterToggle {
    All,
    Level(Level),
}

/// Active level pills plus the search query.
///
/// Invariant: `all` is true whenever no individual level is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    all: bool,
    levels: BTreeSet<Level>,
    pub search: String,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self { all: true, levels: BTreeSet::new(), search: String::new() }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec with the given levels active (none means `all`)
    pub fn with_levels<I: IntoIterator<Item = Level>>(levels: I) -> Self {
        let mut spec = Self::default();
        for level in levels {
            if !spec.is_active(level) {
                spec.toggle(FilterToggle::Level(level));
            }
        }
        spec
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    pub fn all(&self) -> bool {
        self.all
    }

    pub fn is_active(&self, level: Level) -> bool {
        self.levels.contains(&level)
    }

    /// Active levels in ascending order
    pub fn active_levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.levels.iter().copied()
    }

    /// Flip one pill and restore the invariant.
    ///
    /// Turning `all` on clears the levels. Turning a level on turns `all`
    /// off. Ending with no level active turns `all` back on.
    pub fn toggle(&mut self, toggle: FilterToggle) {
        match toggle {
            FilterToggle::All => {
                self.all = !self.all;
                if self.all || self.levels.is_empty() {
                    self.levels.clear();
                    self.all = true;
                }
            }
            FilterToggle::Level(level) => {
                if !self.levels.remove(&level) {
                    self.levels.insert(level);
                }
                self.all = self.levels.is_empty();
            }
        }
    }

    /// Whether no filtering happens at all
    pub fn is_identity(&self) -> bool {
        self.all && self.search.is_empty()
    }
}

/// Apply `spec` to `entries`, preserving order.
///
/// Level filtering runs first, then the case-insensitive message search.
pub fn filter_entries(entries: &[Entry], spec: &FilterSpec) -> Vec<Entry> {
    let query = spec.search.to_lowercase();

    entries
        .iter()
        .filter(|e| spec.all || spec.levels.contains(&e.level))
        .filter(|e| query.is_empty() || e.message.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Filter and re-aggregate, keeping the existing collapse flags
pub fn refilter(entries: &[Entry], spec: &FilterSpec, collapse: &mut CollapseState) -> Aggregation {
    aggregate(&filter_entries(entries, spec), false, collapse)
}
