//! Report type definitions for the grouped result model.
//!
//! This module defines the hierarchy produced by the aggregator
//! (module → test case → entry) and the derived severity summaries.

use crate::severity::Level;
use crate::types::Entry;
use serde::Serialize;
use std::collections::HashMap;

/// Case-folded grouping key for module and test-case identifiers
pub(crate) fn group_key(id: &str) -> String {
    id.to_ascii_uppercase()
}

/// One test case and the entries reported for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCaseGroup {
    /// Test-case id as first seen (e.g. "DNSSEC01", "UNSPECIFIED")
    pub id: String,
    /// Entries, most severe first once aggregation has finished
    pub entries: Vec<Entry>,
    /// Highest level among `entries`
    pub level: Level,
}

impl TestCaseGroup {
    pub(crate) fn new(id: &str) -> Self {
        Self { id: id.to_string(), entries: Vec::new(), level: Level::Info }
    }

    /// Append an entry, raising the rollup level if needed
    pub(crate) fn push(&mut self, entry: Entry) {
        if entry.level > self.level {
            self.level = entry.level;
        }
        self.entries.push(entry);
    }

    pub fn is_unspecified(&self) -> bool {
        crate::types::is_unspecified(&self.id)
    }
}

/// One module and its test cases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleGroup {
    /// Module name as first seen (e.g. "DNSSEC")
    pub name: String,
    /// Test cases, `UNSPECIFIED` first then by descending rollup level
    pub testcases: Vec<TestCaseGroup>,
    /// Case-folded test-case id → index into `testcases`
    #[serde(skip)]
    pub(crate) index: HashMap<String, usize>,
}

impl ModuleGroup {
    pub(crate) fn new(name: &str) -> Self {
        Self { name: name.to_string(), testcases: Vec::new(), index: HashMap::new() }
    }

    /// Look up a test case by id (case-insensitive)
    pub fn testcase(&self, id: &str) -> Option<&TestCaseGroup> {
        self.index.get(&group_key(id)).map(|&i| &self.testcases[i])
    }

    /// Highest rollup level among this module's test cases
    pub fn level(&self) -> Level {
        self.testcases.iter().map(|tc| tc.level).max().unwrap_or(Level::Info)
    }

    /// Number of test cases per rollup level, most severe first.
    ///
    /// Only levels that actually occur are listed.
    pub fn level_breakdown(&self) -> Vec<LevelCount> {
        let mut per_level: HashMap<Level, usize> = HashMap::new();
        for tc in &self.testcases {
            *per_level.entry(tc.level).or_default() += 1;
        }

        Level::descending()
            .filter_map(|level| per_level.get(&level).map(|&count| LevelCount { level, count }))
            .collect()
    }

    pub(crate) fn reindex(&mut self) {
        self.index = self.testcases.iter().enumerate().map(|(i, tc)| (group_key(&tc.id), i)).collect();
    }
}

/// A (level, count) pair in a per-module breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: Level,
    pub count: usize,
}

/// Number of test cases per rollup level, plus the total.
///
/// Test cases are counted once each, by their rollup level, never by entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub all: usize,
    pub info: usize,
    pub notice: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl Counts {
    pub fn get(&self, level: Level) -> usize {
        match level {
            Level::Info => self.info,
            Level::Notice => self.notice,
            Level::Warning => self.warning,
            Level::Error => self.error,
            Level::Critical => self.critical,
        }
    }

    pub(crate) fn record(&mut self, level: Level) {
        self.all += 1;
        match level {
            Level::Info => self.info += 1,
            Level::Notice => self.notice += 1,
            Level::Warning => self.warning += 1,
            Level::Error => self.error += 1,
            Level::Critical => self.critical += 1,
        }
    }

    /// Sum of the per-level buckets (equals `all`)
    pub fn level_total(&self) -> usize {
        Level::ALL.iter().map(|&l| self.get(l)).sum()
    }
}

/// Result of one aggregation pass
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregation {
    /// Modules in first-seen order
    pub modules: Vec<ModuleGroup>,
    pub counts: Counts,
}

impl Aggregation {
    /// Look up a module by name (case-insensitive)
    pub fn module(&self, name: &str) -> Option<&ModuleGroup> {
        let key = group_key(name);
        self.modules.iter().find(|m| group_key(&m.name) == key)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Number of surviving entries across all groups
    pub fn entry_count(&self) -> usize {
        self.modules.iter().flat_map(|m| &m.testcases).map(|tc| tc.entries.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_testcase_rollup_tracks_max() {
        let mut tc = TestCaseGroup::new("ZONE01");
        tc.push(Entry::new("ZONE", "ZONE01", Level::Notice, "a"));
        tc.push(Entry::new("ZONE", "ZONE01", Level::Error, "b"));
        tc.push(Entry::new("ZONE", "ZONE01", Level::Warning, "c"));
        assert_eq!(tc.level, Level::Error);
        assert_eq!(tc.entries.len(), 3);
    }

    #[test]
    fn test_counts_record() {
        let mut counts = Counts::default();
        counts.record(Level::Error);
        counts.record(Level::Error);
        counts.record(Level::Info);
        assert_eq!(counts.all, 3);
        assert_eq!(counts.get(Level::Error), 2);
        assert_eq!(counts.level_total(), counts.all);
    }

    #[test]
    fn test_level_breakdown_only_present_levels() {
        let mut module = ModuleGroup::new("NAMESERVER");
        for (id, level) in [("NS01", Level::Info), ("NS02", Level::Warning), ("NS03", Level::Info)] {
            let mut tc = TestCaseGroup::new(id);
            tc.push(Entry::new("NAMESERVER", id, level, "m"));
            module.testcases.push(tc);
        }

        let breakdown = module.level_breakdown();
        assert_eq!(
            breakdown,
            vec![LevelCount { level: Level::Warning, count: 1 }, LevelCount { level: Level::Info, count: 2 }]
        );
        assert_eq!(module.level(), Level::Warning);
    }
}
