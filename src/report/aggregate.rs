//! Grouping of flat diagnostic entries into a module / test-case hierarchy.
//!
//! This module handles:
//! - Building module and test-case groups in first-seen order
//! - Deriving rollup levels and per-level counts
//! - Sorting test cases and entries by severity
//! - Maintaining the expand/collapse flags across passes

use super::types::{Aggregation, Counts, ModuleGroup, TestCaseGroup, group_key};
use crate::types::{Entry, is_unspecified};
use log::debug;
use std::collections::HashMap;

/// Expand/collapse flags for one result view.
///
/// Modules are keyed by name and test cases by (module, id), both
/// case-insensitively. Absent keys read as collapsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollapseState {
    modules: HashMap<String, bool>,
    testcases: HashMap<String, bool>,
}

fn testcase_key(module: &str, testcase: &str) -> String {
    format!("{}/{}", group_key(module), group_key(testcase))
}

/// Default flag for a newly seen test case: `UNSPECIFIED` starts expanded
fn default_collapsed(testcase: &str) -> bool {
    !is_unspecified(testcase)
}

impl CollapseState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_module_collapsed(&self, module: &str) -> bool {
        self.modules.get(&group_key(module)).copied().unwrap_or(true)
    }

    pub fn is_testcase_collapsed(&self, module: &str, testcase: &str) -> bool {
        self.testcases.get(&testcase_key(module, testcase)).copied().unwrap_or(true)
    }

    pub fn set_module(&mut self, module: &str, collapsed: bool) {
        self.modules.insert(group_key(module), collapsed);
    }

    pub fn set_testcase(&mut self, module: &str, testcase: &str, collapsed: bool) {
        self.testcases.insert(testcase_key(module, testcase), collapsed);
    }

    /// Flip a module flag, returning the new value
    pub fn toggle_module(&mut self, module: &str) -> bool {
        let collapsed = !self.is_module_collapsed(module);
        self.set_module(module, collapsed);
        collapsed
    }

    /// Flip a test-case flag, returning the new value
    pub fn toggle_testcase(&mut self, module: &str, testcase: &str) -> bool {
        let collapsed = !self.is_testcase_collapsed(module, testcase);
        self.set_testcase(module, testcase, collapsed);
        collapsed
    }

    /// Expand every module and test case of `aggregation`
    pub fn expand_all(&mut self, aggregation: &Aggregation) {
        self.set_all(aggregation, false);
    }

    /// Collapse every module and test case of `aggregation`
    pub fn collapse_all(&mut self, aggregation: &Aggregation) {
        self.set_all(aggregation, true);
    }

    fn set_all(&mut self, aggregation: &Aggregation, collapsed: bool) {
        for module in &aggregation.modules {
            self.set_module(&module.name, collapsed);
            for tc in &module.testcases {
                self.set_testcase(&module.name, &tc.id, collapsed);
            }
        }
    }

    /// Number of known keys (modules plus test cases)
    pub fn len(&self) -> usize {
        self.modules.len() + self.testcases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self) {
        self.modules.clear();
        self.testcases.clear();
    }

    /// Write defaults for a test case seen for the first time in a pass
    fn register(&mut self, module: &str, testcase: &str, reset: bool) {
        let tc_key = testcase_key(module, testcase);
        if reset || !self.testcases.contains_key(&tc_key) {
            self.testcases.insert(tc_key, default_collapsed(testcase));
        }

        let module_key = group_key(module);
        if reset || !self.modules.contains_key(&module_key) {
            self.modules.insert(module_key, true);
        }
    }
}

/// Group entries into modules and test cases.
///
/// Modules and test cases appear in first-seen order; test cases are then
/// sorted with `UNSPECIFIED` first and the rest by descending rollup level,
/// entries by descending level. Both sorts are stable.
///
/// With `reset_collapse` every flag is rewritten to its default. Otherwise
/// existing flags are kept and only new keys receive a default.
///
/// # Arguments
/// * `entries` - Normalized entries, in backend order
/// * `reset_collapse` - True on first load, false when re-filtering
/// * `collapse` - Flags carried across passes of the same view
pub fn aggregate(entries: &[Entry], reset_collapse: bool, collapse: &mut CollapseState) -> Aggregation {
    if reset_collapse {
        collapse.clear();
    }

    let mut modules: Vec<ModuleGroup> = Vec::new();
    let mut module_index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let module_key = group_key(&entry.module);
        let mi = *module_index.entry(module_key).or_insert_with(|| {
            modules.push(ModuleGroup::new(&entry.module));
            modules.len() - 1
        });
        let module = &mut modules[mi];

        let tc_key = group_key(&entry.testcase);
        let ti = match module.index.get(&tc_key) {
            Some(&ti) => ti,
            None => {
                module.testcases.push(TestCaseGroup::new(&entry.testcase));
                module.index.insert(tc_key, module.testcases.len() - 1);
                collapse.register(&module.name, &entry.testcase, reset_collapse);
                module.testcases.len() - 1
            }
        };

        module.testcases[ti].push(entry.clone());
    }

    let mut counts = Counts::default();

    for module in &mut modules {
        module.testcases.sort_by(|a, b| b.is_unspecified().cmp(&a.is_unspecified()).then(b.level.cmp(&a.level)));
        module.reindex();

        for tc in &mut module.testcases {
            tc.entries.sort_by(|a, b| b.level.cmp(&a.level));
            counts.record(tc.level);
        }
    }

    debug!(
        "aggregated {} entries into {} modules / {} test cases",
        entries.len(),
        modules.len(),
        counts.all
    );

    Aggregation { modules, counts }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod aggregate_test;
