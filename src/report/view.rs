//! State of one displayed test result.
//!
//! A `ResultView` owns the loaded record, its collapse flags and the active
//! filter, and re-derives the grouped tree whenever the filter changes.

use super::aggregate::{CollapseState, aggregate};
use super::export::{DisplayZone, ExportContext};
use super::filter::{FilterSpec, FilterToggle, filter_entries, refilter};
use super::types::{Aggregation, Counts, LevelCount};
use crate::types::{Entry, TestRecord};
use log::debug;

pub struct ResultView {
    record: TestRecord,
    collapse: CollapseState,
    filter: FilterSpec,
    /// Tree for the current filter
    tree: Aggregation,
    /// Counts and per-module breakdown of the unfiltered result
    totals: Counts,
    breakdown: Vec<(String, Vec<LevelCount>)>,
}

impl ResultView {
    /// Load a record, resetting all collapse flags
    pub fn load(record: TestRecord) -> Self {
        let mut collapse = CollapseState::new();
        let tree = aggregate(&record.results, true, &mut collapse);
        let breakdown = tree.modules.iter().map(|m| (m.name.clone(), m.level_breakdown())).collect();

        debug!("loaded test {} with {} entries", record.id, record.results.len());

        Self { totals: tree.counts, breakdown, tree, collapse, filter: FilterSpec::new(), record }
    }

    pub fn record(&self) -> &TestRecord {
        &self.record
    }

    pub fn tree(&self) -> &Aggregation {
        &self.tree
    }

    pub fn collapse(&self) -> &CollapseState {
        &self.collapse
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Test-case counts of the whole result, independent of the filter
    pub fn totals(&self) -> Counts {
        self.totals
    }

    /// Per-level test-case counts for one module of the whole result
    pub fn module_breakdown(&self, module: &str) -> &[LevelCount] {
        self.breakdown
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(module))
            .map(|(_, counts)| counts.as_slice())
            .unwrap_or(&[])
    }

    pub fn toggle_filter(&mut self, toggle: FilterToggle) {
        self.filter.toggle(toggle);
        self.apply_filter();
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.search = query.to_string();
        self.apply_filter();
    }

    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.apply_filter();
    }

    fn apply_filter(&mut self) {
        self.tree = refilter(&self.record.results, &self.filter, &mut self.collapse);
    }

    pub fn expand_all(&mut self) {
        self.collapse.expand_all(&self.tree);
    }

    pub fn collapse_all(&mut self) {
        self.collapse.collapse_all(&self.tree);
    }

    pub fn toggle_module(&mut self, module: &str) -> bool {
        self.collapse.toggle_module(module)
    }

    pub fn toggle_testcase(&mut self, module: &str, testcase: &str) -> bool {
        self.collapse.toggle_testcase(module, testcase)
    }

    /// All entries of the record, backend order
    pub fn entries(&self) -> &[Entry] {
        &self.record.results
    }

    /// Entries passing the current filter, backend order
    pub fn filtered_entries(&self) -> Vec<Entry> {
        filter_entries(&self.record.results, &self.filter)
    }

    /// Window title, e.g. "räksmörgås.se · Zonemaster"
    pub fn title(&self) -> String {
        format!("{} · Zonemaster", self.record.params.unicode_domain())
    }

    pub fn export_context<'a>(&'a self, language: &'a str, zone: DisplayZone) -> ExportContext<'a> {
        ExportContext {
            test_id: &self.record.id,
            ascii_domain: self.record.params.ascii_domain(),
            created_at: self.record.created_at,
            language,
            zone,
        }
    }
}
