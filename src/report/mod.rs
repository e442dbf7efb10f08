//! Report generation module - Data transformations over diagnostic entries.
//!
//! This module handles:
//! - Grouping entries into modules and test cases with severity rollups
//! - Filtering by level and free-text search
//! - Export to JSON, HTML, CSV and text
//! - The state of one displayed result (collapse flags, active filter)
//!
//! Console rendering is handled by the console_format module.
//!
//! # Module Organization
//!
//! - `types` - Grouped model (ModuleGroup, TestCaseGroup, Counts)
//! - `aggregate` - Grouping, sorting, counting, collapse flags
//! - `filter` - Filter spec and entry filtering
//! - `export` - Payload generation and filenames
//! - `html` - HTML document rendering
//! - `sink` - Where payloads are saved
//! - `view` - One loaded result and its UI state

mod aggregate;
mod export;
mod filter;
mod html;
mod sink;
mod types;
mod view;

pub use types::{Aggregation, Counts, LevelCount, ModuleGroup, TestCaseGroup};

pub use aggregate::{CollapseState, aggregate};

pub use filter::{FilterSpec, FilterToggle, filter_entries, refilter};

pub use export::{DisplayZone, ExportContext, ExportFormat, Exporter, Payload, export_filename, to_delimited, to_json};

pub use sink::{ExportSink, FileSink};

pub use view::ResultView;
