//! Viewing, filtering and exporting of Zonemaster test results.
//!
//! The `report` module groups and filters result entries and produces
//! export payloads, `form` builds the parameters of a new test, and `api`
//! talks to the Zonemaster backend. The `zonemaster-report` binary wires
//! them to the command line.

pub mod api;
pub mod cli;
pub mod config;
pub mod console_format;
pub mod error;
pub mod form;
pub mod labels;
pub mod report;
pub mod severity;
pub mod types;
pub mod ui;

pub use error::{ReportError, Result};
pub use report::{Aggregation, CollapseState, ExportFormat, Exporter, FilterSpec, ResultView};
pub use severity::Level;
pub use types::{Entry, TestRecord};
