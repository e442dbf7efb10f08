//! Export of diagnostic entries to JSON, HTML, CSV and plain text.
//!
//! Exporters are pure: they turn an entry slice into a `Payload`. Writing the
//! payload somewhere is the job of an `ExportSink`.

use super::html::render_html;
use crate::error::Result;
use crate::labels::Labels;
use crate::types::Entry;
use chrono::{DateTime, FixedOffset, Local, Utc};
use log::debug;
use std::fmt;
use std::str::FromStr;

/// Column headers shared by CSV and text exports
const HEADER: [&str; 3] = ["Module", "Level", "Message"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Html,
    Csv,
    Text,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [ExportFormat::Json, ExportFormat::Html, ExportFormat::Csv, ExportFormat::Text];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
            ExportFormat::Csv => "csv",
            ExportFormat::Text => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/javascript",
            ExportFormat::Html => "text/html;charset=utf-8",
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Text => "text/plain;charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" => Ok(ExportFormat::Html),
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Text),
            other => Err(format!("unknown export format '{}' (expected json, html, csv or txt)", other)),
        }
    }
}

/// Which clock the HTML timestamp is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The machine's local time zone
    #[default]
    Local,
    Utc,
    /// The offset the backend reported
    Original,
}

/// Test metadata needed by the exporters
#[derive(Debug, Clone)]
pub struct ExportContext<'a> {
    pub test_id: &'a str,
    /// Punycode form of the tested domain
    pub ascii_domain: String,
    pub created_at: DateTime<FixedOffset>,
    /// Active UI language code, e.g. "en"
    pub language: &'a str,
    pub zone: DisplayZone,
}

impl ExportContext<'_> {
    /// `zonemaster_result_<ascii-domain>_<test-id>.<ext>`
    pub fn filename(&self, format: ExportFormat) -> String {
        export_filename(&self.ascii_domain, self.test_id, format)
    }

    /// Creation time as `yyyy-MM-dd HH:mm GMT+hh:mm`
    pub fn formatted_created_at(&self) -> String {
        let shown = match self.zone {
            DisplayZone::Local => self.created_at.with_timezone(&Local).fixed_offset(),
            DisplayZone::Utc => self.created_at.with_timezone(&Utc).fixed_offset(),
            DisplayZone::Original => self.created_at,
        };
        format!("{} GMT{}", shown.format("%Y-%m-%d %H:%M"), shown.format("%:z"))
    }
}

pub fn export_filename(ascii_domain: &str, test_id: &str, format: ExportFormat) -> String {
    format!("zonemaster_result_{}_{}.{}", ascii_domain, test_id, format.extension())
}

/// An export ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    pub format: ExportFormat,
    pub filename: String,
    pub mime_type: &'static str,
    pub body: Vec<u8>,
}

/// Produces payloads in every supported format.
pub struct Exporter<'a> {
    labels: &'a dyn Labels,
    skip_first_row: bool,
}

impl<'a> Exporter<'a> {
    pub fn new(labels: &'a dyn Labels) -> Self {
        Self { labels, skip_first_row: false }
    }

    /// Reproduce the CSV/text output of older Zonemaster web viewers, which never
    /// emitted the first entry.
    pub fn with_legacy_skip_first_row(mut self, skip: bool) -> Self {
        self.skip_first_row = skip;
        self
    }

    /// Export `entries` in `format`.
    ///
    /// # Arguments
    /// * `entries` - Entries to export, already filtered and ordered by the caller
    /// * `format` - Output format
    /// * `ctx` - Test metadata for the filename and the HTML header
    pub fn export(&self, entries: &[Entry], format: ExportFormat, ctx: &ExportContext<'_>) -> Result<Payload> {
        debug!("exporting {} entries as {}", entries.len(), format);

        let body = match format {
            ExportFormat::Json => to_json(entries)?,
            ExportFormat::Html => render_html(entries, ctx, self.labels),
            ExportFormat::Csv => to_delimited(entries, ";", self.skip_first_row),
            ExportFormat::Text => to_delimited(entries, " \t", self.skip_first_row),
        };

        Ok(Payload { format, filename: ctx.filename(format), mime_type: format.mime_type(), body: body.into_bytes() })
    }
}

/// Entries as a compact JSON array
pub fn to_json(entries: &[Entry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

/// Header plus one line per entry, fields trimmed, CRLF line endings.
///
/// Fields are not quoted; a delimiter inside a message is written as is.
pub fn to_delimited(entries: &[Entry], delimiter: &str, skip_first_row: bool) -> String {
    let mut out = HEADER.join(delimiter);
    out.push_str("\r\n");

    let start = if skip_first_row { 1 } else { 0 };
    for entry in entries.iter().skip(start) {
        let fields = [entry.module.trim(), entry.level.as_str(), entry.message.trim()];
        out.push_str(&fields.join(delimiter));
        out.push_str("\r\n");
    }

    out
}
