//! The domain test form.
//!
//! Holds the domain, protocol switches, profile and the two repeating
//! groups (nameservers and DS records), and turns them into `TestParams`
//! on submission.
//!
//! - `rows` - Row shapes and their validators
//! - `group` - Growable row lists with one-shot auto-growth

mod group;
mod rows;

pub use group::{DeleteOutcome, RepeatingGroup, Row, RowTarget};
pub use rows::{
    DsRecordRow, FieldError, FieldErrors, FormRow, NameserverRow, ROW_ERROR, Validation, validate_ds_record,
    validate_nameserver, validate_protocols,
};

use crate::types::{DsInfo, Nameserver, TestParams};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("the form is disabled")]
    Disabled,

    #[error("row {index} does not exist ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("row value does not belong to the {0} list")]
    WrongRowKind(ListKind),

    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("{}", format_issues(.0))]
    Invalid(Vec<FieldIssue>),
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues.iter().map(|i| format!("{}: {}", i.path, i.error)).collect::<Vec<_>>().join(", ")
}

/// A field error located by its path, e.g. `/nameservers/0/ns`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub path: String,
    pub error: FieldError,
}

impl FieldIssue {
    fn new(path: impl Into<String>, error: FieldError) -> Self {
        Self { path: path.into(), error }
    }
}

/// The repeating lists of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Nameservers,
    DsInfo,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Nameservers => "nameservers",
            ListKind::DsInfo => "ds_info",
        }
    }

    fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "nameservers" => Some(ListKind::Nameservers),
            "ds_info" => Some(ListKind::DsInfo),
            _ => None,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row value of either list
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    Nameserver(NameserverRow),
    DsRecord(DsRecordRow),
}

impl From<&Nameserver> for NameserverRow {
    fn from(ns: &Nameserver) -> Self {
        NameserverRow::new(&ns.ns, ns.ip.as_deref().unwrap_or(""))
    }
}

impl From<&DsInfo> for DsRecordRow {
    fn from(ds: &DsInfo) -> Self {
        DsRecordRow::new(&ds.keytag.to_string(), &ds.algorithm.to_string(), &ds.digtype.to_string(), &ds.digest)
    }
}

/// Field error as reported by the backend on `start_domain_test`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerError {
    pub path: String,
    pub message: String,
}

/// Outcome of loading parent-zone data into a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentData {
    /// Nothing found; a blank row was left for manual input
    Empty,
    Loaded(usize),
}

#[derive(Debug, Clone)]
pub struct TestForm {
    pub domain: String,
    pub disable_ipv4: bool,
    pub disable_ipv6: bool,
    pub profile: String,
    profiles: Vec<String>,
    nameservers: RepeatingGroup<NameserverRow>,
    ds_info: RepeatingGroup<DsRecordRow>,
    disabled: bool,
    /// Server errors on form-level fields, keyed by path
    server_errors: BTreeMap<String, String>,
}

impl TestForm {
    /// New empty form; the profile defaults to the first of `profiles`
    pub fn new(profiles: &[String]) -> Self {
        let profile = profiles.first().cloned().unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        Self {
            domain: String::new(),
            disable_ipv4: false,
            disable_ipv6: false,
            profile,
            profiles: profiles.to_vec(),
            nameservers: RepeatingGroup::new(),
            ds_info: RepeatingGroup::new(),
            disabled: false,
            server_errors: BTreeMap::new(),
        }
    }

    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    pub fn nameservers(&self) -> &RepeatingGroup<NameserverRow> {
        &self.nameservers
    }

    pub fn ds_info(&self) -> &RepeatingGroup<DsRecordRow> {
        &self.ds_info
    }

    pub fn nameservers_mut(&mut self) -> &mut RepeatingGroup<NameserverRow> {
        &mut self.nameservers
    }

    pub fn ds_info_mut(&mut self) -> &mut RepeatingGroup<DsRecordRow> {
        &mut self.ds_info
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn server_error(&self, path: &str) -> Option<&str> {
        self.server_errors.get(path).map(String::as_str)
    }

    pub fn set_domain(&mut self, domain: &str) -> Result<(), FormError> {
        if self.disabled {
            return Err(FormError::Disabled);
        }
        self.domain = domain.to_string();
        self.server_errors.remove("/domain");
        Ok(())
    }

    pub fn add_row(&mut self, list: ListKind, value: Option<RowValue>) -> Result<(), FormError> {
        match (list, value) {
            (ListKind::Nameservers, None) => self.nameservers.add_row(None),
            (ListKind::Nameservers, Some(RowValue::Nameserver(row))) => self.nameservers.add_row(Some(row)),
            (ListKind::DsInfo, None) => self.ds_info.add_row(None),
            (ListKind::DsInfo, Some(RowValue::DsRecord(row))) => self.ds_info.add_row(Some(row)),
            (list, Some(_)) => return Err(FormError::WrongRowKind(list)),
        }
        Ok(())
    }

    pub fn delete_row(&mut self, list: ListKind, target: RowTarget) -> Result<DeleteOutcome, FormError> {
        match list {
            ListKind::Nameservers => self.nameservers.delete_row(target),
            ListKind::DsInfo => self.ds_info.delete_row(target),
        }
    }

    /// Disable or enable every control of the form
    pub fn disable_all(&mut self, disabled: bool) {
        self.disabled = disabled;
        self.nameservers.set_disabled(disabled);
        self.ds_info.set_disabled(disabled);
    }

    /// Replace a list with data fetched from the parent zone.
    ///
    /// Enables the form. Rows of the wrong kind are rejected before anything
    /// is changed.
    pub fn set_parent_data(&mut self, list: ListKind, rows: Vec<RowValue>) -> Result<ParentData, FormError> {
        self.disable_all(false);

        let loaded = match list {
            ListKind::Nameservers => {
                let values = rows
                    .into_iter()
                    .map(|r| match r {
                        RowValue::Nameserver(row) => Ok(row),
                        RowValue::DsRecord(_) => Err(FormError::WrongRowKind(list)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.nameservers.replace_with(values)
            }
            ListKind::DsInfo => {
                let values = rows
                    .into_iter()
                    .map(|r| match r {
                        RowValue::DsRecord(row) => Ok(row),
                        RowValue::Nameserver(_) => Err(FormError::WrongRowKind(list)),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.ds_info.replace_with(values)
            }
        };

        debug!("loaded {} {} rows from the parent zone", loaded, list);
        Ok(if loaded == 0 { ParentData::Empty } else { ParentData::Loaded(loaded) })
    }

    /// Attach backend validation errors to the fields they address.
    ///
    /// Returns how many errors were placed; the rest are logged and skipped.
    pub fn apply_server_errors(&mut self, errors: &[ServerError]) -> usize {
        let mut applied = 0;
        for error in errors {
            match self.apply_server_error(error) {
                Ok(()) => applied += 1,
                Err(e) => warn!("ignoring server error for '{}' ({}): {}", error.path, e, error.message),
            }
        }
        applied
    }

    fn apply_server_error(&mut self, error: &ServerError) -> Result<(), FormError> {
        let segments: Vec<&str> = error.path.trim_start_matches('/').split('/').collect();
        let server = FieldError::Server(error.message.clone());

        match segments.as_slice() {
            [name] if matches!(*name, "domain" | "profile" | "ipv4" | "ipv6") => {
                self.server_errors.insert(format!("/{}", name), error.message.clone());
                Ok(())
            }
            [list, index, rest @ ..] if rest.len() <= 1 => {
                let list = ListKind::from_path_segment(list)
                    .ok_or_else(|| FormError::UnknownField(error.path.clone()))?;
                let index: usize = index.parse().map_err(|_| FormError::UnknownField(error.path.clone()))?;
                let field = rest.first().copied();
                match list {
                    ListKind::Nameservers => self.nameservers.set_error(index, field, server),
                    ListKind::DsInfo => self.ds_info.set_error(index, field, server),
                }
            }
            _ => Err(FormError::UnknownField(error.path.clone())),
        }
    }

    /// Every field error currently on the form
    pub fn issues(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();

        if self.domain.trim().is_empty() {
            issues.push(FieldIssue::new("/domain", FieldError::Required));
        }
        for (path, message) in &self.server_errors {
            issues.push(FieldIssue::new(path.clone(), FieldError::Server(message.clone())));
        }
        collect_row_issues(ListKind::Nameservers, &self.nameservers, &mut issues);
        collect_row_issues(ListKind::DsInfo, &self.ds_info, &mut issues);
        if let Some(error) = validate_protocols(self.disable_ipv4, self.disable_ipv6) {
            issues.push(FieldIssue::new("/ipv6", error));
        }

        issues
    }

    pub fn is_valid(&self) -> bool {
        self.issues().is_empty()
    }

    /// Build the parameters for `start_domain_test`.
    ///
    /// All rows are marked touched first so their errors become visible.
    pub fn submit(&mut self) -> Result<TestParams, FormError> {
        self.nameservers.touch_all();
        self.ds_info.touch_all();

        let mut issues = self.issues();

        let nameservers = self
            .nameservers
            .values()
            .map(|row| {
                let ip = row.ip.trim();
                Nameserver { ns: sanitize_domain(&row.ns), ip: (!ip.is_empty()).then(|| ip.to_string()) }
            })
            .filter(|ns| !ns.ns.is_empty() || ns.ip.is_some())
            .collect();

        let mut ds_info = Vec::new();
        for (index, row) in self.ds_info.values().enumerate() {
            match parse_ds_row(row) {
                Ok(Some(ds)) => ds_info.push(ds),
                Ok(None) => {}
                Err(field) => {
                    issues.push(FieldIssue::new(format!("/ds_info/{}/{}", index, field), FieldError::NotANumber))
                }
            }
        }

        if !issues.is_empty() {
            return Err(FormError::Invalid(issues));
        }

        let params = TestParams {
            domain: sanitize_domain(&self.domain),
            ipv4: self.disable_ipv4.then_some(false),
            ipv6: self.disable_ipv6.then_some(false),
            profile: Some(self.profile.clone()),
            nameservers,
            ds_info,
            extra: serde_json::Map::new(),
        };
        debug!("submitting test for {}", params.domain);
        Ok(params)
    }
}

fn collect_row_issues<R: FormRow>(list: ListKind, group: &RepeatingGroup<R>, issues: &mut Vec<FieldIssue>) {
    for (index, row) in group.rows().iter().enumerate() {
        for (field, error) in row.errors() {
            let path = if *field == ROW_ERROR {
                format!("/{}/{}", list, index)
            } else {
                format!("/{}/{}/{}", list, index, field)
            };
            issues.push(FieldIssue::new(path, error.clone()));
        }
    }
}

/// Trim, and strip one trailing dot unless the name is the root
pub fn sanitize_domain(domain: &str) -> String {
    let domain = domain.trim();
    match domain.strip_suffix('.') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => domain.to_string(),
    }
}

/// Parse a DS row into backend form.
///
/// Rows with nothing worth sending give `Ok(None)`; an unparsable numeric
/// field gives its name.
fn parse_ds_row(row: &DsRecordRow) -> Result<Option<DsInfo>, &'static str> {
    fn number(value: &str, field: &'static str) -> Result<u32, &'static str> {
        let value = value.trim();
        if value.is_empty() { Ok(0) } else { value.parse().map_err(|_| field) }
    }

    let keytag = number(&row.keytag, "keytag")?;
    let algorithm = number(&row.algorithm, "algorithm")?;
    let digtype = number(&row.digtype, "digtype")?;
    let digest = row.digest.trim().to_string();

    if row.keytag.trim().is_empty() && algorithm == 0 && digtype == 0 && digest.is_empty() {
        return Ok(None);
    }
    Ok(Some(DsInfo { keytag, algorithm, digtype, digest }))
}
