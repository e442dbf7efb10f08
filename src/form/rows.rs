//! Row shapes of the repeating field groups and their validators.

use std::collections::BTreeMap;
use std::fmt;

/// A validation problem on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Field must be filled in
    Required,
    /// Field must hold a non-negative integer
    NotANumber,
    /// IPv4 and IPv6 are both disabled
    NoProtocol,
    /// Message reported by the backend for this field
    Server(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => f.write_str("required"),
            FieldError::NotANumber => f.write_str("must be a number"),
            FieldError::NoProtocol => f.write_str("IPv4 and IPv6 cannot both be disabled"),
            FieldError::Server(message) => f.write_str(message),
        }
    }
}

/// Key under which an error on the whole row is stored
pub const ROW_ERROR: &str = "";

/// Errors of one row, keyed by field name
pub type FieldErrors = BTreeMap<&'static str, FieldError>;

/// What a row validator concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Errors were (re)computed
    Checked,
    /// The row is blank again: errors cleared, row back to pristine and untouched
    Cleared,
}

/// A row type usable in a `RepeatingGroup`
pub trait FormRow: Clone + Default + PartialEq + fmt::Debug {
    /// Field names, in display order
    const FIELDS: &'static [&'static str];

    /// Value of a field by name
    fn field(&self, name: &str) -> Option<&str>;

    /// Recompute `errors` for the current value
    fn validate(&self, errors: &mut FieldErrors) -> Validation;

    fn is_blank(&self) -> bool {
        Self::FIELDS.iter().all(|f| self.field(f).is_none_or(str::is_empty))
    }

    /// Static name of a field, for error bookkeeping
    fn field_name(name: &str) -> Option<&'static str> {
        Self::FIELDS.iter().copied().find(|f| *f == name)
    }
}

/// Nameserver row: host name and optional address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameserverRow {
    pub ns: String,
    pub ip: String,
}

impl NameserverRow {
    pub fn new(ns: &str, ip: &str) -> Self {
        Self { ns: ns.to_string(), ip: ip.to_string() }
    }
}

impl FormRow for NameserverRow {
    const FIELDS: &'static [&'static str] = &["ns", "ip"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "ns" => Some(&self.ns),
            "ip" => Some(&self.ip),
            _ => None,
        }
    }

    fn validate(&self, errors: &mut FieldErrors) -> Validation {
        validate_nameserver(self, errors)
    }
}

/// An address without a name makes the name required; an empty row is reset
pub fn validate_nameserver(row: &NameserverRow, errors: &mut FieldErrors) -> Validation {
    if !row.ip.is_empty() && row.ns.is_empty() {
        errors.insert("ns", FieldError::Required);
        Validation::Checked
    } else if row.ip.is_empty() && row.ns.is_empty() {
        errors.clear();
        Validation::Cleared
    } else {
        Validation::Checked
    }
}

/// DS record row, all fields as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DsRecordRow {
    pub keytag: String,
    pub algorithm: String,
    pub digtype: String,
    pub digest: String,
}

impl DsRecordRow {
    pub fn new(keytag: &str, algorithm: &str, digtype: &str, digest: &str) -> Self {
        Self {
            keytag: keytag.to_string(),
            algorithm: algorithm.to_string(),
            digtype: digtype.to_string(),
            digest: digest.to_string(),
        }
    }
}

impl FormRow for DsRecordRow {
    const FIELDS: &'static [&'static str] = &["keytag", "algorithm", "digtype", "digest"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "keytag" => Some(&self.keytag),
            "algorithm" => Some(&self.algorithm),
            "digtype" => Some(&self.digtype),
            "digest" => Some(&self.digest),
            _ => None,
        }
    }

    fn validate(&self, errors: &mut FieldErrors) -> Validation {
        validate_ds_record(self, errors)
    }
}

/// All four DS fields or none: any filled field makes the empty ones required
pub fn validate_ds_record(row: &DsRecordRow, errors: &mut FieldErrors) -> Validation {
    if row.is_blank() {
        errors.clear();
        return Validation::Cleared;
    }

    for &field in DsRecordRow::FIELDS {
        if row.field(field).is_some_and(str::is_empty) {
            errors.insert(field, FieldError::Required);
        }
    }
    Validation::Checked
}

/// At least one protocol family must stay enabled
pub fn validate_protocols(disable_ipv4: bool, disable_ipv6: bool) -> Option<FieldError> {
    if disable_ipv4 && disable_ipv6 { Some(FieldError::NoProtocol) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ns_ip_without_name_requires_name() {
        let mut errors = FieldErrors::new();
        let v = validate_nameserver(&NameserverRow::new("", "192.0.2.1"), &mut errors);
        assert_eq!(v, Validation::Checked);
        assert_eq!(errors.get("ns"), Some(&FieldError::Required));
        assert!(!errors.contains_key("ip"));
    }

    #[test]
    fn test_ns_name_without_ip_is_fine() {
        let mut errors = FieldErrors::new();
        validate_nameserver(&NameserverRow::new("ns1.example.com", ""), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_ns_empty_row_clears() {
        let mut errors = FieldErrors::new();
        errors.insert("ns", FieldError::Required);
        assert_eq!(validate_nameserver(&NameserverRow::default(), &mut errors), Validation::Cleared);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_ds_partial_row_requires_remaining_fields() {
        let mut errors = FieldErrors::new();
        let v = validate_ds_record(&DsRecordRow::new("12345", "", "2", ""), &mut errors);
        assert_eq!(v, Validation::Checked);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("algorithm"), Some(&FieldError::Required));
        assert_eq!(errors.get("digest"), Some(&FieldError::Required));
    }

    #[test]
    fn test_ds_complete_row_has_no_errors() {
        let mut errors = FieldErrors::new();
        validate_ds_record(&DsRecordRow::new("12345", "8", "2", "ABCDEF"), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_ds_empty_row_clears() {
        let mut errors = FieldErrors::new();
        errors.insert("keytag", FieldError::Required);
        assert_eq!(validate_ds_record(&DsRecordRow::default(), &mut errors), Validation::Cleared);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_protocols() {
        assert_eq!(validate_protocols(true, true), Some(FieldError::NoProtocol));
        assert_eq!(validate_protocols(true, false), None);
        assert_eq!(validate_protocols(false, false), None);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(DsRecordRow::field_name("digtype"), Some("digtype"));
        assert_eq!(NameserverRow::field_name("keytag"), None);
        assert!(NameserverRow::default().is_blank());
    }
}
