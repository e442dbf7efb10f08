/// Core data structures for test results
///
/// This module defines the data shapes exchanged with the Zonemaster backend:
/// diagnostic entries, the test record envelope, test parameters and history
/// items, plus the ingestion step that normalizes entry levels.
use crate::error::{ReportError, Result};
use crate::severity::Level;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel test-case id for messages not attached to a specific test case
pub const UNSPECIFIED: &str = "UNSPECIFIED";

/// Whether a test-case id is the `UNSPECIFIED` sentinel (case-insensitive)
pub fn is_unspecified(testcase: &str) -> bool {
    testcase.eq_ignore_ascii_case(UNSPECIFIED)
}

/// One diagnostic finding after ingestion.
///
/// Fields other than the four known ones (for example `args` or
/// `timestamp`) are kept in `extra` so that JSON export reproduces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub module: String,
    pub testcase: String,
    pub level: Level,
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Entry {
    pub fn new(module: &str, testcase: &str, level: Level, message: &str) -> Self {
        Self {
            module: module.to_string(),
            testcase: testcase.to_string(),
            level,
            message: message.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// An entry as received on the wire, level still free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub module: String,
    #[serde(default = "default_testcase")]
    pub testcase: String,
    pub level: String,
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_testcase() -> String {
    UNSPECIFIED.to_string()
}

/// What to do with an entry whose level is not in the severity model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPolicy {
    /// Reject the whole result set
    Strict,
    /// Log a warning and treat the entry as `info`
    Clamp,
}

impl LevelPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict { LevelPolicy::Strict } else { LevelPolicy::Clamp }
    }
}

/// Normalize raw entries: parse every level case-insensitively.
///
/// Order is preserved. Unknown levels are handled per `policy`.
pub fn ingest(raw: Vec<RawEntry>, policy: LevelPolicy) -> Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(raw.len());

    for (index, r) in raw.into_iter().enumerate() {
        let level = match r.level.parse::<Level>() {
            Ok(level) => level,
            Err(_) if policy == LevelPolicy::Clamp => {
                warn!(
                    "entry {} ({}/{}) has unknown level '{}', treating it as info",
                    index, r.module, r.testcase, r.level
                );
                Level::Info
            }
            Err(_) => {
                return Err(ReportError::UnknownLevel {
                    index,
                    module: r.module,
                    testcase: r.testcase,
                    level: r.level,
                });
            }
        };

        entries.push(Entry { module: r.module, testcase: r.testcase, level, message: r.message, extra: r.extra });
    }

    debug!("ingested {} entries", entries.len());
    Ok(entries)
}

/// Nameserver given as test parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nameserver {
    pub ns: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

/// DS record given as test parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DsInfo {
    pub keytag: u32,
    pub algorithm: u32,
    pub digtype: u32,
    pub digest: String,
}

/// Parameters a test was (or will be) run with
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestParams {
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<Nameserver>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ds_info: Vec<DsInfo>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TestParams {
    /// Punycode (ASCII-compatible) form of the domain
    pub fn ascii_domain(&self) -> String {
        to_ascii_domain(&self.domain)
    }

    /// Unicode form of the domain
    pub fn unicode_domain(&self) -> String {
        to_unicode_domain(&self.domain)
    }
}

/// Convert a domain to its ASCII-compatible encoding, falling back to the input
pub fn to_ascii_domain(domain: &str) -> String {
    if domain.is_ascii() {
        return domain.to_string();
    }
    match idna::domain_to_ascii(domain) {
        Ok(ascii) => ascii,
        Err(e) => {
            warn!("cannot convert '{}' to ASCII: {:?}", domain, e);
            domain.to_string()
        }
    }
}

/// Convert a (possibly Punycode) domain to Unicode, falling back to the input
pub fn to_unicode_domain(domain: &str) -> String {
    let (unicode, result) = idna::domain_to_unicode(domain);
    if result.is_err() {
        warn!("cannot convert '{}' to Unicode", domain);
        return domain.to_string();
    }
    unicode
}

/// A test record as returned by `get_test_results`
#[derive(Debug, Clone, Deserialize)]
pub struct RawTestRecord {
    pub hash_id: String,
    pub created_at: String,
    #[serde(default)]
    pub params: TestParams,
    #[serde(default)]
    pub results: Vec<RawEntry>,
    #[serde(default)]
    pub testcase_descriptions: BTreeMap<String, String>,
}

/// A loaded, normalized test record
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub id: String,
    pub created_at: DateTime<FixedOffset>,
    pub params: TestParams,
    pub results: Vec<Entry>,
    pub testcase_descriptions: BTreeMap<String, String>,
}

impl TestRecord {
    pub fn from_raw(raw: RawTestRecord, policy: LevelPolicy) -> Result<Self> {
        Ok(TestRecord {
            created_at: parse_timestamp(&raw.created_at)?,
            id: raw.hash_id,
            params: raw.params,
            results: ingest(raw.results, policy)?,
            testcase_descriptions: raw.testcase_descriptions,
        })
    }

    /// Description of a test case, looked up case-insensitively
    pub fn testcase_description(&self, testcase: &str) -> Option<&str> {
        self.testcase_descriptions
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(testcase))
            .map(|(_, desc)| desc.as_str())
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and the older `YYYY-MM-DD HH:MM:SS[.ffffff]` form,
/// which is taken to be UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| ReportError::Timestamp(s.to_string()))
}

/// One previous test of the same domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: String,
    pub created_at: String,
    #[serde(default)]
    pub overall_result: String,
    #[serde(default)]
    pub undelegated: bool,
}

#[cfg(test)]
#[path = "data_structures_test.rs"]
mod data_structures_test;
