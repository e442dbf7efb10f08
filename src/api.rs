/// API module for talking to the Zonemaster backend
///
/// The backend speaks JSON-RPC 2.0 over HTTP POST. `ResultSource` is the
/// seam the commands use, so they can run against a saved result file or a
/// stub in tests.
use crate::error::{ReportError, Result};
use crate::form::ServerError;
use crate::types::{DsInfo, HistoryItem, Nameserver, RawTestRecord, TestParams};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("zonemaster-report/", env!("CARGO_PKG_VERSION"));

/// Which tests `get_test_history` lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    Delegated,
    Undelegated,
}

impl HistoryFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(HistoryFilter::All),
            "delegated" => Some(HistoryFilter::Delegated),
            "undelegated" => Some(HistoryFilter::Undelegated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryQuery {
    pub domain: String,
    pub filter: HistoryFilter,
    pub offset: usize,
    pub limit: usize,
}

/// Delegation data of a domain as published in its parent zone
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ParentZoneData {
    #[serde(default)]
    pub ns_list: Vec<Nameserver>,
    #[serde(default)]
    pub ds_list: Vec<DsInfo>,
}

/// Where test results and history come from
pub trait ResultSource {
    fn get_test_results(&self, test_id: &str, language: &str) -> Result<RawTestRecord>;

    fn get_test_history(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>>;

    /// Start a test, returning its id
    fn start_domain_test(&self, params: &TestParams, language: &str) -> Result<String>;

    /// Completion of a running test, 0 to 100
    fn test_progress(&self, test_id: &str) -> Result<u8>;

    fn get_data_from_parent_zone(&self, domain: &str) -> Result<ParentZoneData>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Blocking JSON-RPC client
pub struct RpcClient {
    url: String,
    agent: ureq::Agent,
}

impl RpcClient {
    pub fn new(url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).user_agent(USER_AGENT).build();
        Self { url: url.to_string(), agent }
    }

    /// Call `method` and decode its result
    fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        debug!("calling {} at {}", method, self.url);
        let request = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });

        let response = match self.agent.post(&self.url).send_json(request) {
            Ok(response) => response,
            // Validation failures come back with an error status and a JSON-RPC body
            Err(ureq::Error::Status(code, response)) => match response.into_json::<RpcResponse>() {
                Ok(body) if body.error.is_some() => return decode_response(method, body),
                _ => {
                    return Err(ReportError::Backend {
                        method: method.to_string(),
                        message: format!("HTTP status {}", code),
                    });
                }
            },
            Err(e) => return Err(ReportError::Backend { method: method.to_string(), message: e.to_string() }),
        };

        let body: RpcResponse = response
            .into_json()
            .map_err(|e| ReportError::Backend { method: method.to_string(), message: e.to_string() })?;
        decode_response(method, body)
    }
}

fn decode_response<T: DeserializeOwned>(method: &str, body: RpcResponse) -> Result<T> {
    if let Some(error) = body.error {
        let details = error.data.and_then(|d| serde_json::from_value::<Vec<ServerError>>(d).ok()).unwrap_or_default();
        return Err(ReportError::Rpc { method: method.to_string(), code: error.code, message: error.message, details });
    }
    Ok(serde_json::from_value(body.result.unwrap_or(Value::Null))?)
}

impl ResultSource for RpcClient {
    fn get_test_results(&self, test_id: &str, language: &str) -> Result<RawTestRecord> {
        self.call("get_test_results", json!({ "id": test_id, "language": language }))
    }

    fn get_test_history(&self, query: &HistoryQuery) -> Result<Vec<HistoryItem>> {
        self.call(
            "get_test_history",
            json!({
                "offset": query.offset,
                "limit": query.limit,
                "filter": query.filter,
                "frontend_params": { "domain": query.domain },
            }),
        )
    }

    fn start_domain_test(&self, params: &TestParams, language: &str) -> Result<String> {
        let mut value = serde_json::to_value(params)?;
        if let Value::Object(map) = &mut value {
            map.insert("language".to_string(), Value::String(language.to_string()));
        }
        self.call("start_domain_test", value)
    }

    fn test_progress(&self, test_id: &str) -> Result<u8> {
        self.call("test_progress", json!({ "test_id": test_id }))
    }

    fn get_data_from_parent_zone(&self, domain: &str) -> Result<ParentZoneData> {
        self.call("get_data_from_parent_zone", json!({ "domain": domain }))
    }
}

/// Read a saved test result.
///
/// Accepts either the bare result object or a whole JSON-RPC response.
pub fn read_result_file(path: &Path) -> Result<RawTestRecord> {
    debug!("reading result from {}", path.display());
    let s = fs::read_to_string(path).map_err(|source| ReportError::Read { path: path.to_path_buf(), source })?;
    let value: Value = serde_json::from_str(&s)?;
    let value = match value {
        Value::Object(mut map) if map.contains_key("jsonrpc") => map.remove("result").unwrap_or(Value::Null),
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

/// Poll `test_progress` until the test reports 100% or `limit` runs out
pub fn wait_for_test(source: &dyn ResultSource, test_id: &str, poll: Duration, limit: Duration) -> Result<()> {
    let started = Instant::now();
    loop {
        let progress = source.test_progress(test_id)?;
        debug!("test {} at {}%", test_id, progress);
        if progress >= 100 {
            return Ok(());
        }
        if started.elapsed() + poll >= limit {
            return Err(ReportError::WaitTimeout { test_id: test_id.to_string(), progress, secs: limit.as_secs() });
        }
        thread::sleep(poll);
    }
}
