/// Configuration resolution module
///
/// This module handles:
/// - Locating and parsing the TOML config file
/// - Merging file values with CLI flags (flags win)
/// - Resolving the UI language against the enabled languages
use crate::cli::CliArgs;
use crate::error::{ReportError, Result};
use crate::labels::{DEFAULT_LANGUAGE, LANGUAGES, language_name};
use crate::report::DisplayZone;
use log::{debug, warn};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "ZONEMASTER_REPORT_CONFIG";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How long `run --wait` polls before giving up
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 600;

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend_url: Option<String>,
    pub language: Option<String>,
    pub default_language: Option<String>,
    pub enabled_languages: Option<Vec<String>>,
    pub profiles: Option<Vec<String>>,
    pub output_dir: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub wait_timeout_secs: Option<u64>,
    pub strict_levels: Option<bool>,
    pub legacy_skip_first_row: Option<bool>,
    pub utc: Option<bool>,
}

/// Fully resolved settings handed to the commands
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend_url: String,
    pub language: String,
    pub enabled_languages: Vec<String>,
    pub profiles: Vec<String>,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub wait_timeout: Duration,
    pub strict_levels: bool,
    pub legacy_skip_first_row: bool,
    pub zone: DisplayZone,
    pub console_width: Option<usize>,
}

/// Default location: `<config dir>/zonemaster-report/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("zonemaster-report").join("config.toml"))
}

/// Build settings from CLI arguments and the config file they point at
pub fn build_settings(args: &CliArgs) -> Result<Settings> {
    let file = match locate_config(args.config.as_deref(), env::var(CONFIG_ENV).ok()) {
        Some((path, explicit)) if explicit || path.exists() => load_config_file(&path)?,
        Some((path, _)) => {
            debug!("No config file at {}", path.display());
            FileConfig::default()
        }
        None => FileConfig::default(),
    };

    Ok(resolve_settings(args, file))
}

/// Pick the config file path and whether it was asked for explicitly
fn locate_config(cli: Option<&Path>, env_value: Option<String>) -> Option<(PathBuf, bool)> {
    if let Some(path) = cli {
        return Some((path.to_path_buf(), true));
    }
    if let Some(path) = env_value.filter(|v| !v.is_empty()) {
        return Some((PathBuf::from(path), true));
    }
    default_config_path().map(|p| (p, false))
}

pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    debug!("Loading config from {}", path.display());
    let s = fs::read_to_string(path).map_err(|source| ReportError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&s).map_err(|e| ReportError::Config { path: path.to_path_buf(), message: e.to_string() })
}

/// Merge file values with CLI flags
pub fn resolve_settings(args: &CliArgs, file: FileConfig) -> Settings {
    let enabled_languages = resolve_enabled_languages(file.enabled_languages);
    let default_language = resolve_default_language(file.default_language.as_deref(), &enabled_languages);
    let requested = args.language.as_deref().or(file.language.as_deref());
    let language = resolve_language(requested, &default_language, &enabled_languages);

    let utc = args.utc || file.utc.unwrap_or(false);

    Settings {
        backend_url: args.backend.clone().or(file.backend_url).unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        language,
        enabled_languages,
        profiles: file.profiles.unwrap_or_default(),
        output_dir: file.output_dir.unwrap_or_else(|| PathBuf::from(".")),
        timeout: Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        wait_timeout: Duration::from_secs(file.wait_timeout_secs.unwrap_or(DEFAULT_WAIT_TIMEOUT_SECS)),
        strict_levels: args.strict_levels || file.strict_levels.unwrap_or(cfg!(debug_assertions)),
        legacy_skip_first_row: args.legacy_skip_first_row || file.legacy_skip_first_row.unwrap_or(false),
        zone: if utc { DisplayZone::Utc } else { DisplayZone::Local },
        console_width: args.console_width,
    }
}

/// Known languages from the configured list, or all of them
fn resolve_enabled_languages(configured: Option<Vec<String>>) -> Vec<String> {
    let all = || LANGUAGES.iter().map(|(code, _)| code.to_string()).collect::<Vec<_>>();
    let Some(configured) = configured else {
        return all();
    };

    let mut enabled = Vec::new();
    for code in configured {
        let code = code.to_lowercase();
        if !LANGUAGES.iter().any(|(c, _)| *c == code) {
            warn!("Ignoring unsupported language '{}' in enabled_languages", code);
        } else if !enabled.contains(&code) {
            enabled.push(code);
        }
    }

    if enabled.is_empty() {
        warn!("No supported language enabled, enabling all");
        return all();
    }
    enabled
}

fn resolve_default_language(configured: Option<&str>, enabled: &[String]) -> String {
    if let Some(code) = configured {
        let code = code.to_lowercase();
        if enabled.contains(&code) {
            return code;
        }
        warn!("Default language '{}' is not enabled", code);
    }
    if enabled.iter().any(|c| c == DEFAULT_LANGUAGE) {
        DEFAULT_LANGUAGE.to_string()
    } else {
        // resolve_enabled_languages never returns an empty list
        enabled.first().cloned().unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }
}

/// The requested language if enabled, else the default one
pub fn resolve_language(requested: Option<&str>, default: &str, enabled: &[String]) -> String {
    match requested.map(str::to_lowercase) {
        Some(code) if enabled.contains(&code) => code,
        Some(code) => {
            warn!(
                "Language '{}' is not enabled, using {} ({})",
                code,
                language_name(default).unwrap_or(default),
                default
            );
            default.to_string()
        }
        None => default.to_string(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
