use crate::report::ExportFormat;
use crate::severity::Level;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "zonemaster-report")]
#[command(about = "View, filter and export Zonemaster test results")]
#[command(version)]
pub struct CliArgs {
    /// Configuration file (default: $ZONEMASTER_REPORT_CONFIG, then the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Zonemaster backend JSON-RPC endpoint
    #[arg(long, global = true, value_name = "URL")]
    pub backend: Option<String>,

    /// UI language (da, en, fi, fr, nb, sv)
    #[arg(long = "lang", global = true, value_name = "LANG")]
    pub language: Option<String>,

    /// Show and export timestamps in UTC instead of local time
    #[arg(long, global = true)]
    pub utc: bool,

    /// Fail on entries with an unknown severity level instead of treating them as info
    #[arg(long, global = true)]
    pub strict_levels: bool,

    /// Omit the first entry from CSV and text exports, like older viewers did
    #[arg(long, global = true, hide = true)]
    pub legacy_skip_first_row: bool,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, global = true, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show a test result as a module / test case tree
    Show(ShowArgs),

    /// Export a test result to JSON, HTML, CSV or text
    Export(ExportArgs),

    /// List earlier tests of a domain
    History(HistoryArgs),

    /// Start a new domain test
    Run(RunArgs),
}

/// Where a test result comes from: the backend by id, or a saved JSON file
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Test id (hash) to fetch from the backend
    #[arg(value_name = "TEST_ID")]
    pub test_id: Option<String>,

    /// Read the result from a JSON file instead of the backend
    #[arg(long, short = 'i', value_name = "FILE", conflicts_with = "test_id")]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only show entries of these levels (repeatable)
    #[arg(long = "level", short = 'l', value_name = "LEVEL")]
    pub levels: Vec<Level>,

    /// Only show entries whose message contains this text (case-insensitive)
    #[arg(long, short = 's', value_name = "TEXT")]
    pub search: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Expand every module and test case
    #[arg(long)]
    pub expand: bool,

    /// Print the grouped result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Export formats (json, html, csv, txt); repeatable
    #[arg(long = "format", short = 'f', value_name = "FORMAT", default_value = "json")]
    pub formats: Vec<ExportFormat>,

    /// Directory to write the files into (default: from config, else the current directory)
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

impl ExportArgs {
    /// Export only the entries passing the filter
    pub fn is_filtered(&self) -> bool {
        !self.filter.levels.is_empty() || self.filter.search.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Domain to list tests for
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    /// Only list undelegated (or only delegated) tests
    #[arg(long, value_name = "all|delegated|undelegated", default_value = "all")]
    pub filter: String,

    #[arg(long, default_value = "0")]
    pub offset: usize,

    #[arg(long, default_value = "100")]
    pub limit: usize,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Domain to test
    #[arg(long, short = 'd', value_name = "DOMAIN")]
    pub domain: String,

    /// Nameserver as NAME or NAME/IP (repeatable)
    #[arg(long = "ns", value_name = "NAME[/IP]")]
    pub nameservers: Vec<String>,

    /// DS record as KEYTAG,ALGORITHM,DIGTYPE,DIGEST (repeatable)
    #[arg(long = "ds", value_name = "KEYTAG,ALG,DIGTYPE,DIGEST")]
    pub ds_records: Vec<String>,

    /// Pre-fill nameservers and DS records from the parent zone
    #[arg(long)]
    pub fetch_parent: bool,

    #[arg(long)]
    pub disable_ipv4: bool,

    #[arg(long)]
    pub disable_ipv6: bool,

    /// Test profile (default: the first configured profile)
    #[arg(long, value_name = "PROFILE")]
    pub profile: Option<String>,

    /// Print the request parameters instead of starting the test
    #[arg(long, conflicts_with = "wait")]
    pub dry_run: bool,

    /// Wait for the test to finish and show its result
    #[arg(long)]
    pub wait: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        CliArgs::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.console_width == Some(0) {
            return Err("--console-width must be greater than 0".to_string());
        }

        match &self.command {
            Command::Show(args) => args.source.validate(),
            Command::Export(args) => {
                args.source.validate()?;
                if args.formats.is_empty() {
                    return Err("At least one --format is required".to_string());
                }
                Ok(())
            }
            Command::History(args) => {
                if !matches!(args.filter.as_str(), "all" | "delegated" | "undelegated") {
                    return Err(format!(
                        "Invalid history filter '{}': expected all, delegated or undelegated",
                        args.filter
                    ));
                }
                Ok(())
            }
            Command::Run(args) => {
                if args.domain.trim().is_empty() {
                    return Err("--domain must not be empty".to_string());
                }
                Ok(())
            }
        }
    }
}

impl SourceArgs {
    fn validate(&self) -> Result<(), String> {
        if self.test_id.is_none() && self.input.is_none() {
            return Err("Specify a TEST_ID or --input <FILE>".to_string());
        }
        Ok(())
    }
}
