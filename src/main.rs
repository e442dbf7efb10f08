// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use log::{debug, info, warn};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use zonemaster_report::api::{HistoryFilter, HistoryQuery, ResultSource, RpcClient};
use zonemaster_report::cli::{CliArgs, Command, ExportArgs, FilterArgs, HistoryArgs, RunArgs, ShowArgs, SourceArgs};
use zonemaster_report::config::Settings;
use zonemaster_report::console_format::TreeWriter;
use zonemaster_report::error::{ReportError, Result};
use zonemaster_report::form::{
    DsRecordRow, FormError, ListKind, NameserverRow, ParentData, RowValue, TestForm, sanitize_domain,
};
use zonemaster_report::labels::EnglishLabels;
use zonemaster_report::report::{ExportSink, Exporter, FileSink, FilterSpec, ResultView};
use zonemaster_report::types::{LevelPolicy, TestRecord};
use zonemaster_report::{api, config, console_format, ui};

/// Delay between `test_progress` polls
const POLL_INTERVAL: Duration = Duration::from_secs(2);

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    let settings = match config::build_settings(&args) {
        Ok(s) => s,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", error_chain(&e)));
            std::process::exit(1);
        }
    };
    debug!("settings: {:?}", settings);

    if let Err(e) = run(&args.command, &settings) {
        match e {
            ReportError::NoData(_) => ui::notice(&e.to_string()),
            _ => ui::print_error(&error_chain(&e)),
        }
        std::process::exit(1);
    }
}

fn run(command: &Command, settings: &Settings) -> Result<()> {
    let client = RpcClient::new(&settings.backend_url, settings.timeout);
    match command {
        Command::Show(args) => show(args, settings, &client),
        Command::Export(args) => export(args, settings, &client),
        Command::History(args) => history(args, &client),
        Command::Run(args) => start_test(args, settings, &client),
    }
}

/// Error message followed by its sources
fn error_chain(e: &ReportError) -> String {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        message.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    message
}

/// Fetch (or read) a result and normalize it
fn load_record(source: &SourceArgs, settings: &Settings, client: &dyn ResultSource) -> Result<TestRecord> {
    let raw = match (&source.input, &source.test_id) {
        (Some(path), _) => api::read_result_file(path)?,
        (None, Some(test_id)) => client.get_test_results(test_id, &settings.language).map_err(|e| {
            warn!("fetching test {} failed: {}", test_id, e);
            ReportError::NoData(e.to_string())
        })?,
        (None, None) => return Err(ReportError::NoData("no test id given".to_string())),
    };

    TestRecord::from_raw(raw, LevelPolicy::from_strict(settings.strict_levels))
}

fn filter_spec(args: &FilterArgs) -> FilterSpec {
    let spec = if args.levels.is_empty() { FilterSpec::new() } else { FilterSpec::with_levels(args.levels.clone()) };
    spec.with_search(args.search.as_deref().unwrap_or(""))
}

fn show(args: &ShowArgs, settings: &Settings, client: &dyn ResultSource) -> Result<()> {
    let mut view = ResultView::load(load_record(&args.source, settings, client)?);
    view.set_filter(filter_spec(&args.filter));
    if args.expand {
        view.expand_all();
    }

    let stdout = io::stdout();
    if args.json {
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, view.tree())?;
        let _ = writeln!(out);
        return Ok(());
    }

    let use_colors = stdout.is_terminal();
    let mut writer = TreeWriter::new(stdout.lock(), use_colors);
    if let Err(e) = render_view(&mut writer, &view, settings) {
        // Closed pipe (e.g. `| head`) is not an error worth reporting
        debug!("stdout write failed: {}", e);
    }
    Ok(())
}

fn render_view<W: Write>(writer: &mut TreeWriter<W>, view: &ResultView, settings: &Settings) -> io::Result<()> {
    let labels = EnglishLabels;
    let ctx = view.export_context(&settings.language, settings.zone);
    writer.write_header(&view.title(), &ctx.formatted_created_at())?;
    writer.write_summary(&view.totals(), &labels)?;
    writer.write_result(view, &labels)
}

fn export(args: &ExportArgs, settings: &Settings, client: &dyn ResultSource) -> Result<()> {
    let mut view = ResultView::load(load_record(&args.source, settings, client)?);

    let entries = if args.is_filtered() {
        view.set_filter(filter_spec(&args.filter));
        view.filtered_entries()
    } else {
        view.entries().to_vec()
    };

    let labels = EnglishLabels;
    let exporter = Exporter::new(&labels).with_legacy_skip_first_row(settings.legacy_skip_first_row);
    let ctx = view.export_context(&settings.language, settings.zone);
    let mut sink = FileSink::new(args.output_dir.as_deref().unwrap_or(&settings.output_dir));

    for &format in &args.formats {
        let payload = exporter.export(&entries, format, &ctx)?;
        let path = sink.save(&payload)?;
        ui::status(&format!("{} export saved to {}", format, path.display()));
    }
    Ok(())
}

fn history(args: &HistoryArgs, client: &dyn ResultSource) -> Result<()> {
    let query = HistoryQuery {
        domain: sanitize_domain(&args.domain),
        filter: HistoryFilter::parse(&args.filter).unwrap_or_default(),
        offset: args.offset,
        limit: args.limit,
    };
    let items = client.get_test_history(&query)?;
    info!("{} previous tests for {}", items.len(), query.domain);

    let stdout = io::stdout();
    let use_colors = stdout.is_terminal();
    let mut writer = TreeWriter::new(stdout.lock(), use_colors);
    if let Err(e) = writer.write_history(&items) {
        debug!("stdout write failed: {}", e);
    }
    Ok(())
}

/// Fill the form from the command line the way a user would type it
fn fill_form(form: &mut TestForm, args: &RunArgs) -> Result<()> {
    form.disable_ipv4 = args.disable_ipv4;
    form.disable_ipv6 = args.disable_ipv6;
    if let Some(profile) = &args.profile {
        form.profile = profile.clone();
    }

    for ns in &args.nameservers {
        let (name, ip) = ns.split_once('/').unwrap_or((ns.as_str(), ""));
        let row = NameserverRow::new(name.trim(), ip.trim());
        let last = form.nameservers().len() - 1;
        form.nameservers_mut().edit_row(last, |r| *r = row)?;
    }

    for ds in &args.ds_records {
        let mut parts = ds.splitn(4, ',').map(str::trim);
        let mut next = || parts.next().unwrap_or("");
        let row = DsRecordRow::new(next(), next(), next(), next());
        let last = form.ds_info().len() - 1;
        form.ds_info_mut().edit_row(last, |r| *r = row)?;
    }
    Ok(())
}

fn load_parent_data(form: &mut TestForm, client: &dyn ResultSource) -> Result<()> {
    form.disable_all(true);
    let domain = sanitize_domain(&form.domain);
    let data = client.get_data_from_parent_zone(&domain)?;

    let ns_rows = data.ns_list.iter().map(|ns| RowValue::Nameserver(ns.into())).collect();
    if form.set_parent_data(ListKind::Nameservers, ns_rows)? == ParentData::Empty {
        ui::notice("No nameservers found in the parent zone.");
    }
    let ds_rows = data.ds_list.iter().map(|ds| RowValue::DsRecord(ds.into())).collect();
    if form.set_parent_data(ListKind::DsInfo, ds_rows)? == ParentData::Empty {
        ui::notice("No DS records found in the parent zone.");
    }
    Ok(())
}

fn start_test(args: &RunArgs, settings: &Settings, client: &dyn ResultSource) -> Result<()> {
    let mut form = TestForm::new(&settings.profiles);
    form.set_domain(&args.domain)?;
    if args.fetch_parent {
        load_parent_data(&mut form, client)?;
    }
    fill_form(&mut form, args)?;

    let params = form.submit()?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&params)?);
        return Ok(());
    }

    let test_id = match client.start_domain_test(&params, &settings.language) {
        Ok(id) => id,
        Err(ReportError::Rpc { details, .. }) if !details.is_empty() => {
            form.apply_server_errors(&details);
            return Err(FormError::Invalid(form.issues()).into());
        }
        Err(e) => return Err(e),
    };
    ui::status(&format!("Test {} started for {}", test_id, params.domain));

    if !args.wait {
        println!("{}", test_id);
        return Ok(());
    }

    api::wait_for_test(client, &test_id, POLL_INTERVAL, settings.wait_timeout)?;

    let source = SourceArgs { test_id: Some(test_id), input: None };
    show(&ShowArgs { source, ..Default::default() }, settings, client)
}
