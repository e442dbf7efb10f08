/// Tests driving the zonemaster_report library directly
///
/// These cover view and form operations the CLI does not reach on its own.
use std::path::Path;
use zonemaster_report::api::read_result_file;
use zonemaster_report::form::{DeleteOutcome, ListKind, RowTarget, TestForm};
use zonemaster_report::report::{DisplayZone, ExportSink, FileSink, FilterToggle};
use zonemaster_report::types::LevelPolicy;
use zonemaster_report::{ExportFormat, Exporter, Level, ResultView, TestRecord};

fn load_view() -> ResultView {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/result.json");
    let raw = read_result_file(&path).unwrap();
    ResultView::load(TestRecord::from_raw(raw, LevelPolicy::Clamp).unwrap())
}

#[test]
fn test_level_toggle_round_trip() {
    let mut view = load_view();

    view.toggle_filter(FilterToggle::Level(Level::Error));
    assert!(!view.filter().all());
    assert_eq!(view.tree().modules.len(), 1);
    assert_eq!(view.tree().modules[0].name, "DNSSEC");

    view.toggle_filter(FilterToggle::Level(Level::Error));
    assert!(view.filter().all());
    assert_eq!(view.tree().counts.all, view.totals().all);
}

#[test]
fn test_expand_all_opens_test_cases() {
    let mut view = load_view();
    assert!(view.collapse().is_testcase_collapsed("DNSSEC", "DNSSEC02"));

    view.expand_all();
    assert!(!view.collapse().is_module_collapsed("DNSSEC"));
    assert!(!view.collapse().is_testcase_collapsed("DNSSEC", "DNSSEC02"));

    assert!(view.toggle_testcase("DNSSEC", "DNSSEC02"));
    view.collapse_all();
    assert!(view.collapse().is_testcase_collapsed("BASIC", "BASIC01"));
}

#[test]
fn test_nameserver_row_deletion() {
    let mut form = TestForm::new(&[]);
    form.nameservers_mut().edit_row(0, |r| r.ns = "ns1.example.com".to_string()).unwrap();
    assert_eq!(form.nameservers().len(), 2);

    // Trailing blank row after a filled row is only reset
    assert_eq!(form.delete_row(ListKind::Nameservers, RowTarget::Index(1)).unwrap(), DeleteOutcome::Reset { index: 1 });
    assert_eq!(form.nameservers().len(), 2);

    assert_eq!(form.delete_row(ListKind::Nameservers, RowTarget::Index(0)).unwrap(), DeleteOutcome::Removed { focus: 0 });
    assert_eq!(form.nameservers().len(), 1);
    assert!(form.nameservers().row(0).unwrap().is_watched());

    assert_eq!(form.delete_row(ListKind::DsInfo, RowTarget::All).unwrap(), DeleteOutcome::Cleared);
    assert_eq!(form.ds_info().len(), 1);
}

#[test]
fn test_export_every_format_through_sink() {
    let view = load_view();
    let labels = zonemaster_report::labels::EnglishLabels;
    let exporter = Exporter::new(&labels);
    let ctx = view.export_context("en", DisplayZone::Utc);
    let dir = tempfile::tempdir().unwrap();
    let mut sink = FileSink::new(dir.path());

    for format in ExportFormat::ALL {
        let payload = exporter.export(view.entries(), format, &ctx).unwrap();
        let path = sink.save(&payload).unwrap();
        assert!(path.exists(), "{} was not written", path.display());
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 4);
}
