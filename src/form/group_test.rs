use super::*;
use crate::form::rows::{DsRecordRow, NameserverRow};

fn ns_group(names: &[&str]) -> RepeatingGroup<NameserverRow> {
    let mut group = RepeatingGroup::new();
    group.replace_with(names.iter().map(|n| NameserverRow::new(n, "")).collect());
    group
}

fn names(group: &RepeatingGroup<NameserverRow>) -> Vec<String> {
    group.values().map(|r| r.ns.clone()).collect()
}

#[test]
fn test_new_group_has_one_watched_blank_row() {
    let group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    assert_eq!(group.len(), 1);
    let row = group.row(0).unwrap();
    assert!(row.is_pristine());
    assert!(row.is_watched());
    assert!(row.value.is_blank());
}

#[test]
fn test_first_edit_appends_blank_row_once() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();

    group.edit_row(0, |r| r.ns = "n".to_string()).unwrap();
    assert_eq!(group.len(), 2);
    assert!(!group.row(0).unwrap().is_watched());
    assert!(group.row(1).unwrap().is_watched());

    group.edit_row(0, |r| r.ns = "ns1".to_string()).unwrap();
    assert_eq!(group.len(), 2);
}

#[test]
fn test_edit_back_to_blank_does_not_grow() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    group.edit_row(0, |r| r.ns.clear()).unwrap();

    assert_eq!(group.len(), 1);
    let row = group.row(0).unwrap();
    assert!(row.is_pristine());
    assert!(!row.is_touched());
    assert!(row.is_watched());
}

#[test]
fn test_prefilled_row_is_dirty_and_unwatched() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    group.delete_row(RowTarget::All).unwrap();
    group.add_row(Some(NameserverRow::new("ns1.example.com", "")));

    let row = group.row(1).unwrap();
    assert!(!row.is_pristine());
    assert!(!row.is_watched());
}

#[test]
fn test_supplied_blank_row_stays_dirty() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    group.add_row(Some(NameserverRow::default()));

    let row = group.row(1).unwrap();
    assert!(!row.is_pristine());
    assert!(!row.is_watched());
    assert!(row.is_valid());
}

#[test]
fn test_edit_validates_row() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    group.edit_row(0, |r| r.ip = "192.0.2.1".to_string()).unwrap();
    assert_eq!(group.row(0).unwrap().error("ns"), Some(&FieldError::Required));

    group.edit_row(0, |r| r.ns = "ns1.example.com".to_string()).unwrap();
    assert!(group.row(0).unwrap().is_valid());
}

#[test]
fn test_delete_only_row_resets_it() {
    let mut group: RepeatingGroup<DsRecordRow> = RepeatingGroup::new();
    group.rows.clear();
    group.add_row(Some(DsRecordRow::new("1", "8", "2", "AB")));

    let outcome = group.delete_row(RowTarget::Index(0)).unwrap();
    assert_eq!(outcome, DeleteOutcome::Reset { index: 0 });
    assert_eq!(group.len(), 1);
    assert!(group.row(0).unwrap().value.is_blank());
    assert!(group.row(0).unwrap().is_watched());
}

#[test]
fn test_delete_last_row_after_dirty_row_resets() {
    let mut group = ns_group(&["a", "b"]);
    assert_eq!(group.len(), 3);

    let outcome = group.delete_row(RowTarget::Index(2)).unwrap();
    assert_eq!(outcome, DeleteOutcome::Reset { index: 2 });
    assert_eq!(group.len(), 3);
}

#[test]
fn test_delete_middle_row_focuses_next() {
    let mut group = ns_group(&["a", "b", "c"]);

    let outcome = group.delete_row(RowTarget::Index(1)).unwrap();
    assert_eq!(outcome, DeleteOutcome::Removed { focus: 1 });
    assert_eq!(names(&group), vec!["a", "c", ""]);
}

#[test]
fn test_delete_last_row_after_pristine_row_focuses_previous() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    group.add_row(None);
    assert_eq!(group.len(), 2);

    let outcome = group.delete_row(RowTarget::Index(1)).unwrap();
    assert_eq!(outcome, DeleteOutcome::Removed { focus: 0 });
    assert_eq!(group.len(), 1);
}

#[test]
fn test_delete_rearms_new_last_row() {
    let mut group = ns_group(&["a", "b"]);
    group.edit_row(1, |r| r.ns.clear()).unwrap();
    assert!(group.row(1).unwrap().is_pristine());
    assert!(!group.row(1).unwrap().is_watched());

    let outcome = group.delete_row(RowTarget::Index(2)).unwrap();
    assert_eq!(outcome, DeleteOutcome::Removed { focus: 1 });
    let last = group.rows().last().unwrap();
    assert!(last.is_pristine());
    assert!(last.is_watched());
}

#[test]
fn test_delete_all_leaves_one_blank_row() {
    let mut group = ns_group(&["a", "b", "c"]);
    assert_eq!(group.delete_row(RowTarget::All).unwrap(), DeleteOutcome::Cleared);
    assert_eq!(group.len(), 1);
    assert!(group.row(0).unwrap().is_watched());
}

#[test]
fn test_length_never_drops_below_one() {
    let mut group = ns_group(&["a", "b"]);
    for _ in 0..5 {
        group.delete_row(RowTarget::Index(0)).unwrap();
        assert!(!group.is_empty());
    }
}

#[test]
fn test_out_of_range() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    assert!(matches!(
        group.delete_row(RowTarget::Index(4)),
        Err(FormError::RowOutOfRange { index: 4, len: 1 })
    ));
    assert!(group.edit_row(4, |_| {}).is_err());
}

#[test]
fn test_disabled_group_rejects_changes() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    group.set_disabled(true);
    assert!(matches!(group.edit_row(0, |r| r.ns = "x".to_string()), Err(FormError::Disabled)));
    assert!(matches!(group.delete_row(RowTarget::All), Err(FormError::Disabled)));
}

#[test]
fn test_replace_with_appends_trailing_blank() {
    let mut group: RepeatingGroup<NameserverRow> = RepeatingGroup::new();
    let loaded = group.replace_with(vec![NameserverRow::new("a", "192.0.2.1"), NameserverRow::new("b", "")]);
    assert_eq!(loaded, 2);
    assert_eq!(names(&group), vec!["a", "b", ""]);
    assert!(group.rows().last().unwrap().is_watched());
    assert!(!group.row(0).unwrap().is_watched());
}

#[test]
fn test_set_error_by_field() {
    let mut group: RepeatingGroup<DsRecordRow> = RepeatingGroup::new();
    group.set_error(0, Some("digest"), FieldError::Server("bad digest".to_string())).unwrap();
    assert_eq!(group.row(0).unwrap().error("digest"), Some(&FieldError::Server("bad digest".to_string())));

    group.set_error(0, None, FieldError::Server("row".to_string())).unwrap();
    assert!(group.row(0).unwrap().error(ROW_ERROR).is_some());

    assert!(matches!(
        group.set_error(0, Some("nope"), FieldError::Required),
        Err(FormError::UnknownField(_))
    ));
}
