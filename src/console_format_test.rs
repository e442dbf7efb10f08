/// Tests for console formatting module
///
/// Rendering is checked on plain (uncolored) output at a fixed width.

#[cfg(test)]
mod tests {
    use crate::console_format::*;
    use crate::labels::EnglishLabels;
    use crate::report::{Counts, ResultView};
    use crate::severity::Level;
    use crate::types::{Entry, HistoryItem, TestParams, TestRecord, parse_timestamp};
    use std::collections::BTreeMap;

    /// Standard width for tests to ensure reproducible output
    const TEST_CONSOLE_WIDTH: usize = 80;

    fn view() -> ResultView {
        let mut descriptions = BTreeMap::new();
        descriptions.insert("DNSSEC02".to_string(), "DS must match a DNSKEY".to_string());
        ResultView::load(TestRecord {
            id: "f00d".to_string(),
            created_at: parse_timestamp("2024-05-01T08:00:00Z").unwrap(),
            params: TestParams { domain: "example.com".to_string(), ..Default::default() },
            results: vec![
                Entry::new("BASIC", "BASIC01", Level::Info, "parent exists"),
                Entry::new("DNSSEC", "DNSSEC01", Level::Warning, "SHA-1 digest"),
                Entry::new("DNSSEC", "DNSSEC02", Level::Error, "no matching DNSKEY"),
            ],
            testcase_descriptions: descriptions,
        })
    }

    fn render(view: &ResultView) -> String {
        let mut w = TreeWriter::new(Vec::new(), false).with_width(TEST_CONSOLE_WIDTH);
        w.write_result(view, &EnglishLabels).unwrap();
        String::from_utf8(w.into_inner()).unwrap()
    }

    #[test]
    fn test_display_width_ascii() {
        assert_eq!(display_width("hello"), 5);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn test_display_width_unicode() {
        assert_eq!(display_width("▼"), 1);
        assert_eq!(display_width("räksmörgås"), 10);
        assert_eq!(display_width("📦"), 2);
    }

    #[test]
    fn test_truncate_with_padding_needs_padding() {
        let result = truncate_with_padding("hi", 5);
        assert_eq!(result, "hi   ");
    }

    #[test]
    fn test_truncate_with_padding_needs_truncation() {
        let result = truncate_with_padding("hello world", 8);
        assert_eq!(result, "hello...");
        assert_eq!(display_width(&result), 8);
    }

    #[test]
    fn test_truncate_with_padding_wide_chars() {
        let result = truncate_with_padding("test 📦 box and more", 10);
        assert_eq!(display_width(&result), 10);
    }

    #[test]
    fn test_truncate_does_not_pad() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_collapsed_modules_show_only_headers() {
        let out = render(&view());
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("▶ Basic"));
        assert!(lines[0].ends_with(" [Info 1]"));
        assert!(lines[1].starts_with("▶ DNSSEC"));
        assert!(lines[1].ends_with(" [Error 1] [Warning 1]"));
        assert_eq!(display_width(lines[1]), TEST_CONSOLE_WIDTH);
    }

    #[test]
    fn test_expanded_tree_lists_entries() {
        let mut view = view();
        view.expand_all();
        let out = render(&view);

        let dnssec02 = out.lines().position(|l| l.contains("DNSSEC02")).unwrap();
        let dnssec01 = out.lines().position(|l| l.contains("DNSSEC01")).unwrap();
        assert!(dnssec02 < dnssec01, "more severe test case first");
        assert!(out.contains("DS must match a DNSKEY"));
        assert!(out.contains("      ERROR     no matching DNSKEY"));
        assert!(out.lines().all(|l| display_width(l) <= TEST_CONSOLE_WIDTH));
    }

    #[test]
    fn test_collapsed_testcase_hides_entries() {
        let mut view = view();
        view.expand_all();
        view.toggle_testcase("DNSSEC", "DNSSEC02");
        let out = render(&view);

        assert!(out.contains("▶ DNSSEC02"));
        assert!(!out.contains("no matching DNSKEY"));
        assert!(out.contains("SHA-1 digest"));
    }

    #[test]
    fn test_empty_filter_result() {
        let mut view = view();
        view.set_search("nothing matches this");
        assert_eq!(render(&view), "No entries match the current filter.\n");
    }

    #[test]
    fn test_summary_line() {
        let counts = Counts { all: 3, info: 1, notice: 0, warning: 1, error: 1, critical: 0 };
        let mut w = TreeWriter::new(Vec::new(), false);
        w.write_summary(&counts, &EnglishLabels).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(out, "Test cases: 3  Critical 0  Error 1  Warning 1  Notice 0  Info 1\n");
    }

    #[test]
    fn test_colors_wrap_text() {
        let counts = Counts { all: 1, error: 1, ..Default::default() };
        let mut w = TreeWriter::new(Vec::new(), true);
        w.write_summary(&counts, &EnglishLabels).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.contains("\x1b[91mError 1\x1b[0m"));
    }

    #[test]
    fn test_history_lines() {
        let items = vec![HistoryItem {
            id: "abc123".to_string(),
            created_at: "2024-05-01 08:00:00".to_string(),
            overall_result: "warning".to_string(),
            undelegated: true,
        }];
        let mut w = TreeWriter::new(Vec::new(), false);
        w.write_history(&items).unwrap();
        let out = String::from_utf8(w.into_inner()).unwrap();
        assert!(out.starts_with("2024-05-01 08:00:00"));
        assert!(out.contains("WARNING"));
        assert!(out.trim_end().ends_with("abc123  (undelegated)"));
    }
}
