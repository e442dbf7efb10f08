/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - The module / test case / entry tree of a result
/// - Level summaries and per-module breakdowns
/// - Color terminal output
/// - Text truncation and padding
///
/// It accepts a `ResultView` from the report module and renders it.
///
/// ## Output Flexibility
///
/// `TreeWriter` writes to any `std::io::Write` destination, with or without
/// colors, so the same code prints to stdout and into test buffers.
use crate::labels::Labels;
use crate::report::{Counts, LevelCount, ModuleGroup, ResultView, TestCaseGroup};
use crate::severity::Level;
use crate::types::{Entry, HistoryItem};
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const EXPANDED: &str = "▼";
const COLLAPSED: &str = "▶";

/// Width of the level column in entry lines
const LEVEL_WIDTH: usize = 9;

/// Terminal color for a severity level
pub fn level_color(level: Level) -> Color {
    match level {
        Level::Critical => term::color::BRIGHT_MAGENTA,
        Level::Error => term::color::BRIGHT_RED,
        Level::Warning => term::color::BRIGHT_YELLOW,
        Level::Notice => term::color::BRIGHT_CYAN,
        Level::Info => term::color::GREEN,
    }
}

/// ANSI foreground escape for a `term` color
fn ansi_fg(color: Color) -> String {
    // Use RGB for bright yellow (better Windows Terminal support)
    if color == term::color::BRIGHT_YELLOW {
        return "\x1b[38;2;255;255;102m".to_string();
    }
    let code = if color < 8 { 30 + color } else { 90 + (color - 8) };
    format!("\x1b[{}m", code)
}

/// Writer for result trees - configurable for color/plain text
pub struct TreeWriter<W: Write> {
    writer: W,
    use_colors: bool,
    width: usize,
}

impl<W: Write> TreeWriter<W> {
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors, width: get_console_width() }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        if self.use_colors {
            write!(self.writer, "{}{}\x1b[0m", ansi_fg(color), text)
        } else {
            write!(self.writer, "{}", text)
        }
    }

    /// Header: title and creation time
    pub fn write_header(&mut self, title: &str, created: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", title)?;
        writeln!(self.writer, "{}", created)?;
        writeln!(self.writer, "{}", "─".repeat(self.width.min(80)))
    }

    /// One line of test-case counts: "Test cases: 12  critical 0  error 1 ..."
    pub fn write_summary(&mut self, counts: &Counts, labels: &dyn Labels) -> io::Result<()> {
        write!(self.writer, "Test cases: {}", counts.all)?;
        for level in Level::descending() {
            write!(self.writer, "  ")?;
            let text = format!("{} {}", labels.level_name(level), counts.get(level));
            if counts.get(level) > 0 {
                self.write_colored(&text, level_color(level))?;
            } else {
                write!(self.writer, "{}", text)?;
            }
        }
        writeln!(self.writer)
    }

    /// The whole tree of the view's current (filtered) aggregation
    pub fn write_result(&mut self, view: &ResultView, labels: &dyn Labels) -> io::Result<()> {
        let tree = view.tree();
        if tree.is_empty() {
            return writeln!(self.writer, "No entries match the current filter.");
        }

        for module in &tree.modules {
            let collapsed = view.collapse().is_module_collapsed(&module.name);
            self.write_module_line(module, collapsed, view.module_breakdown(&module.name), labels)?;
            if collapsed {
                continue;
            }

            for testcase in &module.testcases {
                let tc_collapsed = view.collapse().is_testcase_collapsed(&module.name, &testcase.id);
                let description = view.record().testcase_description(&testcase.id);
                self.write_testcase_line(testcase, tc_collapsed, description, labels)?;
                if !tc_collapsed {
                    for entry in &testcase.entries {
                        self.write_entry_line(entry, labels)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Module name on the left, level breakdown on the right
    fn write_module_line(
        &mut self,
        module: &ModuleGroup,
        collapsed: bool,
        breakdown: &[LevelCount],
        labels: &dyn Labels,
    ) -> io::Result<()> {
        let marker = if collapsed { COLLAPSED } else { EXPANDED };
        let name = format!("{} {}", marker, labels.module_name(&module.name));

        let badges: Vec<(String, Level)> =
            breakdown.iter().map(|lc| (format!("[{} {}]", labels.level_name(lc.level), lc.count), lc.level)).collect();
        let badges_width: usize = badges.iter().map(|(b, _)| display_width(b) + 1).sum();

        let name_width = self.width.saturating_sub(badges_width).max(display_width(&name).min(20));
        self.write_colored(&truncate_with_padding(&name, name_width), level_color(module.level()))?;
        for (badge, level) in &badges {
            write!(self.writer, " ")?;
            self.write_colored(badge, level_color(*level))?;
        }
        writeln!(self.writer)
    }

    fn write_testcase_line(
        &mut self,
        testcase: &TestCaseGroup,
        collapsed: bool,
        description: Option<&str>,
        labels: &dyn Labels,
    ) -> io::Result<()> {
        let marker = if collapsed { COLLAPSED } else { EXPANDED };
        let level = labels.level_name(testcase.level).to_uppercase();
        let text = match description {
            Some(desc) => format!("  {} {}  {}", marker, testcase.id, desc),
            None => format!("  {} {}", marker, testcase.id),
        };

        let text_width = self.width.saturating_sub(LEVEL_WIDTH + 1).max(10);
        write!(self.writer, "{} ", truncate_with_padding(&text, text_width))?;
        self.write_colored(&level, level_color(testcase.level))?;
        writeln!(self.writer)
    }

    fn write_entry_line(&mut self, entry: &Entry, labels: &dyn Labels) -> io::Result<()> {
        let level = truncate_with_padding(&labels.level_name(entry.level).to_uppercase(), LEVEL_WIDTH);
        write!(self.writer, "      ")?;
        self.write_colored(&level, level_color(entry.level))?;

        let message_width = self.width.saturating_sub(6 + LEVEL_WIDTH + 1).max(10);
        writeln!(self.writer, " {}", truncate(entry.message.trim(), message_width))
    }

    /// Table of earlier tests: date, result, id
    pub fn write_history(&mut self, items: &[HistoryItem]) -> io::Result<()> {
        if items.is_empty() {
            return writeln!(self.writer, "No previous tests.");
        }

        for item in items {
            let result = item.overall_result.to_uppercase();
            write!(self.writer, "{}  ", truncate_with_padding(&item.created_at, 26))?;
            match result.parse::<Level>() {
                Ok(level) => self.write_colored(&truncate_with_padding(&result, LEVEL_WIDTH), level_color(level))?,
                Err(_) => write!(self.writer, "{}", truncate_with_padding(&result, LEVEL_WIDTH))?,
            }
            let undelegated = if item.undelegated { "  (undelegated)" } else { "" };
            writeln!(self.writer, "  {}{}", item.id, undelegated)?;
        }
        Ok(())
    }
}

//
// Console width
//

/// Get terminal width or default to 120
fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        120 // Default width
    }
}

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Fix the console width (from --console-width); only the first call counts
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width);
}

pub fn get_console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(get_terminal_width)
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w <= width {
        return format!("{}{}", s, " ".repeat(width - display_w));
    }

    let mut result = String::new();
    let mut current_width = 0;

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };

    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }

    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }

    if current_width < width {
        result.push_str(&" ".repeat(width - current_width));
    }

    result
}

/// Truncate to at most `width` columns without padding
pub fn truncate(s: &str, width: usize) -> String {
    if display_width(s) <= width { s.to_string() } else { truncate_with_padding(s, width).trim_end().to_string() }
}

#[cfg(test)]
#[path = "console_format_test.rs"]
mod console_format_test;
