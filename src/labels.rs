/// Display labels for modules, severity levels and report headings
///
/// Translation catalogs live outside this crate; `Labels` is the seam they
/// plug into. `EnglishLabels` is the built-in fallback catalog.
use crate::severity::Level;
use std::borrow::Cow;

/// Headings used in exported reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Module,
    Level,
    Message,
}

pub trait Labels {
    /// Display name for a module key; unknown modules pass through unchanged
    fn module_name<'a>(&self, module: &'a str) -> Cow<'a, str>;

    /// Display label for a severity level
    fn level_name(&self, level: Level) -> &str;

    /// Column heading
    fn heading(&self, heading: Heading) -> &str;
}

/// Built-in English catalog
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishLabels;

const MODULE_NAMES: &[(&str, &str)] = &[
    ("system", "System"),
    ("basic", "Basic"),
    ("address", "Address"),
    ("connectivity", "Connectivity"),
    ("consistency", "Consistency"),
    ("delegation", "Delegation"),
    ("dnssec", "DNSSEC"),
    ("nameserver", "Nameserver"),
    ("syntax", "Syntax"),
    ("zone", "Zone"),
];

impl Labels for EnglishLabels {
    fn module_name<'a>(&self, module: &'a str) -> Cow<'a, str> {
        let key = module.to_lowercase();
        MODULE_NAMES
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, name)| Cow::Borrowed(*name))
            .unwrap_or(Cow::Borrowed(module))
    }

    fn level_name(&self, level: Level) -> &str {
        match level {
            Level::Info => "Info",
            Level::Notice => "Notice",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Critical => "Critical",
        }
    }

    fn heading(&self, heading: Heading) -> &str {
        match heading {
            Heading::Module => "Module",
            Heading::Level => "Level",
            Heading::Message => "Message",
        }
    }
}

/// UI languages the viewer ships with: (code, native name)
pub const LANGUAGES: &[(&str, &str)] = &[
    ("da", "Dansk"),
    ("en", "English"),
    ("fi", "Suomi"),
    ("fr", "Français"),
    ("nb", "Norsk (bokmål)"),
    ("sv", "Svenska"),
];

pub const DEFAULT_LANGUAGE: &str = "en";

/// Native name of a language code, if known
pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES.iter().find(|(c, _)| *c == code).map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name_lookup_is_case_insensitive() {
        let labels = EnglishLabels;
        assert_eq!(labels.module_name("DNSSEC"), "DNSSEC");
        assert_eq!(labels.module_name("NAMESERVER"), "Nameserver");
        assert_eq!(labels.module_name("basic"), "Basic");
    }

    #[test]
    fn test_unknown_module_passes_through() {
        assert_eq!(EnglishLabels.module_name("Experimental"), "Experimental");
    }

    #[test]
    fn test_level_names() {
        assert_eq!(EnglishLabels.level_name(Level::Critical), "Critical");
        assert_eq!(EnglishLabels.heading(Heading::Message), "Message");
    }

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("sv"), Some("Svenska"));
        assert_eq!(language_name("de"), None);
    }
}
