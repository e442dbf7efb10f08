use super::*;
use crate::cli::{Command, ShowArgs};

fn args() -> CliArgs {
    CliArgs {
        config: None,
        backend: None,
        language: None,
        utc: false,
        strict_levels: false,
        legacy_skip_first_row: false,
        console_width: None,
        command: Command::Show(ShowArgs::default()),
    }
}

fn langs(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

#[test]
fn test_defaults_without_file() {
    let settings = resolve_settings(&args(), FileConfig::default());
    assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
    assert_eq!(settings.language, "en");
    assert_eq!(settings.enabled_languages.len(), LANGUAGES.len());
    assert_eq!(settings.output_dir, PathBuf::from("."));
    assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    assert_eq!(settings.wait_timeout, Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS));
    assert_eq!(settings.zone, DisplayZone::Local);
    assert!(!settings.legacy_skip_first_row);
    assert!(settings.profiles.is_empty());
}

#[test]
fn test_file_values_apply() {
    let file: FileConfig = toml::from_str(
        r#"
        backend_url = "https://zonemaster.example/api"
        language = "sv"
        profiles = ["default", "test_profile"]
        output_dir = "/tmp/reports"
        timeout_secs = 5
        wait_timeout_secs = 120
        strict_levels = false
        utc = true
        "#,
    )
    .unwrap();

    let settings = resolve_settings(&args(), file);
    assert_eq!(settings.backend_url, "https://zonemaster.example/api");
    assert_eq!(settings.language, "sv");
    assert_eq!(settings.profiles, langs(&["default", "test_profile"]));
    assert_eq!(settings.output_dir, PathBuf::from("/tmp/reports"));
    assert_eq!(settings.timeout, Duration::from_secs(5));
    assert_eq!(settings.wait_timeout, Duration::from_secs(120));
    assert!(!settings.strict_levels);
    assert_eq!(settings.zone, DisplayZone::Utc);
}

#[test]
fn test_cli_overrides_file() {
    let file = FileConfig {
        backend_url: Some("https://file.example/".to_string()),
        language: Some("fr".to_string()),
        strict_levels: Some(false),
        ..Default::default()
    };
    let mut cli = args();
    cli.backend = Some("http://cli.example/".to_string());
    cli.language = Some("FI".to_string());
    cli.strict_levels = true;
    cli.legacy_skip_first_row = true;

    let settings = resolve_settings(&cli, file);
    assert_eq!(settings.backend_url, "http://cli.example/");
    assert_eq!(settings.language, "fi");
    assert!(settings.strict_levels);
    assert!(settings.legacy_skip_first_row);
}

#[test]
fn test_unsupported_language_falls_back_to_default() {
    let mut cli = args();
    cli.language = Some("de".to_string());
    assert_eq!(resolve_settings(&cli, FileConfig::default()).language, "en");
}

#[test]
fn test_disabled_language_falls_back_to_configured_default() {
    let file = FileConfig {
        enabled_languages: Some(langs(&["sv", "nb", "xx"])),
        default_language: Some("nb".to_string()),
        language: Some("da".to_string()),
        ..Default::default()
    };
    let settings = resolve_settings(&args(), file);
    assert_eq!(settings.enabled_languages, langs(&["sv", "nb"]));
    assert_eq!(settings.language, "nb");
}

#[test]
fn test_default_language_must_be_enabled() {
    let enabled = langs(&["fr", "sv"]);
    assert_eq!(resolve_default_language(Some("da"), &enabled), "fr");
    assert_eq!(resolve_default_language(None, &langs(&["en", "sv"])), "en");
}

#[test]
fn test_resolve_language() {
    let enabled = langs(&["en", "fr"]);
    assert_eq!(resolve_language(Some("fr"), "en", &enabled), "fr");
    assert_eq!(resolve_language(Some("sv"), "en", &enabled), "en");
    assert_eq!(resolve_language(None, "fr", &enabled), "fr");
}

#[test]
fn test_empty_enabled_list_enables_all() {
    assert_eq!(resolve_enabled_languages(Some(Vec::new())).len(), LANGUAGES.len());
}

#[test]
fn test_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "language = \"da\"\nlegacy_skip_first_row = true\n").unwrap();

    let file = load_config_file(&path).unwrap();
    assert_eq!(file.language.as_deref(), Some("da"));
    assert_eq!(file.legacy_skip_first_row, Some(true));
}

#[test]
fn test_load_config_file_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "langauge = \"da\"\n").unwrap();

    assert!(matches!(load_config_file(&path), Err(ReportError::Config { .. })));
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let mut cli = args();
    cli.config = Some(PathBuf::from("/nonexistent/zonemaster-report.toml"));
    assert!(matches!(build_settings(&cli), Err(ReportError::Read { .. })));
}

#[test]
fn test_locate_config_precedence() {
    let cli = PathBuf::from("cli.toml");
    assert_eq!(locate_config(Some(cli.as_path()), Some("env.toml".to_string())), Some((cli.clone(), true)));
    assert_eq!(locate_config(None, Some("env.toml".to_string())), Some((PathBuf::from("env.toml"), true)));
    if let Some((path, explicit)) = locate_config(None, Some(String::new())) {
        assert!(path.ends_with("zonemaster-report/config.toml"));
        assert!(!explicit);
    }
}
