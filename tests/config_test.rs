//! Configuration loading tests

use std::io::Write;
use tempfile::NamedTempFile;

use trendigest::config::Config;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[window]
days = 14

[scoring]
change_threshold = 0.5
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.window.days, 14);
    assert_eq!(config.scoring.change_threshold, 0.5);
    // Untouched sections keep their defaults
    assert_eq!(config.extraction.timeout_ms, 2000);
    assert!(!config.keywords.is_empty());
    assert!(!config.aliases.is_empty());
}

#[test]
fn test_explicit_tables_replace_stock_ones() {
    let file = write_config(
        r#"
[aliases]
"lag" = "slow loading"

[keywords]
"Slow loading" = ["slow", "lag"]
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.aliases.len(), 1);
    assert_eq!(config.keywords.len(), 1);
    assert_eq!(config.aliases["lag"], "slow loading");
}

#[test]
fn test_explicitly_empty_table_disables_stock_one() {
    let file = write_config(
        r#"
[aliases]
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.aliases.is_empty());
    assert!(!config.keywords.is_empty());
}

#[test]
fn test_commented_out_table_still_gets_stock_one() {
    let file = write_config(
        r#"
# [aliases]
# "lag" = "slow loading"

[window]
days = 7
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.window.days, 7);
    assert!(!config.aliases.is_empty());
    assert!(!config.keywords.is_empty());
}

#[test]
fn test_invalid_values_rejected() {
    let file = write_config(
        r#"
[window]
days = 0
"#,
    );
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_malformed_toml_rejected() {
    let file = write_config("[window\ndays = ");
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn test_serialization_round_trip() {
    let config = Config::builtin();
    let toml_text = toml::to_string(&config).unwrap();
    let back: Config = toml::from_str(&toml_text).unwrap();
    assert_eq!(back.window.days, config.window.days);
    assert_eq!(back.keywords.len(), config.keywords.len());
    assert_eq!(back.app.id, config.app.id);
}
