//! Tests for configuration module

use super::*;
use crate::error::{Error, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

fn with_env_var<F, T>(key: &str, value: &str, f: F) -> T
where
    F: FnOnce() -> T,
{
    std::env::set_var(key, value);
    let result = f();
    std::env::remove_var(key);
    result
}

#[test]
fn test_defaults() {
    let config = ExtractorConfig::default();
    assert_eq!(config.annotation_key, "xpath");
    assert_eq!(config.id_policy, IdPolicy::NameContainsId);
    assert!(!config.strict_html);
    assert_eq!(config.max_document_bytes, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        annotation_key = "css"
        id_policy = "annotated"
        strict_html = true
        max_document_bytes = 4096
    "#;

    let config = ExtractorConfig::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(config.annotation_key, "css");
    assert_eq!(config.id_policy, IdPolicy::Annotated);
    assert!(config.strict_html);
    assert_eq!(config.max_document_bytes, Some(4096));
}

#[test]
fn test_from_toml_str_minimal() {
    let config = ExtractorConfig::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(config, ExtractorConfig::default());
}

#[test]
fn test_from_toml_str_invalid_syntax() {
    let result = ExtractorConfig::from_toml_str("annotation_key = ");
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse TOML"));
}

#[test]
fn test_from_toml_str_unknown_policy() {
    let result = ExtractorConfig::from_toml_str(r#"id_policy = "sometimes""#);
    assert!(result.is_err());
}

#[test]
fn test_validation_rejects_bad_key() {
    let config = ExtractorConfig::with_key("");
    assert!(config.validate().is_err());

    let config = ExtractorConfig::with_key("x path");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Invalid annotation_key"));
}

#[test]
fn test_validation_rejects_zero_size_limit() {
    let result = ExtractorConfig::builder().max_document_bytes(0).build();
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("max_document_bytes must be greater than 0"));
}

#[test]
fn test_builder() {
    let config = ExtractorConfig::builder()
        .annotation_key("scrape")
        .id_policy(IdPolicy::Disabled)
        .strict_html(true)
        .max_document_bytes(1024)
        .build()
        .unwrap();
    assert_eq!(config.annotation_key, "scrape");
    assert_eq!(config.id_policy, IdPolicy::Disabled);
    assert!(config.strict_html);
    assert_eq!(config.max_document_bytes, Some(1024));
}

#[test]
fn test_from_file() {
    let file = create_temp_config_file(
        r#"
        annotation_key = "selector"
        id_policy = "name_or_annotated"
        "#,
    )
    .unwrap();

    let config = ExtractorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.annotation_key, "selector");
    assert_eq!(config.id_policy, IdPolicy::NameOrAnnotated);
}

#[test]
fn test_from_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExtractorConfig::from_file(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.annotation_key, "xpath");
    assert_eq!(config.id_policy, IdPolicy::NameContainsId);
}

#[test]
fn test_env_overrides_file() {
    let file = create_temp_config_file("max_document_bytes = 100\n").unwrap();
    let config = with_env_var("HTMLSTRUCT_MAX_DOCUMENT_BYTES", "2048", || {
        ExtractorConfig::from_file(file.path())
    })
    .unwrap();
    assert_eq!(config.max_document_bytes, Some(2048));
}

#[test]
fn test_unreadable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ExtractorConfig::from_file(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err:?}");
}
