// Integration tests for configuration load/save
//
// Loading tolerates a missing file (all defaults); saving rewrites the
// whole YAML document atomically via a temp file + rename.

use anyhow::Result;
use med_scribe::{Config, TemplateEntry};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_load_missing_file_yields_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("absent.yaml");

    let config = Config::load(path.to_str().unwrap())?;

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 8501);
    assert_eq!(config.llm.endpoint, "http://localhost:8080");
    assert_eq!(config.llm.temperature, 0.8);
    assert_eq!(config.stt.model, "google/medasr");
    assert!(config.llm.extra_api_params.is_empty());

    Ok(())
}

#[test]
fn test_save_then_load_round_trips() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("med-scribe.yaml");

    let mut config = Config::default();
    config.server.port = 9000;
    config.llm.model = "local/test-model".to_string();
    config.llm.api_key = "secret-token".to_string();
    config.llm.max_tokens = 2048;
    config
        .llm
        .extra_api_params
        .insert("repeat_penalty".to_string(), json!(1.1));
    config.stt.endpoint = "http://stt.local:8000".to_string();
    config.templates.push(TemplateEntry {
        name: "Discharge Summary".to_string(),
        system_prompt: "Write a discharge summary.".to_string(),
    });

    config.save(&path)?;
    assert!(path.exists(), "Config file should exist after save");

    let loaded = Config::load(path.to_str().unwrap())?;
    assert_eq!(loaded.server.port, 9000);
    assert_eq!(loaded.llm.model, "local/test-model");
    assert_eq!(loaded.llm.api_key, "secret-token");
    assert_eq!(loaded.llm.max_tokens, 2048);
    assert_eq!(
        loaded.llm.extra_api_params.get("repeat_penalty"),
        Some(&json!(1.1))
    );
    assert_eq!(loaded.stt.endpoint, "http://stt.local:8000");
    assert_eq!(loaded.templates.len(), 1);
    assert_eq!(loaded.templates[0].name, "Discharge Summary");

    Ok(())
}

#[test]
fn test_save_leaves_no_temp_file_behind() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("med-scribe.yaml");

    Config::default().save(&path)?;

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "No temp file should remain: {:?}", leftovers);

    Ok(())
}

#[test]
fn test_save_overwrites_previous_document_wholesale() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("med-scribe.yaml");

    let mut config = Config::default();
    config.templates.push(TemplateEntry {
        name: "Old".to_string(),
        system_prompt: "old".to_string(),
    });
    config.save(&path)?;

    // Second save drops the old template list entirely
    Config::default().save(&path)?;

    let loaded = Config::load(path.to_str().unwrap())?;
    assert!(loaded.templates.is_empty());

    Ok(())
}
