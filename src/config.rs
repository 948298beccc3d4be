use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub stt: SttConfig,

    /// Fallback templates used when the template directory yields nothing.
    pub templates: Vec<TemplateEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of the OpenAI-compatible completion server (e.g. llama.cpp)
    pub endpoint: String,

    /// Bearer token; empty means the endpoint is unauthenticated
    pub api_key: String,

    pub model: String,

    /// System message sent with every completion request
    pub system_prompt: String,

    /// Maximum tokens to generate (-1 = unlimited)
    pub max_tokens: i64,

    pub temperature: f64,
    pub top_k: i64,
    pub top_p: f64,
    pub min_p: f64,

    /// Additional request-body parameters (e.g. {"repeat_penalty": 1.1}).
    /// Accepts a JSON object, or a string containing one.
    #[serde(deserialize_with = "de_extra_api_params")]
    pub extra_api_params: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Base URL of the OpenAI-compatible ASR server
    pub endpoint: String,

    /// Bearer token; empty means the endpoint is unauthenticated
    pub api_key: String,

    pub model: String,
}

/// A fallback template entry sourced from the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: String,
    pub system_prompt: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080".to_string(),
            api_key: String::new(),
            model: "google/medgemma-27b-text-it".to_string(),
            system_prompt: String::new(),
            max_tokens: -1,
            temperature: 0.8,
            top_k: 40,
            top_p: 0.95,
            min_p: 0.05,
            extra_api_params: Map::new(),
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000".to_string(),
            api_key: String::new(),
            model: "google/medasr".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing file is not an error: every section falls back to its
    /// defaults so a fresh checkout runs without any setup.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid config in {}", path))
    }

    /// Save the full configuration document to `path`.
    ///
    /// Writes a temp file in the same directory and renames it over the
    /// destination so a crash mid-write cannot leave a truncated file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory {:?}", parent))?;
            }
        }

        let contents = serde_yaml::to_string(self).context("Failed to serialize config")?;

        let tmp_path = path.with_extension("yaml.tmp");
        std::fs::write(&tmp_path, &contents)
            .with_context(|| format!("Failed to write temp config {:?}", tmp_path))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to rename {:?} to {:?}", tmp_path, path))?;

        Ok(())
    }
}

/// Validate the extra-parameters field.
///
/// The settings UI submits this as free text, so it arrives either as a
/// JSON object or as a string encoding one. Anything else is rejected with
/// a message the UI can show directly.
pub fn normalize_extra_api_params(value: &Value) -> Result<Map<String, Value>, String> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Map::new());
            }
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Err(
                    "Extra API parameters must be a JSON object (e.g., {\"key\": \"value\"})"
                        .to_string(),
                ),
                Err(e) => Err(format!("Invalid JSON in extra API parameters: {}", e)),
            }
        }
        _ => Err(
            "Extra API parameters must be a JSON object (e.g., {\"key\": \"value\"})".to_string(),
        ),
    }
}

fn de_extra_api_params<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    normalize_extra_api_params(&value).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8501);
        assert_eq!(cfg.llm.endpoint, "http://localhost:8080");
        assert_eq!(cfg.llm.max_tokens, -1);
        assert_eq!(cfg.llm.top_k, 40);
        assert_eq!(cfg.stt.endpoint, "http://localhost:8000");
        assert_eq!(cfg.stt.model, "google/medasr");
        assert!(cfg.templates.is_empty());
    }

    #[test]
    fn extra_params_accepts_object() {
        let map = normalize_extra_api_params(&json!({"repeat_penalty": 1.1})).unwrap();
        assert_eq!(map.get("repeat_penalty"), Some(&json!(1.1)));
    }

    #[test]
    fn extra_params_accepts_string_encoded_object() {
        let map = normalize_extra_api_params(&json!("{\"seed\": 42}")).unwrap();
        assert_eq!(map.get("seed"), Some(&json!(42)));
    }

    #[test]
    fn extra_params_empty_string_is_empty_map() {
        assert!(normalize_extra_api_params(&json!("  ")).unwrap().is_empty());
        assert!(normalize_extra_api_params(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn extra_params_rejects_non_objects() {
        assert!(normalize_extra_api_params(&json!([1, 2])).is_err());
        assert!(normalize_extra_api_params(&json!(3)).is_err());
        assert!(normalize_extra_api_params(&json!("[1, 2]")).is_err());
        assert!(normalize_extra_api_params(&json!("{not valid")).is_err());
    }
}
