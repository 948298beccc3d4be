//! Note template catalog
//!
//! Templates are plain-text files in a directory, one template per file:
//! the filename (sans extension) is the identity and the file content is
//! the system prompt. The directory is rescanned on every query so edits
//! show up without a restart. When the directory yields nothing, a static
//! fallback list from the configuration takes over.

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// A named reusable system-prompt fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    dir: PathBuf,
}

impl TemplateCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load every `.txt` template from the directory, in filename order.
    ///
    /// Unreadable files are skipped with a warning.
    pub fn load_all(&self) -> Vec<Template> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
            .collect();
        paths.sort();

        let mut templates = Vec::new();
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match std::fs::read_to_string(&path) {
                Ok(content) => templates.push(Template {
                    id: stem.to_string(),
                    name: display_name(stem),
                    system_prompt: content.trim().to_string(),
                }),
                Err(e) => {
                    warn!("Failed to load template {:?}: {}", path, e);
                }
            }
        }

        templates
    }

    /// The fallback list sourced from configuration
    pub fn fallback(&self, config: &Config) -> Vec<Template> {
        config
            .templates
            .iter()
            .map(|entry| Template {
                id: entry.name.to_lowercase().replace(' ', "_"),
                name: entry.name.clone(),
                system_prompt: entry.system_prompt.clone(),
            })
            .collect()
    }

    /// Directory templates, or the config fallback when there are none
    pub fn effective(&self, config: &Config) -> Vec<Template> {
        let templates = self.load_all();
        if templates.is_empty() {
            self.fallback(config)
        } else {
            templates
        }
    }

    /// Linear lookup by display name; `None` is a normal outcome
    pub fn get_by_name(&self, name: &str, config: &Config) -> Option<Template> {
        self.effective(config).into_iter().find(|t| t.name == name)
    }
}

/// "discharge_summary" -> "Discharge Summary"
fn display_name(stem: &str) -> String {
    stem.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_title_cases_underscored_stems() {
        assert_eq!(display_name("discharge_summary"), "Discharge Summary");
        assert_eq!(display_name("SOAP_note"), "Soap Note");
        assert_eq!(display_name("progress"), "Progress");
    }
}
