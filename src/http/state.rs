use crate::asr::TranscriptionClient;
use crate::config::Config;
use crate::llm::CompletionClient;
use crate::session::SessionStore;
use crate::templates::TemplateCatalog;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Process-wide settings; read-mostly, rewritten only by settings save
    pub config: Arc<RwLock<Config>>,

    /// Concrete file the settings-save action writes to
    pub config_path: PathBuf,

    pub sessions: SessionStore,
    pub templates: TemplateCatalog,
    pub transcription: TranscriptionClient,
    pub completion: CompletionClient,
}

impl AppState {
    pub fn new(
        config: Config,
        config_path: impl Into<PathBuf>,
        sessions_dir: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path: config_path.into(),
            sessions: SessionStore::new(sessions_dir),
            templates: TemplateCatalog::new(templates_dir),
            transcription: TranscriptionClient::new()?,
            completion: CompletionClient::new()?,
        })
    }
}
