use super::{Session, SessionUpdate};
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

const SESSION_FILE_PREFIX: &str = "s_";
const SESSION_FILE_SUFFIX: &str = ".json";

/// File-per-session store.
///
/// The directory is the index: listing scans for `s_<id>.json` files, so
/// there is no shared document to lock or corrupt. Writers to different
/// sessions never touch the same file; writers to the same id race with
/// last-write-wins semantics, accepted for the target deployment.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", SESSION_FILE_PREFIX, id, SESSION_FILE_SUFFIX))
    }

    /// Create a new session and persist it immediately
    pub async fn create(&self) -> Result<Session> {
        let session = Session::new();
        self.write(&session).await?;
        Ok(session)
    }

    /// All persisted sessions, newest `updated_at` first.
    ///
    /// Unreadable or corrupt records are skipped, never fatal.
    pub async fn list(&self) -> Result<Vec<Session>> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create session directory {:?}", self.dir))?;

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to read session directory {:?}", self.dir))?;

        let mut sessions = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some(id) = name
                .strip_prefix(SESSION_FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(SESSION_FILE_SUFFIX))
            else {
                continue;
            };

            if let Some(session) = self.get(id).await {
                sessions.push(session);
            }
        }

        sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(sessions)
    }

    /// Fetch a session by id.
    ///
    /// A missing, unreadable, or corrupt record is treated as absent; the
    /// caller decides the fallback (typically auto-create).
    pub async fn get(&self, id: &str) -> Option<Session> {
        let path = self.session_path(id);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read session {}: {}", id, e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&contents) {
            Ok(mut session) => {
                session.id = id.to_string();
                Some(session)
            }
            Err(e) => {
                warn!("Skipping corrupt session record {}: {}", id, e);
                None
            }
        }
    }

    /// Merge `patch` into an existing session and persist it.
    ///
    /// Refreshes `updated_at`. Silently a no-op when the id does not exist.
    pub async fn update(&self, id: &str, patch: &SessionUpdate) -> Result<()> {
        let Some(mut session) = self.get(id).await else {
            return Ok(());
        };

        patch.apply(&mut session);
        session.updated_at = Utc::now();
        self.write(&session).await
    }

    /// Remove a session record. Idempotent: a missing id is not an error.
    pub async fn delete(&self, id: &str) -> Result<()> {
        match tokio::fs::remove_file(self.session_path(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete session {}", id)),
        }
    }

    /// Full rewrite of the session's JSON document
    async fn write(&self, session: &Session) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create session directory {:?}", self.dir))?;

        let contents =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;

        tokio::fs::write(self.session_path(&session.id), contents)
            .await
            .with_context(|| format!("Failed to write session {}", session.id))
    }
}
