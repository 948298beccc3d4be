use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One clinical encounter's working state.
///
/// Text fields are grouped by mode (scribe / edit / synthesize) and all
/// default to empty. The id is also encoded in the filename
/// (`s_<id>.json`); the filename wins when the store loads a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: String,

    /// Records written before this field existed deserialize with "now"
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    // Scribe mode
    #[serde(default)]
    pub scribe_transcript: String,
    #[serde(default)]
    pub scribe_note: String,
    #[serde(default)]
    pub scribe_context: String,

    // Edit mode
    #[serde(default)]
    pub edit_original: String,
    #[serde(default)]
    pub edit_instructions: String,
    #[serde(default)]
    pub edit_result: String,

    // Synthesize mode
    #[serde(default)]
    pub synthesize_instructions: String,
    #[serde(default)]
    pub synthesize_hp: String,
    #[serde(default)]
    pub synthesize_consults: String,
    #[serde(default)]
    pub synthesize_studies: String,
    #[serde(default)]
    pub synthesize_progress: String,
    #[serde(default)]
    pub synthesize_result: String,
}

impl Session {
    /// Create a fresh session with a generated id and empty fields
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: generate_session_id(),
            created_at: now,
            updated_at: now,
            scribe_transcript: String::new(),
            scribe_note: String::new(),
            scribe_context: String::new(),
            edit_original: String::new(),
            edit_instructions: String::new(),
            edit_result: String::new(),
            synthesize_instructions: String::new(),
            synthesize_hp: String::new(),
            synthesize_consults: String::new(),
            synthesize_studies: String::new(),
            synthesize_progress: String::new(),
            synthesize_result: String::new(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Short opaque id: the first 8 hex chars of a UUIDv4
fn generate_session_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// Partial update applied to a stored session.
///
/// `None` fields leave the stored value untouched, so callers can persist
/// a single text area without round-tripping the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scribe_transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scribe_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scribe_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesize_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesize_hp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesize_consults: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesize_studies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesize_progress: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesize_result: Option<String>,
}

impl SessionUpdate {
    /// Merge the populated fields into `session`
    pub fn apply(&self, session: &mut Session) {
        macro_rules! merge {
            ($field:ident) => {
                if let Some(value) = &self.$field {
                    session.$field = value.clone();
                }
            };
        }

        merge!(scribe_transcript);
        merge!(scribe_note);
        merge!(scribe_context);
        merge!(edit_original);
        merge!(edit_instructions);
        merge!(edit_result);
        merge!(synthesize_instructions);
        merge!(synthesize_hp);
        merge!(synthesize_consults);
        merge!(synthesize_studies);
        merge!(synthesize_progress);
        merge!(synthesize_result);
    }
}
