use super::state::AppState;
use crate::config::Config;
use crate::llm::StreamResult;
use crate::prompts;
use crate::session::SessionUpdate;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    /// Session whose fields feed the prompt and receive the result
    pub session_id: String,

    /// Display name of the note template to apply
    pub template: String,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub note: String,

    /// Present when the stream failed after producing partial output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Session Handlers
// ============================================================================

/// POST /sessions
/// Create a new session with empty fields
pub async fn create_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.sessions.create().await {
        Ok(session) => {
            info!("Created session {}", session.id);
            (StatusCode::CREATED, Json(session)).into_response()
        }
        Err(e) => {
            error!("Failed to create session: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to create session: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions
/// List all sessions, most recently touched first
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    match state.sessions.list().await {
        Ok(sessions) => (StatusCode::OK, Json(sessions)).into_response(),
        Err(e) => {
            error!("Failed to list sessions: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list sessions: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.sessions.get(&session_id).await {
        Some(session) => (StatusCode::OK, Json(session)).into_response(),
        None => session_not_found(&session_id),
    }
}

/// PATCH /sessions/:session_id
/// Merge the supplied fields into the stored record. Unknown ids are a
/// silent no-op per the store contract.
pub async fn update_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(patch): Json<SessionUpdate>,
) -> impl IntoResponse {
    match state.sessions.update(&session_id, &patch).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to update session {}: {:#}", session_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to update session: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// DELETE /sessions/:session_id
/// Idempotent: deleting a missing session is not an error
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.sessions.delete(&session_id).await {
        Ok(()) => {
            info!("Deleted session {}", session_id);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to delete session {}: {:#}", session_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to delete session: {}", e),
                }),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Template and Settings Handlers
// ============================================================================

/// GET /templates
/// Directory templates, or the config fallback when the directory is empty
pub async fn list_templates(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.read().await;
    (StatusCode::OK, Json(state.templates.effective(&config))).into_response()
}

/// GET /settings
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config.read().await;
    (StatusCode::OK, Json(config.clone())).into_response()
}

/// PUT /settings
/// Persist the full settings document atomically, then swap it in.
/// Malformed extra_api_params are rejected during body deserialization
/// with a descriptive message.
pub async fn save_settings(
    State(state): State<AppState>,
    Json(new_config): Json<Config>,
) -> impl IntoResponse {
    match new_config.save(&state.config_path) {
        Ok(()) => {
            *state.config.write().await = new_config;
            info!("Settings saved to {:?}", state.config_path);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            error!("Failed to save settings: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to save settings: {}", e),
                }),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Transcription Handler
// ============================================================================

/// POST /transcribe
/// Multipart upload (`file` part) proxied to the ASR endpoint
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut audio: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    match field.bytes().await {
                        Ok(bytes) => audio = Some(bytes.to_vec()),
                        Err(e) => {
                            return (
                                StatusCode::BAD_REQUEST,
                                Json(ErrorResponse {
                                    error: format!("Failed to read audio upload: {}", e),
                                }),
                            )
                                .into_response();
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!("Invalid multipart request: {}", e),
                    }),
                )
                    .into_response();
            }
        }
    }

    let Some(audio) = audio else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing 'file' part in upload".to_string(),
            }),
        )
            .into_response();
    };

    let stt = state.config.read().await.stt.clone();

    match state.transcription.transcribe(audio, &stt).await {
        Ok(text) => (StatusCode::OK, Json(TranscribeResponse { text })).into_response(),
        Err(e) => {
            error!("Transcription failed: {:#}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: format!("{:#}", e),
                }),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Note Generation Handlers
// ============================================================================

/// POST /notes/write
/// Generate a new clinical note from the session's transcript
pub async fn write_note(
    State(state): State<AppState>,
    Json(req): Json<NoteRequest>,
) -> impl IntoResponse {
    let Some(session) = state.sessions.get(&req.session_id).await else {
        return session_not_found(&req.session_id);
    };

    let config = state.config.read().await.clone();
    let Some(template) = state.templates.get_by_name(&req.template, &config) else {
        return template_not_found(&req.template);
    };

    info!(
        "Writing note for session {} with template '{}'",
        req.session_id, template.name
    );

    let prompt = prompts::note_writing_prompt(
        &session.scribe_transcript,
        &template.system_prompt,
        &session.scribe_context,
    );

    let result = state.completion.stream_complete(&prompt, &config.llm).await;
    let patch = SessionUpdate {
        scribe_note: Some(result.text()),
        ..Default::default()
    };
    finish_note(&state, &req.session_id, result, patch).await
}

/// POST /notes/edit
/// Revise the session's original note per its edit instructions
pub async fn edit_note(
    State(state): State<AppState>,
    Json(req): Json<NoteRequest>,
) -> impl IntoResponse {
    let Some(session) = state.sessions.get(&req.session_id).await else {
        return session_not_found(&req.session_id);
    };

    let config = state.config.read().await.clone();
    let Some(template) = state.templates.get_by_name(&req.template, &config) else {
        return template_not_found(&req.template);
    };

    info!(
        "Editing note for session {} with template '{}'",
        req.session_id, template.name
    );

    let prompt = prompts::note_edit_prompt(
        &session.edit_original,
        &session.edit_instructions,
        &template.system_prompt,
    );

    let result = state.completion.stream_complete(&prompt, &config.llm).await;
    let patch = SessionUpdate {
        edit_result: Some(result.text()),
        ..Default::default()
    };
    finish_note(&state, &req.session_id, result, patch).await
}

/// POST /notes/synthesize
/// Combine the session's source documents into one note
pub async fn synthesize_note(
    State(state): State<AppState>,
    Json(req): Json<NoteRequest>,
) -> impl IntoResponse {
    let Some(session) = state.sessions.get(&req.session_id).await else {
        return session_not_found(&req.session_id);
    };

    let sources = [
        &session.synthesize_hp,
        &session.synthesize_consults,
        &session.synthesize_studies,
        &session.synthesize_progress,
    ];
    if sources.iter().all(|s| s.trim().is_empty()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "At least one source document is required".to_string(),
            }),
        )
            .into_response();
    }

    let config = state.config.read().await.clone();
    let Some(template) = state.templates.get_by_name(&req.template, &config) else {
        return template_not_found(&req.template);
    };

    info!(
        "Synthesizing note for session {} with template '{}'",
        req.session_id, template.name
    );

    let prompt = prompts::note_synthesis_prompt(
        &session.synthesize_instructions,
        &template.system_prompt,
        &session.synthesize_hp,
        &session.synthesize_consults,
        &session.synthesize_studies,
        &session.synthesize_progress,
    );

    let result = state.completion.stream_complete(&prompt, &config.llm).await;
    let patch = SessionUpdate {
        synthesize_result: Some(result.text()),
        ..Default::default()
    };
    finish_note(&state, &req.session_id, result, patch).await
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ============================================================================
// Helpers
// ============================================================================

/// Persist a generated note and shape the response.
///
/// A stream failure with no output is a gateway error; a failure after
/// partial output still persists what arrived and flags it with a warning.
/// An empty success is returned but not persisted, matching the store's
/// only-write-real-content behavior.
async fn finish_note(
    state: &AppState,
    session_id: &str,
    result: StreamResult,
    patch: SessionUpdate,
) -> Response {
    if let Some(stream_error) = &result.error {
        error!(
            "Note generation for session {} failed: {}",
            session_id, stream_error
        );
        if result.is_empty() {
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: stream_error.clone(),
                }),
            )
                .into_response();
        }
    }

    let note = result.text();
    if !note.is_empty() {
        if let Err(e) = state.sessions.update(session_id, &patch).await {
            error!("Failed to persist note for session {}: {:#}", session_id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to persist note: {}", e),
                }),
            )
                .into_response();
        }
    }

    (
        StatusCode::OK,
        Json(NoteResponse {
            note,
            warning: result.error,
        }),
    )
        .into_response()
}

fn session_not_found(session_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Session {} not found", session_id),
        }),
    )
        .into_response()
}

fn template_not_found(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Template '{}' not found", name),
        }),
    )
        .into_response()
}
