//! HTTP API server: the seam between the core and the browser UI
//!
//! This module provides the REST API the presentation layer drives:
//! - POST/GET /sessions, GET/PATCH/DELETE /sessions/:id - session CRUD
//! - GET /templates - note template catalog
//! - GET/PUT /settings - configuration read and atomic save
//! - POST /transcribe - multipart audio upload to the ASR endpoint
//! - POST /notes/write|edit|synthesize - prompt + streamed completion,
//!   result persisted back into the session
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
