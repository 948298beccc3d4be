//! Streaming completion client
//!
//! Talks to an OpenAI-compatible `/v1/chat/completions` endpoint with
//! `stream: true` and aggregates the server-sent-event deltas into the
//! final note text. Parsing of individual event lines lives in `sse`;
//! the client owns request construction and line reassembly across
//! network chunk boundaries.

mod client;
mod sse;

pub use client::{CompletionClient, StreamResult};
pub use sse::{parse_line, SseEvent};
