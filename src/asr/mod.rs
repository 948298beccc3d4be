//! Speech-to-text client
//!
//! Posts recorded audio to an OpenAI-compatible ASR endpoint
//! (`/v1/audio/transcriptions`) as a multipart form and returns the
//! transcribed text. No audio decoding happens here; bytes go out as-is.

mod client;

pub use client::TranscriptionClient;
