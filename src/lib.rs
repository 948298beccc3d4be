pub mod asr;
pub mod config;
pub mod http;
pub mod llm;
pub mod prompts;
pub mod session;
pub mod templates;

pub use asr::TranscriptionClient;
pub use config::{Config, LlmConfig, ServerConfig, SttConfig, TemplateEntry};
pub use http::{create_router, AppState};
pub use llm::{CompletionClient, SseEvent, StreamResult};
pub use session::{Session, SessionStore, SessionUpdate};
pub use templates::{Template, TemplateCatalog};
