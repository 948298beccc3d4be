//! Clinical session persistence
//!
//! This module provides the per-encounter working state and its store:
//! - `Session`: the record (transcript, notes, synthesis sources, results)
//! - `SessionUpdate`: partial-field patch from the presentation layer
//! - `SessionStore`: one JSON file per session under a dedicated directory
//!
//! There is no shared index file; the directory scan is the session list,
//! which keeps independent sessions safe for concurrent use.

mod record;
mod store;

pub use record::{Session, SessionUpdate};
pub use store::SessionStore;
