//! Core logic for the scratchpad note editor.
//! This crate owns the document model, the codecs and every persistence rule;
//! hosts only forward input and paint.

pub mod config;
pub mod db;
pub mod editor;
pub mod html;
pub mod logging;
pub mod markdown;
pub mod model;
pub mod repo;
pub mod sanitize;
pub mod service;

pub use editor::{EditorKey, EditorSession, HostEffect, KeyOutcome, PaletteSession};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{Block, BlockId, BlockKind};
pub use model::document::{Document, Position};
pub use model::inline::{InlineSpan, InlineText, Marks};
pub use model::theme::Theme;
pub use repo::{KeyValueStore, MemoryKeyValueStore, RepoError, RepoResult, SqliteKeyValueStore};
pub use sanitize::{sanitize, SanitizeProfile};
pub use service::{
    ExportFile, ImportOutcome, ImportSource, Notice, ScratchpadService, ServiceError,
    ServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
