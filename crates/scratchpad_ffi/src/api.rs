//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the codec pipelines and key/value persistence to Dart via FRB.
//! - Keep error semantics simple: envelopes carry `ok` plus a message.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every HTML string handed back to Dart has passed the sanitizer.

use chrono::Local;
use scratchpad_core::db::open_db;
use scratchpad_core::html::{read_document, render_document};
use scratchpad_core::markdown;
use scratchpad_core::service::export_file_name as export_file_name_inner;
use scratchpad_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    sanitize, Document, KeyValueStore, SanitizeProfile, SqliteKeyValueStore,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const STORE_DB_FILE_NAME: &str = "scratchpad_store.sqlite3";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Converts imported Markdown to editor HTML through the `import` profile.
#[flutter_rust_bridge::frb(sync)]
pub fn markdown_to_safe_html(markdown: String) -> String {
    let rendered = render_document(&markdown::parse(&markdown));
    let blocks = read_document(&sanitize(&rendered, SanitizeProfile::Import));
    render_document(&blocks)
}

/// Restores persisted HTML through the `restore` profile and returns the
/// canonical editor markup.
#[flutter_rust_bridge::frb(sync)]
pub fn restore_document_html(raw_html: String) -> String {
    render_document(restored_document(&raw_html).blocks())
}

/// Serializes editor HTML to Markdown for export.
#[flutter_rust_bridge::frb(sync)]
pub fn document_html_to_markdown(html: String) -> String {
    markdown::serialize(restored_document(&html).blocks())
}

/// Returns the sanitized export file name (with `.md`) for today's date.
#[flutter_rust_bridge::frb(sync)]
pub fn export_file_name(requested: Option<String>) -> String {
    export_file_name_inner(requested.as_deref(), Local::now().date_naive())
}

/// Response envelope for key/value store calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Stored value for loads; `None` for saves and missing keys.
    pub value: Option<String>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl StoreResponse {
    fn loaded(value: Option<String>) -> Self {
        let message = if value.is_some() {
            "Loaded."
        } else {
            "No value stored."
        };
        Self {
            ok: true,
            value,
            message: message.to_string(),
        }
    }

    fn saved() -> Self {
        Self {
            ok: true,
            value: None,
            message: "Saved.".to_string(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            message: message.into(),
        }
    }
}

/// Reads one key from the scratchpad store.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn store_load(key: String) -> StoreResponse {
    match with_store(|store| store.get(key.trim())) {
        Ok(value) => StoreResponse::loaded(value),
        Err(err) => StoreResponse::failure(format!("store_load failed: {err}")),
    }
}

/// Upserts one key in the scratchpad store.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn store_save(key: String, value: String) -> StoreResponse {
    match with_store(|store| store.set(key.trim(), &value)) {
        Ok(()) => StoreResponse::saved(),
        Err(err) => StoreResponse::failure(format!("store_save failed: {err}")),
    }
}

fn restored_document(raw_html: &str) -> Document {
    let blocks = read_document(&sanitize(raw_html, SanitizeProfile::Restore));
    let mut document = Document::from_blocks(blocks);
    document.normalize_empty();
    document
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("SCRATCHPAD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn with_store<T>(
    f: impl FnOnce(&SqliteKeyValueStore<'_>) -> scratchpad_core::RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_store_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("store DB open failed: {err}"))?;
    let store = SqliteKeyValueStore::try_new(&conn)
        .map_err(|err| format!("store init failed: {err}"))?;
    f(&store).map_err(|err| err.to_string())
}
