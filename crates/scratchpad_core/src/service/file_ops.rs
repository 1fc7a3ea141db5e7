//! Import/export file naming and validation rules.

use crate::config::{DEFAULT_EXPORT_PREFIX, MAX_FILE_NAME_CHARS};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_NAME_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[^a-z0-9_\-.]").expect("valid file name regex"));
static UNDERSCORE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{2,}").expect("valid underscore run regex"));
static MARKDOWN_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(md|markdown)$").expect("valid markdown extension regex"));

/// Where an import payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportSource {
    /// OS file picker; its extension filter is trusted.
    FilePicker,
    /// Drag-and-drop; the extension is checked.
    DragDrop,
}

impl ImportSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FilePicker => "file_picker",
            Self::DragDrop => "drag_drop",
        }
    }
}

/// Default export stem, e.g. `scratchpad-2026-03-01`.
pub fn default_export_name(today: NaiveDate) -> String {
    format!("{DEFAULT_EXPORT_PREFIX}-{}", today.format("%Y-%m-%d"))
}

/// Reduces a requested name to `[A-Za-z0-9_.-]`, collapses `_` runs and
/// truncates; blank input falls back to the default stem.
pub fn sanitize_export_name(requested: Option<&str>, today: NaiveDate) -> String {
    let requested = requested.map(str::trim).unwrap_or_default();
    if requested.is_empty() {
        return default_export_name(today);
    }
    let replaced = UNSAFE_NAME_CHARS_RE.replace_all(requested, "_");
    let collapsed = UNDERSCORE_RUN_RE.replace_all(&replaced, "_");
    let truncated: String = collapsed.chars().take(MAX_FILE_NAME_CHARS).collect();
    if truncated.trim_matches('_').is_empty() {
        return default_export_name(today);
    }
    truncated
}

/// Final export file name with the `.md` extension appended.
pub fn export_file_name(requested: Option<&str>, today: NaiveDate) -> String {
    format!("{}.md", sanitize_export_name(requested, today))
}

pub fn is_markdown_file_name(name: &str) -> bool {
    MARKDOWN_FILE_RE.is_match(name)
}
