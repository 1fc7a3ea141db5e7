//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the editor session, the codec pipelines and the key/value
//!   store into load/save/import/export use cases.
//! - Keep FFI layers decoupled from storage details.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod file_ops;
pub mod save_debounce;
pub mod scratchpad_service;

pub use file_ops::{export_file_name, is_markdown_file_name, sanitize_export_name, ImportSource};
pub use save_debounce::SaveDebouncer;
pub use scratchpad_service::{ExportFile, ImportOutcome, ScratchpadService};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for scratchpad use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Persistence-layer failure.
    Storage(RepoError),
    /// Drag-and-drop payload without a Markdown extension.
    UnsupportedFileType(String),
    /// Import payload above the size limit.
    FileTooLarge { bytes: usize, limit: usize },
    /// Export requested while the document has no text.
    NothingToExport,
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::UnsupportedFileType(_) => write!(f, "Only .md files are supported"),
            Self::FileTooLarge { limit, .. } => {
                write!(f, "File is too large (max {} MB)", limit / (1024 * 1024))
            }
            Self::NothingToExport => write!(f, "Nothing to export"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Short user-facing message (toast) produced by a use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

impl From<&ServiceError> for Notice {
    fn from(value: &ServiceError) -> Self {
        match value {
            ServiceError::NothingToExport => Self::info(value.to_string()),
            ServiceError::Storage(_) => Self::error("Could not access storage"),
            other => Self::error(other.to_string()),
        }
    }
}
