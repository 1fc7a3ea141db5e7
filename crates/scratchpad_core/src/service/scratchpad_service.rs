//! Scratchpad use-case service.
//!
//! # Responsibility
//! - Restore the document and theme from storage at startup.
//! - Debounce document saves and persist theme changes immediately.
//! - Run the Markdown import and export pipelines.
//!
//! # Invariants
//! - Restored HTML always passes the `restore` sanitizer profile before it
//!   is read; imported Markdown always passes the `import` profile.
//! - The saved payload is rendered when the save fires, so the latest
//!   mutation always wins.
//! - Storage failures are logged and reported; in-memory state is never
//!   rolled back.

use crate::config::{CONTENT_KEY, MAX_IMPORT_BYTES, SAVE_DEBOUNCE, THEME_KEY};
use crate::editor::session::EditorSession;
use crate::html::{read_document, render_document};
use crate::markdown;
use crate::model::document::Document;
use crate::model::theme::Theme;
use crate::repo::{KeyValueStore, RepoError};
use crate::sanitize::{sanitize, SanitizeProfile};
use crate::service::file_ops::{export_file_name, is_markdown_file_name, ImportSource};
use crate::service::save_debounce::SaveDebouncer;
use crate::service::{Notice, ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{error, info, warn};
use std::time::Instant;

/// Result of an import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The document was replaced.
    Replaced { notice: Notice },
    /// The user declined to overwrite existing content.
    Declined,
}

/// Markdown payload ready to be written by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
    pub notice: Notice,
}

/// Scratchpad facade over a key/value store implementation.
pub struct ScratchpadService<S: KeyValueStore> {
    store: S,
    session: EditorSession,
    debouncer: SaveDebouncer,
    pending_notice: Option<Notice>,
}

impl<S: KeyValueStore> ScratchpadService<S> {
    /// Creates a service with an empty document; call [`Self::load`] next.
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: EditorSession::default(),
            debouncer: SaveDebouncer::new(SAVE_DEBOUNCE),
            pending_notice: None,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn has_pending_save(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Takes the notice queued by the last edit, if any.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.pending_notice.take()
    }

    /// Restores theme, then content, from storage.
    ///
    /// On failure the session keeps whatever was restored so far (at worst
    /// the empty document with the default theme).
    pub fn load(&mut self) -> ServiceResult<()> {
        let started_at = Instant::now();

        let theme = self
            .store
            .get(THEME_KEY)
            .map_err(|err| log_storage_error("load_theme", err))?
            .and_then(|value| Theme::parse(&value))
            .unwrap_or_default();
        self.session = EditorSession::new(Document::new(), theme);

        let Some(stored) = self
            .store
            .get(CONTENT_KEY)
            .map_err(|err| log_storage_error("load_content", err))?
        else {
            info!(
                "event=load module=service status=ok content=absent theme={} duration_ms={}",
                theme.as_str(),
                started_at.elapsed().as_millis()
            );
            return Ok(());
        };

        let blocks = read_document(&sanitize(&stored, SanitizeProfile::Restore));
        let block_count = blocks.len();
        let mut document = Document::from_blocks(blocks);
        document.normalize_empty();
        self.session = EditorSession::new(document, theme);

        info!(
            "event=load module=service status=ok content=present theme={} content_bytes={} block_count={} duration_ms={}",
            theme.as_str(),
            stored.len(),
            block_count,
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    /// Runs `edit` against the session; document changes schedule a save and
    /// theme changes are persisted right away.
    pub fn edit<T>(&mut self, now: Instant, edit: impl FnOnce(&mut EditorSession) -> T) -> T {
        let revision = self.session.revision();
        let theme = self.session.theme();
        let result = edit(&mut self.session);

        if self.session.theme() != theme {
            if let Err(err) = self.persist_theme() {
                self.pending_notice = Some(Notice::from(&err));
            }
        }
        if self.session.revision() != revision {
            self.debouncer.schedule(now);
        }
        result
    }

    /// Writes the document when the debounce window has elapsed.
    ///
    /// Returns `Ok(true)` when a save was performed.
    pub fn flush_if_due(&mut self, now: Instant) -> ServiceResult<bool> {
        if !self.debouncer.poll(now) {
            return Ok(false);
        }
        self.save_now().map(|()| true)
    }

    /// Writes the current document immediately.
    pub fn save_now(&mut self) -> ServiceResult<()> {
        self.debouncer.cancel();
        let started_at = Instant::now();
        let html = render_document(self.session.document().blocks());
        self.store
            .set(CONTENT_KEY, &html)
            .map_err(|err| log_storage_error("save", err))?;
        info!(
            "event=save module=service status=ok content_bytes={} duration_ms={}",
            html.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }

    pub fn toggle_theme(&mut self) -> ServiceResult<Theme> {
        let theme = self.session.toggle_theme();
        self.persist_theme()?;
        Ok(theme)
    }

    fn persist_theme(&mut self) -> ServiceResult<()> {
        let theme = self.session.theme();
        self.store
            .set(THEME_KEY, theme.as_str())
            .map_err(|err| log_storage_error("save_theme", err))?;
        info!(
            "event=theme_change module=service status=ok theme={}",
            theme.as_str()
        );
        Ok(())
    }

    /// Replaces the document with imported Markdown.
    ///
    /// `confirm` is asked (with the file name) only when the current
    /// document has visible text.
    pub fn import_markdown(
        &mut self,
        file_name: &str,
        text: &str,
        source: ImportSource,
        now: Instant,
        confirm: impl FnOnce(&str) -> bool,
    ) -> ServiceResult<ImportOutcome> {
        if source == ImportSource::DragDrop && !is_markdown_file_name(file_name) {
            warn!(
                "event=import module=service status=rejected source={} reason=unsupported_type",
                source.as_str()
            );
            return Err(ServiceError::UnsupportedFileType(file_name.to_string()));
        }
        if text.len() > MAX_IMPORT_BYTES {
            warn!(
                "event=import module=service status=rejected source={} reason=too_large input_bytes={}",
                source.as_str(),
                text.len()
            );
            return Err(ServiceError::FileTooLarge {
                bytes: text.len(),
                limit: MAX_IMPORT_BYTES,
            });
        }
        if self.session.document().has_visible_text() && !confirm(file_name) {
            info!(
                "event=import module=service status=declined source={}",
                source.as_str()
            );
            return Ok(ImportOutcome::Declined);
        }

        let started_at = Instant::now();
        let rendered = render_document(&markdown::parse(text));
        let blocks = read_document(&sanitize(&rendered, SanitizeProfile::Import));
        let block_count = blocks.len();
        self.edit(now, |session| session.replace_document(blocks));

        info!(
            "event=import module=service status=ok source={} input_bytes={} block_count={} duration_ms={}",
            source.as_str(),
            text.len(),
            block_count,
            started_at.elapsed().as_millis()
        );
        Ok(ImportOutcome::Replaced {
            notice: Notice::info(format!("Loaded {file_name}")),
        })
    }

    /// Serializes the document to Markdown under a sanitized file name.
    pub fn export_markdown(
        &self,
        requested_name: Option<&str>,
        today: NaiveDate,
    ) -> ServiceResult<ExportFile> {
        let document = self.session.document();
        if !document.has_visible_text() {
            return Err(ServiceError::NothingToExport);
        }
        let file_name = export_file_name(requested_name, today);
        let contents = markdown::serialize(document.blocks());
        info!(
            "event=export module=service status=ok output_bytes={}",
            contents.len()
        );
        Ok(ExportFile {
            notice: Notice::info(format!("Exported as {file_name}")),
            file_name,
            contents,
        })
    }
}

fn log_storage_error(operation: &str, err: RepoError) -> ServiceError {
    error!(
        "event={operation} module=service status=error error_code=storage_failed error={err}"
    );
    ServiceError::Storage(err)
}
