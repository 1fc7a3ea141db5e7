//! Editor session: the document, caret, palette and theme of one surface.
//!
//! # Responsibility
//! - Translate host input events into document operations.
//! - Keep the caret and palette consistent after every mutation.
//! - Report side effects (theme, import, export) back to the host.
//!
//! # Invariants
//! - `revision` increases on every document or theme mutation and on
//!   nothing else.
//! - Keys consumed by an open palette never reach the document.

use crate::editor::command::{Command, CommandAction};
use crate::editor::palette::{PaletteCommit, PaletteKey, PaletteOutcome, PaletteSession, Rect, Size};
use crate::editor::selection::{HitRegion, Selection, SelectionController, SurfacePoint};
use crate::model::block::{Block, BlockId, BlockKind};
use crate::model::document::{BackspaceOutcome, Document, Position};
use crate::model::theme::Theme;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static BARE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("valid bare url regex"));

/// Editing keys the session interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Enter,
    ShiftEnter,
    /// Ctrl/Cmd + Enter.
    ModEnter,
    /// Ctrl/Cmd + E.
    ModE,
    Backspace,
    Tab,
    ArrowUp,
    ArrowDown,
    Escape,
}

/// Side effects the host must carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEffect {
    ThemeChanged(Theme),
    ExportRequested,
    ImportRequested,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The session handled the key; the host must suppress its default.
    Handled,
    /// The host should apply its default behaviour.
    Default,
    /// Handled, and the host must perform the effect.
    Effect(HostEffect),
}

#[derive(Debug, Clone)]
pub struct EditorSession {
    document: Document,
    selection: SelectionController,
    palette: PaletteSession,
    theme: Theme,
    viewport: Size,
    revision: u64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Document::new(), Theme::default())
    }
}

impl EditorSession {
    pub fn new(document: Document, theme: Theme) -> Self {
        let selection = SelectionController::new(&document);
        Self {
            document,
            selection,
            palette: PaletteSession::default(),
            theme,
            viewport: Size::new(0.0, 0.0),
            revision: 0,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn caret(&self) -> Position {
        self.selection.caret()
    }

    pub fn selection(&self) -> Selection {
        self.selection.current()
    }

    pub fn palette(&self) -> &PaletteSession {
        &self.palette
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Empty-document hint visibility.
    pub fn is_placeholder_visible(&self) -> bool {
        self.document.is_visually_empty()
    }

    /// Swaps in a whole new document (import); the palette closes.
    pub fn replace_document(&mut self, blocks: Vec<Block>) {
        let caret = self.document.replace_all(blocks);
        self.document.normalize_empty();
        self.palette.close();
        self.selection.restore(&self.document, caret);
        self.touch();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.touch();
        self.theme
    }

    /// Host-reported caret move (click, arrow keys handled natively).
    pub fn set_caret(&mut self, point: SurfacePoint) -> Position {
        let caret = self.selection.set_caret(&self.document, point);
        self.palette.refresh(&self.document, caret);
        caret
    }

    /// Pointer press on the surface; any open palette closes first.
    pub fn pointer_down(&mut self, point: SurfacePoint) -> Position {
        self.palette.close();
        self.set_caret(point)
    }

    pub fn select(&mut self, anchor: Position, focus: Position) -> Selection {
        self.selection.select(&self.document, anchor, focus)
    }

    /// Inserts typed text at the caret, replacing any selection.
    pub fn type_text(&mut self, text: &str, caret_rect: Option<Rect>) -> Position {
        let at = self.delete_selection();
        let Some(caret) = self.document.insert_text(at, text) else {
            return self.caret();
        };
        self.selection.restore(&self.document, caret);
        self.touch();
        self.palette
            .on_input(&self.document, caret, caret_rect, self.viewport, self.theme);
        caret
    }

    /// Pastes plain text; a lone `http(s)://` URL becomes a link.
    pub fn paste(&mut self, text: &str) -> Position {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let at = self.delete_selection();
        let trimmed = text.trim();
        let inserted = if BARE_URL_RE.is_match(trimmed) {
            self.document.insert_link(at, trimmed, trimmed)
        } else {
            self.document.insert_text(at, &text)
        };
        let Some(caret) = inserted else {
            return self.caret();
        };
        self.selection.restore(&self.document, caret);
        self.palette.refresh(&self.document, caret);
        self.touch();
        caret
    }

    /// Checkbox click: toggles the todo without moving the caret.
    pub fn click_checkbox(&mut self, block_id: BlockId) -> Option<bool> {
        let checked = self.document.toggle_todo(block_id)?;
        self.selection.set_caret(
            &self.document,
            SurfacePoint {
                block_id,
                offset: 0,
                region: HitRegion::TodoCheckbox,
            },
        );
        self.touch();
        Some(checked)
    }

    /// Pointer press anywhere outside the palette closes it.
    pub fn pointer_down_outside_palette(&mut self) {
        self.palette.close();
    }

    pub fn hover_command(&mut self, index: usize) {
        self.palette.hover(index);
    }

    /// Pointer click on a palette entry.
    pub fn click_command(&mut self, index: usize) -> KeyOutcome {
        match self.palette.select(index) {
            Some(commit) => self.commit(commit),
            None => KeyOutcome::Handled,
        }
    }

    pub fn key(&mut self, key: EditorKey) -> KeyOutcome {
        if self.palette.is_open() {
            let palette_key = match key {
                EditorKey::ArrowUp => Some(PaletteKey::Up),
                EditorKey::ArrowDown => Some(PaletteKey::Down),
                EditorKey::Enter => Some(PaletteKey::Enter),
                EditorKey::Escape => Some(PaletteKey::Escape),
                _ => None,
            };
            if let Some(palette_key) = palette_key {
                return match self.palette.on_key(palette_key) {
                    PaletteOutcome::Commit(commit) => self.commit(commit),
                    PaletteOutcome::Ignored => KeyOutcome::Default,
                    PaletteOutcome::Consumed | PaletteOutcome::Closed => KeyOutcome::Handled,
                };
            }
        }

        let outcome = match key {
            EditorKey::Enter => self.enter(),
            EditorKey::ShiftEnter => self.insert_literal("\n"),
            EditorKey::Tab => self.insert_literal("\t"),
            EditorKey::ModEnter => self.toggle_todo_at_caret(),
            EditorKey::ModE => KeyOutcome::Effect(HostEffect::ExportRequested),
            EditorKey::Backspace => self.backspace(),
            EditorKey::ArrowUp | EditorKey::ArrowDown | EditorKey::Escape => KeyOutcome::Default,
        };
        self.palette.refresh(&self.document, self.caret());
        outcome
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn insert_literal(&mut self, text: &str) -> KeyOutcome {
        let at = self.delete_selection();
        if let Some(caret) = self.document.insert_text(at, text) {
            self.selection.restore(&self.document, caret);
            self.touch();
        }
        KeyOutcome::Handled
    }

    /// Removes the selected range, within one block or across blocks;
    /// returns the caret.
    fn delete_selection(&mut self) -> Position {
        let selection = self.selection.current();
        if selection.is_collapsed() {
            return selection.focus;
        }
        match self.document.delete_across(selection.anchor, selection.focus) {
            Some(caret) => {
                self.touch();
                self.selection.restore(&self.document, caret)
            }
            None => selection.focus,
        }
    }

    fn enter(&mut self) -> KeyOutcome {
        let at = self.delete_selection();
        let Some(block) = self.document.find(at.block_id) else {
            return KeyOutcome::Default;
        };
        let kind = block.kind;
        let blank = block.content.is_blank();

        let caret = match kind {
            BlockKind::Code => self.document.insert_text(at, "\n"),
            BlockKind::ListItem if blank => self.document.convert_block(at.block_id, BlockKind::Text),
            BlockKind::ListItem => self
                .document
                .insert_block_after(at.block_id, at.offset, BlockKind::ListItem)
                .map(|inserted| inserted.caret),
            BlockKind::TodoItem => self
                .document
                .insert_block_after(at.block_id, at.offset, BlockKind::TodoItem)
                .map(|inserted| inserted.caret),
            _ => self
                .document
                .insert_block_after(at.block_id, at.offset, BlockKind::Text)
                .map(|inserted| inserted.caret),
        };
        match caret {
            Some(caret) => {
                self.selection.restore(&self.document, caret);
                self.touch();
                KeyOutcome::Handled
            }
            None => KeyOutcome::Default,
        }
    }

    fn toggle_todo_at_caret(&mut self) -> KeyOutcome {
        match self.document.toggle_todo(self.caret().block_id) {
            Some(_) => {
                self.touch();
                KeyOutcome::Handled
            }
            None => KeyOutcome::Default,
        }
    }

    fn backspace(&mut self) -> KeyOutcome {
        let selection = self.selection.current();
        if !selection.is_collapsed() {
            self.delete_selection();
            return KeyOutcome::Handled;
        }

        let caret = selection.focus;
        let Some(block) = self.document.find(caret.block_id) else {
            return KeyOutcome::Default;
        };
        let at_start = caret.offset == 0 || (block.content.is_placeholder() && caret.offset <= 1);

        if !at_start {
            let Some(position) =
                self.document
                    .delete_range(caret.block_id, caret.offset - 1, caret.offset)
            else {
                return KeyOutcome::Default;
            };
            self.selection.restore(&self.document, position);
            self.touch();
            return KeyOutcome::Handled;
        }

        match self.document.merge_with_previous(caret.block_id) {
            Some(BackspaceOutcome::Demoted(position)) | Some(BackspaceOutcome::Removed(position)) => {
                self.selection.restore(&self.document, position);
                self.touch();
                KeyOutcome::Handled
            }
            Some(BackspaceOutcome::Delegated) | None => KeyOutcome::Default,
        }
    }

    /// Applies a palette commit: drop `/query`, then run the command.
    fn commit(&mut self, commit: PaletteCommit) -> KeyOutcome {
        let PaletteCommit { command, slash } = commit;
        let caret = self.caret();
        let anchor = if caret.block_id == slash.block_id && caret.offset >= slash.offset {
            self.document
                .delete_range(slash.block_id, slash.offset, caret.offset)
                .unwrap_or(caret)
        } else {
            caret
        };
        self.selection.restore(&self.document, anchor);
        self.touch();
        debug!(
            "event=palette_commit module=editor status=ok action={}",
            command.action.id()
        );
        self.run_command(&command, anchor)
    }

    fn run_command(&mut self, command: &Command, anchor: Position) -> KeyOutcome {
        match command.action {
            CommandAction::ToggleTheme => KeyOutcome::Effect(HostEffect::ThemeChanged(self.toggle_theme())),
            CommandAction::Upload => KeyOutcome::Effect(HostEffect::ImportRequested),
            CommandAction::Export => KeyOutcome::Effect(HostEffect::ExportRequested),
            CommandAction::Todo | CommandAction::Divider => {
                let Some(kind) = command.action.block_kind() else {
                    return KeyOutcome::Handled;
                };
                let end = self
                    .document
                    .find(anchor.block_id)
                    .map_or(anchor.offset, Block::text_len);
                if let Some(inserted) = self.document.insert_block_after(anchor.block_id, end, kind) {
                    self.selection.restore(&self.document, inserted.caret);
                }
                KeyOutcome::Handled
            }
            _ => {
                if let Some(kind) = command.action.block_kind() {
                    if let Some(caret) = self.document.convert_block(anchor.block_id, kind) {
                        self.selection.restore(&self.document, caret);
                    }
                }
                KeyOutcome::Handled
            }
        }
    }
}
