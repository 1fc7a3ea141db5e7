//! Slash command palette state machine and menu placement.
//!
//! # Responsibility
//! - Decide when a typed `/` opens the palette and keep its query in sync
//!   with the text between that slash and the caret.
//! - Track the highlighted entry and produce a commit for the session.
//! - Place the menu inside the viewport.
//!
//! # Invariants
//! - The palette never opens without a caret rectangle.
//! - While open, the caret stays in the block the slash was typed in;
//!   otherwise the palette closes.
//! - `active_index` is always a valid index into a non-empty filtered list.

use crate::config::{MENU_MAX_HEIGHT, MENU_OFFSET, MENU_VIEWPORT_PADDING, MENU_WIDTH};
use crate::editor::command::{default_commands, filter_commands, with_separators, Command, PaletteEntry};
use crate::model::block::BlockId;
use crate::model::document::{Document, Position};
use crate::model::inline::PLACEHOLDER;
use crate::model::theme::Theme;

const URL_SCHEME_SUFFIXES: &[&str] = &["http:", "https:", "ftp:"];

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Menu size used before the host has measured the rendered menu.
    pub fn default_menu() -> Self {
        Self::new(MENU_WIDTH, MENU_MAX_HEIGHT)
    }
}

/// Top-left corner of the palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuPlacement {
    pub top: f64,
    pub left: f64,
}

/// Places a menu of `menu` size next to the caret rectangle `anchor`.
///
/// Below the anchor when it fits; otherwise above when that fits or has
/// more room; otherwise aligned to the viewport bottom. The result is always
/// kept `MENU_VIEWPORT_PADDING` away from the viewport edges.
pub fn place_menu(anchor: Rect, menu: Size, viewport: Size) -> MenuPlacement {
    let space_below = viewport.height - anchor.bottom();
    let space_above = anchor.top;

    let mut top = anchor.bottom() + MENU_OFFSET;
    if space_below < menu.height + MENU_VIEWPORT_PADDING {
        top = if space_above >= menu.height || space_above > space_below {
            anchor.top - menu.height - MENU_OFFSET
        } else {
            viewport.height - menu.height - MENU_VIEWPORT_PADDING
        };
    }

    let mut left = anchor.left;
    if left + menu.width > viewport.width - MENU_VIEWPORT_PADDING {
        left = MENU_VIEWPORT_PADDING.max(viewport.width - menu.width - MENU_VIEWPORT_PADDING);
    }

    let max_top = viewport.height - menu.height - MENU_VIEWPORT_PADDING;
    MenuPlacement {
        top: MENU_VIEWPORT_PADDING.max(top.min(max_top)),
        left: MENU_VIEWPORT_PADDING.max(left),
    }
}

/// Keys the palette reacts to while open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// A command chosen by the user together with the slash to remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteCommit {
    pub command: Command,
    /// Position of the `/` that opened the palette.
    pub slash: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteOutcome {
    /// The palette is closed; the key belongs to the editor.
    Ignored,
    /// The key was used for navigation.
    Consumed,
    /// The palette closed without a command.
    Closed,
    Commit(PaletteCommit),
}

#[derive(Debug, Clone, PartialEq)]
struct OpenPalette {
    block_id: BlockId,
    slash_offset: usize,
    query: String,
    commands: Vec<Command>,
    filtered: Vec<Command>,
    active_index: usize,
    placement: MenuPlacement,
}

/// Palette state owned by an editor session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaletteSession {
    open: Option<OpenPalette>,
}

impl PaletteSession {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn query(&self) -> Option<&str> {
        self.open.as_ref().map(|open| open.query.as_str())
    }

    pub fn filtered(&self) -> &[Command] {
        self.open
            .as_ref()
            .map_or(&[], |open| open.filtered.as_slice())
    }

    pub fn entries(&self) -> Vec<PaletteEntry<'_>> {
        with_separators(self.filtered())
    }

    pub fn active_index(&self) -> Option<usize> {
        self.open
            .as_ref()
            .filter(|open| !open.filtered.is_empty())
            .map(|open| open.active_index)
    }

    pub fn placement(&self) -> Option<MenuPlacement> {
        self.open.as_ref().map(|open| open.placement)
    }

    /// Re-evaluates the palette after text input at `caret`.
    ///
    /// Opens on a qualifying `/`; while open, re-derives the query or closes.
    pub fn on_input(
        &mut self,
        document: &Document,
        caret: Position,
        caret_rect: Option<Rect>,
        viewport: Size,
        theme: Theme,
    ) {
        if self.is_open() {
            self.refresh(document, caret);
            return;
        }
        let Some(rect) = caret_rect else {
            return;
        };
        if !slash_triggers(document, caret) {
            return;
        }
        let commands = default_commands(theme);
        self.open = Some(OpenPalette {
            block_id: caret.block_id,
            slash_offset: caret.offset - 1,
            query: String::new(),
            filtered: commands.clone(),
            commands,
            active_index: 0,
            placement: place_menu(rect, Size::default_menu(), viewport),
        });
    }

    /// Re-derives the query from the current caret; closes when the caret
    /// left the slash's block, moved onto or before the opening slash, or
    /// that slash was deleted.
    pub fn refresh(&mut self, document: &Document, caret: Position) {
        let Some(open) = self.open.as_mut() else {
            return;
        };
        let slash_offset = open.slash_offset;
        let query = document
            .find(caret.block_id)
            .filter(|_| caret.block_id == open.block_id && caret.offset > slash_offset)
            .and_then(|block| {
                let before = block.content.text_before(caret.offset);
                let mut chars = before.chars().skip(slash_offset);
                if chars.next() != Some('/') {
                    return None;
                }
                Some(chars.collect::<String>())
            });
        let Some(query) = query else {
            self.close();
            return;
        };
        open.filtered = filter_commands(&open.commands, &query);
        open.query = query;
        open.active_index = 0;
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    /// Highlights the entry under the pointer.
    pub fn hover(&mut self, index: usize) {
        if let Some(open) = self.open.as_mut() {
            if index < open.filtered.len() {
                open.active_index = index;
            }
        }
    }

    /// Commits the entry at `index` (pointer click).
    pub fn select(&mut self, index: usize) -> Option<PaletteCommit> {
        let open = self.open.as_ref()?;
        let command = open.filtered.get(index)?.clone();
        let slash = Position::new(open.block_id, open.slash_offset);
        self.close();
        Some(PaletteCommit { command, slash })
    }

    pub fn on_key(&mut self, key: PaletteKey) -> PaletteOutcome {
        let Some(open) = self.open.as_mut() else {
            return PaletteOutcome::Ignored;
        };
        let len = open.filtered.len();
        match key {
            PaletteKey::Down => {
                if len > 0 {
                    open.active_index = (open.active_index + 1) % len;
                }
                PaletteOutcome::Consumed
            }
            PaletteKey::Up => {
                if len > 0 {
                    open.active_index = (open.active_index + len - 1) % len;
                }
                PaletteOutcome::Consumed
            }
            PaletteKey::Enter => {
                let index = open.active_index;
                match self.select(index) {
                    Some(commit) => PaletteOutcome::Commit(commit),
                    None => PaletteOutcome::Consumed,
                }
            }
            PaletteKey::Escape => {
                self.close();
                PaletteOutcome::Closed
            }
        }
    }
}

/// Whether the character just typed before `caret` opens the palette.
fn slash_triggers(document: &Document, caret: Position) -> bool {
    let Some(block) = document.find(caret.block_id) else {
        return false;
    };
    if caret.offset == 0 || !block.kind.has_text() {
        return false;
    }
    let before = block.content.text_before(caret.offset);
    let Some(without_slash) = before.strip_suffix('/') else {
        return false;
    };
    if block
        .content
        .marks_before(caret.offset)
        .is_some_and(|marks| marks.link_href.is_some())
    {
        return false;
    }
    if URL_SCHEME_SUFFIXES
        .iter()
        .any(|scheme| without_slash.ends_with(scheme))
    {
        return false;
    }
    match without_slash.chars().last() {
        None => true,
        Some(previous) => previous.is_whitespace() || previous == PLACEHOLDER,
    }
}
