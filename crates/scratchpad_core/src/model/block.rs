//! Block domain model.
//!
//! # Responsibility
//! - Define the typed block record backing the editable surface.
//! - Provide constructors that establish per-kind invariants.
//!
//! # Invariants
//! - `id` is stable for the lifetime of a block and never reused.
//! - Only `BulletList`/`NumberList` carry `children`, and their children are
//!   always `ListItem` blocks.
//! - A `TodoItem` never has empty content; it holds the placeholder instead.
//! - `checked` is meaningful only for `TodoItem`, `language` only for `Code`.

use crate::model::inline::InlineText;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for every block in the document.
pub type BlockId = Uuid;

/// Structural kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Text,
    Heading1,
    Heading2,
    Heading3,
    BulletList,
    NumberList,
    ListItem,
    TodoItem,
    Quote,
    Divider,
    /// Fenced code; content is raw text without marks.
    Code,
}

impl BlockKind {
    /// List containers own `ListItem` children instead of inline content.
    pub fn is_container(self) -> bool {
        matches!(self, Self::BulletList | Self::NumberList)
    }

    /// Kinds that backspace at the start of an empty block demotes to text.
    pub fn is_formatted(self) -> bool {
        matches!(
            self,
            Self::Heading1
                | Self::Heading2
                | Self::Heading3
                | Self::Quote
                | Self::TodoItem
                | Self::ListItem
                | Self::Code
        )
    }

    /// Whether a caret can live inside a block of this kind.
    pub fn has_text(self) -> bool {
        !self.is_container() && self != Self::Divider
    }

    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Heading1),
            2 => Some(Self::Heading2),
            3 => Some(Self::Heading3),
            _ => None,
        }
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            Self::Heading1 => Some(1),
            Self::Heading2 => Some(2),
            Self::Heading3 => Some(3),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Heading1 => "heading1",
            Self::Heading2 => "heading2",
            Self::Heading3 => "heading3",
            Self::BulletList => "bulletList",
            Self::NumberList => "numberList",
            Self::ListItem => "listItem",
            Self::TodoItem => "todoItem",
            Self::Quote => "quote",
            Self::Divider => "divider",
            Self::Code => "code",
        }
    }
}

/// One structural unit of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    #[serde(default)]
    pub content: InlineText,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Block>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Block {
    /// Creates an empty block of `kind` with a generated id.
    pub fn new(kind: BlockKind) -> Self {
        Self::with_id(Uuid::new_v4(), kind)
    }

    pub fn with_id(id: BlockId, kind: BlockKind) -> Self {
        let mut block = Self {
            id,
            kind,
            content: InlineText::new(),
            children: Vec::new(),
            checked: false,
            language: None,
        };
        block.ensure_placeholder();
        block
    }

    pub fn text(content: InlineText) -> Self {
        Self::leaf(BlockKind::Text, content)
    }

    pub fn empty_text() -> Self {
        Self::new(BlockKind::Text)
    }

    /// Creates a heading; levels outside 1..=3 fall back to level 3.
    pub fn heading(level: u8, content: InlineText) -> Self {
        let kind = BlockKind::heading(level).unwrap_or(BlockKind::Heading3);
        Self::leaf(kind, content)
    }

    pub fn todo(content: InlineText, checked: bool) -> Self {
        let mut block = Self::leaf(BlockKind::TodoItem, content);
        block.checked = checked;
        block
    }

    pub fn quote(content: InlineText) -> Self {
        Self::leaf(BlockKind::Quote, content)
    }

    pub fn divider() -> Self {
        Self::new(BlockKind::Divider)
    }

    pub fn code(language: Option<String>, text: impl Into<String>) -> Self {
        let mut block = Self::leaf(BlockKind::Code, InlineText::plain(text));
        block.language = language.filter(|value| !value.is_empty());
        block
    }

    pub fn list_item(content: InlineText) -> Self {
        Self::leaf(BlockKind::ListItem, content)
    }

    /// Creates a list container from already-built items.
    ///
    /// Non-container `kind` values are treated as a bullet list.
    pub fn list(kind: BlockKind, items: Vec<Block>) -> Self {
        let kind = if kind.is_container() {
            kind
        } else {
            BlockKind::BulletList
        };
        let mut block = Self::new(kind);
        block.children = items;
        block
    }

    /// Creates a leaf block of `kind` holding `content`.
    pub fn leaf(kind: BlockKind, content: InlineText) -> Self {
        let mut block = Self::new(kind);
        block.content = if kind == BlockKind::Code {
            content.to_unformatted()
        } else {
            content
        };
        block.ensure_placeholder();
        block
    }

    /// Number of caret positions in the block's own text run.
    pub fn text_len(&self) -> usize {
        if self.kind.has_text() {
            self.content.char_len()
        } else {
            0
        }
    }

    /// Whether the block (or any list item below it) has non-blank text.
    pub fn has_visible_text(&self) -> bool {
        !self.content.is_blank() || self.children.iter().any(Block::has_visible_text)
    }

    /// Compares kind, content and kind-specific state, ignoring ids.
    pub fn structurally_eq(&self, other: &Block) -> bool {
        self.kind == other.kind
            && self.content == other.content
            && (self.kind != BlockKind::TodoItem || self.checked == other.checked)
            && (self.kind != BlockKind::Code || self.language == other.language)
            && blocks_structurally_eq(&self.children, &other.children)
    }

    /// Restores the todo sentinel after the text run became empty.
    pub(crate) fn ensure_placeholder(&mut self) {
        if self.kind == BlockKind::TodoItem && self.content.is_empty() {
            self.content = InlineText::placeholder();
        }
    }
}

/// Pairwise [`Block::structurally_eq`] over two sequences.
pub fn blocks_structurally_eq(left: &[Block], right: &[Block]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(a, b)| a.structurally_eq(b))
}
