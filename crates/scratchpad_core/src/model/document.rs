//! Live block document and its structural operations.
//!
//! # Responsibility
//! - Hold the ordered block sequence backing the editable surface.
//! - Perform insert/split/demote/convert/toggle edits and report where the
//!   caret belongs afterwards.
//!
//! # Invariants
//! - The document never holds zero blocks.
//! - List containers never hold zero items and are never adjacent to a
//!   container of the same kind after a structural edit.
//! - Operations addressing an unknown id are no-ops returning `None`.

use crate::model::block::{Block, BlockId, BlockKind};
use crate::model::inline::{InlineSpan, InlineText, Marks};
use serde::{Deserialize, Serialize};

/// Caret coordinate inside a block's text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub block_id: BlockId,
    /// Character offset, clamped to `[0, text_len]`.
    pub offset: usize,
}

impl Position {
    pub fn new(block_id: BlockId, offset: usize) -> Self {
        Self { block_id, offset }
    }

    pub fn start_of(block_id: BlockId) -> Self {
        Self::new(block_id, 0)
    }
}

/// Result of [`Document::insert_block_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    /// Id of the block created for the requested kind.
    pub block_id: BlockId,
    /// Where the caret should land.
    pub caret: Position,
}

/// Result of [`Document::merge_with_previous`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackspaceOutcome {
    /// An empty formatted block was turned into plain text in place.
    Demoted(Position),
    /// An empty block (or the divider before it) was removed.
    Removed(Position),
    /// Ordinary text deletion; the model does nothing.
    Delegated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Top(usize),
    Item { list: usize, item: usize },
}

/// The single always-on document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates the canonical empty document (one empty text block).
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::empty_text()],
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        let mut document = Self { blocks };
        document.normalize();
        document
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Replaces the whole block tree in one step (import path).
    pub fn replace_all(&mut self, blocks: Vec<Block>) -> Position {
        self.blocks = blocks;
        self.normalize();
        self.first_caret()
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        match self.locate(id)? {
            Slot::Top(index) => self.blocks.get(index),
            Slot::Item { list, item } => self.blocks[list].children.get(item),
        }
    }

    /// Id of the list container holding `item_id`, if it is a list item.
    pub fn parent_list(&self, item_id: BlockId) -> Option<&Block> {
        match self.locate(item_id)? {
            Slot::Item { list, .. } => self.blocks.get(list),
            Slot::Top(_) => None,
        }
    }

    /// Caret-addressable blocks in document order (list items, not lists).
    pub fn leaves(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().flat_map(|block| {
            if block.kind.is_container() {
                block.children.iter().collect::<Vec<_>>()
            } else {
                vec![block]
            }
        })
    }

    /// Plain text rendering: one line per leaf block.
    pub fn plain_text(&self) -> String {
        self.leaves()
            .map(|block| block.content.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_visible_text(&self) -> bool {
        self.blocks.iter().any(Block::has_visible_text)
    }

    /// Whether the empty-document hint should show: no text and no
    /// structural block at all.
    pub fn is_visually_empty(&self) -> bool {
        !self.has_visible_text()
            && self
                .blocks
                .iter()
                .all(|block| matches!(block.kind, BlockKind::Text | BlockKind::Code))
    }

    /// Clamps `position` to its block, or `None` when the block is gone.
    pub fn clamp(&self, position: Position) -> Option<Position> {
        let block = self.find(position.block_id)?;
        Some(Position::new(
            position.block_id,
            position.offset.min(block.text_len()),
        ))
    }

    pub fn first_caret(&self) -> Position {
        self.leaves()
            .find(|block| block.kind.has_text())
            .map(|block| Position::start_of(block.id))
            .unwrap_or_else(|| Position::start_of(self.blocks[0].id))
    }

    /// Inserts `text` at `at`; returns the caret after the insertion.
    ///
    /// Typing into a todo that only holds the placeholder replaces it.
    pub fn insert_text(&mut self, at: Position, text: &str) -> Option<Position> {
        let block = self.text_block_mut(at.block_id)?;
        if text.is_empty() {
            return Some(Position::new(at.block_id, at.offset.min(block.text_len())));
        }
        if block.content.is_placeholder() {
            block.content = InlineText::new();
        }
        let offset = if block.kind == BlockKind::Code {
            let offset = at.offset.min(block.content.char_len());
            block.content.insert_span(offset, InlineSpan::plain(text))
        } else {
            block.content.insert_str(at.offset, text)
        };
        Some(Position::new(at.block_id, offset))
    }

    /// Inserts a link span (paste of a bare URL).
    pub fn insert_link(&mut self, at: Position, href: &str, label: &str) -> Option<Position> {
        let block = self.text_block_mut(at.block_id)?;
        if block.kind == BlockKind::Code {
            let offset = at.offset.min(block.content.char_len());
            let caret = block.content.insert_span(offset, InlineSpan::plain(label));
            return Some(Position::new(at.block_id, caret));
        }
        if block.content.is_placeholder() {
            block.content = InlineText::new();
        }
        let caret = block
            .content
            .insert_span(at.offset, InlineSpan::new(label, Marks::link(href)));
        Some(Position::new(at.block_id, caret))
    }

    /// Deletes `[start, end)` inside one block; returns the caret at `start`.
    pub fn delete_range(&mut self, block_id: BlockId, start: usize, end: usize) -> Option<Position> {
        let block = self.text_block_mut(block_id)?;
        let (start, end) = (start.min(end), start.max(end));
        block.content.delete_range(start, end);
        block.ensure_placeholder();
        Some(Position::new(block_id, start.min(block.text_len())))
    }

    /// Deletes everything between two positions, in either order and across
    /// blocks. The first block keeps its kind and receives the text left
    /// after the last position; blocks in between are removed.
    pub fn delete_across(&mut self, anchor: Position, focus: Position) -> Option<Position> {
        let order: Vec<BlockId> = self.leaves().map(|block| block.id).collect();
        let anchor_index = order.iter().position(|id| *id == anchor.block_id)?;
        let focus_index = order.iter().position(|id| *id == focus.block_id)?;
        if anchor_index == focus_index {
            return self.delete_range(anchor.block_id, anchor.offset, focus.offset);
        }
        let (start, end, start_index, end_index) = if anchor_index < focus_index {
            (anchor, focus, anchor_index, focus_index)
        } else {
            (focus, anchor, focus_index, anchor_index)
        };

        let tail = match self.text_block_mut(end.block_id) {
            Some(block) if !block.content.is_placeholder() => {
                let offset = end.offset.min(block.content.char_len());
                block.content.split_off(offset)
            }
            _ => InlineText::new(),
        };
        for id in &order[start_index + 1..=end_index] {
            self.detach(*id);
        }

        let caret = match self.text_block_mut(start.block_id) {
            Some(block) => {
                if block.content.is_placeholder() {
                    block.content = InlineText::new();
                }
                let offset = start.offset.min(block.content.char_len());
                block.content.split_off(offset);
                let tail = if block.kind == BlockKind::Code {
                    tail.to_unformatted()
                } else {
                    tail
                };
                block.content.append(tail);
                block.ensure_placeholder();
                Some(Position::new(start.block_id, offset))
            }
            None => {
                self.detach(start.block_id);
                None
            }
        };

        self.normalize();
        self.normalize_empty();
        Some(
            caret
                .and_then(|position| self.clamp(position))
                .unwrap_or_else(|| self.first_caret()),
        )
    }

    /// Splits `anchor` at `offset` and inserts a block of `kind` after it.
    ///
    /// The anchor's trailing content moves into the new block. An empty text
    /// anchor is replaced instead when inserting a todo or a divider.
    pub fn insert_block_after(
        &mut self,
        anchor: BlockId,
        offset: usize,
        kind: BlockKind,
    ) -> Option<Inserted> {
        let slot = self.locate(anchor)?;
        let anchor_block = self.block_at_mut(slot);
        let replace_anchor = anchor_block.kind == BlockKind::Text
            && anchor_block.content.is_blank()
            && matches!(kind, BlockKind::TodoItem | BlockKind::Divider);
        let tail = if anchor_block.kind.has_text() && !replace_anchor {
            let offset = offset.min(anchor_block.content.char_len());
            let tail = anchor_block.content.split_off(offset);
            anchor_block.ensure_placeholder();
            tail
        } else {
            InlineText::new()
        };
        let tail = if tail.is_placeholder() {
            InlineText::new()
        } else {
            tail
        };

        if kind == BlockKind::ListItem || kind.is_container() {
            return Some(self.insert_list_item_after(slot, kind, tail));
        }

        let mut created = vec![Block::leaf(kind, tail)];
        let block_id = created[0].id;
        let caret = match kind {
            BlockKind::Divider => {
                let follow = Block::text(created[0].content.clone());
                created[0].content = InlineText::new();
                let caret = Position::start_of(follow.id);
                created.push(follow);
                caret
            }
            BlockKind::TodoItem if created[0].content.is_placeholder() => {
                Position::new(block_id, 1)
            }
            _ => Position::start_of(block_id),
        };

        let index = match slot {
            Slot::Top(index) if replace_anchor => {
                self.blocks.remove(index);
                index
            }
            Slot::Top(index) => index + 1,
            Slot::Item { list, item } => self.split_list(list, item + 1),
        };
        for (shift, block) in created.into_iter().enumerate() {
            self.blocks.insert(index + shift, block);
        }
        self.coalesce_lists();
        Some(Inserted { block_id, caret })
    }

    /// Backspace with the caret at the start of `block_id`.
    pub fn merge_with_previous(&mut self, block_id: BlockId) -> Option<BackspaceOutcome> {
        let slot = self.locate(block_id)?;
        let block = self.block_at(slot);
        if !block.kind.has_text() {
            return None;
        }

        if block.kind.is_formatted() && block.content.is_blank() {
            let position = self.convert_block(block_id, BlockKind::Text)?;
            if let Some(block) = self.text_block_mut(block_id) {
                block.content = InlineText::new();
            }
            return Some(BackspaceOutcome::Demoted(position));
        }

        if block.kind != BlockKind::Text || !block.content.is_empty() {
            return Some(BackspaceOutcome::Delegated);
        }

        let Slot::Top(index) = slot else {
            return Some(BackspaceOutcome::Delegated);
        };
        if index == 0 {
            return Some(BackspaceOutcome::Delegated);
        }
        if self.blocks[index - 1].kind == BlockKind::Divider {
            self.blocks.remove(index - 1);
            self.coalesce_lists();
            return Some(BackspaceOutcome::Removed(Position::start_of(block_id)));
        }

        let previous = self.previous_leaf(block_id)?;
        let caret = Position::new(previous.id, previous.text_len());
        self.blocks.remove(index);
        self.coalesce_lists();
        Some(BackspaceOutcome::Removed(caret))
    }

    /// Flips the `checked` flag of a todo item; returns the new state.
    pub fn toggle_todo(&mut self, block_id: BlockId) -> Option<bool> {
        let slot = self.locate(block_id)?;
        let block = self.block_at_mut(slot);
        if block.kind != BlockKind::TodoItem {
            return None;
        }
        block.checked = !block.checked;
        Some(block.checked)
    }

    /// Changes the kind of a block, keeping its inline content.
    pub fn convert_block(&mut self, block_id: BlockId, kind: BlockKind) -> Option<Position> {
        let slot = self.locate(block_id)?;
        let current = self.block_at(slot).kind;
        if current == kind {
            return Some(Position::start_of(block_id));
        }
        if !current.has_text() {
            return None;
        }

        if kind == BlockKind::Divider {
            let end = self.block_at(slot).text_len();
            return self
                .insert_block_after(block_id, end, kind)
                .map(|inserted| inserted.caret);
        }

        if kind.is_container() || kind == BlockKind::ListItem {
            let list_kind = if kind.is_container() {
                kind
            } else {
                BlockKind::BulletList
            };
            return Some(self.wrap_in_list(slot, block_id, list_kind));
        }

        let index = match slot {
            Slot::Top(index) => index,
            Slot::Item { list, item } => self.lift_list_item(list, item),
        };
        let block = &mut self.blocks[index];
        if block.kind.is_container() {
            return None;
        }
        let was_todo = block.kind == BlockKind::TodoItem;
        if was_todo && block.content.is_placeholder() {
            block.content = InlineText::new();
        }
        if kind == BlockKind::Code {
            block.content = block.content.to_unformatted();
        }
        if !(was_todo && kind == BlockKind::TodoItem) {
            block.checked = false;
        }
        block.language = None;
        block.kind = kind;
        block.ensure_placeholder();
        self.coalesce_lists();
        Some(Position::start_of(block_id))
    }

    /// Removes a block entirely; returns where the caret should go.
    pub fn remove_block(&mut self, block_id: BlockId) -> Option<Position> {
        let slot = self.locate(block_id)?;
        let previous = self
            .previous_leaf(block_id)
            .map(|block| Position::new(block.id, block.text_len()));
        match slot {
            Slot::Top(index) => {
                self.blocks.remove(index);
            }
            Slot::Item { list, item } => {
                self.blocks[list].children.remove(item);
                if self.blocks[list].children.is_empty() {
                    self.blocks.remove(list);
                }
            }
        }
        self.normalize();
        Some(
            previous
                .and_then(|position| self.clamp(position))
                .unwrap_or_else(|| self.first_caret()),
        )
    }

    /// Deletes every block; the document keeps one empty text block.
    pub fn clear(&mut self) -> Position {
        self.blocks.clear();
        self.normalize();
        self.first_caret()
    }

    /// Canonicalizes a document without visible content to one empty text
    /// block. Returns whether the document is (now) that canonical form.
    pub fn normalize_empty(&mut self) -> bool {
        let has_divider = self
            .blocks
            .iter()
            .any(|block| block.kind == BlockKind::Divider);
        if self.has_visible_text() || has_divider {
            return false;
        }
        let is_canonical = self.blocks.len() == 1
            && self.blocks[0].kind == BlockKind::Text
            && self.blocks[0].content.is_empty();
        if !is_canonical {
            self.blocks = vec![Block::empty_text()];
        }
        true
    }

    /// Re-establishes structural invariants after bulk changes.
    pub fn normalize(&mut self) {
        self.blocks.retain(|block| !block.kind.is_container() || !block.children.is_empty());
        for block in &mut self.blocks {
            if block.kind == BlockKind::ListItem {
                block.kind = BlockKind::Text;
            }
            block.ensure_placeholder();
            for child in &mut block.children {
                child.kind = BlockKind::ListItem;
                child.children.clear();
            }
        }
        self.coalesce_lists();
        if self.blocks.is_empty() {
            self.blocks.push(Block::empty_text());
        }
    }

    fn locate(&self, id: BlockId) -> Option<Slot> {
        for (index, block) in self.blocks.iter().enumerate() {
            if block.id == id {
                return Some(Slot::Top(index));
            }
            if let Some(item) = block.children.iter().position(|child| child.id == id) {
                return Some(Slot::Item { list: index, item });
            }
        }
        None
    }

    fn block_at(&self, slot: Slot) -> &Block {
        match slot {
            Slot::Top(index) => &self.blocks[index],
            Slot::Item { list, item } => &self.blocks[list].children[item],
        }
    }

    fn block_at_mut(&mut self, slot: Slot) -> &mut Block {
        match slot {
            Slot::Top(index) => &mut self.blocks[index],
            Slot::Item { list, item } => &mut self.blocks[list].children[item],
        }
    }

    fn text_block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        let slot = self.locate(id)?;
        let block = self.block_at_mut(slot);
        block.kind.has_text().then_some(block)
    }

    /// Removes one leaf without normalizing; emptied lists are left for
    /// `normalize`.
    fn detach(&mut self, id: BlockId) {
        match self.locate(id) {
            Some(Slot::Top(index)) => {
                self.blocks.remove(index);
            }
            Some(Slot::Item { list, item }) => {
                self.blocks[list].children.remove(item);
            }
            None => {}
        }
    }

    fn previous_leaf(&self, id: BlockId) -> Option<&Block> {
        let mut previous = None;
        for block in self.leaves() {
            if block.id == id {
                return previous;
            }
            if block.kind.has_text() {
                previous = Some(block);
            }
        }
        None
    }

    fn insert_list_item_after(&mut self, slot: Slot, kind: BlockKind, tail: InlineText) -> Inserted {
        let item = Block::list_item(tail);
        let caret = Position::start_of(item.id);
        let block_id = item.id;
        match slot {
            Slot::Item { list, item: index }
                if kind == BlockKind::ListItem || self.blocks[list].kind == kind =>
            {
                self.blocks[list].children.insert(index + 1, item);
            }
            Slot::Item { list, item: index } => {
                let at = self.split_list(list, index + 1);
                self.blocks.insert(at, Block::list(kind, vec![item]));
            }
            Slot::Top(index) => {
                let list_kind = if kind.is_container() {
                    kind
                } else {
                    BlockKind::BulletList
                };
                self.blocks.insert(index + 1, Block::list(list_kind, vec![item]));
            }
        }
        self.coalesce_lists();
        Inserted { block_id, caret }
    }

    /// Moves items `from..` of list `list` into a new container right after
    /// it. Returns the top-level index between the two halves.
    fn split_list(&mut self, list: usize, from: usize) -> usize {
        let container = &mut self.blocks[list];
        if from >= container.children.len() {
            return list + 1;
        }
        let tail = container.children.split_off(from);
        let kind = container.kind;
        self.blocks.insert(list + 1, Block::list(kind, tail));
        list + 1
    }

    /// Pulls one list item out to top level as a text block, splitting the
    /// list around it. Returns the new top-level index of the item.
    fn lift_list_item(&mut self, list: usize, item: usize) -> usize {
        let at = self.split_list(list, item + 1);
        let mut lifted = self.blocks[list].children.remove(item);
        lifted.kind = BlockKind::Text;
        if self.blocks[list].children.is_empty() {
            self.blocks.remove(list);
            self.blocks.insert(list, lifted);
            list
        } else {
            self.blocks.insert(at, lifted);
            at
        }
    }

    fn wrap_in_list(&mut self, slot: Slot, block_id: BlockId, list_kind: BlockKind) -> Position {
        match slot {
            Slot::Item { list, item } if self.blocks[list].kind != list_kind => {
                let at = self.split_list(list, item + 1);
                let moved = self.blocks[list].children.remove(item);
                if self.blocks[list].children.is_empty() {
                    self.blocks[list] = Block::list(list_kind, vec![moved]);
                } else {
                    self.blocks.insert(at, Block::list(list_kind, vec![moved]));
                }
            }
            Slot::Item { .. } => {}
            Slot::Top(index) => {
                let mut block = self.blocks.remove(index);
                if block.content.is_placeholder() {
                    block.content = InlineText::new();
                }
                block.kind = BlockKind::ListItem;
                block.checked = false;
                block.language = None;
                self.blocks.insert(index, Block::list(list_kind, vec![block]));
            }
        }
        self.coalesce_lists();
        Position::start_of(block_id)
    }

    fn coalesce_lists(&mut self) {
        let mut index = 1;
        while index < self.blocks.len() {
            let same_list = self.blocks[index].kind.is_container()
                && self.blocks[index].kind == self.blocks[index - 1].kind;
            if same_list {
                let next = self.blocks.remove(index);
                self.blocks[index - 1].children.extend(next.children);
            } else {
                index += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackspaceOutcome, Document, Position};
    use crate::model::block::{Block, BlockKind};
    use crate::model::inline::InlineText;

    fn doc_with(blocks: Vec<Block>) -> Document {
        Document::from_blocks(blocks)
    }

    #[test]
    fn split_moves_trailing_content_into_new_block() {
        let mut doc = doc_with(vec![Block::heading(1, InlineText::plain("Title rest"))]);
        let anchor = doc.blocks()[0].id;
        let inserted = doc.insert_block_after(anchor, 5, BlockKind::Text).unwrap();

        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[0].content.plain_text(), "Title");
        assert_eq!(doc.blocks()[1].content.plain_text(), " rest");
        assert_eq!(inserted.caret, Position::start_of(inserted.block_id));
    }

    #[test]
    fn todo_replaces_empty_text_anchor_and_caret_skips_placeholder() {
        let mut doc = Document::new();
        let anchor = doc.blocks()[0].id;
        let inserted = doc.insert_block_after(anchor, 0, BlockKind::TodoItem).unwrap();

        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].kind, BlockKind::TodoItem);
        assert_eq!(inserted.caret, Position::new(inserted.block_id, 1));
        assert!(doc.find(anchor).is_none());
    }

    #[test]
    fn divider_is_followed_by_a_caret_block() {
        let mut doc = doc_with(vec![Block::text(InlineText::plain("above"))]);
        let anchor = doc.blocks()[0].id;
        let inserted = doc.insert_block_after(anchor, 5, BlockKind::Divider).unwrap();

        let kinds: Vec<_> = doc.blocks().iter().map(|block| block.kind).collect();
        assert_eq!(kinds, vec![BlockKind::Text, BlockKind::Divider, BlockKind::Text]);
        assert_eq!(inserted.caret.block_id, doc.blocks()[2].id);
    }

    #[test]
    fn empty_middle_list_item_is_lifted_and_list_split() {
        let items = ["a", "", "c"]
            .iter()
            .map(|text| Block::list_item(InlineText::plain(*text)))
            .collect();
        let mut doc = doc_with(vec![Block::list(BlockKind::NumberList, items)]);
        let middle = doc.blocks()[0].children[1].id;

        let outcome = doc.merge_with_previous(middle).unwrap();
        assert_eq!(outcome, BackspaceOutcome::Demoted(Position::start_of(middle)));

        let kinds: Vec<_> = doc.blocks().iter().map(|block| block.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::NumberList, BlockKind::Text, BlockKind::NumberList]
        );
        assert_eq!(doc.blocks()[1].id, middle);
    }

    #[test]
    fn backspace_on_content_is_delegated() {
        let mut doc = doc_with(vec![Block::quote(InlineText::plain("keep"))]);
        let id = doc.blocks()[0].id;
        assert_eq!(doc.merge_with_previous(id), Some(BackspaceOutcome::Delegated));
        assert_eq!(doc.blocks()[0].kind, BlockKind::Quote);
    }

    #[test]
    fn converting_to_list_merges_with_adjacent_list() {
        let mut doc = doc_with(vec![
            Block::list(
                BlockKind::BulletList,
                vec![Block::list_item(InlineText::plain("one"))],
            ),
            Block::text(InlineText::plain("two")),
        ]);
        let id = doc.blocks()[1].id;
        doc.convert_block(id, BlockKind::BulletList).unwrap();

        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].children.len(), 2);
        assert_eq!(doc.blocks()[0].children[1].id, id);
    }

    #[test]
    fn converting_one_item_to_other_list_kind_splits_the_list() {
        let items = ["a", "b", "c"]
            .iter()
            .map(|text| Block::list_item(InlineText::plain(*text)))
            .collect();
        let mut doc = doc_with(vec![Block::list(BlockKind::BulletList, items)]);
        let middle = doc.blocks()[0].children[1].id;

        doc.convert_block(middle, BlockKind::NumberList).unwrap();
        let kinds: Vec<_> = doc.blocks().iter().map(|block| block.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::BulletList, BlockKind::NumberList, BlockKind::BulletList]
        );
        assert_eq!(doc.blocks()[1].children[0].id, middle);
        assert_eq!(doc.blocks()[0].children.len(), 1);
        assert_eq!(doc.blocks()[2].children.len(), 1);
    }

    #[test]
    fn delete_across_blocks_joins_the_remaining_halves() {
        let mut doc = doc_with(vec![
            Block::heading(2, InlineText::plain("Title")),
            Block::list(
                BlockKind::BulletList,
                vec![Block::list_item(InlineText::plain("gone"))],
            ),
            Block::text(InlineText::plain("tail end")),
        ]);
        let first = doc.blocks()[0].id;
        let last = doc.blocks()[2].id;

        let caret = doc
            .delete_across(Position::new(last, 5), Position::new(first, 2))
            .unwrap();
        assert_eq!(caret, Position::new(first, 2));
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].kind, BlockKind::Heading2);
        assert_eq!(doc.plain_text(), "Tiend");
    }

    #[test]
    fn delete_across_everything_leaves_canonical_empty_document() {
        let mut doc = doc_with(vec![
            Block::text(InlineText::plain("one")),
            Block::divider(),
            Block::text(InlineText::plain("two")),
        ]);
        let first = doc.blocks()[0].id;
        let last = doc.blocks()[2].id;

        let caret = doc
            .delete_across(Position::start_of(first), Position::new(last, 3))
            .unwrap();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].kind, BlockKind::Text);
        assert!(doc.blocks()[0].content.is_empty());
        assert_eq!(caret, Position::start_of(doc.blocks()[0].id));
    }

    #[test]
    fn stale_ids_are_no_ops() {
        let mut doc = Document::new();
        let stale = Block::empty_text().id;
        assert!(doc.toggle_todo(stale).is_none());
        assert!(doc.convert_block(stale, BlockKind::Quote).is_none());
        assert!(doc.insert_block_after(stale, 0, BlockKind::Text).is_none());
        assert!(doc.merge_with_previous(stale).is_none());
    }
}
