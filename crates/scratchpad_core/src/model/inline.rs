//! Inline span model.
//!
//! # Responsibility
//! - Represent the text of a leaf block as runs of uniformly formatted
//!   characters.
//! - Provide offset-based editing primitives for structural operations.
//!
//! # Invariants
//! - After any public mutation no span is empty and no two adjacent spans
//!   carry identical marks.
//! - Offsets count Unicode scalar values, never bytes.

use serde::{Deserialize, Serialize};

/// Empty-content sentinel kept inside todo text runs so the caret always
/// has a character to sit behind.
pub const PLACEHOLDER: char = '\u{00A0}';

/// Character-level formatting flags of one span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_href: Option<String>,
}

impl Marks {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }

    pub fn code() -> Self {
        Self {
            code: true,
            ..Self::default()
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Self {
            link_href: Some(href.into()),
            ..Self::default()
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// A run of characters sharing one set of marks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineSpan {
    pub text: String,
    #[serde(default)]
    pub marks: Marks,
}

impl InlineSpan {
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Marks::default())
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Normalized inline content of one leaf block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineText {
    spans: Vec<InlineSpan>,
}

impl InlineText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds unformatted content.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::from_spans(vec![InlineSpan::plain(text)])
    }

    /// Builds content from arbitrary spans, coalescing as needed.
    pub fn from_spans(spans: Vec<InlineSpan>) -> Self {
        let mut text = Self { spans };
        text.normalize();
        text
    }

    /// Content consisting only of the empty-content sentinel.
    pub fn placeholder() -> Self {
        Self::plain(PLACEHOLDER.to_string())
    }

    pub fn spans(&self) -> &[InlineSpan] {
        &self.spans
    }

    pub fn into_spans(self) -> Vec<InlineSpan> {
        self.spans
    }

    /// Appends one span, merging it into the last span when marks match.
    pub fn push(&mut self, span: InlineSpan) {
        if span.text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.marks == span.marks => last.text.push_str(&span.text),
            _ => self.spans.push(span),
        }
    }

    pub fn append(&mut self, other: InlineText) {
        for span in other.spans {
            self.push(span);
        }
    }

    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn char_len(&self) -> usize {
        self.spans.iter().map(InlineSpan::char_len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// True when there is nothing but whitespace or the sentinel.
    pub fn is_blank(&self) -> bool {
        self.spans.iter().all(|span| {
            span.text
                .chars()
                .all(|c| c.is_whitespace() || c == PLACEHOLDER)
        })
    }

    /// True when the content is exactly the empty-content sentinel.
    pub fn is_placeholder(&self) -> bool {
        self.spans.len() == 1
            && self.spans[0].marks.is_plain()
            && self.spans[0].text.chars().eq([PLACEHOLDER])
    }

    /// Drops every mark, keeping the characters.
    pub fn to_unformatted(&self) -> InlineText {
        InlineText::plain(self.plain_text())
    }

    /// Marks in effect for a character typed at `offset`.
    ///
    /// Typing continues the span before the caret, except that a link is not
    /// extended past its end.
    pub fn marks_for_insert(&self, offset: usize) -> Marks {
        let mut remaining = offset;
        for span in &self.spans {
            let len = span.char_len();
            if remaining < len {
                return span.marks.clone();
            }
            if remaining == len {
                let mut marks = span.marks.clone();
                marks.link_href = None;
                return marks;
            }
            remaining -= len;
        }
        Marks::default()
    }

    /// Returns the marks of the character just before `offset`.
    pub fn marks_before(&self, offset: usize) -> Option<&Marks> {
        if offset == 0 {
            return None;
        }
        let mut remaining = offset;
        for span in &self.spans {
            let len = span.char_len();
            if remaining <= len {
                return Some(&span.marks);
            }
            remaining -= len;
        }
        None
    }

    /// Splits at `offset`: `self` keeps `[0, offset)`, the rest is returned.
    pub fn split_off(&mut self, offset: usize) -> InlineText {
        let mut remaining = offset;
        let mut index = 0;
        while index < self.spans.len() {
            let len = self.spans[index].char_len();
            if remaining < len {
                break;
            }
            remaining -= len;
            index += 1;
        }

        if index >= self.spans.len() {
            return InlineText::new();
        }

        let mut tail = self.spans.split_off(index);
        if remaining > 0 {
            let first = &mut tail[0];
            let cut = byte_index(&first.text, remaining);
            let right = first.text.split_off(cut);
            let head = std::mem::replace(&mut first.text, right);
            self.spans.push(InlineSpan::new(head, first.marks.clone()));
        }
        InlineText::from_spans(tail)
    }

    /// Inserts `text` at `offset` using the marks of the surrounding span.
    /// Returns the offset just past the inserted text.
    pub fn insert_str(&mut self, offset: usize, text: &str) -> usize {
        let marks = self.marks_for_insert(offset);
        self.insert_span(offset, InlineSpan::new(text, marks))
    }

    /// Inserts a preformatted span at `offset`.
    /// Returns the offset just past the inserted span.
    pub fn insert_span(&mut self, offset: usize, span: InlineSpan) -> usize {
        let offset = offset.min(self.char_len());
        let inserted = span.char_len();
        let tail = self.split_off(offset);
        self.push(span);
        self.append(tail);
        offset + inserted
    }

    /// Deletes the characters in `[start, end)`; bounds are clamped.
    pub fn delete_range(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let (start, end) = (start.min(len), end.min(len));
        if start >= end {
            return;
        }
        let tail = self.split_off(end);
        self.split_off(start);
        self.append(tail);
    }

    /// Text of the characters before `offset`.
    pub fn text_before(&self, offset: usize) -> String {
        self.plain_text().chars().take(offset).collect()
    }

    fn normalize(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        for span in spans {
            self.push(span);
        }
    }
}

/// Converts a character offset into a byte index of `text`.
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::{InlineSpan, InlineText, Marks, PLACEHOLDER};

    fn mixed() -> InlineText {
        InlineText::from_spans(vec![
            InlineSpan::plain("ab"),
            InlineSpan::new("cd", Marks::bold()),
            InlineSpan::plain("ef"),
        ])
    }

    #[test]
    fn from_spans_coalesces_identical_neighbours_and_drops_empty_runs() {
        let text = InlineText::from_spans(vec![
            InlineSpan::plain("a"),
            InlineSpan::plain(""),
            InlineSpan::plain("b"),
            InlineSpan::new("c", Marks::italic()),
            InlineSpan::new("d", Marks::italic()),
        ]);
        assert_eq!(
            text.spans(),
            &[
                InlineSpan::plain("ab"),
                InlineSpan::new("cd", Marks::italic())
            ]
        );
    }

    #[test]
    fn split_off_inside_a_span_keeps_marks_on_both_sides() {
        let mut head = mixed();
        let tail = head.split_off(3);
        assert_eq!(
            head.spans(),
            &[InlineSpan::plain("ab"), InlineSpan::new("c", Marks::bold())]
        );
        assert_eq!(
            tail.spans(),
            &[InlineSpan::new("d", Marks::bold()), InlineSpan::plain("ef")]
        );
    }

    #[test]
    fn delete_range_rejoins_matching_spans() {
        let mut text = mixed();
        text.delete_range(2, 4);
        assert_eq!(text.spans(), &[InlineSpan::plain("abef")]);
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let mut text = InlineText::plain("héllo");
        let tail = text.split_off(2);
        assert_eq!(text.plain_text(), "hé");
        assert_eq!(tail.plain_text(), "llo");
    }

    #[test]
    fn typing_after_a_link_does_not_extend_it() {
        let mut text = InlineText::from_spans(vec![InlineSpan::new("site", Marks::link("https://x.y"))]);
        let caret = text.insert_str(4, "!");
        assert_eq!(caret, 5);
        assert_eq!(text.spans()[1], InlineSpan::plain("!"));
    }

    #[test]
    fn placeholder_is_blank_but_not_empty() {
        let text = InlineText::placeholder();
        assert!(text.is_placeholder());
        assert!(text.is_blank());
        assert!(!text.is_empty());
        assert_eq!(text.plain_text(), PLACEHOLDER.to_string());
    }
}
