//! Inline Markdown: `**bold**`, `*italic*`, `` `code` `` and `[label](url)`.
//!
//! # Invariants
//! - Code spans are recognized first and their content is inert.
//! - A `*`/`_` directly next to an identical delimiter never opens or closes
//!   italic.
//! - Parsing never fails; unmatched delimiters stay literal text.

use crate::html::render::render_inline;
use crate::model::inline::{InlineSpan, InlineText, Marks};
use once_cell::sync::Lazy;
use regex::Regex;

static CODE_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid code span regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*|__([^_]+)__").expect("valid bold regex"));

/// Parses one line of inline Markdown into marked spans.
pub fn parse_inline(text: &str) -> InlineText {
    let mut out = InlineText::new();
    parse_code_spans(text, &mut out);
    out
}

/// Renders inline Markdown straight to escaped HTML.
pub fn render_inline_html(text: &str) -> String {
    render_inline(&parse_inline(text))
}

fn parse_code_spans(text: &str, out: &mut InlineText) {
    let mut last = 0;
    for captures in CODE_SPAN_RE.captures_iter(text) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        parse_links(&text[last..whole.start()], out);
        out.push(InlineSpan::new(inner.as_str(), Marks::code()));
        last = whole.end();
    }
    parse_links(&text[last..], out);
}

fn parse_links(text: &str, out: &mut InlineText) {
    let mut last = 0;
    for captures in LINK_RE.captures_iter(text) {
        let (Some(whole), Some(label), Some(href)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        parse_bold(&text[last..whole.start()], &Marks::default(), out);
        parse_bold(label.as_str(), &Marks::link(href.as_str()), out);
        last = whole.end();
    }
    parse_bold(&text[last..], &Marks::default(), out);
}

fn parse_bold(text: &str, base: &Marks, out: &mut InlineText) {
    let mut last = 0;
    for captures in BOLD_RE.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        let Some(inner) = captures.get(1).or_else(|| captures.get(2)) else {
            continue;
        };
        parse_italic(&text[last..whole.start()], base, out);
        let mut marks = base.clone();
        marks.bold = true;
        parse_italic(inner.as_str(), &marks, out);
        last = whole.end();
    }
    parse_italic(&text[last..], base, out);
}

fn parse_italic(text: &str, base: &Marks, out: &mut InlineText) {
    let mut rest = text;
    while let Some((open, close)) = find_italic(rest) {
        out.push(InlineSpan::new(&rest[..open], base.clone()));
        let mut marks = base.clone();
        marks.italic = true;
        out.push(InlineSpan::new(&rest[open + 1..close], marks));
        rest = &rest[close + 1..];
    }
    out.push(InlineSpan::new(rest, base.clone()));
}

/// Byte indices of the next italic opener/closer pair in `text`.
fn find_italic(text: &str) -> Option<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let is_lone = |index: usize, delimiter: char| {
        let before = index.checked_sub(1).map(|i| chars[i].1);
        let after = chars.get(index + 1).map(|(_, c)| *c);
        before != Some(delimiter) && after != Some(delimiter)
    };

    for (open, &(_, delimiter)) in chars.iter().enumerate() {
        if !matches!(delimiter, '*' | '_') || !is_lone(open, delimiter) {
            continue;
        }
        let Some(close) = chars[open + 1..]
            .iter()
            .position(|(_, c)| *c == delimiter)
            .map(|relative| open + 1 + relative)
        else {
            continue;
        };
        if close > open + 1 && is_lone(close, delimiter) {
            return Some((chars[open].0, chars[close].0));
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Delimiter {
    Link(String),
    Bold,
    Italic(&'static str),
    Code,
}

impl Delimiter {
    fn open(&self) -> &'static str {
        match self {
            Self::Link(_) => "[",
            Self::Bold => "**",
            Self::Italic(marker) => *marker,
            Self::Code => "`",
        }
    }

    fn close(&self, out: &mut String) {
        match self {
            Self::Link(href) => {
                out.push_str("](");
                out.push_str(href);
                out.push(')');
            }
            other => out.push_str(other.open()),
        }
    }

    /// Same mark, ignoring which italic marker was chosen.
    fn same_mark(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Italic(_), Self::Italic(_)) => true,
            _ => self == other,
        }
    }
}

fn delimiters_for(marks: &Marks) -> Vec<Delimiter> {
    let mut wanted = Vec::with_capacity(4);
    if let Some(href) = &marks.link_href {
        wanted.push(Delimiter::Link(href.clone()));
    }
    if marks.bold {
        wanted.push(Delimiter::Bold);
    }
    if marks.italic {
        wanted.push(Delimiter::Italic(if marks.bold { "_" } else { "*" }));
    }
    if marks.code {
        wanted.push(Delimiter::Code);
    }
    wanted
}

/// Re-wraps marked spans with Markdown delimiters.
///
/// Marks nest in the fixed order link, bold, italic, code; italic uses `_`
/// inside bold and `*` otherwise.
pub fn serialize_inline(text: &InlineText) -> String {
    let mut out = String::new();
    let mut open: Vec<Delimiter> = Vec::new();

    for span in text.spans() {
        let wanted = delimiters_for(&span.marks);
        let shared = open
            .iter()
            .zip(&wanted)
            .take_while(|(current, next)| current.same_mark(next))
            .count();
        while open.len() > shared {
            if let Some(delimiter) = open.pop() {
                delimiter.close(&mut out);
            }
        }
        for delimiter in wanted.into_iter().skip(shared) {
            out.push_str(delimiter.open());
            open.push(delimiter);
        }
        out.push_str(&span.text);
    }

    while let Some(delimiter) = open.pop() {
        delimiter.close(&mut out);
    }
    out
}
