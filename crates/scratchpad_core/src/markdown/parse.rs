//! Line-oriented Markdown parser.
//!
//! # Responsibility
//! - Turn imported Markdown into block records in one forward pass.
//!
//! # Invariants
//! - Line rules are tried in a fixed priority order; the first match wins.
//! - Fenced code content is kept verbatim and never inline-parsed.
//! - Parsing never fails; anything unrecognized becomes a text block.

use crate::markdown::inline::parse_inline;
use crate::model::block::{Block, BlockKind};
use crate::model::inline::{InlineSpan, InlineText};
use once_cell::sync::Lazy;
use regex::Regex;

const FENCE: &str = "```";

static THEMATIC_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-{3,}|\*{3,}|_{3,})\s*$").expect("valid thematic break regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(#{1,3}) (.+)$").expect("valid heading regex"));
static TODO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*+] \[([ xX])\](?: (.*))?$").expect("valid todo regex"));
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-*+] (.*)$").expect("valid bullet regex"));
static NUMBERED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)] (.*)$").expect("valid numbered regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListMarker {
    Bullet,
    Numbered,
}

impl ListMarker {
    fn kind(self) -> BlockKind {
        match self {
            Self::Bullet => BlockKind::BulletList,
            Self::Numbered => BlockKind::NumberList,
        }
    }
}

/// Parses a Markdown document into blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    let normalized = markdown.replace('\r', "");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let mut blocks = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index];

        if let Some(tag) = line.strip_prefix(FENCE) {
            let mut body = Vec::new();
            index += 1;
            while index < lines.len() && !lines[index].starts_with(FENCE) {
                body.push(lines[index]);
                index += 1;
            }
            let tag = tag.trim();
            let language = (!tag.is_empty()).then(|| tag.to_string());
            blocks.push(Block::code(language, body.join("\n")));
            index += 1;
            continue;
        }

        if THEMATIC_BREAK_RE.is_match(line) {
            blocks.push(Block::divider());
            index += 1;
            continue;
        }

        if let Some(captures) = HEADING_RE.captures(line) {
            let level = captures.get(1).map_or(1, |hashes| hashes.as_str().len());
            let text = captures.get(2).map_or("", |text| text.as_str());
            blocks.push(Block::heading(level as u8, parse_inline(text)));
            index += 1;
            continue;
        }

        if let Some(block) = parse_todo(line) {
            blocks.push(block);
            index += 1;
            continue;
        }

        if let Some((marker, _)) = list_item(line) {
            let mut items = Vec::new();
            while index < lines.len() {
                match list_item(lines[index]) {
                    Some((next, text)) if next == marker => {
                        items.push(Block::list_item(parse_inline(text)));
                        index += 1;
                    }
                    _ => break,
                }
            }
            blocks.push(Block::list(marker.kind(), items));
            continue;
        }

        if line.starts_with('>') {
            let mut content = InlineText::new();
            let mut first = true;
            while index < lines.len() && lines[index].starts_with('>') {
                if !first {
                    content.push(InlineSpan::plain("\n"));
                }
                let body = &lines[index][1..];
                content.append(parse_inline(body.strip_prefix(' ').unwrap_or(body)));
                first = false;
                index += 1;
            }
            blocks.push(Block::quote(content));
            continue;
        }

        if line.trim().is_empty() {
            blocks.push(Block::empty_text());
        } else {
            blocks.push(Block::text(parse_inline(line)));
        }
        index += 1;
    }

    blocks
}

fn parse_todo(line: &str) -> Option<Block> {
    let captures = TODO_RE.captures(line)?;
    let checked = captures.get(1).is_some_and(|state| state.as_str() != " ");
    let text = captures.get(2).map_or("", |text| text.as_str());
    Some(Block::todo(parse_inline(text), checked))
}

/// Classifies a non-todo list line.
fn list_item(line: &str) -> Option<(ListMarker, &str)> {
    if TODO_RE.is_match(line) {
        return None;
    }
    if let Some(captures) = BULLET_RE.captures(line) {
        return Some((ListMarker::Bullet, captures.get(1).map_or("", |m| m.as_str())));
    }
    NUMBERED_RE
        .captures(line)
        .map(|captures| (ListMarker::Numbered, captures.get(1).map_or("", |m| m.as_str())))
}
