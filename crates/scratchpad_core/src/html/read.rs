//! HTML to block reader.
//!
//! # Responsibility
//! - Rebuild block records from sanitized surface markup (restored content
//!   and rendered imports).
//! - Migrate legacy todo markup whose text sits directly after the checkbox.
//!
//! # Invariants
//! - Input is expected to be sanitizer output; parsing follows the HTML5
//!   tree construction rules and never fails on malformed markup.
//! - Loose top-level inline content becomes text blocks split on `<br>`.

use crate::html::render::{CHECKED_CLASS, TODO_CLASS, TODO_TEXT_CLASS};
use crate::model::block::{Block, BlockKind};
use crate::model::inline::{InlineSpan, InlineText, Marks};
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];
const BLOCK_ELEMENTS: &[&str] = &[
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
    "hr",
    "pre",
    "table",
    "thead",
    "tbody",
    "tr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn new(name: &str, attrs: Vec<(String, String)>) -> Self {
        Self {
            name: name.to_string(),
            attrs,
            children: Vec::new(),
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|value| value.split_ascii_whitespace().any(|item| item == class))
    }

    fn is_block(&self) -> bool {
        BLOCK_ELEMENTS.contains(&self.name.as_str())
    }

    fn has_block_children(&self) -> bool {
        self.children
            .iter()
            .any(|child| matches!(child, Node::Element(element) if element.is_block()))
    }

    fn find_descendant(&self, predicate: &dyn Fn(&Element) -> bool) -> Option<&Element> {
        for child in &self.children {
            if let Node::Element(element) = child {
                if predicate(element) {
                    return Some(element);
                }
                if let Some(found) = element.find_descendant(predicate) {
                    return Some(found);
                }
            }
        }
        None
    }
}

/// Reads surface markup into blocks.
pub fn read_document(html: &str) -> Vec<Block> {
    let root = parse_fragment(html);
    let mut reader = BlockReader::default();
    reader.read_container(&root.children);
    reader.flush_loose();
    reader.blocks
}

#[derive(Default)]
struct BlockReader {
    blocks: Vec<Block>,
    loose: InlineText,
}

impl BlockReader {
    fn read_container(&mut self, nodes: &[Node]) {
        for node in nodes {
            match node {
                Node::Text(text) => self.loose.push(InlineSpan::plain(text.as_str())),
                Node::Element(element) if element.name == "br" => self.flush_loose(),
                Node::Element(element) if element.is_block() => {
                    self.flush_loose();
                    self.read_block(element);
                }
                Node::Element(element) if is_inline(&element.name) => {
                    collect_inline(element, &Marks::default(), &mut self.loose);
                }
                Node::Element(element) => {
                    if element.name != "input" {
                        self.read_container(&element.children);
                    }
                }
            }
        }
    }

    fn flush_loose(&mut self) {
        let content = std::mem::take(&mut self.loose);
        if !content.is_blank() {
            self.blocks.push(Block::text(content));
        }
    }

    fn read_block(&mut self, element: &Element) {
        match element.name.as_str() {
            "div" | "p" if element.has_class(TODO_CLASS) => self.blocks.push(read_todo(element)),
            "div" | "p" if element.has_block_children() => {
                self.read_container(&element.children);
                self.flush_loose();
            }
            "div" | "p" | "li" => self.blocks.push(Block::text(block_content(element))),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = element.name[1..].parse::<u8>().unwrap_or(3).min(3);
                self.blocks.push(Block::heading(level, block_content(element)));
            }
            "ul" | "ol" => {
                let mut items = Vec::new();
                collect_list_items(element, &mut items);
                if !items.is_empty() {
                    let kind = if element.name == "ul" {
                        BlockKind::BulletList
                    } else {
                        BlockKind::NumberList
                    };
                    self.blocks.push(Block::list(kind, items));
                }
            }
            "blockquote" => self.blocks.push(Block::quote(block_content(element))),
            "hr" => self.blocks.push(Block::divider()),
            "pre" => self.blocks.push(read_code(element)),
            "table" | "thead" | "tbody" | "tr" => self.read_table(element),
            _ => self.read_container(&element.children),
        }
    }

    fn read_table(&mut self, element: &Element) {
        if element.name == "tr" {
            let cells: Vec<String> = element
                .children
                .iter()
                .filter_map(|child| match child {
                    Node::Element(cell) if cell.name == "td" || cell.name == "th" => {
                        Some(text_content(cell).trim().to_string())
                    }
                    _ => None,
                })
                .collect();
            if !cells.is_empty() {
                self.blocks
                    .push(Block::text(InlineText::plain(cells.join(" | "))));
            }
            return;
        }
        for child in &element.children {
            if let Node::Element(inner) = child {
                self.read_table(inner);
            }
        }
    }
}

fn is_inline(name: &str) -> bool {
    matches!(
        name,
        "strong" | "b" | "em" | "i" | "code" | "a" | "span" | "u" | "s" | "small" | "mark"
    )
}

fn read_todo(element: &Element) -> Block {
    let checkbox = element.find_descendant(&|node: &Element| node.name == "input");
    let checked = element.has_class(CHECKED_CLASS)
        || checkbox.is_some_and(|input| input.attr("checked").is_some());

    let mut content = InlineText::new();
    match element.find_descendant(&|node: &Element| node.has_class(TODO_TEXT_CLASS)) {
        Some(text_run) => collect_children(text_run, &Marks::default(), &mut content),
        None => {
            for child in &element.children {
                match child {
                    Node::Element(node) if node.name == "input" => {}
                    Node::Element(node) => collect_inline(node, &Marks::default(), &mut content),
                    Node::Text(text) => content.push(InlineSpan::plain(text.as_str())),
                }
            }
        }
    }
    strip_trailing_break(&mut content);
    if content.is_blank() && !content.is_placeholder() {
        content = InlineText::new();
    }
    Block::todo(content, checked)
}

fn read_code(element: &Element) -> Block {
    let code = element.find_descendant(&|node: &Element| node.name == "code");
    let language = code
        .into_iter()
        .chain(std::iter::once(element))
        .filter_map(|node| node.attr("class"))
        .flat_map(str::split_ascii_whitespace)
        .find_map(|class| class.strip_prefix("language-"))
        .map(str::to_string);
    Block::code(language, text_content(element))
}

fn collect_list_items(list: &Element, items: &mut Vec<Block>) {
    for child in &list.children {
        let Node::Element(element) = child else {
            continue;
        };
        match element.name.as_str() {
            "li" => {
                let mut content = InlineText::new();
                let mut nested = Vec::new();
                for node in &element.children {
                    match node {
                        Node::Element(inner) if inner.name == "ul" || inner.name == "ol" => {
                            nested.push(inner)
                        }
                        Node::Element(inner) => collect_inline(inner, &Marks::default(), &mut content),
                        Node::Text(text) => content.push(InlineSpan::plain(text.as_str())),
                    }
                }
                strip_trailing_break(&mut content);
                items.push(Block::list_item(content));
                for inner in nested {
                    collect_list_items(inner, items);
                }
            }
            "ul" | "ol" => collect_list_items(element, items),
            _ => {}
        }
    }
}

fn block_content(element: &Element) -> InlineText {
    let mut content = InlineText::new();
    collect_children(element, &Marks::default(), &mut content);
    strip_trailing_break(&mut content);
    content
}

fn collect_children(element: &Element, marks: &Marks, out: &mut InlineText) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push(InlineSpan::new(text.as_str(), marks.clone())),
            Node::Element(inner) => collect_inline(inner, marks, out),
        }
    }
}

fn collect_inline(element: &Element, marks: &Marks, out: &mut InlineText) {
    let mut marks = marks.clone();
    match element.name.as_str() {
        "br" => {
            out.push(InlineSpan::new("\n", marks));
            return;
        }
        "input" | "hr" | "img" => return,
        "strong" | "b" => marks.bold = true,
        "em" | "i" => marks.italic = true,
        "code" => marks.code = true,
        "a" => {
            if let Some(href) = element.attr("href") {
                marks.link_href = Some(href.to_string());
            }
        }
        _ if element.is_block() => {
            if !out.is_empty() && !out.plain_text().ends_with('\n') {
                out.push(InlineSpan::plain("\n"));
            }
        }
        _ => {}
    }
    collect_children(element, &marks, out);
}

fn text_content(element: &Element) -> String {
    let mut text = String::new();
    for child in &element.children {
        match child {
            Node::Text(value) => text.push_str(value),
            Node::Element(inner) if inner.name == "br" => text.push('\n'),
            Node::Element(inner) => text.push_str(&text_content(inner)),
        }
    }
    text
}

/// Drops exactly one trailing line break (the editable-line sentinel).
fn strip_trailing_break(content: &mut InlineText) {
    let len = content.char_len();
    if len > 0 && content.plain_text().ends_with('\n') {
        content.delete_range(len - 1, len);
    }
}

/// Builds the element tree with the HTML5 tree builder in a `<body>`
/// context, so implied end tags and entities follow the HTML standard.
fn parse_fragment(html: &str) -> Element {
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));
    let dom = html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
        .one(html);

    let mut root = Element::new("#root", Vec::new());
    for html_element in dom.document.children.borrow().iter() {
        convert_children(html_element, &mut root);
    }
    root
}

fn convert_children(handle: &Handle, into: &mut Element) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => {
                let text = contents.borrow();
                match into.children.last_mut() {
                    Some(Node::Text(previous)) => previous.push_str(&text),
                    _ => into.children.push(Node::Text(text.to_string())),
                }
            }
            NodeData::Element { name, attrs, .. } => {
                if RAW_TEXT_ELEMENTS.contains(&&*name.local) {
                    continue;
                }
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                let mut element = Element::new(&name.local, attrs);
                convert_children(child, &mut element);
                into.children.push(Node::Element(element));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::read_document;
    use crate::html::render::render_document;
    use crate::model::block::{blocks_structurally_eq, Block, BlockKind};
    use crate::model::inline::{InlineSpan, InlineText, Marks};

    #[test]
    fn rendered_blocks_read_back_unchanged() {
        let blocks = vec![
            Block::heading(2, InlineText::plain("Plan")),
            Block::todo(InlineText::placeholder(), false),
            Block::list(
                BlockKind::NumberList,
                vec![Block::list_item(InlineText::from_spans(vec![
                    InlineSpan::plain("a "),
                    InlineSpan::new("b", Marks::bold()),
                ]))],
            ),
            Block::quote(InlineText::plain("x\ny")),
            Block::divider(),
            Block::code(Some("rust".into()), "let a = 1 < 2;"),
            Block::empty_text(),
        ];
        let read = read_document(&render_document(&blocks));
        assert!(blocks_structurally_eq(&read, &blocks), "{read:#?}");
    }

    #[test]
    fn legacy_todo_text_after_checkbox_is_migrated() {
        let blocks = read_document(
            "<div class=\"todo-item\"><input type=\"checkbox\" checked>buy <b>milk</b></div>",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].kind, BlockKind::TodoItem);
        assert!(blocks[0].checked);
        assert_eq!(blocks[0].content.plain_text(), "buy milk");
    }

    #[test]
    fn loose_top_level_text_splits_on_breaks() {
        let blocks = read_document("first<br>second<br><br>");
        let texts: Vec<_> = blocks.iter().map(|b| b.content.plain_text()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(read_document("<br>").is_empty());
    }

    #[test]
    fn table_rows_become_text_lines() {
        let blocks = read_document(
            "<table><thead><tr><th>a</th><th>b</th></tr></thead>\
             <tbody><tr><td>1</td><td>2</td></tr></tbody></table>",
        );
        let texts: Vec<_> = blocks.iter().map(|b| b.content.plain_text()).collect();
        assert_eq!(texts, vec!["a | b", "1 | 2"]);
    }

    #[test]
    fn named_and_numeric_entities_decode() {
        let blocks = read_document("<p>a&amp;b&#60;&#x3e;&nbsp;&hellip;&bogus</p>");
        assert_eq!(blocks[0].content.plain_text(), "a&b<>\u{a0}\u{2026}&bogus");
    }

    #[test]
    fn implied_end_tags_close_list_items_and_paragraphs() {
        let blocks = read_document("<ul><li>a<li>b</ul><p>one<p>two");
        assert_eq!(blocks[0].kind, BlockKind::BulletList);
        let items: Vec<_> = blocks[0]
            .children
            .iter()
            .map(|item| item.content.plain_text())
            .collect();
        assert_eq!(items, vec!["a", "b"]);
        let texts: Vec<_> = blocks[1..].iter().map(|b| b.content.plain_text()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn script_content_is_never_read_as_text() {
        let blocks = read_document("<div>kept<script>alert(1)</script></div>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content.plain_text(), "kept");
    }
}
