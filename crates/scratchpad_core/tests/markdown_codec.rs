use scratchpad_core::html::{read_document, render_document};
use scratchpad_core::markdown::{parse, render_inline_html, serialize};
use scratchpad_core::model::block::blocks_structurally_eq;
use scratchpad_core::{sanitize, Block, BlockKind, SanitizeProfile};

fn assert_round_trip(markdown: &str) -> Vec<Block> {
    let blocks = parse(markdown);
    let reparsed = parse(&serialize(&blocks));
    assert!(
        blocks_structurally_eq(&blocks, &reparsed),
        "round trip changed structure for {markdown:?}:\n{blocks:#?}\nvs\n{reparsed:#?}"
    );
    blocks
}

fn kinds(blocks: &[Block]) -> Vec<BlockKind> {
    blocks.iter().map(|block| block.kind).collect()
}

#[test]
fn every_block_kind_round_trips() {
    let cases: &[(&str, BlockKind)] = &[
        ("plain words", BlockKind::Text),
        ("# Title", BlockKind::Heading1),
        ("## Section", BlockKind::Heading2),
        ("### Detail", BlockKind::Heading3),
        ("- one\n- two", BlockKind::BulletList),
        ("1. one\n2. two", BlockKind::NumberList),
        ("- [ ] open", BlockKind::TodoItem),
        ("- [x] closed", BlockKind::TodoItem),
        ("> quoted\n> twice", BlockKind::Quote),
        ("---", BlockKind::Divider),
        ("```rust\nfn main() {}\n```", BlockKind::Code),
        ("see [docs](https://example.com/docs)", BlockKind::Text),
    ];
    for (markdown, kind) in cases {
        let blocks = assert_round_trip(markdown);
        assert_eq!(kinds(&blocks), vec![*kind], "kind of {markdown:?}");
    }
}

#[test]
fn mixed_document_round_trips() {
    let markdown = "# Weekly plan\n\
                    Some **bold** and *italic* with `code`.\n\
                    - first\n\
                    - second\n\
                    1. ordered\n\
                    - [ ] pending\n\
                    - [x] finished\n\
                    > a quote\n\
                    ---\n\
                    ```\nraw *text*\n```\n\
                    \n\
                    [link](https://example.com)";
    let blocks = assert_round_trip(markdown);
    assert_eq!(
        kinds(&blocks),
        vec![
            BlockKind::Heading1,
            BlockKind::Text,
            BlockKind::BulletList,
            BlockKind::NumberList,
            BlockKind::TodoItem,
            BlockKind::TodoItem,
            BlockKind::Quote,
            BlockKind::Divider,
            BlockKind::Code,
            BlockKind::Text,
            BlockKind::Text,
        ]
    );
}

#[test]
fn todo_list_serializes_back_byte_for_byte() {
    let markdown = "- [ ] buy milk\n- [x] done";
    let blocks = parse(markdown);

    assert_eq!(kinds(&blocks), vec![BlockKind::TodoItem, BlockKind::TodoItem]);
    assert!(!blocks[0].checked);
    assert!(blocks[1].checked);
    assert_eq!(serialize(&blocks), markdown);
}

#[test]
fn inline_emphasis_renders_to_exact_markup() {
    let html = render_inline_html("**bold** and *italic* and `code`");
    assert!(html.contains("<strong>bold</strong> and <em>italic</em> and <code>code</code>"));
}

#[test]
fn import_pipeline_preserves_structure() {
    let markdown = "## Notes\n- alpha\n- beta\n- [x] shipped\n> careful\n```sh\nls -la\n```";
    let parsed = parse(markdown);

    let imported = read_document(&sanitize(
        &render_document(&parsed),
        SanitizeProfile::Import,
    ));

    assert!(blocks_structurally_eq(&parsed, &imported), "{imported:#?}");
    assert_eq!(imported[4].language.as_deref(), Some("sh"));
}

#[test]
fn malformed_markdown_degrades_to_text() {
    let blocks = parse("#no space\n**unclosed\n-not a list");
    assert_eq!(
        kinds(&blocks),
        vec![BlockKind::Text, BlockKind::Text, BlockKind::Text]
    );
    assert_eq!(blocks[1].content.plain_text(), "**unclosed");
}
