use scratchpad_core::{Block, BlockKind, Document, InlineSpan, InlineText, Marks, Theme};
use uuid::Uuid;

#[test]
fn block_serialization_uses_expected_wire_fields() {
    let block_id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let mut block = Block::with_id(block_id, BlockKind::TodoItem);
    block.content = InlineText::from_spans(vec![
        InlineSpan::plain("ship "),
        InlineSpan::new("release", Marks::bold()),
    ]);
    block.checked = true;

    let json = serde_json::to_value(&block).unwrap();
    assert_eq!(json["id"], block_id.to_string());
    assert_eq!(json["kind"], "todoItem");
    assert_eq!(json["checked"], true);
    assert_eq!(json["content"][0]["text"], "ship ");
    assert_eq!(json["content"][1]["marks"]["bold"], true);
    assert!(json.get("children").is_none());
    assert!(json.get("language").is_none());

    let decoded: Block = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, block);
}

#[test]
fn missing_optional_fields_take_defaults() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "kind": "heading2",
    });

    let block: Block = serde_json::from_value(value).unwrap();
    assert_eq!(block.kind, BlockKind::Heading2);
    assert!(block.content.is_empty());
    assert!(!block.checked);
    assert!(block.children.is_empty());
}

#[test]
fn unknown_block_kind_is_rejected() {
    let value = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "kind": "table",
    });
    assert!(serde_json::from_value::<Block>(value).is_err());
}

#[test]
fn theme_serializes_as_persisted_value() {
    assert_eq!(serde_json::to_value(Theme::Light).unwrap(), "light");
    assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
    assert_eq!(Theme::parse("sepia"), None);
}

#[test]
fn document_round_trips_through_json() {
    let document = Document::from_blocks(vec![
        Block::heading(1, InlineText::plain("Title")),
        Block::list(
            BlockKind::NumberList,
            vec![Block::list_item(InlineText::plain("one"))],
        ),
        Block::code(Some("rust".to_string()), "let x = 1;"),
    ]);

    let json = serde_json::to_string(&document).unwrap();
    let decoded: Document = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, document);
}
