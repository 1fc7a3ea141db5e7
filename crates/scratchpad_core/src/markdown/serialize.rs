//! Block to Markdown serializer.

use crate::markdown::inline::serialize_inline;
use crate::model::block::{Block, BlockKind};
use crate::model::inline::InlineText;

/// Serializes blocks to Markdown; one line (or line group) per block.
pub fn serialize(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        serialize_block(block, &mut lines);
    }
    lines.join("\n")
}

fn serialize_block(block: &Block, lines: &mut Vec<String>) {
    match block.kind {
        BlockKind::Text | BlockKind::ListItem => lines.push(inline(&block.content)),
        BlockKind::Heading1 | BlockKind::Heading2 | BlockKind::Heading3 => {
            let level = block.kind.heading_level().unwrap_or(1) as usize;
            lines.push(format!("{} {}", "#".repeat(level), inline(&block.content)));
        }
        BlockKind::BulletList => {
            for item in &block.children {
                lines.push(format!("- {}", inline(&item.content)));
            }
        }
        BlockKind::NumberList => {
            for (number, item) in block.children.iter().enumerate() {
                lines.push(format!("{}. {}", number + 1, inline(&item.content)));
            }
        }
        BlockKind::TodoItem => {
            let state = if block.checked { "x" } else { " " };
            lines.push(format!("- [{state}] {}", inline(&block.content)));
        }
        BlockKind::Quote => {
            for line in inline(&block.content).split('\n') {
                if line.is_empty() {
                    lines.push(">".to_string());
                } else {
                    lines.push(format!("> {line}"));
                }
            }
        }
        BlockKind::Divider => lines.push("---".to_string()),
        BlockKind::Code => {
            lines.push(format!("```{}", block.language.as_deref().unwrap_or("")));
            lines.push(block.content.plain_text());
            lines.push("```".to_string());
        }
    }
}

fn inline(content: &InlineText) -> String {
    if content.is_placeholder() {
        return String::new();
    }
    serialize_inline(content)
}
