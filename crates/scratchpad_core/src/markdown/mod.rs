//! Markdown codec.
//!
//! # Responsibility
//! - Parse imported Markdown into blocks and serialize blocks for export.
//!
//! # Invariants
//! - Neither direction fails; malformed input degrades to plain text.
//! - `parse(serialize(blocks))` is structurally equal to `blocks` for every
//!   block kind.
//!
//! # See also
//! - `html` for the HTML side of the import pipeline.

pub mod inline;
pub mod parse;
pub mod serialize;

pub use inline::{parse_inline, render_inline_html, serialize_inline};
pub use parse::parse;
pub use serialize::serialize;
