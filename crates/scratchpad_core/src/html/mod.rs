//! HTML side of the editable surface.
//!
//! # Responsibility
//! - Render blocks to the markup that is persisted under the content key.
//! - Read sanitized markup (restored or imported) back into blocks.
//!
//! # See also
//! - `sanitize` for the trust boundary every foreign string passes first.

pub mod read;
pub mod render;

pub use read::read_document;
pub use render::{escape_html, render_document, render_inline};
