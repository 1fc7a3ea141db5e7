//! Interactive editing layer on top of the document model.
//!
//! # Responsibility
//! - Map surface input (text, keys, pointer) to model operations.
//! - Own caret, slash palette and theme state for one editable surface.

pub mod command;
pub mod palette;
pub mod selection;
pub mod session;

pub use command::{default_commands, filter_commands, Command, CommandAction, CommandGroup, PaletteEntry};
pub use palette::{place_menu, MenuPlacement, PaletteKey, PaletteOutcome, PaletteSession, Rect, Size};
pub use selection::{HitRegion, Selection, SelectionController, SurfacePoint};
pub use session::{EditorKey, EditorSession, HostEffect, KeyOutcome};
