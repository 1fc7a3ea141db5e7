//! Compile-time configuration for the scratchpad core.

use std::time::Duration;

/// Storage key holding the restore-profile HTML of the document.
pub const CONTENT_KEY: &str = "scratchpad_content";
/// Storage key holding `"dark"` or `"light"`.
pub const THEME_KEY: &str = "scratchpad_theme";

/// Quiescence window before a pending save is written.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default command palette width in surface pixels.
pub const MENU_WIDTH: f64 = 280.0;
/// Default command palette maximum height.
pub const MENU_MAX_HEIGHT: f64 = 340.0;
/// Gap between the caret rectangle and the palette.
pub const MENU_OFFSET: f64 = 6.0;
/// Minimum distance between the palette and any viewport edge.
pub const MENU_VIEWPORT_PADDING: f64 = 10.0;

/// Largest Markdown payload accepted by import.
pub const MAX_IMPORT_BYTES: usize = 10 * 1024 * 1024;
/// Export file names are truncated to this many characters (before `.md`).
pub const MAX_FILE_NAME_CHARS: usize = 255;
/// Prefix of the default export name, followed by the ISO date.
pub const DEFAULT_EXPORT_PREFIX: &str = "scratchpad";
