//! HTML sanitizer; the only trust boundary of the scratchpad.
//!
//! # Responsibility
//! - Reduce any foreign HTML (restored storage content, rendered imports) to
//!   an allow-listed subset before it reaches the document.
//!
//! # Invariants
//! - `sanitize` never fails and never returns the raw input.
//! - Script-capable elements are removed together with their content.
//! - Only `http`, `https` and `mailto` URLs survive.
//! - Anchors always carry `rel="noopener"` and `target="_blank"`; inputs are
//!   always non-editable checkboxes.

use ammonia::{Builder, UrlRelative};
use log::{error, warn};
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};

/// Output used when sanitizing yields nothing usable: one empty line.
pub const FALLBACK_HTML: &str = "<br>";

const SHARED_TAGS: &[&str] = &[
    "div",
    "span",
    "br",
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
    "a",
    "strong",
    "em",
    "code",
    "pre",
    "input",
];
const IMPORT_ONLY_TAGS: &[&str] = &["b", "i", "table", "thead", "tbody", "tr", "th", "td"];
const RESTORE_GENERIC_ATTRIBUTES: &[&str] = &[
    "class",
    "id",
    "role",
    "aria-label",
    "aria-multiline",
    "data-placeholder",
];
const IMPORT_GENERIC_ATTRIBUTES: &[&str] = &["class", "aria-label"];
const CONTENT_STRIPPED_TAGS: &[&str] = &["script", "style"];
const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Allow-list profile applied by [`sanitize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeProfile {
    /// Persisted editor content read back at startup.
    Restore,
    /// Markdown imports after rendering to HTML.
    Import,
}

impl SanitizeProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Restore => "restore",
            Self::Import => "import",
        }
    }

    /// Whether `tag` may appear in output of this profile.
    pub fn allows_tag(self, tag: &str) -> bool {
        self.tags().contains(tag)
    }

    /// Whether `attribute` may appear on `tag`, including the attributes the
    /// cleaner forces onto anchors and inputs.
    pub fn allows_attribute(self, tag: &str, attribute: &str) -> bool {
        let forced: &[&str] = match tag {
            "a" => &["href", "rel", "target"],
            "input" => &["checked", "type", "contenteditable"],
            _ => &[],
        };
        forced.contains(&attribute) || self.generic_attributes().contains(attribute)
    }

    fn tags(self) -> HashSet<&'static str> {
        let mut tags: HashSet<&'static str> = SHARED_TAGS.iter().copied().collect();
        if self == Self::Import {
            tags.extend(IMPORT_ONLY_TAGS.iter().copied());
        }
        tags
    }

    fn generic_attributes(self) -> HashSet<&'static str> {
        let attributes = match self {
            Self::Restore => RESTORE_GENERIC_ATTRIBUTES,
            Self::Import => IMPORT_GENERIC_ATTRIBUTES,
        };
        attributes.iter().copied().collect()
    }

    fn builder(self) -> Builder<'static> {
        let mut tag_attributes = HashMap::new();
        tag_attributes.insert("a", HashSet::from(["href"]));
        tag_attributes.insert("input", HashSet::from(["checked"]));

        let mut builder = Builder::empty();
        builder
            .tags(self.tags())
            .clean_content_tags(CONTENT_STRIPPED_TAGS.iter().copied().collect())
            .generic_attributes(self.generic_attributes())
            .tag_attributes(tag_attributes)
            .url_schemes(URL_SCHEMES.iter().copied().collect())
            .url_relative(UrlRelative::Deny)
            .link_rel(Some("noopener"))
            .set_tag_attribute_value("a", "target", "_blank")
            .set_tag_attribute_value("input", "type", "checkbox")
            .set_tag_attribute_value("input", "contenteditable", "false")
            .strip_comments(true);
        builder
    }
}

/// Cleans `raw_html` with the given profile.
///
/// Empty input, an empty result, or a failure inside the cleaner all yield
/// [`FALLBACK_HTML`].
pub fn sanitize(raw_html: &str, profile: SanitizeProfile) -> String {
    if raw_html.trim().is_empty() {
        return FALLBACK_HTML.to_string();
    }

    let cleaned = panic::catch_unwind(AssertUnwindSafe(|| {
        profile.builder().clean(raw_html).to_string()
    }));

    match cleaned {
        Ok(html) if !html.trim().is_empty() => html,
        Ok(_) => {
            warn!(
                "event=sanitize module=sanitize status=empty profile={} input_bytes={}",
                profile.as_str(),
                raw_html.len()
            );
            FALLBACK_HTML.to_string()
        }
        Err(_) => {
            error!(
                "event=sanitize module=sanitize status=error profile={} input_bytes={}",
                profile.as_str(),
                raw_html.len()
            );
            FALLBACK_HTML.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{sanitize, SanitizeProfile, FALLBACK_HTML};

    #[test]
    fn empty_input_falls_back_to_single_break() {
        assert_eq!(sanitize("", SanitizeProfile::Restore), FALLBACK_HTML);
        assert_eq!(sanitize("   ", SanitizeProfile::Import), FALLBACK_HTML);
    }

    #[test]
    fn content_of_only_stripped_tags_falls_back() {
        assert_eq!(
            sanitize("<script>alert(1)</script>", SanitizeProfile::Import),
            FALLBACK_HTML
        );
    }

    #[test]
    fn import_profile_drops_restore_only_attributes() {
        let html = sanitize(
            "<div id=\"x\" role=\"note\" class=\"c\">t</div>",
            SanitizeProfile::Import,
        );
        assert_eq!(html, "<div class=\"c\">t</div>");
    }

    #[test]
    fn restore_profile_drops_table_markup_but_keeps_text() {
        let html = sanitize("<table><tr><td>cell</td></tr></table>", SanitizeProfile::Restore);
        assert!(!html.contains("<table"));
        assert!(html.contains("cell"));
    }
}
