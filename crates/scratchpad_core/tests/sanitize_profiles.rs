use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use scratchpad_core::html::read_document;
use scratchpad_core::sanitize::FALLBACK_HTML;
use scratchpad_core::{sanitize, BlockKind, SanitizeProfile};

const PROFILES: [SanitizeProfile; 2] = [SanitizeProfile::Restore, SanitizeProfile::Import];

/// Parses sanitizer output as a `<body>` fragment and reports every element
/// or attribute outside the profile's allow-list.
fn allow_list_violations(html: &str, profile: SanitizeProfile) -> Vec<String> {
    let context = QualName::new(
        None,
        Namespace::from("http://www.w3.org/1999/xhtml"),
        LocalName::from("body"),
    );
    let dom = html5ever::parse_fragment(RcDom::default(), ParseOpts::default(), context, Vec::new())
        .one(html);
    let mut violations = Vec::new();
    for root in dom.document.children.borrow().iter() {
        collect_violations(root, profile, &mut violations);
    }
    violations
}

fn collect_violations(handle: &Handle, profile: SanitizeProfile, out: &mut Vec<String>) {
    for child in handle.children.borrow().iter() {
        if let NodeData::Element { name, attrs, .. } = &child.data {
            let tag = name.local.to_string();
            if !profile.allows_tag(&tag) {
                out.push(format!("<{tag}>"));
            }
            for attr in attrs.borrow().iter() {
                let attribute = attr.name.local.to_string();
                if !profile.allows_attribute(&tag, &attribute) {
                    out.push(format!("<{tag} {attribute}>"));
                }
                if attribute == "href"
                    && !["http:", "https:", "mailto:"]
                        .iter()
                        .any(|scheme| attr.value.to_ascii_lowercase().starts_with(scheme))
                {
                    out.push(format!("<{tag} href={}>", &*attr.value));
                }
            }
        }
        collect_violations(child, profile, out);
    }
}

#[test]
fn script_tags_never_survive_in_any_case() {
    for profile in PROFILES {
        let html = sanitize(
            "<SCRIPT>alert(1)</SCRIPT><div>kept</div><ScRiPt src=x></ScRiPt>",
            profile,
        );
        assert!(!html.to_lowercase().contains("<script"), "{html}");
        assert!(html.contains("kept"));
    }
}

#[test]
fn lone_script_import_has_no_script_substring() {
    let html = sanitize("<script>alert(1)</script>", SanitizeProfile::Import);
    assert!(!html.to_lowercase().contains("<script"));
    assert_eq!(html, FALLBACK_HTML);
}

#[test]
fn event_handlers_and_styles_are_dropped() {
    for profile in PROFILES {
        let html = sanitize(
            "<div onclick=\"steal()\" style=\"color:red\" onmouseover=\"x()\">text</div>\
             <style>body { display: none }</style>",
            profile,
        );
        assert!(!html.contains("onclick"), "{html}");
        assert!(!html.contains("onmouseover"), "{html}");
        assert!(!html.contains("style"), "{html}");
        assert!(!html.contains("display"), "{html}");
        assert!(html.contains("text"));
    }
}

#[test]
fn javascript_links_lose_their_href() {
    for profile in PROFILES {
        let html = sanitize("<a href=\"javascript:alert(1)\">click</a>", profile);
        assert!(!html.to_lowercase().contains("javascript"), "{html}");
        assert!(html.contains("click"));
    }
}

#[test]
fn anchors_are_forced_to_open_safely() {
    for profile in PROFILES {
        let html = sanitize(
            "<a href=\"https://example.com\" target=\"_self\" rel=\"opener\">site</a>",
            profile,
        );
        assert!(html.contains("href=\"https://example.com\""), "{html}");
        assert!(html.contains("target=\"_blank\""), "{html}");
        assert!(html.contains("rel=\"noopener\""), "{html}");
        assert!(!html.contains("_self"));
    }
}

#[test]
fn inputs_are_forced_to_inert_checkboxes() {
    let html = sanitize(
        "<input type=\"text\" value=\"secret\" checked contenteditable=\"true\">",
        SanitizeProfile::Restore,
    );
    assert!(html.contains("type=\"checkbox\""), "{html}");
    assert!(html.contains("contenteditable=\"false\""), "{html}");
    assert!(!html.contains("secret"));
}

#[test]
fn embedding_elements_are_removed() {
    for profile in PROFILES {
        let html = sanitize(
            "<iframe src=\"https://evil.example\"></iframe>\
             <object data=\"x.swf\"></object>\
             <img src=x onerror=alert(1)>\
             <div>body</div>",
            profile,
        );
        for needle in ["<iframe", "<object", "<img", "onerror"] {
            assert!(!html.contains(needle), "{needle} in {html}");
        }
        assert!(html.contains("body"));
    }
}

#[test]
fn import_keeps_tables_and_restore_does_not() {
    let table = "<table><tr><th>a</th><td>b</td></tr></table>";

    let imported = sanitize(table, SanitizeProfile::Import);
    assert!(imported.contains("<table>"), "{imported}");
    let blocks = read_document(&imported);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].content.plain_text(), "a | b");

    let restored = sanitize(table, SanitizeProfile::Restore);
    assert!(!restored.contains("<table"));
}

#[test]
fn restore_keeps_editor_attributes_import_drops_them() {
    let html = "<div role=\"textbox\" data-placeholder=\"Type\" class=\"x\">t</div>";

    let restored = sanitize(html, SanitizeProfile::Restore);
    assert!(restored.contains("role=\"textbox\""), "{restored}");
    assert!(restored.contains("data-placeholder=\"Type\""), "{restored}");

    let imported = sanitize(html, SanitizeProfile::Import);
    assert!(!imported.contains("role="), "{imported}");
    assert!(!imported.contains("data-placeholder"), "{imported}");
    assert!(imported.contains("class=\"x\""));
}

#[test]
fn unknown_tags_are_unwrapped_silently() {
    let html = sanitize("<marquee><blink>hello</blink></marquee>", SanitizeProfile::Import);
    assert!(!html.contains("marquee"));
    assert!(html.contains("hello"));
}

#[test]
fn sanitized_todo_markup_reads_as_todo() {
    let html = sanitize(
        "<div class=\"todo-item checked\" onclick=\"x()\">\
         <input type=\"checkbox\" checked contenteditable=\"false\">\
         <span class=\"todo-text\">ship it</span></div>",
        SanitizeProfile::Restore,
    );
    let blocks = read_document(&html);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].kind, BlockKind::TodoItem);
    assert!(blocks[0].checked);
    assert_eq!(blocks[0].content.plain_text(), "ship it");
}

#[test]
fn malformed_and_nested_markup_stays_inside_the_allow_list() {
    let deep = format!(
        "{}<span onclick=x()>deep</span>{}",
        "<div>".repeat(500),
        "</div>".repeat(500)
    );
    let inputs = [
        "<scr<script>ipt>alert(1)</script>",
        "<svg><script>alert(1)</script><foreignObject><div>x</div></foreignObject></svg>",
        "<math><mi><a href=javascript:x>m</a></mi></math>",
        "<a href=\"https://ok.example title=x onclick=\"y()\">open quote",
        "<div class='a onmouseover='z()'>unclosed</div",
        "<table><tr><td><iframe src=x></iframe><form><input type=text formaction=x></form>",
        "<p><b><i><a href=\"data:text/html,x\">nested</a></i></b></p>",
        "<noscript><img src=x onerror=alert(1)></noscript><template><script>x</script></template>",
        deep.as_str(),
    ];

    for profile in PROFILES {
        for input in inputs {
            let html = sanitize(input, profile);
            let violations = allow_list_violations(&html, profile);
            assert!(
                violations.is_empty(),
                "{profile:?} {input:.60}: {violations:?} in {html:.200}"
            );
        }
    }
}
