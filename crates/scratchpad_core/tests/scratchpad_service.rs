use chrono::NaiveDate;
use scratchpad_core::config::{CONTENT_KEY, THEME_KEY};
use scratchpad_core::db::open_db_in_memory;
use scratchpad_core::{
    BlockKind, EditorKey, ImportOutcome, ImportSource, KeyValueStore, MemoryKeyValueStore, Notice,
    RepoError, RepoResult, ScratchpadService, ServiceError, SqliteKeyValueStore, Theme,
};
use std::cell::Cell;
use std::time::{Duration, Instant};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Store whose every call fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> RepoResult<Option<String>> {
        Err(RepoError::Unavailable("quota exceeded".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn saves_are_debounced_until_typing_pauses() {
    let store = MemoryKeyValueStore::new();
    let mut service = ScratchpadService::new(&store);
    service.load().unwrap();
    let start = Instant::now();

    service.edit(start, |session| session.type_text("a", None));
    service.edit(start + ms(300), |session| session.type_text("b", None));

    assert!(!service.flush_if_due(start + ms(600)).unwrap());
    assert_eq!(store.get(CONTENT_KEY).unwrap(), None);

    assert!(service.flush_if_due(start + ms(800)).unwrap());
    assert_eq!(
        store.get(CONTENT_KEY).unwrap().as_deref(),
        Some("<div>ab</div>")
    );
    assert!(!service.has_pending_save());
    assert!(!service.flush_if_due(start + ms(2000)).unwrap());
}

#[test]
fn caret_moves_do_not_schedule_saves() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();

    service.edit(Instant::now(), |session| session.key(EditorKey::ArrowDown));
    assert!(!service.has_pending_save());
}

#[test]
fn saved_document_restores_in_a_new_service() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();

    let mut first = ScratchpadService::new(&store);
    first.load().unwrap();
    let now = Instant::now();
    first.edit(now, |session| {
        session.type_text("Groceries", None);
        session.key(EditorKey::Enter);
        session.type_text("milk", None);
    });
    first.save_now().unwrap();

    let mut second = ScratchpadService::new(&store);
    second.load().unwrap();
    assert_eq!(second.session().document().plain_text(), "Groceries\nmilk");
}

#[test]
fn theme_toggle_is_persisted_immediately() {
    let store = MemoryKeyValueStore::new();
    let mut service = ScratchpadService::new(&store);
    service.load().unwrap();

    assert_eq!(service.toggle_theme().unwrap(), Theme::Light);
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));

    let now = Instant::now();
    service.edit(now, |session| {
        session.type_text("/", Some(scratchpad_core::editor::Rect::new(0.0, 0.0, 1.0, 16.0)));
        session.type_text("dark", None);
        session.key(EditorKey::Enter)
    });
    assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));
}

#[test]
fn unknown_stored_theme_falls_back_to_dark() {
    let store = MemoryKeyValueStore::new();
    store.set(THEME_KEY, "sepia").unwrap();
    let mut service = ScratchpadService::new(&store);
    service.load().unwrap();
    assert_eq!(service.session().theme(), Theme::Dark);
}

#[test]
fn import_into_empty_document_skips_confirmation() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();
    let asked = Cell::new(false);

    let outcome = service
        .import_markdown(
            "plan.md",
            "# Plan\n- [ ] write tests",
            ImportSource::FilePicker,
            Instant::now(),
            |_| {
                asked.set(true);
                true
            },
        )
        .unwrap();

    assert!(!asked.get());
    assert_eq!(
        outcome,
        ImportOutcome::Replaced {
            notice: Notice::info("Loaded plan.md")
        }
    );
    let kinds: Vec<_> = service
        .session()
        .document()
        .blocks()
        .iter()
        .map(|block| block.kind)
        .collect();
    assert_eq!(kinds, vec![BlockKind::Heading1, BlockKind::TodoItem]);
    assert!(service.has_pending_save());
}

#[test]
fn declined_import_keeps_existing_content() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();
    let now = Instant::now();
    service.edit(now, |session| session.type_text("keep me", None));

    let outcome = service
        .import_markdown("other.md", "# Other", ImportSource::FilePicker, now, |name| {
            assert_eq!(name, "other.md");
            false
        })
        .unwrap();

    assert_eq!(outcome, ImportOutcome::Declined);
    assert_eq!(service.session().document().plain_text(), "keep me");
}

#[test]
fn drag_drop_rejects_non_markdown_files() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();

    let err = service
        .import_markdown("notes.txt", "hi", ImportSource::DragDrop, Instant::now(), |_| true)
        .unwrap_err();

    assert!(matches!(err, ServiceError::UnsupportedFileType(_)));
    assert_eq!(Notice::from(&err), Notice::error("Only .md files are supported"));

    let accepted = service.import_markdown(
        "notes.txt",
        "hi",
        ImportSource::FilePicker,
        Instant::now(),
        |_| true,
    );
    assert!(accepted.is_ok());
}

#[test]
fn oversized_imports_are_rejected() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();
    let huge = "a".repeat(10 * 1024 * 1024 + 1);

    let err = service
        .import_markdown("big.md", &huge, ImportSource::DragDrop, Instant::now(), |_| true)
        .unwrap_err();
    assert_eq!(err.to_string(), "File is too large (max 10 MB)");
}

#[test]
fn imported_script_text_is_inert() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();

    service
        .import_markdown(
            "x.md",
            "<script>alert(1)</script>\n[bad](javascript:alert(1))",
            ImportSource::FilePicker,
            Instant::now(),
            |_| true,
        )
        .unwrap();
    service.save_now().unwrap();

    let stored = service.store().get(CONTENT_KEY).unwrap().unwrap();
    assert!(!stored.to_lowercase().contains("<script"));
    assert!(!stored.contains("javascript:"));
}

#[test]
fn export_serializes_markdown_with_sanitized_name() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();
    service
        .import_markdown(
            "in.md",
            "## Title\n1. one\n2. two\n> said",
            ImportSource::FilePicker,
            Instant::now(),
            |_| true,
        )
        .unwrap();

    let export = service.export_markdown(Some("my notes?"), today()).unwrap();
    assert_eq!(export.file_name, "my_notes_.md");
    assert_eq!(export.contents, "## Title\n1. one\n2. two\n> said");
    assert_eq!(export.notice, Notice::info("Exported as my_notes_.md"));

    let dated = service.export_markdown(None, today()).unwrap();
    assert_eq!(dated.file_name, "scratchpad-2026-10-16.md");
}

#[test]
fn exporting_an_empty_document_is_refused() {
    let mut service = ScratchpadService::new(MemoryKeyValueStore::new());
    service.load().unwrap();

    let err = service.export_markdown(None, today()).unwrap_err();
    assert!(matches!(err, ServiceError::NothingToExport));
    assert!(!Notice::from(&err).is_error);
}

#[test]
fn storage_failures_keep_the_session_usable() {
    let mut service = ScratchpadService::new(BrokenStore);
    let err = service.load().unwrap_err();
    assert!(matches!(err, ServiceError::Storage(_)));
    assert!(service.session().is_placeholder_visible());

    let now = Instant::now();
    service.edit(now, |session| session.type_text("still works", None));
    let err = service.flush_if_due(now + ms(500)).unwrap_err();
    assert_eq!(Notice::from(&err), Notice::error("Could not access storage"));
    assert_eq!(service.session().document().plain_text(), "still works");
}

#[test]
fn failed_theme_write_queues_a_notice() {
    let mut service = ScratchpadService::new(BrokenStore);
    let _ = service.load();

    let now = Instant::now();
    service.edit(now, |session| session.toggle_theme());
    assert_eq!(service.session().theme(), Theme::Light);
    assert_eq!(
        service.take_notice(),
        Some(Notice::error("Could not access storage"))
    );
    assert_eq!(service.take_notice(), None);
}
