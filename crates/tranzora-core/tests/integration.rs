//! Integration tests for tranzora-core
//!
//! These tests verify the end-to-end workflow:
//! - File selection and session state transitions
//! - Translation with mock backend (both response shapes)
//! - Failure handling (markers, no propagation)
//! - Export serialization and the history round trip

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

use tranzora_core::{
    AppConfig, DocumentStructure, DocumentTranslator, DocumentUpload, Error, ExportFormat,
    FAILED_ORIGINAL_TEXT, FAILED_TRANSLATION_TEXT, HistoryStore, Lang, LayoutElement, Page,
    ProgressStage, Result, SessionState, TranslatedDocument, TranslationOutcome, Translator,
    TranslatorInfo,
};

// =============================================================================
// Mock Translator for Testing
// =============================================================================

/// What the mock backend should hand back.
#[derive(Clone)]
enum MockBehavior {
    Flat,
    PagedWithLayout,
    PagedWithoutLayout,
    Fail,
}

/// A mock translator that returns predictable results without network calls.
struct MockTranslator {
    behavior: MockBehavior,
    calls: AtomicUsize,
}

impl MockTranslator {
    fn new(behavior: MockBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: "mock",
            requires_api_key: false,
            supports_layout: true,
        }
    }

    async fn translate_document(
        &self,
        upload: &DocumentUpload,
        _target: &Lang,
        _preserve_layout: bool,
    ) -> Result<TranslatedDocument> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!upload.bytes.is_empty(), "upload should carry file bytes");

        match self.behavior {
            MockBehavior::Flat => Ok(TranslatedDocument {
                original_text: "hola".to_string(),
                translated_text: "hello".to_string(),
                structure: None,
            }),
            MockBehavior::PagedWithLayout => Ok(TranslatedDocument {
                original_text: "un\n\ndeux".to_string(),
                translated_text: "one\n\ntwo".to_string(),
                structure: Some(DocumentStructure {
                    pages: vec![
                        Page {
                            page_number: 1,
                            original_text: "un".to_string(),
                            translated_text: "one".to_string(),
                            layout_elements: vec![LayoutElement {
                                kind: "heading".to_string(),
                                text: "un".to_string(),
                                translated_text: "one".to_string(),
                            }],
                        },
                        Page {
                            page_number: 2,
                            original_text: "deux".to_string(),
                            translated_text: "two".to_string(),
                            layout_elements: Vec::new(),
                        },
                    ],
                }),
            }),
            MockBehavior::PagedWithoutLayout => Ok(TranslatedDocument {
                original_text: "a\n\nb".to_string(),
                translated_text: "x\n\ny".to_string(),
                structure: None,
            }),
            MockBehavior::Fail => Err(Error::TranslationRequest(
                "HTTP 500 Internal Server Error: mock".to_string(),
            )),
        }
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

struct Fixture {
    _dir: TempDir,
    translator: DocumentTranslator,
    input: PathBuf,
}

/// Build a translator over a temp history store and a temp input file,
/// with the simulated progress delays zeroed out.
fn fixture(behavior: MockBehavior) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("letter.pdf");
    std::fs::write(&input, b"%PDF-fixture").expect("write fixture");

    let config = AppConfig {
        stage_delay_ms: 0,
        complete_delay_ms: 0,
        ..Default::default()
    };
    let history = HistoryStore::open(dir.path().join("history")).expect("open history");
    let translator =
        DocumentTranslator::with_translator(MockTranslator::new(behavior), history, config)
            .expect("build translator");

    Fixture {
        _dir: dir,
        translator,
        input,
    }
}

// =============================================================================
// Translation Flow Tests
// =============================================================================

#[tokio::test]
async fn test_translate_without_file_is_noop() {
    let mut fx = fixture(MockBehavior::Flat);
    let outcome = fx.translator.translate(None).await.expect("translate");
    assert_eq!(outcome, TranslationOutcome::NoSourceFile);
    assert_eq!(fx.translator.session().state(), SessionState::Empty);
}

#[tokio::test]
async fn test_flat_translation_populates_session() {
    let mut fx = fixture(MockBehavior::Flat);
    fx.translator.select_file(&fx.input).expect("select");

    let outcome = fx.translator.translate(None).await.expect("translate");
    assert_eq!(outcome, TranslationOutcome::Completed { layout_preserved: false });

    let session = fx.translator.session();
    assert_eq!(session.state(), SessionState::Translated);
    assert_eq!(session.original_text(), "hola");
    assert_eq!(session.translated_text(), "hello");
    assert!(session.document_structure().is_none());
    assert!(!session.layout_preserved());
    assert!(!session.is_processing());
}

#[tokio::test]
async fn test_paged_translation_with_layout() {
    let mut fx = fixture(MockBehavior::PagedWithLayout);
    fx.translator.select_file(&fx.input).expect("select");

    let outcome = fx.translator.translate(None).await.expect("translate");
    assert_eq!(outcome, TranslationOutcome::Completed { layout_preserved: true });

    let session = fx.translator.session();
    assert!(session.layout_preserved());
    let structure = session.document_structure().expect("structure");
    assert_eq!(structure.page_count(), 2);
    assert_eq!(
        structure.pages.iter().map(|p| p.page_number).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(session.translated_text(), "one\n\ntwo");
}

#[tokio::test]
async fn test_paged_translation_without_layout_keeps_joined_text() {
    let mut fx = fixture(MockBehavior::PagedWithoutLayout);
    fx.translator.select_file(&fx.input).expect("select");

    fx.translator.translate(None).await.expect("translate");
    let session = fx.translator.session();
    assert!(!session.layout_preserved());
    assert!(session.document_structure().is_none());
    assert_eq!(session.translated_text(), "x\n\ny");
}

#[tokio::test]
async fn test_failed_translation_substitutes_markers() {
    let mut fx = fixture(MockBehavior::Fail);
    fx.translator.select_file(&fx.input).expect("select");

    // the error is absorbed, never propagated
    let outcome = fx.translator.translate(None).await.expect("translate");
    assert_eq!(outcome, TranslationOutcome::Failed);

    let session = fx.translator.session();
    assert_eq!(session.state(), SessionState::Translated);
    assert_eq!(session.original_text(), FAILED_ORIGINAL_TEXT);
    assert_eq!(session.translated_text(), FAILED_TRANSLATION_TEXT);
    assert!(session.document_structure().is_none());
    assert!(!session.is_processing());
}

#[tokio::test]
async fn test_progress_checkpoints_fire_in_order() {
    let mut fx = fixture(MockBehavior::Flat);
    fx.translator.select_file(&fx.input).expect("select");

    let (tx, rx) = std::sync::mpsc::channel();
    fx.translator
        .translate(Some(Box::new(move |stage| {
            let _ = tx.send(stage.percent());
        })))
        .await
        .expect("translate");

    let seen: Vec<u8> = rx.try_iter().collect();
    assert_eq!(seen, vec![25, 50, 75, 100]);
}

#[tokio::test]
async fn test_failed_translation_stops_at_translate_checkpoint() {
    let mut fx = fixture(MockBehavior::Fail);
    fx.translator.select_file(&fx.input).expect("select");

    let (tx, rx) = std::sync::mpsc::channel();
    fx.translator
        .translate(Some(Box::new(move |stage: ProgressStage| {
            let _ = tx.send(stage.percent());
        })))
        .await
        .expect("translate");

    let seen: Vec<u8> = rx.try_iter().collect();
    assert_eq!(seen, vec![25, 50, 75]);
}

#[tokio::test]
async fn test_retranslate_after_file_swap() {
    let mut fx = fixture(MockBehavior::Flat);
    fx.translator.select_file(&fx.input).expect("select");
    fx.translator.translate(None).await.expect("translate");
    assert_eq!(fx.translator.session().translated_text(), "hello");

    // swapping the file clears the previous result before the next call
    let second = fx.input.with_file_name("other.txt");
    std::fs::write(&second, b"text").expect("write fixture");
    fx.translator.select_file(&second).expect("select");
    assert_eq!(fx.translator.session().translated_text(), "");
    assert_eq!(fx.translator.session().state(), SessionState::FileSelected);

    fx.translator.translate(None).await.expect("translate");
    assert_eq!(fx.translator.session().translated_text(), "hello");
}

// =============================================================================
// Export + History Tests
// =============================================================================

#[tokio::test]
async fn test_export_without_translation_is_noop() {
    let mut fx = fixture(MockBehavior::Flat);
    fx.translator.select_file(&fx.input).expect("select");

    let artifact = fx
        .translator
        .export_and_record(ExportFormat::Text)
        .expect("export");
    assert!(artifact.is_none());
    assert!(fx.translator.history().is_empty());
}

#[tokio::test]
async fn test_export_then_history_round_trip() {
    let mut fx = fixture(MockBehavior::Flat);
    fx.translator.select_file(&fx.input).expect("select");
    fx.translator.translate(None).await.expect("translate");

    let artifact = fx
        .translator
        .export_and_record(ExportFormat::Text)
        .expect("export")
        .expect("artifact");
    assert_eq!(artifact.bytes, b"hello");
    assert_eq!(artifact.file_name, "translation_english.txt");

    let records = fx.translator.history().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_name, "letter.pdf");
    assert_eq!(records[0].translated_text, "hello");
    assert_eq!(records[0].original_text, "hola");
    assert!(!records[0].layout_preserved);
}

#[tokio::test]
async fn test_repeated_exports_prepend_records() {
    let mut fx = fixture(MockBehavior::Flat);
    fx.translator.select_file(&fx.input).expect("select");
    fx.translator.translate(None).await.expect("translate");

    for format in [ExportFormat::Text, ExportFormat::Pdf, ExportFormat::Docx] {
        fx.translator
            .export_and_record(format)
            .expect("export")
            .expect("artifact");
    }

    let records = fx.translator.history().records();
    assert_eq!(records.len(), 3);
    // newest first, ids unique
    let ids: Vec<_> = records.iter().map(|r| r.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(ids, sorted);
    sorted.dedup();
    assert_eq!(sorted.len(), 3);
}

#[tokio::test]
async fn test_layout_export_carries_structure_into_history() {
    let mut fx = fixture(MockBehavior::PagedWithLayout);
    fx.translator.select_file(&fx.input).expect("select");
    fx.translator.translate(None).await.expect("translate");

    let artifact = fx
        .translator
        .export_and_record(ExportFormat::Text)
        .expect("export")
        .expect("artifact");
    let text = String::from_utf8(artifact.bytes).expect("utf-8");
    assert_eq!(text, "--- Page 1 ---\n\none\n\n--- Page 2 ---\n\ntwo");

    let record = &fx.translator.history().records()[0];
    assert!(record.layout_preserved);
    let structure = record.document_structure.as_ref().expect("structure");
    assert_eq!(structure.page_count(), 2);
}

#[tokio::test]
async fn test_all_formats_agree_on_page_text() {
    let mut fx = fixture(MockBehavior::PagedWithLayout);
    fx.translator.select_file(&fx.input).expect("select");
    fx.translator.translate(None).await.expect("translate");

    let pdf = fx
        .translator
        .export_and_record(ExportFormat::Pdf)
        .expect("export")
        .expect("artifact");
    assert!(pdf.bytes.starts_with(b"%PDF"));

    let docx = fx
        .translator
        .export_and_record(ExportFormat::Docx)
        .expect("export")
        .expect("artifact");
    assert!(docx.bytes.starts_with(b"PK"));
}
