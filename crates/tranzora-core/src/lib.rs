//! Tranzora Core Library
//!
//! This library provides the core functionality for translating documents:
//! - Upload validation and single-session state tracking
//! - Translation via a remote translation service
//! - Export to plain text, PDF, and DOCX
//! - Durable translation history

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod history;
pub mod session;
pub mod translator;
pub mod util;

pub use config::{
    AppConfig, DEFAULT_TARGET_LANG, Lang, LanguageOption, TranslatorConfig, flag_for_lang,
    is_supported_language, language_name, target_languages,
};
pub use document::{DocumentStructure, LayoutElement, Page};
pub use error::{Error, Result};
pub use export::{ExportArtifact, ExportFormat, render_export};
pub use history::{HistoryRecord, HistoryStore};
pub use session::{
    FAILED_ORIGINAL_TEXT, FAILED_TRANSLATION_TEXT, SessionState, SourceFile, TranslationSession,
};
pub use translator::{
    DocumentUpload, ProgressCallback, ProgressStage, RemoteTranslator, TranslatedDocument,
    Translator, TranslatorInfo, create_translator,
};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Terminal result of a translate call.
///
/// Failure is absorbed into the session as failure-marker content, so the
/// call itself only errors on re-entry ([`Error::TranslationBusy`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationOutcome {
    Completed { layout_preserved: bool },
    Failed,
    /// No source file selected; nothing happened
    NoSourceFile,
}

/// High-level document translator that combines all components.
///
/// This is the explicit state container the composition root owns: the live
/// session, the translation backend, and the history store.
pub struct DocumentTranslator {
    translator: Arc<dyn Translator>,
    history: HistoryStore,
    session: TranslationSession,
    config: AppConfig,
}

impl DocumentTranslator {
    /// Create a new document translator with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self> {
        let translator = create_translator(&config.translator)?;
        let history_path = config
            .history
            .path
            .clone()
            .unwrap_or_else(util::history_store_path);
        let history = HistoryStore::open(history_path)?;

        Self::with_translator(translator, history, config)
    }

    /// Create with a custom translation backend and history store.
    pub fn with_translator(
        translator: Arc<dyn Translator>,
        history: HistoryStore,
        config: AppConfig,
    ) -> Result<Self> {
        let mut session = TranslationSession::new();
        session.set_target_lang(config.target_lang.clone())?;

        Ok(Self {
            translator,
            history,
            session,
            config,
        })
    }

    pub fn session(&self) -> &TranslationSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TranslationSession {
        &mut self.session
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore {
        &mut self.history
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn translator_info(&self) -> TranslatorInfo {
        self.translator.info()
    }

    /// Select a file for translation (see [`TranslationSession::select_file`]).
    pub fn select_file(&mut self, candidate: &Path) -> Result<()> {
        self.session.select_file(candidate)
    }

    /// Clear the session back to `Empty`.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Translate the selected file via the remote backend.
    ///
    /// Drives the four-checkpoint progress sequence with simulated delays,
    /// then stores the outcome in the session. A failed remote call lands in
    /// `Translated` with failure-marker text; it is logged, never propagated.
    pub async fn translate(
        &mut self,
        progress: Option<ProgressCallback>,
    ) -> Result<TranslationOutcome> {
        let Some(source) = self.session.source_file().cloned() else {
            return Ok(TranslationOutcome::NoSourceFile);
        };

        self.session.begin_translation()?;

        let emit = |stage: ProgressStage| {
            if let Some(ref callback) = progress {
                callback(stage);
            }
        };
        let stage_delay = Duration::from_millis(self.config.stage_delay_ms);

        info!(
            "Translating {} to {} with {}",
            source.file_name,
            self.session.target_lang(),
            self.translator.name()
        );

        emit(ProgressStage::Upload);
        tokio::time::sleep(stage_delay).await;
        emit(ProgressStage::Extract);
        tokio::time::sleep(stage_delay).await;
        emit(ProgressStage::Translate);

        match self.request_translation(&source).await {
            Ok(result) => {
                let layout_preserved = result.structure.is_some();
                self.session.complete_translation(
                    result.original_text,
                    result.translated_text,
                    result.structure,
                );
                emit(ProgressStage::Complete);
                tokio::time::sleep(Duration::from_millis(self.config.complete_delay_ms)).await;
                Ok(TranslationOutcome::Completed { layout_preserved })
            }
            Err(e) => {
                error!("Translation error: {}", e);
                self.session.fail_translation();
                Ok(TranslationOutcome::Failed)
            }
        }
    }

    async fn request_translation(&self, source: &SourceFile) -> Result<TranslatedDocument> {
        let bytes = tokio::fs::read(&source.path).await?;
        let upload = DocumentUpload {
            file_name: source.file_name.clone(),
            mime_type: source.mime_type.clone(),
            bytes,
        };

        self.translator
            .translate_document(&upload, self.session.target_lang(), self.config.preserve_layout)
            .await
    }

    /// Serialize the translated content into `format` and append a history
    /// record.
    ///
    /// Returns `None` (a no-op) when there is no source file or no translated
    /// text. The record is appended only after serialization succeeded, so a
    /// failed export never leaves a phantom history entry.
    pub fn export_and_record(&mut self, format: ExportFormat) -> Result<Option<ExportArtifact>> {
        let Some(source) = self.session.source_file() else {
            return Ok(None);
        };
        if self.session.translated_text().is_empty() {
            return Ok(None);
        }

        let artifact = export::render_export(&self.session, format)?;

        let now = chrono::Utc::now();
        let record = HistoryRecord {
            id: now.timestamp_millis(),
            file_name: source.file_name.clone(),
            date: now.to_rfc3339(),
            original_text: self.session.original_text().to_string(),
            translated_text: self.session.translated_text().to_string(),
            document_structure: self.session.document_structure().cloned(),
            layout_preserved: self.session.layout_preserved(),
        };
        self.history.add(record)?;

        info!("Exported {} ({} bytes)", artifact.file_name, artifact.bytes.len());
        Ok(Some(artifact))
    }
}
