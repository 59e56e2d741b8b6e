//! Translation session state.
//!
//! A session holds the one in-progress translation job: the selected file,
//! the texts produced by the remote call, the optional per-page structure,
//! and the busy flag that makes the call single-flight. There is exactly one
//! live session per application; it is reset on a new upload or on demand.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{DEFAULT_TARGET_LANG, Lang};
use crate::document::DocumentStructure;
use crate::error::{Error, Result};

/// Original text substituted when the remote call fails outright.
pub const FAILED_ORIGINAL_TEXT: &str = "Could not retrieve original text.";
/// Translated text substituted when the remote call fails outright.
pub const FAILED_TRANSLATION_TEXT: &str = "⚠️ Translation failed. Please try again later.";

/// Document extensions accepted for upload.
pub const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];
/// Image extensions accepted for upload.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Whether a file name carries a supported extension (case-insensitive
/// suffix match against the document and image sets).
pub fn is_supported_file(file_name: &str) -> bool {
    let Some(extension) = extension_of(file_name) else {
        return false;
    };
    DOCUMENT_EXTENSIONS.contains(&extension.as_str())
        || IMAGE_EXTENSIONS.contains(&extension.as_str())
}

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// The file currently selected for translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub file_name: String,
    /// Size on disk; 0 when the file is not readable yet
    pub size: u64,
    /// Declared media type from the file name
    pub mime_type: String,
    /// Derived from the declared media type
    pub is_image: bool,
}

impl SourceFile {
    /// Build a source file descriptor from a path, validating the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidFileType(path.display().to_string()))?;

        if !is_supported_file(&file_name) {
            return Err(Error::InvalidFileType(file_name));
        }

        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let is_image = mime_type.starts_with("image/");
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size,
            mime_type,
            is_image,
        })
    }
}

/// Observable session lifecycle state.
///
/// `Translating` never reverts to `Empty`/`FileSelected`: a failed call still
/// lands in `Translated` carrying failure-marker text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    FileSelected,
    Translating,
    Translated,
}

/// The single live translation job.
pub struct TranslationSession {
    source_file: Option<SourceFile>,
    /// Single-flight guard; checked and set atomically before a remote call
    /// is dispatched, so the property holds even without UI gating.
    busy: AtomicBool,
    original_text: String,
    translated_text: String,
    document_structure: Option<DocumentStructure>,
    layout_preserved: bool,
    target_lang: Lang,
}

impl Default for TranslationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationSession {
    pub fn new() -> Self {
        Self {
            source_file: None,
            busy: AtomicBool::new(false),
            original_text: String::new(),
            translated_text: String::new(),
            document_structure: None,
            layout_preserved: false,
            target_lang: Lang::new(DEFAULT_TARGET_LANG),
        }
    }

    /// Select a file for translation.
    ///
    /// On success the previous file is replaced and all translation output is
    /// cleared, so stale translated content never survives a file swap. On an
    /// unsupported extension the session is left untouched.
    pub fn select_file(&mut self, candidate: &Path) -> Result<()> {
        let source = SourceFile::from_path(candidate)?;
        self.source_file = Some(source);
        self.original_text.clear();
        self.translated_text.clear();
        self.document_structure = None;
        self.layout_preserved = false;
        Ok(())
    }

    /// Adapter for drag-and-drop style multi-file payloads: the first
    /// candidate is used, the rest are dropped.
    pub fn select_first_file(&mut self, candidates: &[PathBuf]) -> Result<()> {
        let Some(first) = candidates.first() else {
            return Ok(());
        };
        self.select_file(first)
    }

    /// Clear the session back to `Empty`.
    pub fn reset(&mut self) {
        self.source_file = None;
        self.original_text.clear();
        self.translated_text.clear();
        self.document_structure = None;
        self.layout_preserved = false;
        self.busy.store(false, Ordering::SeqCst);
    }

    pub fn state(&self) -> SessionState {
        if self.busy.load(Ordering::SeqCst) {
            SessionState::Translating
        } else if !self.translated_text.is_empty() {
            SessionState::Translated
        } else if self.source_file.is_some() {
            SessionState::FileSelected
        } else {
            SessionState::Empty
        }
    }

    pub fn source_file(&self) -> Option<&SourceFile> {
        self.source_file.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn document_structure(&self) -> Option<&DocumentStructure> {
        self.document_structure.as_ref()
    }

    pub fn layout_preserved(&self) -> bool {
        self.layout_preserved
    }

    pub fn target_lang(&self) -> &Lang {
        &self.target_lang
    }

    pub fn set_target_lang(&mut self, lang: Lang) -> Result<()> {
        if !crate::config::is_supported_language(lang.as_str()) {
            return Err(Error::UnsupportedLanguage(lang.0));
        }
        self.target_lang = lang;
        Ok(())
    }

    /// Atomically claim the busy flag before dispatching a remote call.
    ///
    /// Errors with [`Error::TranslationBusy`] if a call is already in flight.
    pub(crate) fn begin_translation(&self) -> Result<()> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| Error::TranslationBusy)?;
        Ok(())
    }

    /// Store a successful outcome and release the busy flag.
    pub(crate) fn complete_translation(
        &mut self,
        original_text: String,
        translated_text: String,
        structure: Option<DocumentStructure>,
    ) {
        self.layout_preserved = structure.is_some();
        self.document_structure = structure;
        self.original_text = original_text;
        self.translated_text = translated_text;
        self.busy.store(false, Ordering::SeqCst);
    }

    /// Store the fixed failure markers and release the busy flag.
    ///
    /// Failure is surfaced as content, so the session still reaches the
    /// terminal `Translated` state.
    pub(crate) fn fail_translation(&mut self) {
        self.original_text = FAILED_ORIGINAL_TEXT.to_string();
        self.translated_text = FAILED_TRANSLATION_TEXT.to_string();
        self.document_structure = None;
        self.layout_preserved = false;
        self.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"content").expect("write fixture");
        path
    }

    #[test]
    fn test_all_supported_extensions_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        for ext in DOCUMENT_EXTENSIONS.iter().chain(IMAGE_EXTENSIONS.iter()) {
            for name in [format!("a.{ext}"), format!("a.{}", ext.to_uppercase())] {
                let mut session = TranslationSession::new();
                let path = touch(dir.path(), &name);
                assert!(session.select_file(&path).is_ok(), "should accept {name}");
                assert_eq!(session.state(), SessionState::FileSelected);
            }
        }
    }

    #[test]
    fn test_unsupported_extension_leaves_session_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = TranslationSession::new();
        session
            .select_file(&touch(dir.path(), "good.txt"))
            .expect("valid file");
        session.complete_translation("orig".into(), "trans".into(), None);

        let result = session.select_file(&touch(dir.path(), "bad.exe"));
        assert!(matches!(result, Err(Error::InvalidFileType(_))));
        // rejection mutates nothing
        assert_eq!(session.source_file().map(|f| f.file_name.as_str()), Some("good.txt"));
        assert_eq!(session.translated_text(), "trans");
        assert_eq!(session.state(), SessionState::Translated);
    }

    #[test]
    fn test_file_swap_clears_stale_translation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = TranslationSession::new();
        session
            .select_file(&touch(dir.path(), "first.pdf"))
            .expect("valid file");
        session.complete_translation("orig".into(), "trans".into(), None);
        assert_eq!(session.state(), SessionState::Translated);

        session
            .select_file(&touch(dir.path(), "second.docx"))
            .expect("valid file");
        assert_eq!(session.translated_text(), "");
        assert_eq!(session.original_text(), "");
        assert!(session.document_structure().is_none());
        assert!(!session.layout_preserved());
        assert_eq!(session.state(), SessionState::FileSelected);
    }

    #[test]
    fn test_image_flag_from_media_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = TranslationSession::new();
        session
            .select_file(&touch(dir.path(), "scan.JPEG"))
            .expect("valid image");
        assert!(session.source_file().expect("file").is_image);

        session
            .select_file(&touch(dir.path(), "report.pdf"))
            .expect("valid document");
        assert!(!session.source_file().expect("file").is_image);
    }

    #[test]
    fn test_select_first_file_drops_extras() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = TranslationSession::new();
        let first = touch(dir.path(), "a.txt");
        let second = touch(dir.path(), "b.txt");
        session
            .select_first_file(&[first, second])
            .expect("valid files");
        assert_eq!(session.source_file().map(|f| f.file_name.as_str()), Some("a.txt"));

        // empty payload is a no-op
        let mut empty = TranslationSession::new();
        empty.select_first_file(&[]).expect("no-op");
        assert_eq!(empty.state(), SessionState::Empty);
    }

    #[test]
    fn test_busy_guard_rejects_second_call() {
        let session = TranslationSession::new();
        session.begin_translation().expect("first claim");
        assert!(matches!(session.begin_translation(), Err(Error::TranslationBusy)));
    }

    #[test]
    fn test_failure_lands_in_translated_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = TranslationSession::new();
        session
            .select_file(&touch(dir.path(), "doc.pdf"))
            .expect("valid file");
        session.begin_translation().expect("claim");
        assert_eq!(session.state(), SessionState::Translating);

        session.fail_translation();
        assert_eq!(session.state(), SessionState::Translated);
        assert_eq!(session.translated_text(), FAILED_TRANSLATION_TEXT);
        assert_eq!(session.original_text(), FAILED_ORIGINAL_TEXT);
        assert!(!session.is_processing());
    }

    #[test]
    fn test_reset_returns_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut session = TranslationSession::new();
        session
            .select_file(&touch(dir.path(), "doc.pdf"))
            .expect("valid file");
        session.complete_translation("o".into(), "t".into(), None);

        session.reset();
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.source_file().is_none());
        assert_eq!(session.translated_text(), "");
    }

    #[test]
    fn test_unsupported_target_language_rejected() {
        let mut session = TranslationSession::new();
        assert!(session.set_target_lang(Lang::new("korean")).is_ok());
        assert!(matches!(
            session.set_target_lang(Lang::new("latin")),
            Err(Error::UnsupportedLanguage(_))
        ));
        assert_eq!(session.target_lang().as_str(), "korean");
    }
}
