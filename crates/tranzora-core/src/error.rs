use thiserror::Error;

/// Unified error type for tranzora-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Upload validation (unsupported file types)
/// - Translation operations (API requests, responses, re-entrancy)
/// - History operations (store initialization, persistence)
/// - Export operations (PDF/DOCX serialization)
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Upload Errors
    // ==========================================================================
    /// Selected file has an unsupported extension
    #[error("unsupported file type: {0}")]
    InvalidFileType(String),

    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// A translation is already in flight for this session
    #[error("a translation is already in progress")]
    TranslationBusy,

    /// Translation API request failed
    #[error("translation API request failed: {0}")]
    TranslationRequest(String),

    /// Invalid response from translation API
    #[error("invalid translation API response: {0}")]
    TranslationInvalidResponse(String),

    /// Translation request timed out
    #[error("translation request timed out")]
    TranslationTimeout,

    /// Unsupported target language code
    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),

    // ==========================================================================
    // History Errors
    // ==========================================================================
    /// Failed to open the history store
    #[error("failed to open history store: {0}")]
    HistoryInit(String),

    /// Failed to persist the history list
    #[error("failed to write history: {0}")]
    HistoryWrite(String),

    // ==========================================================================
    // Export Errors
    // ==========================================================================
    /// Failed to build the PDF export
    #[error("failed to build PDF export: {0}")]
    ExportPdf(String),

    /// Failed to build the DOCX export
    #[error("failed to build DOCX export: {0}")]
    ExportDocx(String),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
