use async_trait::async_trait;

use crate::config::Lang;
use crate::document::DocumentStructure;
use crate::error::Result;

/// Information about a translation backend
#[derive(Debug, Clone)]
pub struct TranslatorInfo {
    /// Human-readable name
    pub name: &'static str,
    /// Whether this backend requires an API key
    pub requires_api_key: bool,
    /// Whether this backend can return per-page layout structure
    pub supports_layout: bool,
}

/// The file payload sent to a translation backend.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// A fully interpreted translation result, ready to store in the session.
///
/// `structure` is present only when the backend returned per-page layout
/// data; flat responses leave it unset.
#[derive(Debug, Clone, Default)]
pub struct TranslatedDocument {
    pub original_text: String,
    pub translated_text: String,
    pub structure: Option<DocumentStructure>,
}

/// Trait for translation backends
#[async_trait]
pub trait Translator: Send + Sync {
    /// Get information about this backend
    fn info(&self) -> TranslatorInfo;

    /// Get the backend name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate a whole document into the target language.
    async fn translate_document(
        &self,
        upload: &DocumentUpload,
        target: &Lang,
        preserve_layout: bool,
    ) -> Result<TranslatedDocument>;
}
