mod remote;
mod response;
mod traits;

pub use remote::RemoteTranslator;
pub use response::{
    ORIGINAL_TEXT_UNAVAILABLE, TRANSLATED_TEXT_MISSING, TranslateResponse, TranslationData,
};
pub use traits::{DocumentUpload, TranslatedDocument, Translator, TranslatorInfo};

use crate::config::TranslatorConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a translator from configuration
pub fn create_translator(config: &TranslatorConfig) -> Result<Arc<dyn Translator>> {
    let translator = RemoteTranslator::new(
        config.api_base.clone(),
        config.api_key.clone(),
        config.retry_count,
        config.retry_delay_ms,
    );

    Ok(Arc::new(translator))
}

/// The four checkpoints of the simulated progress sequence.
///
/// Purely UI feedback, separated by fixed delays; not tied to real transfer
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStage {
    Upload,
    Extract,
    Translate,
    Complete,
}

impl ProgressStage {
    pub const fn percent(self) -> u8 {
        match self {
            Self::Upload => 25,
            Self::Extract => 50,
            Self::Translate => 75,
            Self::Complete => 100,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Extract => "Extract",
            Self::Translate => "Translate",
            Self::Complete => "Complete",
        }
    }
}

/// Callback invoked at each progress checkpoint.
pub type ProgressCallback = Box<dyn Fn(ProgressStage) + Send>;
