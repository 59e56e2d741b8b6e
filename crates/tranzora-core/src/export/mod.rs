//! Export pipeline: serialize the session's translated content into one of
//! the destination formats.
//!
//! All three formats derive the per-page text identically from the session
//! (structure pages when layout is preserved, the flat translated text
//! otherwise); they differ only in container format.

mod docx;
mod pdf;
mod text;

use crate::config::language_name;
use crate::document::Page;
use crate::error::Result;
use crate::session::TranslationSession;

/// Destination format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain;charset=utf-8",
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A serialized export, ready to hand to the download mechanism.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Title block shared by the paginated formats.
pub(crate) struct TitleBlock {
    pub language: &'static str,
    pub file_name: String,
}

/// What each destination page contains, derived once for all formats.
pub(crate) enum ExportBody<'a> {
    Flat(&'a str),
    Paged(&'a [Page]),
}

fn body_of(session: &TranslationSession) -> ExportBody<'_> {
    match session.document_structure() {
        Some(structure) if session.layout_preserved() => ExportBody::Paged(&structure.pages),
        _ => ExportBody::Flat(session.translated_text()),
    }
}

/// Serialize the session's translated content into `format`.
///
/// The caller is responsible for the no-op guard (no file / no translated
/// text) and for appending the history record after serialization succeeds.
pub fn render_export(session: &TranslationSession, format: ExportFormat) -> Result<ExportArtifact> {
    let body = body_of(session);
    let title = TitleBlock {
        language: language_name(session.target_lang().as_str()),
        file_name: session
            .source_file()
            .map(|f| f.file_name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
    };

    let bytes = match format {
        ExportFormat::Text => text::render(&body).into_bytes(),
        ExportFormat::Pdf => pdf::render(&body, &title)?,
        ExportFormat::Docx => docx::render(&body, &title)?,
    };

    Ok(ExportArtifact {
        file_name: format!(
            "translation_{}.{}",
            session.target_lang().as_str(),
            format.extension()
        ),
        mime_type: format.mime_type(),
        bytes,
    })
}
