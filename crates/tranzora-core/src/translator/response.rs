//! Wire format of the translation service response.
//!
//! The service returns `{ "translation_data": ... }` in one of two shapes:
//! a multi-page shape (`pages` is a non-empty array, optionally carrying
//! `layout_elements` per page) or a flat shape (`original_text` /
//! `translated_text` at the top level). Interpretation of both shapes into a
//! [`TranslatedDocument`] lives here so it can be tested without a server.

use serde::Deserialize;

use super::traits::TranslatedDocument;
use crate::document::{DocumentStructure, LayoutElement, Page};

/// Flat-shape default when the service omits the original text.
pub const ORIGINAL_TEXT_UNAVAILABLE: &str = "Original text not available.";
/// Flat-shape default when the service omits the translated text.
pub const TRANSLATED_TEXT_MISSING: &str = "⚠️ No translated text found.";

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateResponse {
    pub translation_data: Option<TranslationData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslationData {
    #[serde(default)]
    pub pages: Vec<WirePage>,
    pub original_text: Option<String>,
    pub translated_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WirePage {
    pub original_text: Option<String>,
    pub translated_text: Option<String>,
    #[serde(default)]
    pub layout_elements: Vec<WireLayoutElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireLayoutElement {
    #[serde(rename = "type", default = "default_element_kind")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub translated_text: String,
}

fn default_element_kind() -> String {
    "paragraph".to_string()
}

/// Replace literal two-character `\n` escape sequences with real newlines.
///
/// The service double-escapes newlines inside JSON strings; they arrive here
/// as backslash-n and must be normalized before storing.
fn normalize_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

impl TranslateResponse {
    /// Interpret the response into a [`TranslatedDocument`].
    pub fn into_document(self) -> TranslatedDocument {
        self.translation_data.unwrap_or_default().into_document()
    }
}

impl TranslationData {
    pub fn into_document(self) -> TranslatedDocument {
        if self.pages.is_empty() {
            return self.into_flat_document();
        }

        let original_text = normalize_newlines(
            &self
                .pages
                .iter()
                .map(|p| p.original_text.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n\n"),
        );
        let translated_text = normalize_newlines(
            &self
                .pages
                .iter()
                .map(|p| p.translated_text.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n\n"),
        );

        // Layout counts as preserved only when at least one page actually
        // carries layout elements; otherwise the structure is dropped and
        // only the joined texts survive.
        let has_layout = self.pages.iter().any(|p| !p.layout_elements.is_empty());
        let structure = has_layout.then(|| DocumentStructure {
            pages: self
                .pages
                .into_iter()
                .enumerate()
                .map(|(index, page)| Page {
                    page_number: index + 1,
                    original_text: normalize_newlines(
                        page.original_text.as_deref().unwrap_or_default(),
                    ),
                    translated_text: normalize_newlines(
                        page.translated_text.as_deref().unwrap_or_default(),
                    ),
                    layout_elements: page
                        .layout_elements
                        .into_iter()
                        .map(|element| LayoutElement {
                            kind: element.kind,
                            text: normalize_newlines(&element.text),
                            translated_text: normalize_newlines(&element.translated_text),
                        })
                        .collect(),
                })
                .collect(),
        });

        TranslatedDocument {
            original_text,
            translated_text,
            structure,
        }
    }

    fn into_flat_document(self) -> TranslatedDocument {
        let original = self
            .original_text
            .unwrap_or_else(|| ORIGINAL_TEXT_UNAVAILABLE.to_string());
        let translated = self
            .translated_text
            .unwrap_or_else(|| TRANSLATED_TEXT_MISSING.to_string());

        TranslatedDocument {
            original_text: normalize_newlines(&original),
            translated_text: normalize_newlines(&translated),
            structure: None,
        }
    }
}
