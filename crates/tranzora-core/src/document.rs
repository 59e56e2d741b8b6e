//! Per-page document structure returned by the translation service when
//! layout preservation is requested.

use serde::{Deserialize, Serialize};

/// Ordered per-page structure of a translated document.
///
/// Owned exclusively by the session; replaced wholesale on each successful
/// translation and copied into history records at export time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStructure {
    pub pages: Vec<Page>,
}

/// A single page of the translated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based, sequential, no gaps
    pub page_number: usize,
    pub original_text: String,
    pub translated_text: String,
    /// Structural text blocks in reading order; may be empty
    pub layout_elements: Vec<LayoutElement>,
}

/// A structural text block (paragraph, heading, ...) within a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutElement {
    /// Block kind as reported by the service ("paragraph", "heading", ...)
    pub kind: String,
    pub text: String,
    pub translated_text: String,
}

impl DocumentStructure {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
