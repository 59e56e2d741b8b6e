//! Plain-text export.

use super::ExportBody;

/// Render the translated content as raw UTF-8 text.
///
/// With layout preserved each page gets a `--- Page N ---` header; flat
/// content is emitted verbatim.
pub(super) fn render(body: &ExportBody<'_>) -> String {
    match body {
        ExportBody::Flat(text) => (*text).to_string(),
        ExportBody::Paged(pages) => pages
            .iter()
            .map(|page| format!("--- Page {} ---\n\n{}", page.page_number, page.translated_text))
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}
