//! Paginated PDF export built with lopdf.
//!
//! One destination page per structure page (flat content gets a single
//! page), a title block on the first page, word-wrapped body text. Base-14
//! Helvetica fonts; non-Latin target scripts are limited by the standard
//! WinAnsi encoding.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use super::{ExportBody, TitleBlock};
use crate::error::{Error, Result};

// A4 in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 40.0;
const BODY_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const TITLE_SIZE: f32 = 18.0;
const INFO_SIZE: f32 = 12.0;
const HEADER_SIZE: f32 = 10.0;
const BODY_SIZE: f32 = 11.0;
const LEADING: f32 = 14.0;

/// Wrap text to a maximum number of characters per line, breaking on
/// whitespace and hard-splitting words longer than a full line.
pub(super) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        if raw_line.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();

            if !current.is_empty() && current.chars().count() + 1 + word_len > max_chars {
                lines.push(std::mem::take(&mut current));
            }

            if word_len > max_chars {
                // Hard-split oversized words
                let mut chunk = String::new();
                for ch in word.chars() {
                    if chunk.chars().count() == max_chars {
                        lines.push(std::mem::take(&mut chunk));
                    }
                    chunk.push(ch);
                }
                current = chunk;
            } else {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn chars_per_line(font_size: f32) -> usize {
    // Average Helvetica glyph is roughly 0.55em wide
    (BODY_WIDTH / (font_size * 0.55)).floor() as usize
}

/// Accumulates content operations per destination page, breaking to a fresh
/// page when the cursor runs out of room.
struct PageComposer {
    pages: Vec<Vec<Operation>>,
    cursor: f32,
}

impl PageComposer {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_HEIGHT - MARGIN - TITLE_SIZE,
        }
    }

    fn break_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = PAGE_HEIGHT - MARGIN - HEADER_SIZE;
    }

    fn line(&mut self, font: &str, size: f32, gray: f32, text: &str) {
        if self.cursor < MARGIN {
            self.break_page();
        }

        // pages is never empty: the composer starts with one and only grows
        let Some(ops) = self.pages.last_mut() else {
            return;
        };
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("g", vec![gray.into()]));
        ops.push(Operation::new("Td", vec![MARGIN.into(), self.cursor.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        ops.push(Operation::new("ET", vec![]));

        self.cursor -= LEADING;
    }

    fn space(&mut self, amount: f32) {
        self.cursor -= amount;
    }

    fn body_text(&mut self, text: &str) {
        for line in wrap_text(text, chars_per_line(BODY_SIZE)) {
            self.line("F1", BODY_SIZE, 0.1, &line);
        }
    }
}

pub(super) fn render(body: &ExportBody<'_>, title: &TitleBlock) -> Result<Vec<u8>> {
    let mut composer = PageComposer::new();

    composer.line("F2", TITLE_SIZE, 0.0, "Translation Result");
    composer.space(4.0);
    composer.line("F1", INFO_SIZE, 0.4, &format!("Language: {}", title.language));
    composer.line("F1", INFO_SIZE, 0.4, &format!("File: {}", title.file_name));
    composer.space(20.0);

    match body {
        ExportBody::Flat(text) => composer.body_text(text),
        ExportBody::Paged(pages) => {
            for (index, page) in pages.iter().enumerate() {
                if index > 0 {
                    composer.break_page();
                }
                composer.line("F1", HEADER_SIZE, 0.6, &format!("Page {}", page.page_number));
                composer.space(8.0);
                composer.body_text(&page.translated_text);
            }
        }
    }

    assemble(composer.pages)
}

#[allow(clippy::cast_possible_wrap)]
fn assemble(page_ops: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let font_bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_regular,
            "F2" => font_bold,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_ops.len());
    for operations in page_ops {
        let content = Content { operations };
        let encoded = content
            .encode()
            .map_err(|e| Error::ExportPdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| Error::ExportPdf(e.to_string()))?;
    Ok(bytes)
}
