//! Word-processor export: a minimal WordprocessingML package written with
//! the zip crate.
//!
//! Structurally equivalent to the PDF export: title block, then either one
//! section per structure page (explicit page breaks between) or one
//! paragraph per line of the flat translated text.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{ExportBody, TitleBlock};
use crate::error::{Error, Result};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A run with optional properties; sizes are half-points per OOXML.
fn run(text: &str, props: &str) -> String {
    let properties = if props.is_empty() {
        String::new()
    } else {
        format!("<w:rPr>{props}</w:rPr>")
    };
    format!(
        "<w:r>{properties}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        escape_xml(text)
    )
}

fn paragraph(runs: &str) -> String {
    format!("<w:p>{runs}</w:p>")
}

fn empty_paragraph() -> String {
    "<w:p/>".to_string()
}

fn page_break() -> String {
    "<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>".to_string()
}

fn body_lines(text: &str, out: &mut Vec<String>) {
    for line in text.split('\n') {
        out.push(paragraph(&run(line, "<w:sz w:val=\"22\"/>")));
    }
}

fn document_xml(body: &ExportBody<'_>, title: &TitleBlock) -> String {
    let mut paragraphs = vec![
        paragraph(&run("Translation Result", "<w:b/><w:sz w:val=\"32\"/>")),
        paragraph(&run(
            &format!("Language: {}", title.language),
            "<w:i/><w:sz w:val=\"24\"/>",
        )),
        paragraph(&run(
            &format!("File: {}", title.file_name),
            "<w:i/><w:sz w:val=\"24\"/>",
        )),
        empty_paragraph(),
    ];

    match body {
        ExportBody::Flat(text) => body_lines(text, &mut paragraphs),
        ExportBody::Paged(pages) => {
            for (index, page) in pages.iter().enumerate() {
                if index > 0 {
                    paragraphs.push(page_break());
                }
                paragraphs.push(paragraph(&run(
                    &format!("Page {}", page.page_number),
                    "<w:b/><w:sz w:val=\"24\"/>",
                )));
                paragraphs.push(empty_paragraph());
                body_lines(&page.translated_text, &mut paragraphs);
            }
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
        <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
        <w:body>{}</w:body></w:document>",
        paragraphs.concat()
    )
}

pub(super) fn render(body: &ExportBody<'_>, title: &TitleBlock) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let entries = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", RELS_XML.to_string()),
        ("word/document.xml", document_xml(body, title)),
    ];

    for (name, content) in entries {
        zip.start_file(name, options)
            .map_err(|e| Error::ExportDocx(e.to_string()))?;
        zip.write_all(content.as_bytes())
            .map_err(|e| Error::ExportDocx(e.to_string()))?;
    }

    let cursor = zip.finish().map_err(|e| Error::ExportDocx(e.to_string()))?;
    Ok(cursor.into_inner())
}
