//! DOCX writer.
//!
//! Serialises a [`RenderedDocument`] into a minimal WordprocessingML package. Only the
//! parts Word and LibreOffice need are emitted: content types, package and document
//! relationships, styles, a single bullet numbering definition and the body.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};

use quick_xml::escape::escape;
use tracing::{debug, error, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{GuideError, Result};
use crate::filename::DOCX_EXTENSION;
use crate::markup::MarkupSpan;
use crate::render::{Block, ListMarker, RenderedDocument, LINE_SPACING, TITLE_LEVEL};

/// Colour of the title and section headings (dark blue).
pub const HEADING_COLOR: &str = "1E3A8A";
/// Title size in half-points (28pt).
const TITLE_SIZE: u32 = 56;
/// Section heading size in half-points (24pt).
const HEADING_SIZE: u32 = 48;
const BULLET_NUM_ID: u32 = 1;

const CONTENT_TYPES_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>
</Types>
"#;

const PACKAGE_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>
"#;

const DOCUMENT_RELS_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering" Target="numbering.xml"/>
</Relationships>
"#;

const STYLES_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:rPr><w:sz w:val="22"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Title">
    <w:name w:val="Title"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:pPr><w:spacing w:after="240"/></w:pPr>
    <w:rPr><w:b/><w:color w:val="1E3A8A"/><w:sz w:val="56"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="Heading1">
    <w:name w:val="heading 1"/>
    <w:basedOn w:val="Normal"/>
    <w:next w:val="Normal"/>
    <w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/><w:outlineLvl w:val="0"/></w:pPr>
    <w:rPr><w:b/><w:color w:val="1E3A8A"/><w:sz w:val="48"/></w:rPr>
  </w:style>
  <w:style w:type="paragraph" w:styleId="ListBullet">
    <w:name w:val="List Bullet"/>
    <w:basedOn w:val="Normal"/>
    <w:pPr><w:numPr><w:ilvl w:val="0"/><w:numId w:val="1"/></w:numPr></w:pPr>
  </w:style>
</w:styles>
"#;

const NUMBERING_XML: &[u8] = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:multiLevelType w:val="singleLevel"/>
    <w:lvl w:ilvl="0">
      <w:start w:val="1"/>
      <w:numFmt w:val="bullet"/>
      <w:lvlText w:val="•"/>
      <w:lvlJc w:val="left"/>
      <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
    </w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
</w:numbering>
"#
.as_bytes();

/// Writes `document` to `output_dir/file_name`, creating the directory if needed.
/// `.docx` is appended when `file_name` lacks it.
pub fn persist(document: &RenderedDocument, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    if let Err(e) = fs::create_dir_all(output_dir) {
        error!(error = ?e, path = %output_dir.display(), "[RENDER] Failed to create output directory");
        return Err(GuideError::persistence(output_dir, e));
    }

    let file_name = if file_name.ends_with(DOCX_EXTENSION) {
        file_name.to_string()
    } else {
        format!("{file_name}{DOCX_EXTENSION}")
    };
    let path = output_dir.join(file_name);

    let bytes = to_docx_bytes(document).map_err(|e| GuideError::persistence(&path, e))?;
    fs::write(&path, &bytes).map_err(|e| {
        error!(error = ?e, path = %path.display(), "[RENDER] Failed to write document");
        GuideError::persistence(&path, e)
    })?;

    info!(path = %path.display(), size = bytes.len(), "[RENDER] Persisted document");
    Ok(path)
}

/// Packages `document` as DOCX bytes.
pub fn to_docx_bytes(document: &RenderedDocument) -> io::Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", PACKAGE_RELS_XML),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML),
        ("word/styles.xml", STYLES_XML),
        ("word/numbering.xml", NUMBERING_XML),
    ];
    for (name, content) in parts {
        zip.start_file(name, deflated).map_err(io_error)?;
        zip.write_all(content)?;
    }

    let body = document_xml(document);
    zip.start_file("word/document.xml", deflated)
        .map_err(io_error)?;
    zip.write_all(body.as_bytes())?;

    let cursor = zip.finish().map_err(io_error)?;
    debug!(blocks = document.blocks.len(), "[RENDER] Packaged DOCX");
    Ok(cursor.into_inner())
}

/// The `word/document.xml` part for `document`.
pub fn document_xml(document: &RenderedDocument) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\n\
         <w:body>\n",
    );
    for block in &document.blocks {
        write_block(&mut xml, block);
    }
    xml.push_str("<w:sectPr/>\n</w:body>\n</w:document>\n");
    xml
}

fn write_block(xml: &mut String, block: &Block) {
    match block {
        Block::Heading { text, level } => {
            let (style, size) = if *level == TITLE_LEVEL {
                ("Title", TITLE_SIZE)
            } else {
                ("Heading1", HEADING_SIZE)
            };
            let _ = writeln!(
                xml,
                "<w:p><w:pPr><w:pStyle w:val=\"{style}\"/></w:pPr>\
                 <w:r><w:rPr><w:b/><w:color w:val=\"{HEADING_COLOR}\"/><w:sz w:val=\"{size}\"/></w:rPr>\
                 <w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
                escape(text.as_str())
            );
        }
        Block::Paragraph { spans, list } => {
            xml.push_str("<w:p><w:pPr>");
            if *list == ListMarker::Bullet {
                let _ = write!(
                    xml,
                    "<w:pStyle w:val=\"ListBullet\"/>\
                     <w:numPr><w:ilvl w:val=\"0\"/><w:numId w:val=\"{BULLET_NUM_ID}\"/></w:numPr>"
                );
            }
            let _ = write!(
                xml,
                "<w:spacing w:line=\"{}\" w:lineRule=\"auto\"/></w:pPr>",
                line_twips()
            );
            for span in spans {
                write_run(xml, span);
            }
            xml.push_str("</w:p>\n");
        }
    }
}

fn write_run(xml: &mut String, span: &MarkupSpan) {
    xml.push_str("<w:r>");
    if !span.format.is_plain() {
        xml.push_str("<w:rPr>");
        if span.format.bold {
            xml.push_str("<w:b/>");
        }
        if span.format.italic {
            xml.push_str("<w:i/>");
        }
        if span.format.highlighted {
            xml.push_str("<w:highlight w:val=\"yellow\"/>");
        }
        xml.push_str("</w:rPr>");
    }
    let _ = write!(
        xml,
        "<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        escape(span.text.as_str())
    );
}

/// Line spacing in 240ths of a line, as WordprocessingML expects with `lineRule="auto"`.
fn line_twips() -> u32 {
    (LINE_SPACING * 240.0).round() as u32
}

fn io_error(e: zip::result::ZipError) -> io::Error {
    io::Error::other(e)
}
