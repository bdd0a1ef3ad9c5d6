// Outline-format (.docx) reader.
//
// A .docx file is a ZIP archive of Office Open XML parts. Two parts matter
// here:
// - `word/document.xml`: body paragraphs in document order
// - `word/styles.xml`: style definitions, used to recognize which paragraph
//   styles are top-level headings
//
// The reader emits a flat paragraph stream with a heading-boundary flag;
// the segmentation rules live in `extract::blocks`.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

/// One body paragraph with its structural role.
#[derive(Debug, Clone, PartialEq)]
pub struct DocxParagraph {
    pub text: String,
    /// True when the paragraph's style is a top-level heading style.
    pub is_heading: bool,
}

/// Read all body paragraphs of a .docx file in document order.
pub fn read_paragraphs(path: &Path) -> Result<Vec<DocxParagraph>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut archive = ZipArchive::new(file).context("not a valid .docx (ZIP) archive")?;

    let heading_styles = heading_style_ids(&mut archive)?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .context("missing word/document.xml part")?
        .read_to_string(&mut xml)
        .context("word/document.xml is not valid UTF-8")?;

    parse_document_xml(&xml, &heading_styles)
}

/// Extract an attribute value by key from an element.
fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Collect the paragraph style ids that mark a top-level heading.
///
/// A style counts when its name is "heading 1" (the name Word gives the
/// built-in style) or its outline level is 0. "Heading1" is always included
/// as a fallback for documents that carry no styles part.
fn heading_style_ids(archive: &mut ZipArchive<File>) -> Result<HashSet<String>> {
    let mut ids: HashSet<String> = HashSet::new();
    ids.insert("Heading1".to_string());

    let mut xml = String::new();
    match archive.by_name("word/styles.xml") {
        Ok(mut part) => {
            part.read_to_string(&mut xml)
                .context("word/styles.xml is not valid UTF-8")?;
        }
        // No styles part — fall back to the default id only
        Err(_) => return Ok(ids),
    }

    let mut reader = Reader::from_str(&xml);
    let mut current_id: Option<String> = None;
    let mut is_paragraph_style = false;
    let mut is_heading = false;

    loop {
        match reader.read_event().context("error parsing word/styles.xml")? {
            Event::Start(e) if e.name().as_ref() == b"w:style" => {
                current_id = get_attr(&e, b"w:styleId");
                is_paragraph_style = get_attr(&e, b"w:type").as_deref() == Some("paragraph");
                is_heading = false;
            }
            Event::Start(e) | Event::Empty(e) if current_id.is_some() => {
                match e.name().as_ref() {
                    b"w:name" => {
                        if let Some(name) = get_attr(&e, b"w:val") {
                            if name.eq_ignore_ascii_case("heading 1") {
                                is_heading = true;
                            }
                        }
                    }
                    b"w:outlineLvl" => {
                        if get_attr(&e, b"w:val").as_deref() == Some("0") {
                            is_heading = true;
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:style" => {
                if is_heading && is_paragraph_style {
                    if let Some(id) = current_id.take() {
                        ids.insert(id);
                    }
                }
                current_id = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

/// Walk document.xml and emit paragraphs with their heading flag.
fn parse_document_xml(xml: &str, heading_styles: &HashSet<String>) -> Result<Vec<DocxParagraph>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();

    let mut in_paragraph = false;
    let mut in_text_run = false;
    let mut text = String::new();
    let mut style_id: Option<String> = None;

    loop {
        match reader.read_event().context("error parsing word/document.xml")? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    in_paragraph = true;
                    text.clear();
                    style_id = None;
                }
                b"w:t" if in_paragraph => in_text_run = true,
                b"w:pStyle" if in_paragraph => style_id = get_attr(&e, b"w:val"),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"w:pStyle" && in_paragraph => {
                style_id = get_attr(&e, b"w:val");
            }
            Event::Text(t) if in_text_run => {
                text.push_str(&t.unescape().context("bad text escape in document.xml")?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" if in_paragraph => {
                    let is_heading = style_id
                        .as_ref()
                        .is_some_and(|id| heading_styles.contains(id));
                    paragraphs.push(DocxParagraph {
                        text: std::mem::take(&mut text),
                        is_heading,
                    });
                    in_paragraph = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
