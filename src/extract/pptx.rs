// Slide-format (.pptx) reader.
//
// A .pptx file is a ZIP archive with one XML part per slide
// (`ppt/slides/slide1.xml`, `slide2.xml`, ...). Within a slide, shapes
// (`p:sp`) carry text bodies (`p:txBody`); the title shape is the one whose
// placeholder (`p:ph`) type is title, ctrTitle, or vertTitle. Text runs
// (`a:t`) are grouped into paragraphs (`a:p`).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

/// One slide's text content.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// Trimmed title placeholder text; None when the slide has no title or
    /// the title is blank.
    pub title: Option<String>,
    /// Trimmed non-empty paragraph lines from every non-title shape, in
    /// shape order.
    pub body: Vec<String>,
}

/// Read all slides of a .pptx file in slide-number order.
pub fn read_slides(path: &Path) -> Result<Vec<Slide>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut archive = ZipArchive::new(file).context("not a valid .pptx (ZIP) archive")?;

    // Archive entry order is arbitrary; slide order comes from the number
    // in the part name.
    let mut slide_parts: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slide_parts.sort();

    let mut slides = Vec::with_capacity(slide_parts.len());
    for (_, part_name) in slide_parts {
        let mut xml = String::new();
        archive
            .by_name(&part_name)
            .with_context(|| format!("missing slide part {part_name}"))?
            .read_to_string(&mut xml)
            .with_context(|| format!("{part_name} is not valid UTF-8"))?;
        slides.push(parse_slide_xml(&xml).with_context(|| format!("error parsing {part_name}"))?);
    }

    Ok(slides)
}

/// Extract the N from "ppt/slides/slideN.xml".
fn slide_number(part_name: &str) -> Option<u32> {
    part_name
        .strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

fn get_attr(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Walk one slide's XML and split its text into title and body lines.
fn parse_slide_xml(xml: &str) -> Result<Slide> {
    let mut reader = Reader::from_str(xml);

    let mut title: Option<String> = None;
    let mut body: Vec<String> = Vec::new();

    // Per-shape state
    let mut in_shape = false;
    let mut shape_is_title = false;
    let mut shape_lines: Vec<String> = Vec::new();

    // Per-paragraph state — only paragraphs inside a text body count, which
    // keeps table cell text (a:p inside graphic frames) out.
    let mut in_text_body = false;
    let mut in_text_run = false;
    let mut line = String::new();

    loop {
        match reader.read_event().context("malformed slide XML")? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:sp" => {
                    in_shape = true;
                    shape_is_title = false;
                    shape_lines.clear();
                }
                b"p:txBody" if in_shape => in_text_body = true,
                b"a:p" if in_text_body => line.clear(),
                b"a:t" if in_text_body => in_text_run = true,
                b"p:ph" if in_shape => {
                    if is_title_placeholder(&e) {
                        shape_is_title = true;
                    }
                }
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == b"p:ph" && in_shape => {
                if is_title_placeholder(&e) {
                    shape_is_title = true;
                }
            }
            Event::Text(t) if in_text_run => {
                line.push_str(&t.unescape().context("bad text escape in slide XML")?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_text_run = false,
                b"a:p" if in_text_body => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        shape_lines.push(trimmed.to_string());
                    }
                    line.clear();
                }
                b"p:txBody" => in_text_body = false,
                b"p:sp" if in_shape => {
                    if shape_is_title && title.is_none() {
                        let joined = shape_lines.join("\n");
                        let trimmed = joined.trim();
                        if !trimmed.is_empty() {
                            title = Some(trimmed.to_string());
                        }
                    } else {
                        body.append(&mut shape_lines);
                    }
                    in_shape = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(Slide { title, body })
}

fn is_title_placeholder(e: &BytesStart) -> bool {
    matches!(
        get_attr(e, b"type").as_deref(),
        Some("title" | "ctrTitle" | "vertTitle")
    )
}
