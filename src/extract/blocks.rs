// Topic block segmentation.
//
// Turns a reader's flat structure stream into ordered (heading, content)
// blocks. Outline documents and slide decks follow different rules:
//
// - Outline: a heading paragraph opens a block; body paragraphs accumulate
//   under it. A block only survives if it gathered non-empty content, so a
//   trailing heading with nothing after it is dropped, as is any text before
//   the first heading.
// - Slides: every slide with a non-empty title is a block, even when the
//   rest of the slide is empty.

use super::docx::DocxParagraph;
use super::pptx::Slide;
use super::TopicBlock;

/// Segment an outline document's paragraph stream into topic blocks.
pub fn segment_outline(paragraphs: &[DocxParagraph]) -> Vec<TopicBlock> {
    let mut blocks = Vec::new();
    let mut heading: Option<String> = None;
    let mut content: Vec<String> = Vec::new();

    for paragraph in paragraphs {
        let text = paragraph.text.trim();
        if text.is_empty() {
            continue;
        }

        if paragraph.is_heading {
            finalize(&mut blocks, heading.take(), &content);
            heading = Some(text.to_string());
            content.clear();
        } else {
            // Accumulates even before the first heading; cleared when the
            // first heading arrives, so unattributable text is dropped.
            content.push(text.to_string());
        }
    }

    finalize(&mut blocks, heading.take(), &content);
    blocks
}

/// Close the open block, keeping it only when it has accumulated content.
fn finalize(blocks: &mut Vec<TopicBlock>, heading: Option<String>, content: &[String]) {
    if let Some(heading) = heading {
        if !content.is_empty() {
            blocks.push(TopicBlock {
                heading,
                content: content.join("\n"),
            });
        }
    }
}

/// Segment a slide deck into topic blocks, one per titled slide.
pub fn segment_slides(slides: &[Slide]) -> Vec<TopicBlock> {
    slides
        .iter()
        .filter_map(|slide| {
            slide.title.as_ref().map(|title| TopicBlock {
                heading: title.clone(),
                content: slide.body.join("\n"),
            })
        })
        .collect()
}
