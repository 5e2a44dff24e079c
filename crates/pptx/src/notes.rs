//! Notes slide parts: finding the notes text body, reading it, clearing it.
//!
//! The notes text lives in the shape carrying a body placeholder
//! (`<p:ph type="body"/>`). Other shapes on the notes page, such as the
//! slide image or the slide number, are left untouched.

use crate::xml::{local_name, prefix, read_events};
use notes_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Writer;
use std::ops::Range;

/// A parsed notes slide part.
pub(crate) struct NotesSlide {
    events: Vec<Event<'static>>,
    /// Event range of the body placeholder shape, `<p:sp>` through `</p:sp>`.
    body: Option<Range<usize>>,
}

impl NotesSlide {
    pub(crate) fn parse(xml: &str, part_name: &str) -> Result<Self> {
        let events = read_events(xml, part_name)?;
        let body = find_body_placeholder(&events);
        Ok(Self { events, body })
    }

    pub(crate) fn has_body(&self) -> bool {
        self.body.is_some()
    }

    /// Notes text: paragraphs joined by `\n`, line breaks rendered as `\n`.
    ///
    /// Empty when the notes slide has no body placeholder.
    pub(crate) fn text(&self) -> Result<String> {
        let Some(range) = self.body.clone() else {
            return Ok(String::new());
        };

        let mut text = String::new();
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut paragraphs = 0usize;

        for event in &self.events[range] {
            match event {
                Event::Start(e) => {
                    let name = e.name();
                    let local = local_name(name.as_ref());
                    if local == b"p" && top_is(&stack, b"txBody") {
                        if paragraphs > 0 {
                            text.push('\n');
                        }
                        paragraphs += 1;
                    } else if local == b"br" && in_paragraph(&stack) {
                        text.push('\n');
                    }
                    stack.push(local.to_vec());
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let local = local_name(name.as_ref());
                    if local == b"p" && top_is(&stack, b"txBody") {
                        if paragraphs > 0 {
                            text.push('\n');
                        }
                        paragraphs += 1;
                    } else if local == b"br" && in_paragraph(&stack) {
                        text.push('\n');
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(e) if top_is(&stack, b"t") && within(&stack, b"txBody") => {
                    let unescaped = e
                        .unescape()
                        .map_err(|e| Error::XmlError(format!("Invalid notes text: {}", e)))?;
                    text.push_str(&unescaped);
                }
                Event::CData(e) if top_is(&stack, b"t") && within(&stack, b"txBody") => {
                    text.push_str(&String::from_utf8_lossy(e));
                }
                _ => {}
            }
        }

        Ok(text)
    }

    /// Serialize the part with its notes text body emptied.
    ///
    /// All paragraphs but the first are removed; the first loses its runs,
    /// line breaks, and fields but keeps its properties.
    pub(crate) fn cleared(&self) -> Result<Vec<u8>> {
        let range = self.body.clone().unwrap_or(0..0);
        let mut writer = Writer::new(Vec::new());

        let events = self.events[..range.start]
            .iter()
            .cloned()
            .chain(clear_text_body(&self.events[range.clone()]))
            .chain(self.events[range.end..].iter().cloned());

        for event in events {
            writer
                .write_event(event)
                .map_err(|e| Error::XmlError(format!("Failed to write notes slide: {}", e)))?;
        }

        Ok(writer.into_inner())
    }
}

/// Locate the first shape whose placeholder is of type `body`.
fn find_body_placeholder(events: &[Event<'static>]) -> Option<Range<usize>> {
    // (index of the <sp> start event, whether it carries a body placeholder)
    let mut shapes: Vec<(usize, bool)> = Vec::new();

    for (idx, event) in events.iter().enumerate() {
        match event {
            Event::Start(e) | Event::Empty(e) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"sp" if matches!(event, Event::Start(_)) => shapes.push((idx, false)),
                    b"ph" if is_body_placeholder(e) => {
                        if let Some(shape) = shapes.last_mut() {
                            shape.1 = true;
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"sp" {
                    if let Some((start, true)) = shapes.pop() {
                        return Some(start..idx + 1);
                    }
                }
            }
            _ => {}
        }
    }

    None
}

fn is_body_placeholder(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"type" && attr.value.as_ref() == b"body")
}

/// Rewrite the events of one shape so that its text body holds a single
/// empty paragraph.
fn clear_text_body(shape: &[Event<'static>]) -> Vec<Event<'static>> {
    let mut kept = Vec::with_capacity(shape.len());
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut skip_depth: Option<usize> = None;
    let mut seen_paragraph = false;
    let mut paragraph_name: Option<String> = None;

    for event in shape {
        if let Some(depth) = skip_depth {
            match event {
                Event::Start(e) => {
                    let name = e.name();
                    stack.push(local_name(name.as_ref()).to_vec());
                }
                Event::End(_) => {
                    stack.pop();
                    if stack.len() == depth {
                        skip_depth = None;
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) | Event::Empty(e) => {
                let is_start = matches!(event, Event::Start(_));
                let name = e.name();
                let local = local_name(name.as_ref());

                let remove = if top_is(&stack, b"txBody") {
                    if paragraph_name.is_none() {
                        paragraph_name = Some(match prefix(name.as_ref()) {
                            Some(p) => format!("{}:p", String::from_utf8_lossy(p)),
                            None => "p".to_string(),
                        });
                    }
                    if local == b"p" {
                        let later_paragraph = seen_paragraph;
                        seen_paragraph = true;
                        later_paragraph
                    } else {
                        false
                    }
                } else {
                    in_paragraph(&stack) && matches!(local, b"r" | b"br" | b"fld")
                };

                if remove {
                    if is_start {
                        skip_depth = Some(stack.len());
                        stack.push(local.to_vec());
                    }
                    continue;
                }

                if is_start {
                    stack.push(local.to_vec());
                }
                kept.push(event.clone());
            }
            Event::End(e) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"txBody" && !seen_paragraph {
                    let tag = paragraph_name.take().unwrap_or_else(|| "a:p".to_string());
                    kept.push(Event::Empty(BytesStart::new(tag)));
                    seen_paragraph = true;
                }
                stack.pop();
                kept.push(event.clone());
            }
            other => kept.push(other.clone()),
        }
    }

    kept
}

fn top_is(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.last().map(|top| top.as_slice() == name).unwrap_or(false)
}

fn within(stack: &[Vec<u8>], name: &[u8]) -> bool {
    stack.iter().any(|n| n.as_slice() == name)
}

/// Directly inside a paragraph of a text body.
fn in_paragraph(stack: &[Vec<u8>]) -> bool {
    let len = stack.len();
    len >= 2 && stack[len - 1].as_slice() == b"p" && stack[len - 2].as_slice() == b"txBody"
}
