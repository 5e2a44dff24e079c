//! In-memory PPTX packages for tests.

use quick_xml::escape::escape;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// One slide of a fixture deck.
pub(crate) struct FixtureSlide {
    notes: Option<Vec<String>>,
}

impl FixtureSlide {
    /// A slide whose notes body holds one paragraph per entry.
    pub(crate) fn with_notes(paragraphs: &[&str]) -> Self {
        Self {
            notes: Some(paragraphs.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub(crate) fn without_notes() -> Self {
        Self { notes: None }
    }
}

pub(crate) fn build_pptx(slides: &[FixtureSlide]) -> Vec<u8> {
    build_pptx_without("", slides)
}

/// Build a deck, leaving out the entry named `omit`.
pub(crate) fn build_pptx_without(omit: &str, slides: &[FixtureSlide]) -> Vec<u8> {
    let mut parts: Vec<(String, String)> = Vec::new();

    parts.push((
        "[Content_Types].xml".to_string(),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/></Types>"#
            .to_string(),
    ));
    parts.push((
        "_rels/.rels".to_string(),
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
            .to_string(),
    ));

    let mut slide_ids = String::new();
    let mut presentation_rels = String::from(
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#,
    );

    for (idx, slide) in slides.iter().enumerate() {
        let n = idx + 1;
        slide_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            255 + n,
            n + 1
        ));
        presentation_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            n + 1,
            n
        ));

        parts.push((format!("ppt/slides/slide{}.xml", n), slide_xml(n)));

        if let Some(paragraphs) = &slide.notes {
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", n),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide{}.xml"/></Relationships>"#,
                    n
                ),
            ));
            parts.push((
                format!("ppt/notesSlides/notesSlide{}.xml", n),
                notes_xml(n, paragraphs),
            ));
        }
    }

    parts.push((
        "ppt/presentation.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#,
            slide_ids
        ),
    ));
    parts.push((
        "ppt/_rels/presentation.xml.rels".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            presentation_rels
        ),
    ));

    let mut zip_data = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut zip_data));
        let options = FileOptions::default();

        for (name, content) in parts.iter().filter(|(name, _)| name != omit) {
            writer.start_file(name.as_str(), options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }

        writer.finish().unwrap();
    }
    zip_data
}

/// Rewrite the deck in `bytes` with the entry `name` holding `content`.
pub(crate) fn replace_part(bytes: &[u8], name: &str, content: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut zip_data = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut zip_data));
        for idx in 0..archive.len() {
            let mut file = archive.by_index(idx).unwrap();
            let entry = file.name().to_string();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();

            writer.start_file(entry.as_str(), FileOptions::default()).unwrap();
            if entry == name {
                writer.write_all(content.as_bytes()).unwrap();
            } else {
                writer.write_all(&data).unwrap();
            }
        }
        writer.finish().unwrap();
    }
    zip_data
}

fn slide_xml(n: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Slide {} title</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
        n
    )
}

fn notes_xml(n: usize, paragraphs: &[String]) -> String {
    let body = if paragraphs.is_empty() {
        r#"<a:p><a:endParaRPr lang="en-US"/></a:p>"#.to_string()
    } else {
        paragraphs
            .iter()
            .map(|p| {
                format!(
                    r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                    escape(p.as_str())
                )
            })
            .collect()
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp><p:sp><p:nvSpPr><p:cNvPr id="4" name="Slide Number Placeholder 3"/><p:cNvSpPr/><p:nvPr><p:ph type="sldNum" idx="5"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:fld id="{{B6F15528-21DE-4FAA-801E-634DDDAF4B2B}}" type="slidenum"><a:t>{}</a:t></a:fld></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#,
        body, n
    )
}
