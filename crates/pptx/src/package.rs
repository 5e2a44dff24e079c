//! PPTX package: slide enumeration, notes access, and serialization.

use crate::notes::NotesSlide;
use crate::rels::{parse_relationships, rel_types, rels_part_for, resolve_target, Relationship};
use crate::xml::local_name;
use notes_core::{Error, PresentationFormat, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{HashMap, HashSet};
use std::fs::{self, Permissions};
use std::io::{Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// A slide handle, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    number: usize,
    part_name: String,
    notes_part: Option<String>,
}

impl Slide {
    /// 1-based position in the presentation.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Part name of the slide inside the package, e.g. `ppt/slides/slide1.xml`.
    pub fn part_name(&self) -> &str {
        &self.part_name
    }

    /// Part name of the attached notes slide, if any.
    pub fn notes_part(&self) -> Option<&str> {
        self.notes_part.as_deref()
    }

    /// Whether the slide has a notes slide attached.
    pub fn has_notes(&self) -> bool {
        self.notes_part.is_some()
    }
}

/// An opened PPTX package held in memory.
///
/// Parts changed through [`PptxPackage::clear_notes`] are kept aside and
/// written on [`PptxPackage::save`]; every other entry is copied raw.
pub struct PptxPackage {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    slides: Vec<Slide>,
    modified: HashMap<String, Vec<u8>>,
    source: Option<PathBuf>,
}

impl PptxPackage {
    /// Open a PPTX file. The whole file is read up front, so saving over
    /// the same path is safe.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let mut package = Self::from_bytes(bytes)?;
        package.source = Some(path.to_path_buf());
        Ok(package)
    }

    /// Open a PPTX package from its raw bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if PresentationFormat::from_magic(&bytes) == Some(PresentationFormat::Ppt) {
            return Err(Error::UnsupportedFormat(
                "legacy PowerPoint (.ppt) content; convert it to .pptx first".to_string(),
            ));
        }

        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slides = read_slides(&mut archive)?;
        log::debug!("Opened package with {} slides", slides.len());

        Ok(Self {
            archive,
            slides,
            modified: HashMap::new(),
            source: None,
        })
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Notes text of `slide`, or `None` when it has no notes slide.
    pub fn notes_text(&mut self, slide: &Slide) -> Result<Option<String>> {
        let Some(part_name) = slide.notes_part() else {
            return Ok(None);
        };

        let xml = self.read_part(part_name)?;
        let notes = NotesSlide::parse(&xml, part_name)?;
        notes.text().map(Some)
    }

    /// Remove the notes text of `slide`. A no-op for slides without notes
    /// and for notes that are already empty.
    pub fn clear_notes(&mut self, slide: &Slide) -> Result<()> {
        let Some(part_name) = slide.notes_part() else {
            return Ok(());
        };

        let xml = self.read_part(part_name)?;
        let notes = NotesSlide::parse(&xml, part_name)?;
        if !notes.has_body() {
            log::debug!("Slide {} notes have no body placeholder", slide.number());
            return Ok(());
        }

        let cleared = notes.cleared()?;
        if cleared != xml.as_bytes() {
            self.modified.insert(part_name.to_string(), cleared);
        }

        Ok(())
    }

    /// Serialize the package to a ZIP archive in memory.
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for idx in 0..self.archive.len() {
            let file = self
                .archive
                .by_index_raw(idx)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", idx, e)))?;

            match self.modified.get(file.name()) {
                Some(content) => {
                    let name = file.name().to_string();
                    let options = FileOptions::default()
                        .compression_method(CompressionMethod::Deflated)
                        .last_modified_time(file.last_modified());
                    drop(file);

                    writer
                        .start_file(name.as_str(), options)
                        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
                    writer.write_all(content)?;
                }
                None => {
                    let name = file.name().to_string();
                    writer
                        .raw_copy_file(file)
                        .map_err(|e| Error::ZipError(format!("Failed to copy '{}': {}", name, e)))?;
                }
            }
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))?;
        Ok(cursor.into_inner())
    }

    /// Write the package to `path`, replacing any existing file.
    ///
    /// The archive is written to a temporary file next to `path` and renamed
    /// into place, so a failed save leaves `path` untouched. An existing
    /// symlink is written through: the file it points to is replaced and the
    /// link stays.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;

        let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let permissions = self.output_permissions(&target);

        let mut tmp = tempfile::Builder::new()
            .prefix(".strip-notes-")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        if let Some(permissions) = permissions {
            fs::set_permissions(tmp.path(), permissions)?;
        }

        tmp.persist(&target).map_err(|e| Error::IoError(e.error))?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());

        Ok(())
    }

    /// Permissions for the saved file: those of the file being replaced,
    /// else those of the file the package was opened from.
    fn output_permissions(&self, path: &Path) -> Option<Permissions> {
        fs::metadata(path)
            .ok()
            .or_else(|| self.source.as_ref().and_then(|src| fs::metadata(src).ok()))
            .map(|meta| meta.permissions())
    }

    /// Read a part, preferring a modified copy.
    fn read_part(&mut self, part_name: &str) -> Result<String> {
        if let Some(content) = self.modified.get(part_name) {
            return String::from_utf8(content.clone())
                .map_err(|e| Error::CorruptedFile(format!("'{}' is not UTF-8: {}", part_name, e)));
        }
        read_file_from_archive(&mut self.archive, part_name)
    }
}

/// Resolve every slide, in `p:sldIdLst` order, with its notes slide.
fn read_slides<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Vec<Slide>> {
    let entries: HashSet<String> = archive.file_names().map(String::from).collect();

    let main_part = main_document_part(archive)?;
    let main_xml = read_file_from_archive(archive, &main_part)?;
    let main_rels = read_relationships(archive, &entries, &main_part)?;

    let targets: HashMap<&str, &str> = main_rels
        .iter()
        .filter(|rel| rel.is_internal(rel_types::SLIDE))
        .map(|rel| (rel.id.as_str(), rel.target.as_str()))
        .collect();

    let mut slides = Vec::new();
    for (idx, rel_id) in slide_id_order(&main_xml)?.iter().enumerate() {
        let target = targets.get(rel_id.as_str()).ok_or_else(|| {
            Error::CorruptedFile(format!("No slide relationship for '{}'", rel_id))
        })?;

        let part_name = resolve_target(&main_part, target);
        if !entries.contains(&part_name) {
            return Err(Error::CorruptedFile(format!(
                "Slide part '{}' is missing",
                part_name
            )));
        }

        let notes_part = read_relationships(archive, &entries, &part_name)?
            .iter()
            .find(|rel| rel.is_internal(rel_types::NOTES_SLIDE))
            .map(|rel| resolve_target(&part_name, &rel.target));

        if let Some(notes) = &notes_part {
            if !entries.contains(notes) {
                return Err(Error::CorruptedFile(format!(
                    "Notes part '{}' referenced by '{}' is missing",
                    notes, part_name
                )));
            }
        }

        slides.push(Slide {
            number: idx + 1,
            part_name,
            notes_part,
        });
    }

    Ok(slides)
}

/// Part name of the main presentation part, from the package relationships.
fn main_document_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let rels_xml = read_file_from_archive(archive, &rels_part_for(""))?;

    parse_relationships(&rels_xml)?
        .iter()
        .find(|rel| rel.is_internal(rel_types::OFFICE_DOCUMENT))
        .map(|rel| resolve_target("", &rel.target))
        .ok_or_else(|| Error::CorruptedFile("No main presentation part".to_string()))
}

/// Relationships of `part_name`; empty when the part has no rels part.
fn read_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    entries: &HashSet<String>,
    part_name: &str,
) -> Result<Vec<Relationship>> {
    let rels_part = rels_part_for(part_name);
    if !entries.contains(&rels_part) {
        return Ok(Vec::new());
    }
    parse_relationships(&read_file_from_archive(archive, &rels_part)?)
}

/// Relationship ids of `<p:sldId r:id="..."/>`, in document order.
fn slide_id_order(presentation_xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(presentation_xml);
    reader.trim_text(true);

    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                let name = e.name();
                if local_name(name.as_ref()) != b"sldId" {
                    continue;
                }

                // The numeric `id` has no prefix; the relationship id does.
                let rel_id = e.attributes().flatten().find_map(|attr| {
                    let key = attr.key.as_ref();
                    (key.contains(&b':') && local_name(key) == b"id")
                        .then(|| String::from_utf8_lossy(&attr.value).to_string())
                });

                if let Some(rel_id) = rel_id {
                    ids.push(rel_id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}
