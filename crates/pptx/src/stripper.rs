//! Notes stripper: clears the notes of every slide and saves the result.

use crate::package::PptxPackage;
use notes_core::{Error, NotesStripper, Result};
use std::path::Path;

/// Strips speaker notes from PPTX files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PptxNotesStripper;

impl PptxNotesStripper {
    /// Create a new notes stripper.
    pub fn new() -> Self {
        Self
    }

    fn strip_file(&self, input: &Path, output: &Path) -> Result<bool> {
        let mut package = PptxPackage::open(input)?;
        let notes_found = strip_package(&mut package)?;
        package.save(output)?;
        Ok(notes_found)
    }
}

impl NotesStripper for PptxNotesStripper {
    fn strip(&self, input: &Path, output: &Path) -> Result<bool> {
        self.strip_file(input, output)
            .map_err(|e| Error::processing(input, e))
    }
}

/// Clear the notes of every slide in `package`.
///
/// Returns whether any slide had notes with non-whitespace text. Nothing is
/// written; an error on any slide leaves the caller with nothing to save.
pub fn strip_package(package: &mut PptxPackage) -> Result<bool> {
    let slides = package.slides().to_vec();
    let mut notes_found = false;

    for slide in slides.iter().filter(|s| s.has_notes()) {
        let text = package.notes_text(slide)?.unwrap_or_default();
        if !text.trim().is_empty() {
            log::debug!("Slide {} has notes ({} chars)", slide.number(), text.len());
            notes_found = true;
        }

        package.clear_notes(slide)?;
    }

    Ok(notes_found)
}
