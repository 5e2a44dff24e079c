//! PPTX (Office Open XML) backend for stripping speaker notes.
//!
//! Opens .pptx files, which are ZIP archives containing XML documents,
//! clears the notes text of every slide, and writes the package back.

mod notes;
pub mod package;
mod rels;
pub mod stripper;
mod xml;

#[cfg(test)]
mod fixture;

pub use package::{PptxPackage, Slide};
pub use stripper::{strip_package, PptxNotesStripper};
