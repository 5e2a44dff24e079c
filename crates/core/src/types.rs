//! Domain types for a batch run: inputs, resolved tasks, and outcomes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the file stem of the default output path.
pub const NO_NOTES_SUFFIX: &str = "_no_notes";

/// The format of a presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from the extension of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        None
    }
}

/// What the caller asked for: input files plus output options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSpec {
    /// Input paths, in the order they were given.
    pub inputs: Vec<PathBuf>,

    /// Explicit output path. Only valid with a single input.
    pub output: Option<PathBuf>,

    /// Overwrite each input instead of writing a sibling file.
    pub in_place: bool,

    /// Suppress per-file and summary messages.
    pub quiet: bool,
}

impl InputSpec {
    /// Create a spec for the given inputs with default options.
    pub fn new<I, P>(inputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set an explicit output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Enable or disable in-place mode.
    pub fn with_in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }

    /// Enable or disable quiet mode.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Check the option invariants. Touches no files.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(Error::Configuration(
                "At least one input file is required".to_string(),
            ));
        }

        if self.output.is_some() && self.inputs.len() > 1 {
            return Err(Error::Configuration(
                "Cannot specify --output with multiple input files".to_string(),
            ));
        }

        if self.output.is_some() && self.in_place {
            return Err(Error::Configuration(
                "Cannot use both --output and --in-place".to_string(),
            ));
        }

        Ok(())
    }

    /// Where the stripped copy of `input` is written.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        if self.in_place {
            input.to_path_buf()
        } else if let Some(output) = &self.output {
            output.clone()
        } else {
            default_output_path(input)
        }
    }
}

/// One input file paired with the location its stripped copy goes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTask {
    /// The input path as given.
    pub input_path: PathBuf,
    /// Where the stripped document is written. Equal to `input_path` in
    /// in-place mode.
    pub output_path: PathBuf,
}

impl ResolvedTask {
    /// Resolve the output path of `input` under `spec`.
    pub fn resolve(input: &Path, spec: &InputSpec) -> Self {
        Self {
            input_path: input.to_path_buf(),
            output_path: spec.output_path_for(input),
        }
    }

    /// Whether the task overwrites its own input.
    pub fn is_in_place(&self) -> bool {
        self.input_path == self.output_path
    }
}

/// Default output location: `<stem>_no_notes<suffix>` next to the input.
///
/// The suffix keeps its original case.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();

    let mut name = OsString::from(stem);
    name.push(NO_NOTES_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }

    input.with_file_name(name)
}

/// Why a file was passed over without counting as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Neither a modern nor a legacy presentation extension.
    UnsupportedExtension,
}

/// Why a task failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The input path does not exist.
    NotFound,
    /// The input is a legacy binary (.ppt) presentation.
    LegacyFormat,
    /// The document could not be opened, read, or written.
    Processing(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NotFound => write!(f, "not found"),
            FailureReason::LegacyFormat => write!(f, "legacy format unsupported"),
            FailureReason::Processing(cause) => write!(f, "{}", cause),
        }
    }
}

/// Final state of one task. Created once and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Passed over; does not affect the exit code.
    Skipped { reason: SkipReason },
    /// The input could not be stripped.
    Failed { reason: FailureReason },
    /// The output was written. `notes_were_present` is set when any slide
    /// had non-whitespace notes.
    Succeeded { notes_were_present: bool },
}

impl TaskOutcome {
    /// Whether the task counts as an error.
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failed { .. })
    }

    /// Whether the output was written.
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Succeeded { .. })
    }
}
