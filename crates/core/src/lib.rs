//! Core domain types, output path resolution, and the batch driver for
//! stripping speaker notes from presentations.

pub mod batch;
pub mod error;
pub mod report;
pub mod types;

pub use batch::{run, NotesStripper, RunReport, RunSummary, TaskRecord};
pub use error::{Error, Result};
pub use report::{Channel, StatusLine};
pub use types::{
    default_output_path, FailureReason, InputSpec, PresentationFormat, ResolvedTask, SkipReason,
    TaskOutcome,
};
