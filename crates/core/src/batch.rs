//! Batch driver: runs the notes stripper over every input in order.

use crate::error::Result;
use crate::types::{
    FailureReason, InputSpec, PresentationFormat, ResolvedTask, SkipReason, TaskOutcome,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Removes speaker notes from one document and writes the result.
pub trait NotesStripper {
    /// Strip `input` into `output`, overwriting `output` if it exists.
    ///
    /// Returns whether any slide carried non-whitespace notes.
    fn strip(&self, input: &Path, output: &Path) -> Result<bool>;
}

impl<F> NotesStripper for F
where
    F: Fn(&Path, &Path) -> Result<bool>,
{
    fn strip(&self, input: &Path, output: &Path) -> Result<bool> {
        self(input, output)
    }
}

/// The outcome of one input, in the order inputs were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    /// The input path as given.
    pub input_path: PathBuf,

    /// Set once the output path was resolved, i.e. the stripper was invoked.
    pub output_path: Option<PathBuf>,

    /// What happened to the input.
    pub outcome: TaskOutcome,
}

/// Success, failure, and skip counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &TaskOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else if outcome.is_failure() {
            self.failed += 1;
        } else {
            self.skipped += 1;
        }
    }

    /// Process exit code: 0 when no task failed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            0
        } else {
            1
        }
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub tasks: Vec<TaskRecord>,
    pub summary: RunSummary,
}

impl RunReport {
    /// Counts over every task of the run.
    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Process exit code for the run, see [`RunSummary::exit_code`].
    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }

    /// The summary line is only worth printing for multi-file runs.
    pub fn is_batch(&self) -> bool {
        self.tasks.len() > 1
    }
}

/// Run `stripper` over every input of `spec`.
///
/// Fails only on a configuration error, before any file is touched. Every
/// per-file problem becomes a failed [`TaskRecord`] and the run continues.
pub fn run<S>(spec: &InputSpec, stripper: &S) -> Result<RunReport>
where
    S: NotesStripper + ?Sized,
{
    spec.validate()?;

    let mut tasks = Vec::with_capacity(spec.inputs.len());
    let mut summary = RunSummary::default();

    for input in &spec.inputs {
        let record = process_input(input, spec, stripper);
        summary.record(&record.outcome);
        tasks.push(record);
    }

    log::debug!(
        "Run finished: {} succeeded, {} failed, {} skipped",
        summary.succeeded,
        summary.failed,
        summary.skipped
    );

    Ok(RunReport { tasks, summary })
}

/// Classify one input and, if it is a PPTX, strip it.
fn process_input<S>(input: &Path, spec: &InputSpec, stripper: &S) -> TaskRecord
where
    S: NotesStripper + ?Sized,
{
    let finished = |output_path: Option<PathBuf>, outcome: TaskOutcome| TaskRecord {
        input_path: input.to_path_buf(),
        output_path,
        outcome,
    };

    if !input.exists() {
        return finished(
            None,
            TaskOutcome::Failed {
                reason: FailureReason::NotFound,
            },
        );
    }

    match PresentationFormat::from_path(input) {
        None => {
            log::debug!("Skipping {} (unsupported extension)", input.display());
            return finished(
                None,
                TaskOutcome::Skipped {
                    reason: SkipReason::UnsupportedExtension,
                },
            );
        }
        Some(PresentationFormat::Ppt) => {
            return finished(
                None,
                TaskOutcome::Failed {
                    reason: FailureReason::LegacyFormat,
                },
            );
        }
        Some(PresentationFormat::Pptx) => {}
    }

    let task = ResolvedTask::resolve(input, spec);
    if task.is_in_place() {
        log::debug!("Stripping notes in place: {}", task.input_path.display());
    } else {
        log::debug!(
            "Stripping notes: {} -> {}",
            task.input_path.display(),
            task.output_path.display()
        );
    }

    let outcome = match stripper.strip(&task.input_path, &task.output_path) {
        Ok(notes_were_present) => TaskOutcome::Succeeded { notes_were_present },
        Err(e) => TaskOutcome::Failed {
            reason: FailureReason::Processing(e.cause_message()),
        },
    };

    finished(Some(task.output_path), outcome)
}
