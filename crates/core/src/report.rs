//! Human-readable status lines for a finished run.

use crate::batch::{RunReport, RunSummary, TaskRecord};
use crate::types::{FailureReason, TaskOutcome};

/// Which stream a status line belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stdout,
    Stderr,
}

/// A single line of run output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub channel: Channel,
    pub text: String,
}

impl StatusLine {
    fn stdout(text: String) -> Self {
        Self {
            channel: Channel::Stdout,
            text,
        }
    }

    fn stderr(text: String) -> Self {
        Self {
            channel: Channel::Stderr,
            text,
        }
    }
}

impl TaskRecord {
    /// The line describing this task's outcome.
    pub fn status_line(&self) -> StatusLine {
        let input = self.input_path.display();
        let output = self
            .output_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match &self.outcome {
            TaskOutcome::Succeeded {
                notes_were_present: true,
            } => StatusLine::stdout(format!("✓ Stripped notes from {} → {}", input, output)),
            TaskOutcome::Succeeded {
                notes_were_present: false,
            } => StatusLine::stdout(format!("✓ No notes found in {} → {}", input, output)),
            TaskOutcome::Skipped { .. } => {
                StatusLine::stderr(format!("Warning: Skipping {} (not a .pptx file)", input))
            }
            TaskOutcome::Failed { reason } => match reason {
                FailureReason::NotFound => {
                    StatusLine::stderr(format!("Error: File not found: {}", input))
                }
                FailureReason::LegacyFormat => StatusLine::stderr(format!(
                    "Error: Old PowerPoint format (.ppt) not supported. Please convert {} to .pptx first.",
                    input
                )),
                FailureReason::Processing(cause) => {
                    StatusLine::stderr(format!("Error processing {}: {}", input, cause))
                }
            },
        }
    }
}

impl RunSummary {
    pub fn summary_line(&self) -> String {
        format!(
            "Processed {} file(s) successfully, {} error(s)",
            self.succeeded, self.failed
        )
    }
}

impl RunReport {
    /// Lines to print for this run, in input order.
    ///
    /// Quiet mode drops the stdout lines (successes and the summary);
    /// warnings and errors on stderr are always kept.
    pub fn status_lines(&self, quiet: bool) -> Vec<StatusLine> {
        let mut lines: Vec<StatusLine> = self
            .tasks
            .iter()
            .map(TaskRecord::status_line)
            .filter(|line| !quiet || line.channel == Channel::Stderr)
            .collect();

        if !quiet && self.is_batch() {
            lines.push(StatusLine::stdout(format!(
                "\n{}",
                self.summary.summary_line()
            )));
        }

        lines
    }
}
