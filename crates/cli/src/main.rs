//! CLI tool for stripping speaker notes from PowerPoint files.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use notes_core::{Channel, InputSpec, RunReport};
use notes_pptx::PptxNotesStripper;
use std::path::PathBuf;
use std::process;

/// Strip speaker notes from PowerPoint files.
#[derive(Parser, Debug)]
#[command(name = "strip-notes")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:
  Strip notes and create new file:
    strip-notes lecture01.pptx

  Specify output filename:
    strip-notes lecture01.pptx -o lecture01_student.pptx

  Process multiple files:
    strip-notes slides/*.pptx

  Overwrite original file (use with caution):
    strip-notes lecture01.pptx --in-place")]
struct Args {
    /// PowerPoint file(s) to process (.pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output file path (only valid with single input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite original file(s) instead of creating new files
    #[arg(long)]
    in_place: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn input_spec(&self) -> InputSpec {
        let spec = InputSpec::new(&self.input)
            .with_in_place(self.in_place)
            .with_quiet(self.quiet);

        match &self.output {
            Some(output) => spec.with_output(output),
            None => spec,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let spec = args.input_spec();
    log::debug!("Processing {} input(s)", spec.inputs.len());
    let stripper = PptxNotesStripper::new();

    let report = match notes_core::run(&spec, &stripper) {
        Ok(report) => report,
        Err(e) if e.is_fatal() => Args::command()
            .error(ErrorKind::ArgumentConflict, e.to_string())
            .exit(),
        Err(e) => return Err(e.into()),
    };

    if args.json {
        // Paths that are not valid UTF-8 cannot go into JSON.
        if let Err(e) = print_json(&report) {
            log::warn!("{:#}; printing the plain report instead", e);
            print_report(&report, spec.quiet);
        }
    } else {
        print_report(&report, spec.quiet);
    }

    process::exit(report.exit_code());
}

/// Print per-file status lines and the summary.
fn print_report(report: &RunReport, quiet: bool) {
    for line in report.status_lines(quiet) {
        match line.channel {
            Channel::Stdout => println!("{}", line.text),
            Channel::Stderr => eprintln!("{}", line.text),
        }
    }
}

/// Print the whole report as JSON on stdout.
fn print_json(report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize run report")?;
    println!("{}", json);
    Ok(())
}
