use std::fs::File;
use std::io::{self, Write};

use crate::model::{Pipeline, StreamSpec};
use crate::staging::StagingArea;
use crate::status::Termination;

/// Emit one pipeline's report: header, the full captured staging-file
/// contents copied to its destination, and a footer reflecting `term` —
/// then remove that pipeline's staging file (spec.md §4.5).
///
/// The captured block is copied atomically before the footer is printed
/// (spec.md §5: "the captured output block is emitted atomically before
/// the footer line"), which here just means "don't interleave the two
/// writes with anything else" — the Supervisor already serializes calls
/// to this function one pipeline at a time.
pub fn report(pipeline: &Pipeline, term: Termination, staging: &StagingArea) {
    println!("## Output {} ##", pipeline.name);

    if let Err(e) = copy_capture(pipeline) {
        tracing::error!(pipeline = %pipeline.name, error = %e, "failed to copy captured output");
    }

    if term.is_success() {
        println!("## {} finished successfully ##", pipeline.name);
    } else {
        println!(
            "## {} finished unsuccessfully (Err: {}) ##",
            pipeline.name,
            term.report_code()
        );
    }

    staging.remove_file(&pipeline.staging);
}

/// Copy the staging file's bytes to the pipeline's destination, then, if the
/// capture is non-empty and doesn't already end in `\n`, write one more —
/// spec.md §4.5 promises "each line is emitted with a trailing newline", so
/// the footer line that follows must never be glued onto the last byte of a
/// job's output (e.g. an `echo -n` capture).
fn copy_capture(pipeline: &Pipeline) -> io::Result<()> {
    let bytes = std::fs::read(&pipeline.staging)?;
    let needs_trailing_newline = bytes.last().is_some_and(|&b| b != b'\n');

    match &pipeline.output {
        StreamSpec::Standard => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&bytes)?;
            if needs_trailing_newline {
                lock.write_all(b"\n")?;
            }
            lock.flush()
        }
        StreamSpec::File(path) => {
            let mut dest = File::create(path)?;
            dest.write_all(&bytes)?;
            if needs_trailing_newline {
                dest.write_all(b"\n")?;
            }
            dest.flush()
        }
    }
}
