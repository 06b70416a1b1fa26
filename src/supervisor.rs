use std::sync::mpsc;
use std::thread;

use crate::executor;
use crate::model::{Job, Pipeline};
use crate::reporter;
use crate::staging::StagingArea;
use crate::status::Termination;

struct PipelineOutcome {
    index: usize,
    term: Termination,
}

/// Run every pipeline concurrently, report each as it finishes, then clean
/// up the staging area (spec.md §4.4).
///
/// Spawns one worker thread per pipeline rather than one OS subprocess
/// (spec.md §9's sanctioned "cooperative task" shape); "await any
/// subordinate's termination" is an `mpsc` fan-in instead of a `waitpid(-1)`
/// loop, so message arrival order is completion order (§4.4 of
/// SPEC_FULL.md).
pub fn run(jobs: &[Job], pipelines: &[Pipeline], staging: StagingArea) {
    let (tx, rx) = mpsc::channel::<PipelineOutcome>();

    thread::scope(|scope| {
        for (index, pipeline) in pipelines.iter().enumerate() {
            let tx = tx.clone();
            scope.spawn(move || {
                let term = executor::run_pipeline(pipeline, jobs);
                let _ = tx.send(PipelineOutcome { index, term });
            });
        }
        drop(tx);

        for _ in 0..pipelines.len() {
            let outcome = rx.recv().expect("every spawned worker sends exactly once");
            reporter::report(&pipelines[outcome.index], outcome.term, &staging);
        }
    });

    staging.cleanup();
}
