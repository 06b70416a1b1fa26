use std::fs::{File, OpenOptions};
use std::process::{Child, Command, Stdio};

use crate::error::RunnerError;
use crate::model::{Job, Pipeline, StreamSpec};
use crate::status::Termination;

/// Run one pipeline to completion: install its input/output redirections,
/// wire `members.len() - 1` anonymous pipes between its jobs, spawn every
/// job, and wait for the chain to finish.
///
/// Never propagates an error out — any internal failure (pipe creation,
/// redirection, spawn) is logged and folded into a failing [`Termination`]
/// so the Reporter always has something to print for this pipeline, and one
/// pipeline's failure never aborts its siblings (spec.md §7).
///
/// Runs on its own worker thread spawned by the Supervisor (spec.md §9's
/// "cooperative task per pipeline" shape) rather than as a forked OS
/// process. Because of that, redirecting the pipeline's input/output is done
/// per-child via the `Stdio` handed to each spawned [`Command`], never by
/// mutating this thread's own stdin/stdout — those file descriptors are
/// shared with every other pipeline's executor thread in this same process.
pub fn run_pipeline(pipeline: &Pipeline, jobs: &[Job]) -> Termination {
    match run_pipeline_inner(pipeline, jobs) {
        Ok(term) => term,
        Err(e) => {
            tracing::error!(pipeline = %pipeline.name, error = %e, "pipeline executor failed");
            Termination::Exited(1)
        }
    }
}

fn run_pipeline_inner(pipeline: &Pipeline, jobs: &[Job]) -> Result<Termination, RunnerError> {
    let head_stdin = redirect_input(&pipeline.input)?;
    let tail_stdout = redirect_output(&pipeline.staging)?;

    if pipeline.members.is_empty() {
        // Trivial case (spec.md §4.3 step 3): nothing to spawn, nothing to
        // capture. `head_stdin`/`tail_stdout` are simply dropped, closing the
        // fds we just opened.
        return Ok(Termination::Exited(0));
    }

    let n = pipeline.members.len();
    let mut children: Vec<Child> = Vec::with_capacity(n);
    let mut next_stdin = Some(head_stdin);
    let mut tail_stdout = Some(tail_stdout);

    for (i, &job_index) in pipeline.members.iter().enumerate() {
        let job = &jobs[job_index];
        let mut cmd = Command::new(&job.exec);
        cmd.args(&job.args);
        cmd.stdin(next_stdin.take().expect("stdin prepared for every stage"));

        let is_last = i + 1 == n;
        let stdout = if is_last {
            tail_stdout.take().expect("tail stdout prepared once")
        } else {
            let (reader, writer) = os_pipe::pipe()
                .map_err(|e| RunnerError::WiringFailed(format!("failed to allocate channel: {e}")))?;
            next_stdin = Some(Stdio::from(reader));
            Stdio::from(writer)
        };
        cmd.stdout(stdout);

        match cmd.spawn() {
            Ok(child) => children.push(child),
            Err(e) => {
                tracing::error!(job = %job.name, exec = %job.exec, error = %e, "failed to spawn job");
                reap_all(&mut children);
                return Ok(Termination::Exited(exec_failure_code(&e)));
            }
        }
    }

    // Wait on the tail only to establish the pipeline's reported status
    // (spec.md §4.3 step 7); its termination implies every upstream has
    // seen EOF and is exiting or has exited. Everything else is reaped
    // afterward purely to avoid zombies accumulating in this long-lived
    // process (see SPEC_FULL.md §4.3 — the original's "reaped implicitly at
    // executor exit" assumed the executor was itself a short-lived process).
    let tail = children.last_mut().expect("n > 0 checked above");
    let tail_status = tail.wait().map_err(RunnerError::SpawnFailed)?;
    let term = Termination::from_exit_status(tail_status);

    let upstream_count = children.len() - 1;
    reap_all(&mut children[..upstream_count]);

    Ok(term)
}

fn redirect_input(input: &StreamSpec) -> Result<Stdio, RunnerError> {
    match input {
        StreamSpec::Standard => Ok(Stdio::inherit()),
        StreamSpec::File(path) => File::open(path)
            .map(Stdio::from)
            .map_err(|e| RunnerError::WiringFailed(format!("pipeline input {}: {e}", path.display()))),
    }
}

fn redirect_output(staging: &std::path::Path) -> Result<Stdio, RunnerError> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .open(staging)
        .map(Stdio::from)
        .map_err(|e| RunnerError::WiringFailed(format!("staging file {}: {e}", staging.display())))
}

/// Map a spawn failure to an exit-code-flavored outcome, following the
/// `command not found` vs. other-failure split in this file's `command_error`
/// for the old interactive shell.
fn exec_failure_code(e: &std::io::Error) -> i32 {
    if e.kind() == std::io::ErrorKind::NotFound {
        127
    } else {
        126
    }
}

fn reap_all(children: &mut [Child]) {
    for child in children.iter_mut() {
        let _ = child.wait();
    }
}
