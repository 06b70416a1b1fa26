use std::collections::HashSet;
use std::path::PathBuf;

/// Index into the crate-wide job list. Kept as a distinct type alias rather
/// than a bare `usize` so call sites documenting "job index" read clearly.
pub type JobIndex = usize;

/// A named invocation of an external program with fixed arguments.
///
/// Immutable once built by [`crate::config`]. `exec` is resolved via the
/// host's executable search path at spawn time, the same way
/// `std::process::Command` already does — no explicit `PATH` walk is needed
/// here (contrast `examples/jswans33-james-shell/src/builtins.rs`'s
/// `find_in_path`, which exists only to implement the `type` builtin).
#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub exec: String,
    pub args: Vec<String>,
}

/// What a pipeline's overall stdin/stdout should be connected to.
///
/// Deliberately an enum rather than comparing free-form sentinel strings at
/// execution time (spec.md §9's design note). Parsed from YAML by
/// [`crate::config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSpec {
    Standard,
    File(PathBuf),
}

/// An ordered, non-branching chain of jobs whose adjacent stdout/stdin are
/// connected by anonymous pipes, plus the pipeline-wide input/output
/// redirection and its assigned staging file.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub name: String,
    pub input: StreamSpec,
    pub output: StreamSpec,
    pub members: Vec<JobIndex>,
    /// Assigned by the staging area before any child is spawned; empty until
    /// then.
    pub staging: PathBuf,
}

/// Fixed name of the pipeline synthesized for jobs no configured pipeline
/// references.
pub const DEFAULT_PIPELINE_NAME: &str = "default-pipe";

/// Build the default pipeline collecting every job index not referenced by
/// any configured pipeline, in ascending (original declaration) order.
///
/// Returns `None` if every job is already referenced by some pipeline.
pub fn build_default_pipeline(job_count: usize, assigned: &HashSet<JobIndex>) -> Option<Pipeline> {
    let members: Vec<JobIndex> = (0..job_count).filter(|i| !assigned.contains(i)).collect();

    if members.is_empty() {
        return None;
    }

    Some(Pipeline {
        name: DEFAULT_PIPELINE_NAME.to_string(),
        input: StreamSpec::Standard,
        output: StreamSpec::Standard,
        members,
        staging: PathBuf::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_collects_unreferenced_jobs_in_order() {
        let assigned: HashSet<JobIndex> = [1].into_iter().collect();
        let pipeline = build_default_pipeline(4, &assigned).expect("some jobs unreferenced");
        assert_eq!(pipeline.name, DEFAULT_PIPELINE_NAME);
        assert_eq!(pipeline.input, StreamSpec::Standard);
        assert_eq!(pipeline.output, StreamSpec::Standard);
        assert_eq!(pipeline.members, vec![0, 2, 3]);
    }

    #[test]
    fn no_default_pipeline_when_every_job_is_assigned() {
        let assigned: HashSet<JobIndex> = [0, 1, 2].into_iter().collect();
        assert!(build_default_pipeline(3, &assigned).is_none());
    }

    #[test]
    fn no_default_pipeline_for_zero_jobs() {
        let assigned: HashSet<JobIndex> = HashSet::new();
        assert!(build_default_pipeline(0, &assigned).is_none());
    }
}
