use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::error::RunnerError;
use crate::model::{Job, Pipeline, StreamSpec};

const DEFAULT_STAGING_DIR: &str = "./tmp/";
const DEFAULT_STAGING_EXT: &str = ".out";

/// Top-level YAML document, see SPEC_FULL.md §3/§6.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(rename = "StagingDir")]
    staging_dir: Option<String>,
    #[serde(rename = "StagingExt")]
    staging_ext: Option<String>,
    #[serde(rename = "Jobs")]
    jobs: Vec<RawJob>,
    #[serde(rename = "Pipes")]
    pipes: Vec<RawPipe>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Exec")]
    exec: String,
    #[serde(rename = "Args")]
    args: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPipe {
    #[serde(rename = "Name")]
    name: String,
    input: StreamSpecWire,
    output: StreamSpecWire,
    #[serde(rename = "Pipe")]
    pipe: Vec<String>,
}

/// Wire form of [`StreamSpec`]: the sentinel literals `stdin`/`stdout` mean
/// "inherit the parent's standard stream"; any other string is a path.
/// spec.md §6 fixes this as case-sensitive — `"Stdin"` is a path, not the
/// sentinel.
#[derive(Debug)]
struct StreamSpecWire(StreamSpec);

impl<'de> Deserialize<'de> for StreamSpecWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(StreamSpecWire(match raw.as_str() {
            "stdin" | "stdout" => StreamSpec::Standard,
            _ => StreamSpec::File(PathBuf::from(raw)),
        }))
    }
}

/// Everything produced by loading and resolving one configuration file.
pub struct LoadedConfig {
    pub jobs: Vec<Job>,
    pub pipelines: Vec<Pipeline>,
    pub assigned_jobs: HashSet<usize>,
    pub staging_dir: PathBuf,
    pub staging_ext: String,
}

/// Load and fully resolve a configuration file.
///
/// Every failure mode — missing file, invalid YAML, a missing required
/// attribute, an unknown job name referenced by a pipeline, or a duplicate
/// job name — collapses to [`RunnerError::ConfigInvalid`]; spec.md §6 gives
/// exactly one user-visible message for all of them. Detail is logged via
/// `tracing`, not surfaced to the user.
pub fn load(path: &Path) -> Result<LoadedConfig, RunnerError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to read config file");
        RunnerError::ConfigInvalid
    })?;

    let raw: RawConfig = serde_yaml::from_str(&text).map_err(|e| {
        tracing::error!(error = %e, "failed to parse config YAML");
        RunnerError::ConfigInvalid
    })?;

    resolve(raw)
}

fn resolve(raw: RawConfig) -> Result<LoadedConfig, RunnerError> {
    let mut jobs = Vec::with_capacity(raw.jobs.len());
    let mut index_by_name: HashMap<String, usize> = HashMap::with_capacity(raw.jobs.len());

    for raw_job in raw.jobs {
        if index_by_name.contains_key(&raw_job.name) {
            tracing::error!(job = %raw_job.name, "duplicate job name in config");
            return Err(RunnerError::ConfigInvalid);
        }
        let index = jobs.len();
        index_by_name.insert(raw_job.name.clone(), index);
        jobs.push(Job {
            name: raw_job.name,
            exec: raw_job.exec,
            args: raw_job.args,
        });
    }

    let mut pipelines = Vec::with_capacity(raw.pipes.len());
    let mut assigned_jobs = HashSet::new();

    for raw_pipe in raw.pipes {
        let mut members = Vec::with_capacity(raw_pipe.pipe.len());
        for job_name in raw_pipe.pipe {
            let Some(&index) = index_by_name.get(&job_name) else {
                tracing::error!(job = %job_name, pipe = %raw_pipe.name, "pipe references unknown job");
                return Err(RunnerError::ConfigInvalid);
            };
            members.push(index);
            assigned_jobs.insert(index);
        }

        pipelines.push(Pipeline {
            name: raw_pipe.name,
            input: raw_pipe.input.0,
            output: raw_pipe.output.0,
            members,
            staging: PathBuf::new(),
        });
    }

    let staging_dir = PathBuf::from(raw.staging_dir.unwrap_or_else(|| DEFAULT_STAGING_DIR.to_string()));
    let staging_ext = raw.staging_ext.unwrap_or_else(|| DEFAULT_STAGING_EXT.to_string());

    Ok(LoadedConfig {
        jobs,
        pipelines,
        assigned_jobs,
        staging_dir,
        staging_ext,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<LoadedConfig, RunnerError> {
        let raw: RawConfig = serde_yaml::from_str(yaml).expect("valid yaml for this test");
        resolve(raw)
    }

    #[test]
    fn minimal_single_job_single_pipe() {
        let cfg = parse(
            r#"
Jobs:
  - Name: e
    Exec: echo
    Args: ["-n", "hello"]
Pipes:
  - Name: P1
    input: stdin
    output: stdout
    Pipe: [e]
"#,
        )
        .expect("parses");
        assert_eq!(cfg.jobs.len(), 1);
        assert_eq!(cfg.pipelines.len(), 1);
        assert_eq!(cfg.pipelines[0].members, vec![0]);
        assert_eq!(cfg.pipelines[0].input, StreamSpec::Standard);
        assert_eq!(cfg.pipelines[0].output, StreamSpec::Standard);
        assert_eq!(cfg.staging_dir, PathBuf::from(DEFAULT_STAGING_DIR));
        assert_eq!(cfg.staging_ext, DEFAULT_STAGING_EXT);
    }

    #[test]
    fn file_backed_input_and_output_paths() {
        let cfg = parse(
            r#"
Jobs:
  - Name: e
    Exec: echo
    Args: []
Pipes:
  - Name: P
    input: in.txt
    output: out.txt
    Pipe: [e]
"#,
        )
        .expect("parses");
        assert_eq!(cfg.pipelines[0].input, StreamSpec::File(PathBuf::from("in.txt")));
        assert_eq!(cfg.pipelines[0].output, StreamSpec::File(PathBuf::from("out.txt")));
    }

    #[test]
    fn unreferenced_job_is_not_assigned() {
        let cfg = parse(
            r#"
Jobs:
  - Name: a
    Exec: echo
    Args: ["one"]
  - Name: b
    Exec: echo
    Args: ["two"]
Pipes:
  - Name: P
    input: stdin
    output: stdout
    Pipe: [a]
"#,
        )
        .expect("parses");
        assert!(cfg.assigned_jobs.contains(&0));
        assert!(!cfg.assigned_jobs.contains(&1));
    }

    #[test]
    fn duplicate_job_name_is_config_invalid() {
        let err = parse(
            r#"
Jobs:
  - Name: a
    Exec: echo
    Args: []
  - Name: a
    Exec: true
    Args: []
Pipes: []
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RunnerError::ConfigInvalid));
    }

    #[test]
    fn pipe_referencing_unknown_job_is_config_invalid() {
        let err = parse(
            r#"
Jobs:
  - Name: a
    Exec: echo
    Args: []
Pipes:
  - Name: P
    input: stdin
    output: stdout
    Pipe: [missing]
"#,
        )
        .unwrap_err();
        assert!(matches!(err, RunnerError::ConfigInvalid));
    }

    #[test]
    fn missing_required_attribute_fails_to_parse() {
        let raw = serde_yaml::from_str::<RawConfig>(
            r#"
Jobs:
  - Name: a
    Exec: echo
Pipes: []
"#,
        );
        assert!(raw.is_err());
    }

    #[test]
    fn job_referenced_by_multiple_pipelines_is_allowed() {
        let cfg = parse(
            r#"
Jobs:
  - Name: a
    Exec: echo
    Args: []
Pipes:
  - Name: P1
    input: stdin
    output: stdout
    Pipe: [a]
  - Name: P2
    input: stdin
    output: stdout
    Pipe: [a]
"#,
        )
        .expect("parses");
        assert_eq!(cfg.pipelines[0].members, vec![0]);
        assert_eq!(cfg.pipelines[1].members, vec![0]);
    }

    #[test]
    fn custom_staging_dir_and_ext_are_honored() {
        let cfg = parse(
            r#"
StagingDir: /var/run/runpipe/
StagingExt: .capture
Jobs: []
Pipes: []
"#,
        )
        .expect("parses");
        assert_eq!(cfg.staging_dir, PathBuf::from("/var/run/runpipe/"));
        assert_eq!(cfg.staging_ext, ".capture");
    }
}
