use thiserror::Error;

/// Every error kind the runner can produce, from config loading through to
/// wiring a single pipeline's children together.
///
/// `ConfigInvalid` and `StagingUnavailable` are the only two that ever reach
/// `main` directly — `SpawnFailed` and `WiringFailed` are confined to one
/// pipeline's executor thread, logged there, and folded into that
/// pipeline's reported [`crate::status::Termination`] rather than
/// propagated further. A job's non-zero exit or signal termination isn't a
/// `RunnerError` at all — it's an ordinary `Termination` the Reporter
/// classifies directly; nothing failed internally for the runner to report.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("config invalid")]
    ConfigInvalid,

    #[error("staging directory unavailable: {0}")]
    StagingUnavailable(String),

    #[error("failed to spawn child process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("failed to wire pipeline descriptors: {0}")]
    WiringFailed(String),
}
