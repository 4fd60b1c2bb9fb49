//! Error kinds for each pipeline stage.

use std::path::PathBuf;
use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the {key} value is null")]
    MissingRequired { key: String },
    #[error("invalid value {value:?} for {key}, expected one of: {}", .allowed.join(", "))]
    InvalidValue { key: String, value: String, allowed: Vec<String> },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("profile {profile}: option {key} is declared in more than one argument list")]
    Overlap { profile: String, key: String },
    #[error("profile {profile}: program is empty")]
    EmptyProgram { profile: String },
}

#[derive(thiserror::Error, Debug)]
#[error("clone the repository error: {reason}")]
pub struct FetchError {
    pub reason: String,
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("failed to start {program}: {reason}")]
    Spawn { program: String, reason: String },
    #[error("failed waiting for {program}: {reason}")]
    Wait { program: String, reason: String },
    #[error("{program} did not finish within {}s and was killed", .after.as_secs())]
    TimedOut { program: String, after: Duration },
}

#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("report not found: {}", .path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read report {}: {source}", .path.display())]
    Read { path: PathBuf, #[source] source: std::io::Error },
    #[error("report conversion failed: {reason}")]
    Convert { reason: String },
    #[error("failed to write report line: {0}")]
    Write(#[from] std::io::Error),
}

/// Fatal failures: any of these ends the run with `CO_RESULT = false`.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("handle input error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error("failed to remove stale report {}: {source}", .path.display())]
    StaleReport { path: PathBuf, #[source] source: std::io::Error },
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
