//! Repository Fetcher: materialize a working copy of the source repository.

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};

use crate::cmd::CommandSpec;
use crate::error::FetchError;
use crate::exec::Executor;

pub trait RepositoryFetcher {
    /// Either `dest` holds a usable working copy of `url` afterwards, or this fails.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Clones with the `git` CLI through an [`Executor`]. One attempt, no retries.
pub struct GitFetcher<E: Executor> {
    pub executor: E,
    pub git: String,
    pub timeout: Option<Duration>,
}

impl<E: Executor> GitFetcher<E> {
    pub fn new(executor: E) -> Self { GitFetcher { executor, git: "git".to_string(), timeout: None } }

    pub fn clone_command(&self, url: &str, dest: &Path) -> CommandSpec {
        CommandSpec::new(self.git.clone())
            .env("GIT_TERMINAL_PROMPT", "0")
            .arg("clone")
            .arg("--")
            .arg(url)
            .arg(dest.to_string_lossy())
            .timeout(self.timeout)
    }
}

impl<E: Executor> RepositoryFetcher for GitFetcher<E> {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        info!(%url, dest = %dest.display(), "cloning repository");
        let cmd = self.clone_command(url, dest);
        let result = self
            .executor
            .exec(&cmd, Path::new("."))
            .map_err(|e| FetchError { reason: e.to_string() })?;

        if result.exit_succeeded {
            return Ok(());
        }
        for line in &result.stderr {
            warn!(target: "lintrelay::git", "{line}");
        }
        let code = result.code.map_or_else(|| "signal".to_string(), |c| c.to_string());
        let reason = match result.stderr.iter().rev().find(|l| !l.trim().is_empty()) {
            Some(last) => format!("git exited with {code}: {}", last.trim()),
            None => format!("git exited with {code}"),
        };
        Err(FetchError { reason })
    }
}
