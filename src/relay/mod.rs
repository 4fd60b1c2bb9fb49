//! Report Relay: republish the tool's report artifact on the output channel.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::cmd::CommandSpec;
use crate::error::RelayError;
use crate::exec::{next_line, Executor};
use crate::output::Console;
use crate::profile::OutputType;

/// Write each line of the report at `path` as `[COUT] <tag> <line>`, one line at a time.
/// Returns the line count.
pub fn relay<O: Write, E: Write>(path: &Path, tag: &str, console: &mut Console<O, E>) -> Result<usize, RelayError> {
    let read_err = |source| RelayError::Read { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RelayError::NotFound { path: path.to_path_buf() },
        _ => read_err(e),
    })?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut count = 0;
    while let Some(line) = next_line(&mut reader, &mut buf).map_err(read_err)? {
        console.tagged(tag, &line)?;
        count += 1;
    }
    debug!(path = %path.display(), lines = count, "report relayed");
    Ok(count)
}

/// Only a definite "no such file" counts; other metadata errors surface when the file is read.
fn is_missing(path: &Path) -> bool {
    matches!(fs::metadata(path), Err(e) if e.kind() == ErrorKind::NotFound)
}

/// Remove a report left by an earlier run so it cannot be relayed as this run's.
pub fn clear_stale(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed stale report");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// External report-format converter, invoked as
/// `<program> --from <fmt> --to <fmt> --input <path> --output <path>`.
pub struct Converter<E: Executor> {
    pub executor: E,
    pub program: String,
    pub timeout: Option<Duration>,
}

impl<E: Executor> Converter<E> {
    pub fn new(executor: E, program: impl Into<String>) -> Self {
        Converter { executor, program: program.into(), timeout: None }
    }

    /// Converted file sits next to the input, extension swapped for the target format.
    pub fn output_path(input: &Path, to: OutputType) -> PathBuf { input.with_extension(to.as_str()) }

    pub fn command(&self, input: &Path, from: OutputType, to: OutputType) -> CommandSpec {
        CommandSpec::new(self.program.clone())
            .arg("--from")
            .arg(from.as_str())
            .arg("--to")
            .arg(to.as_str())
            .arg("--input")
            .arg(input.to_string_lossy())
            .arg("--output")
            .arg(Self::output_path(input, to).to_string_lossy())
            .timeout(self.timeout)
    }

    pub fn convert(&self, input: &Path, from: OutputType, to: OutputType) -> Result<PathBuf, RelayError> {
        if is_missing(input) {
            return Err(RelayError::NotFound { path: input.to_path_buf() });
        }
        info!(input = %input.display(), %from, %to, "converting report");
        let result = self
            .executor
            .exec(&self.command(input, from, to), Path::new("."))
            .map_err(|e| RelayError::Convert { reason: e.to_string() })?;
        if !result.exit_succeeded {
            let code = result.code.map_or_else(|| "signal".to_string(), |c| c.to_string());
            let detail = result.stderr.last().map(|l| format!(": {l}")).unwrap_or_default();
            return Err(RelayError::Convert { reason: format!("{} exited with {code}{detail}", self.program) });
        }
        let output = Self::output_path(input, to);
        if is_missing(&output) {
            return Err(RelayError::NotFound { path: output });
        }
        Ok(output)
    }
}
