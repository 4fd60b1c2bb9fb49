//! The run pipeline: parse, fetch, compile, execute, relay, report.
//!
//! Config, profile, fetch and spawn failures are fatal. A tool that exits
//! non-zero has found violations; that is relayed, not failed. A missing or
//! unconvertible report is reported on the error channel and does not change
//! the result.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cmd::compile;
use crate::config::{parse, OptionSet};
use crate::error::{PipelineError, RelayError};
use crate::exec::{Executor, Planner};
use crate::fetch::RepositoryFetcher;
use crate::output::{report, Console};
use crate::profile::ToolProfile;
use crate::relay::{clear_stale, relay, Converter};
use crate::render::{PosixRenderer, Renderer};

pub const DEFAULT_WORKSPACE: &str = "./workspace";
pub const DEFAULT_CONVERTER: &str = "report-convert";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);
/// Tags the analysis tool's own output so it cannot pass for framing lines.
pub const TOOL_TAG: &str = "TOOL";

/// Immutable run settings, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where the working copy is cloned; the tool runs here.
    pub workspace: PathBuf,
    pub converter: String,
    /// Limit for each subprocess. `None` waits forever.
    pub timeout: Option<Duration>,
    pub dry_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            workspace: PathBuf::from(DEFAULT_WORKSPACE),
            converter: DEFAULT_CONVERTER.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            dry_run: false,
        }
    }
}

/// What happened after a run that reached the relay stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub tool_succeeded: bool,
    pub tool_code: Option<i32>,
    /// Lines relayed from the report, or `None` when the report could not be relayed.
    pub report_lines: Option<usize>,
}

pub struct Pipeline<X: Executor, F: RepositoryFetcher> {
    pub profile: ToolProfile,
    pub settings: Settings,
    pub executor: X,
    pub fetcher: F,
}

impl<X: Executor, F: RepositoryFetcher> Pipeline<X, F> {
    pub fn new(profile: ToolProfile, settings: Settings, executor: X, fetcher: F) -> Self {
        Pipeline { profile, settings, executor, fetcher }
    }

    /// Run end to end, print the status line, and return the process exit code.
    pub fn execute<O: Write, W: Write>(&self, raw: &str, console: &mut Console<O, W>) -> i32 {
        match self.run(raw, console) {
            Ok(_) => report(console, true),
            Err(e) => {
                warn!(error = %e, "run aborted");
                if let Err(io) = console.error(&e.to_string()) {
                    warn!(error = %io, "failed to write error line");
                }
                report(console, false)
            }
        }
    }

    pub fn run<O: Write, W: Write>(&self, raw: &str, console: &mut Console<O, W>) -> Result<Summary, PipelineError> {
        let profile = &self.profile;
        let workspace = &self.settings.workspace;
        profile.validate()?;
        let opts = parse(raw, profile.vocabulary)?;

        if self.settings.dry_run {
            let cmd = compile(&opts, profile).timeout(self.settings.timeout);
            let renderer = PosixRenderer::default();
            console.tagged("PLAN", &Planner { renderer: &renderer }.plan(&cmd, workspace))?;
            return Ok(Summary { tool_succeeded: true, ..Default::default() });
        }

        self.fetcher.fetch(opts.get("git-url"), workspace)?;

        self.clear_stale_reports(&opts)?;

        let cmd = compile(&opts, profile).timeout(self.settings.timeout);
        info!(tool = profile.name, "running analysis");
        debug!(command = %PosixRenderer::loose().render_cmd_plan(&cmd, Some(workspace)), "analysis command");
        let result = self.executor.exec(&cmd, workspace)?;
        for line in &result.stdout {
            console.tagged(TOOL_TAG, line)?;
        }
        for line in &result.stderr {
            console.tagged_error(TOOL_TAG, line)?;
        }
        if !result.exit_succeeded {
            warn!(tool = profile.name, code = ?result.code, "analysis exited non-zero, relaying report anyway");
        }

        let report_lines = match self.relay_report(&opts, console) {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(error = %e, "report relay failed");
                console.error(&format!("relay report error: {e}"))?;
                None
            }
        };

        Ok(Summary { tool_succeeded: result.exit_succeeded, tool_code: result.code, report_lines })
    }

    /// Reports live at fixed paths; anything there before the tool runs is from an earlier run.
    fn clear_stale_reports(&self, opts: &OptionSet) -> Result<(), PipelineError> {
        let profile = &self.profile;
        let report = profile.report_path(opts, &self.settings.workspace);
        let wanted = profile.requested_output(opts);
        let mut stale = vec![report.clone()];
        if wanted != profile.native_format {
            stale.push(Converter::<X>::output_path(&report, wanted));
        }
        for path in stale {
            clear_stale(&path).map_err(|source| PipelineError::StaleReport { path, source })?;
        }
        Ok(())
    }

    fn relay_report<O: Write, W: Write>(&self, opts: &OptionSet, console: &mut Console<O, W>) -> Result<usize, RelayError> {
        let profile = &self.profile;
        let mut path = profile.report_path(opts, &self.settings.workspace);
        let wanted = profile.requested_output(opts);
        if wanted != profile.native_format {
            let converter = Converter {
                executor: &self.executor,
                program: self.settings.converter.clone(),
                timeout: self.settings.timeout,
            };
            path = converter.convert(&path, profile.native_format, wanted)?;
        }
        relay(&path, profile.relay_tag(wanted), console)
    }
}
