//! Execution and planning interfaces.

use std::io::{self, BufRead};
use std::path::Path;

use crate::cmd::CommandSpec;
use crate::error::RunError;
use crate::render::Renderer;

/// Outcome of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    pub exit_succeeded: bool,
    /// `None` when the process was ended by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl RunResult {
    pub fn success() -> Self { RunResult { exit_succeeded: true, code: Some(0), ..Default::default() } }
    pub fn failure(code: i32) -> Self { RunResult { exit_succeeded: false, code: Some(code), ..Default::default() } }
    pub fn with_stdout(mut self, line: &str) -> Self { self.stdout.push(line.into()); self }
    pub fn with_stderr(mut self, line: &str) -> Self { self.stderr.push(line.into()); self }
}

/// Runs a command with `cwd` as its working directory and waits for it.
///
/// `Err` means the process could not be started, waited on, or finished in time.
/// A non-zero exit is an `Ok` result with `exit_succeeded == false`.
pub trait Executor {
    fn exec(&self, cmd: &CommandSpec, cwd: &Path) -> Result<RunResult, RunError>;
}

impl<E: Executor + ?Sized> Executor for &E {
    fn exec(&self, cmd: &CommandSpec, cwd: &Path) -> Result<RunResult, RunError> { (**self).exec(cmd, cwd) }
}

/// Renders what would run, without running it.
pub struct Planner<'a, R: Renderer> { pub renderer: &'a R }

impl<'a, R: Renderer> Planner<'a, R> {
    pub fn plan(&self, cmd: &CommandSpec, cwd: &Path) -> String {
        self.renderer.render_cmd_plan(cmd, Some(cwd))
    }
}

/// Next line from `reader` without its line ending, or `None` at end of input.
/// Invalid UTF-8 is replaced, CRLF endings are stripped. `buf` is scratch space.
pub fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(buf.as_slice()).into_owned()))
}

pub fn read_lines<R: BufRead>(mut reader: R) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    while let Some(line) = next_line(&mut reader, &mut buf)? {
        lines.push(line);
    }
    Ok(lines)
}

#[cfg(feature = "exec")]
pub use std_exec::StdExecutor;

#[cfg(feature = "exec")]
mod std_exec {
    use std::io::{BufReader, Read};
    use std::path::Path;
    use std::process::{Child, Command, ExitStatus, Stdio};
    use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
    use std::thread;
    use std::time::{Duration, Instant};

    use tracing::{debug, warn};

    use super::{next_line, Executor, RunResult};
    use crate::cmd::CommandSpec;
    use crate::error::RunError;

    const POLL_INTERVAL: Duration = Duration::from_millis(50);

    /// Spawns the program directly (no shell) with piped output.
    ///
    /// The time limit covers the whole call: waiting for the child and draining
    /// its output. Lines still pending when it expires are dropped.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StdExecutor;

    impl Executor for StdExecutor {
        fn exec(&self, cmd: &CommandSpec, cwd: &Path) -> Result<RunResult, RunError> {
            debug!(program = %cmd.program, args = ?cmd.args, cwd = %cwd.display(), "spawning");
            let deadline = cmd.time_limit().map(|limit| Instant::now() + limit);
            let mut child = Command::new(&cmd.program)
                .args(&cmd.args)
                .envs(&cmd.env)
                .current_dir(cwd)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| RunError::Spawn { program: cmd.program.clone(), reason: e.to_string() })?;

            let out = child.stdout.take().map(collect);
            let err = child.stderr.take().map(collect);

            let status = wait_bounded(&mut child, deadline)
                .map_err(|e| RunError::Wait { program: cmd.program.clone(), reason: e.to_string() })?;

            let Some(status) = status else {
                let after = cmd.time_limit().unwrap_or_default();
                warn!(program = %cmd.program, secs = after.as_secs(), "killed after timeout");
                return Err(RunError::TimedOut { program: cmd.program.clone(), after });
            };

            let (stdout, out_done) = drain(out, deadline);
            let (stderr, err_done) = drain(err, deadline);
            if !(out_done && err_done) {
                warn!(program = %cmd.program, "output still held open after exit, stopped reading at deadline");
            }

            Ok(RunResult { exit_succeeded: status.success(), code: status.code(), stdout, stderr })
        }
    }

    /// Reader thread forwarding lines as they arrive. It ends when the pipe closes.
    fn collect<R: Read + Send + 'static>(r: R) -> Receiver<String> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut reader = BufReader::new(r);
            let mut buf = Vec::new();
            while let Ok(Some(line)) = next_line(&mut reader, &mut buf) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        rx
    }

    /// Lines received before the pipe closed or the deadline passed; `true` if the pipe closed.
    fn drain(rx: Option<Receiver<String>>, deadline: Option<Instant>) -> (Vec<String>, bool) {
        let Some(rx) = rx else { return (Vec::new(), true) };
        let mut lines = Vec::new();
        loop {
            let next = match deadline {
                Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match next {
                Ok(line) => lines.push(line),
                Err(RecvTimeoutError::Disconnected) => return (lines, true),
                Err(RecvTimeoutError::Timeout) => return (lines, false),
            }
        }
    }

    /// `Ok(None)` means the deadline passed and the child was killed and reaped.
    fn wait_bounded(child: &mut Child, deadline: Option<Instant>) -> std::io::Result<Option<ExitStatus>> {
        let Some(deadline) = deadline else { return child.wait().map(Some) };
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

}
