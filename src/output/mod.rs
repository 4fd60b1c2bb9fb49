//! Output channel and Result Reporter.
//!
//! Every line this crate prints starts with [`TAG`]. Framing and payload go to
//! `out`; error lines go to `err`. The last line on `out` is always the status line.

use std::io::{self, Stderr, Stdout, Write};

use tracing::error;

pub const TAG: &str = "[COUT]";
pub const EXIT_OK: i32 = 0;
pub const EXIT_FATAL: i32 = 1;

pub struct Console<O: Write, E: Write> {
    out: O,
    err: E,
}

impl Console<Stdout, Stderr> {
    pub fn std() -> Self { Console { out: io::stdout(), err: io::stderr() } }
}

impl<O: Write, E: Write> Console<O, E> {
    pub fn new(out: O, err: E) -> Self { Console { out, err } }

    pub fn line(&mut self, text: &str) -> io::Result<()> { writeln!(self.out, "{} {}", TAG, text) }

    pub fn tagged(&mut self, tag: &str, text: &str) -> io::Result<()> { writeln!(self.out, "{} {} {}", TAG, tag, text) }

    pub fn error(&mut self, text: &str) -> io::Result<()> { writeln!(self.err, "{} {}", TAG, text) }

    pub fn tagged_error(&mut self, tag: &str, text: &str) -> io::Result<()> { writeln!(self.err, "{} {} {}", TAG, tag, text) }

    pub fn result(&mut self, success: bool) -> io::Result<()> {
        writeln!(self.out, "{} CO_RESULT = {}", TAG, success)?;
        self.out.flush()?;
        self.err.flush()
    }

    pub fn into_parts(self) -> (O, E) { (self.out, self.err) }
}

/// Emit the final status line and return the process exit code.
pub fn report<O: Write, E: Write>(console: &mut Console<O, E>, success: bool) -> i32 {
    if let Err(e) = console.result(success) {
        error!(error = %e, "failed to write result line");
    }
    if success { EXIT_OK } else { EXIT_FATAL }
}
