//! Shell-style rendering of a [`CommandSpec`] for logs and dry-run plans.
//!
//! Rendering is display only. Execution always passes argv directly.

use std::path::Path;

use crate::cmd::CommandSpec;

/// `Strict` quotes every argument; `Loose` leaves plain words bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePolicy { Strict, Loose }

pub trait Renderer {
    fn render_cmd(&self, cmd: &CommandSpec) -> String;

    fn render_cmd_plan(&self, cmd: &CommandSpec, cwd: Option<&Path>) -> String {
        let mut s = self.render_cmd(cmd);
        if let Some(dir) = cwd {
            s = format!("cd {} && {}", quote_sh(&dir.to_string_lossy()), s);
        }
        if let Some(ms) = cmd.flags.timeout_ms { s.push_str(&format!("  # timeout={}ms", ms)); }
        s
    }
}

#[derive(Debug, Clone)]
pub struct PosixRenderer { pub quote: QuotePolicy }

impl Default for PosixRenderer { fn default() -> Self { Self { quote: QuotePolicy::Strict } } }

impl PosixRenderer {
    pub fn loose() -> Self { Self { quote: QuotePolicy::Loose } }

    fn quote_arg(&self, a: &str) -> String {
        match self.quote {
            QuotePolicy::Loose if is_simple_word(a) && !a.is_empty() => a.to_string(),
            _ => quote_sh(a),
        }
    }
}

impl Renderer for PosixRenderer {
    fn render_cmd(&self, cmd: &CommandSpec) -> String {
        let mut parts: Vec<String> = Vec::new();
        for (k, v) in &cmd.env {
            parts.push(format!("{}={}", k, self.quote_arg(v)));
        }
        parts.push(quote_prog(&cmd.program));
        for a in &cmd.args {
            parts.push(self.quote_arg(a));
        }
        parts.join(" ")
    }
}

fn quote_prog(p: &str) -> String {
    if !p.is_empty() && is_simple_word(p) { p.to_string() } else { quote_sh(p) }
}

fn is_simple_word(s: &str) -> bool {
    s.chars().all(|c| matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '/' | ':' | '+' | '%' | '@' | '=' | ','))
}

fn quote_sh(s: &str) -> String {
    if s.is_empty() { return "''".to_string(); }
    let escaped = s.replace('\'', "'\"'\"'");
    format!("'{}'", escaped)
}
