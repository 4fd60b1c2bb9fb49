//! Command modeling and the option-to-argv compiler.

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::config::OptionSet;
use crate::profile::ToolProfile;

/// A fully resolved invocation: program plus ordered argv, never passed through a shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
    pub flags: CmdFlags,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdFlags {
    pub timeout_ms: Option<u64>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self { CommandSpec { program: program.into(), ..Default::default() } }
    pub fn arg(mut self, a: impl Into<String>) -> Self { self.args.push(a.into()); self }
    pub fn env(mut self, k: impl Into<String>, v: impl Into<String>) -> Self { self.env.insert(k.into(), v.into()); self }

    pub fn timeout(mut self, limit: Option<Duration>) -> Self {
        self.flags.timeout_ms = limit.map(|d| d.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    pub fn time_limit(&self) -> Option<Duration> { self.flags.timeout_ms.map(Duration::from_millis) }
}

/// Build the tool invocation. Flags follow the profile's declared order, never input order.
pub fn compile(opts: &OptionSet, profile: &ToolProfile) -> CommandSpec {
    let mut cmd = CommandSpec::new(profile.program.clone());

    for a in profile.leading_args {
        cmd.args.push(a.to_string());
    }

    for name in profile.positional {
        let value = profile.resolve(opts, name);
        if !value.is_empty() {
            cmd.args.push(value.to_string());
        }
    }

    for name in profile.value_flags {
        if opts.is_set(name) {
            cmd.args.push(format!("--{}={}", name, opts.get(name)));
        }
    }

    for name in profile.bool_flags {
        if opts.switch(name) {
            cmd.args.push(format!("--{}", name));
        }
    }

    if let Some(flag) = profile.report_flag {
        cmd.args.push(flag.to_string());
        cmd.args.push(profile.report_arg(opts).to_string_lossy().into_owned());
    }

    debug!(tool = profile.name, program = %cmd.program, args = ?cmd.args, "compiled command");
    cmd
}
