//! Tool profiles: the invocation grammar and defaults of each analysis tool.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{KeySpec, OptionSet};
use crate::error::ProfileError;

pub const PHPMD_PROGRAM: &str = "/home/composer/.composer/vendor/bin/phpmd";
pub const PHPMD_REPORT: &str = "/tmp/phpmd.xml";
pub const PHPMD_RULESET: &str = "cleancode,codesize,controversial,design,naming,unusedcode";
pub const CHECKSTYLE_REPORT_DIR: &str = "build/reports/checkstyle";

const PHPMD_KEYS: &[KeySpec] = &[
    KeySpec::required("git-url"),
    KeySpec::optional("path"),
    KeySpec::optional("formats"),
    KeySpec::optional("ruleset"),
    KeySpec::optional("exclude"),
    KeySpec::optional("minimumpriority"),
    KeySpec::optional("suffixes"),
    KeySpec::optional("strict"),
    KeySpec::optional("ignore-violations-on-exit"),
];

const CHECKSTYLE_KEYS: &[KeySpec] = &[
    KeySpec::required("git-url"),
    KeySpec::required("out-put-type").one_of(&["xml", "json", "yaml"]),
    KeySpec::optional("report-path"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Tool {
    Phpmd,
    Checkstyle,
}

impl Tool {
    pub fn profile(self) -> ToolProfile {
        match self {
            Tool::Phpmd => ToolProfile::phpmd(),
            Tool::Checkstyle => ToolProfile::checkstyle(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType { Xml, Json, Yaml }

impl OutputType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "xml" => Some(OutputType::Xml),
            "json" => Some(OutputType::Json),
            "yaml" => Some(OutputType::Yaml),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputType::Xml => "xml",
            OutputType::Json => "json",
            OutputType::Yaml => "yaml",
        }
    }

    pub fn content_tag(self) -> &'static str {
        match self {
            OutputType::Xml => "CO_XML_CONTENT",
            OutputType::Json => "CO_JSON_CONTENT",
            OutputType::Yaml => "CO_YAML_CONTENT",
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Where the tool leaves its report, relative to the working copy unless absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLocation {
    Fixed(PathBuf),
    /// A directory taken from an option (or its default) plus a fixed file name.
    UnderOption { key: &'static str, file: &'static str },
}

#[derive(Debug, Clone)]
pub struct ToolProfile {
    pub name: &'static str,
    pub program: String,
    pub leading_args: &'static [&'static str],
    pub vocabulary: &'static [KeySpec],
    pub positional: &'static [&'static str],
    pub value_flags: &'static [&'static str],
    pub bool_flags: &'static [&'static str],
    pub defaults: &'static [(&'static str, &'static str)],
    pub report: ReportLocation,
    pub report_flag: Option<&'static str>,
    pub native_format: OutputType,
    /// Option naming the format the caller wants relayed; `None` means native.
    pub format_key: Option<&'static str>,
    /// Fixed relay tag; `None` tags lines by relayed format.
    pub report_tag: Option<&'static str>,
}

impl ToolProfile {
    pub fn phpmd() -> Self {
        ToolProfile {
            name: "phpmd",
            program: PHPMD_PROGRAM.to_string(),
            leading_args: &[],
            vocabulary: PHPMD_KEYS,
            positional: &["path", "formats", "ruleset"],
            value_flags: &["minimumpriority", "exclude", "suffixes"],
            bool_flags: &["strict", "ignore-violations-on-exit"],
            defaults: &[("path", "."), ("formats", "xml"), ("ruleset", PHPMD_RULESET)],
            report: ReportLocation::Fixed(PathBuf::from(PHPMD_REPORT)),
            report_flag: Some("--reportfile"),
            native_format: OutputType::Xml,
            format_key: None,
            report_tag: Some("REPORT"),
        }
    }

    pub fn checkstyle() -> Self {
        ToolProfile {
            name: "checkstyle",
            program: "gradle".to_string(),
            leading_args: &["checkstyleMain"],
            vocabulary: CHECKSTYLE_KEYS,
            positional: &[],
            value_flags: &[],
            bool_flags: &[],
            defaults: &[("report-path", CHECKSTYLE_REPORT_DIR)],
            report: ReportLocation::UnderOption { key: "report-path", file: "main.xml" },
            report_flag: None,
            native_format: OutputType::Xml,
            format_key: Some("out-put-type"),
            report_tag: None,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self { self.program = program.into(); self }
    pub fn with_report(mut self, report: ReportLocation) -> Self { self.report = report; self }

    pub fn default_for(&self, key: &str) -> &'static str {
        self.defaults.iter().find(|(k, _)| *k == key).map(|(_, v)| *v).unwrap_or("")
    }

    /// Option value with the profile default substituted when unset.
    pub fn resolve<'a>(&self, opts: &'a OptionSet, key: &str) -> &'a str {
        match opts.get(key) {
            "" => self.default_for(key),
            v => v,
        }
    }

    /// Report path as handed to the tool on its command line.
    pub fn report_arg(&self, opts: &OptionSet) -> PathBuf {
        match &self.report {
            ReportLocation::Fixed(p) => p.clone(),
            ReportLocation::UnderOption { key, file } => Path::new(self.resolve(opts, key)).join(file),
        }
    }

    /// Report path as seen from this process, given the tool's working directory.
    pub fn report_path(&self, opts: &OptionSet, workdir: &Path) -> PathBuf { workdir.join(self.report_arg(opts)) }

    pub fn requested_output(&self, opts: &OptionSet) -> OutputType {
        self.format_key
            .and_then(|k| OutputType::parse(opts.get(k)))
            .unwrap_or(self.native_format)
    }

    pub fn relay_tag(&self, output: OutputType) -> &'static str { self.report_tag.unwrap_or(output.content_tag()) }

    /// A key may sit in only one of the positional, value-flag and bool-flag lists.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.program.is_empty() {
            return Err(ProfileError::EmptyProgram { profile: self.name.to_string() });
        }
        let all = self.positional.iter().chain(self.value_flags).chain(self.bool_flags);
        let mut seen: Vec<&str> = Vec::new();
        for &key in all {
            if seen.contains(&key) {
                return Err(ProfileError::Overlap { profile: self.name.to_string(), key: key.to_string() });
            }
            seen.push(key);
        }
        Ok(())
    }
}
