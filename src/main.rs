use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use lintrelay::pipeline::{DEFAULT_CONVERTER, DEFAULT_WORKSPACE};
use lintrelay::prelude::*;
use lintrelay::profile::ReportLocation;
use lintrelay::telemetry::init_tracing;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "lintrelay",
    version,
    about = "Clone a repository, run a code analysis tool on it, and relay the report"
)]
struct Cli {
    #[arg(long, env = "CO_TOOL", value_enum, default_value_t = Tool::Phpmd)]
    tool: Tool,
    #[arg(
        long,
        env = "CO_DATA",
        default_value = "",
        hide_env_values = true,
        help = "Whitespace separated key=value options"
    )]
    data: String,
    #[arg(long, env = "CO_WORKSPACE", default_value = DEFAULT_WORKSPACE)]
    workspace: PathBuf,
    #[arg(long, help = "Override the analysis tool executable")]
    tool_bin: Option<String>,
    #[arg(long, help = "Override where the tool writes its report")]
    report_file: Option<PathBuf>,
    #[arg(long, env = "CO_GIT", default_value = "git")]
    git_bin: String,
    #[arg(long, env = "CO_CONVERTER", default_value = DEFAULT_CONVERTER)]
    converter_bin: String,
    #[arg(long, env = "CO_TIMEOUT_SECS", default_value_t = 3600, help = "Per-subprocess limit, 0 disables")]
    timeout_secs: u64,
    #[arg(long, help = "Print the compiled command instead of cloning and running")]
    dry_run: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut profile = cli.tool.profile();
    if let Some(bin) = cli.tool_bin {
        profile = profile.with_program(bin);
    }
    if let Some(path) = cli.report_file {
        profile = profile.with_report(ReportLocation::Fixed(path));
    }

    let timeout = (cli.timeout_secs > 0).then(|| Duration::from_secs(cli.timeout_secs));
    let settings = Settings {
        workspace: cli.workspace,
        converter: cli.converter_bin,
        timeout,
        dry_run: cli.dry_run,
    };
    debug!(tool = profile.name, ?settings, "starting");

    let fetcher = GitFetcher { executor: StdExecutor, git: cli.git_bin, timeout };
    let pipeline = Pipeline::new(profile, settings, StdExecutor, fetcher);
    let code = pipeline.execute(&cli.data, &mut Console::std());
    std::process::exit(code);
}
