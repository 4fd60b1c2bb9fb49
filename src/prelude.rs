//! lintrelay::prelude - grab-and-go imports for driving a run

pub use crate::cmd::{compile, CommandSpec};
pub use crate::config::{parse, KeySpec, OptionSet};
pub use crate::error::{ConfigError, FetchError, PipelineError, RelayError, RunError};
pub use crate::exec::{Executor, RunResult};
pub use crate::fetch::{GitFetcher, RepositoryFetcher};
pub use crate::output::Console;
pub use crate::pipeline::{Pipeline, Settings};
pub use crate::profile::{OutputType, Tool, ToolProfile};
#[cfg(feature = "exec")]
pub use crate::exec::StdExecutor;
