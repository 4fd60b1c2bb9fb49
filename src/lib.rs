//! lintrelay: compile lint options into a safe analysis-tool invocation and relay its report.

pub mod error;
pub mod config;
pub mod profile;
pub mod cmd;
pub mod render;
pub mod exec;
pub mod fetch;
pub mod relay;
pub mod output;
pub mod pipeline;
pub mod telemetry;
pub mod prelude;
pub mod macros;

pub use error::PipelineError;
