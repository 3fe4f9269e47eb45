mod execute;
mod logging;
mod plan;

pub use execute::{execute_run, progress_bar};
pub use logging::init_logging;
pub use plan::BatchPlan;

use thiserror::Error;

use catalogen_generate::GenerationError;
use catalogen_sink::SinkError;

/// Errors raised while executing a generation run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("invalid record: {0}")]
    Draft(#[from] catalogen_core::Error),
    #[error("invalid batch plan: {0}")]
    Plan(String),
    #[error("logging error: {0}")]
    Logging(String),
}

/// Result type for run operations.
pub type RunResult<T> = std::result::Result<T, RunError>;
