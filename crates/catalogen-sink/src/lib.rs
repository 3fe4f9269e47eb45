//! Destinations for generated product draft batches.

pub mod errors;
pub mod file;
pub mod import_api;
pub mod sink;

pub use errors::{SinkError, SinkResult};
pub use file::FileSink;
pub use import_api::{ImportApiConfig, ImportApiSink};
pub use sink::{BatchSink, SinkReceipt, SinkSummary};
