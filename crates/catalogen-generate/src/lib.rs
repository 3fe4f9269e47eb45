//! Templated random product-record generation for catalogen.
//!
//! A [`RecordGenerator`] owns a product draft template, clones it for every
//! record and fills the clone through replaceable hooks before a final
//! caller-supplied modification pass.

pub mod errors;
pub mod generator;
pub mod hooks;
pub mod model;
pub mod presets;
pub mod text;

pub use errors::{GenerationError, HookError, HookKind};
pub use generator::RecordGenerator;
pub use hooks::{HookContext, HookResult, Hooks};
pub use model::{GeneratorOptions, IdPolicy};
pub use text::{FakerTextSource, TextSource};
