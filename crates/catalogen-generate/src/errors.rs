use std::fmt;

use thiserror::Error;

/// Error returned by a caller-supplied hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Hook slot that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    Key,
    Slug,
    Price,
    VariantKey,
    VariantSku,
    Modify,
}

impl HookKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Slug => "slug",
            Self::Price => "price",
            Self::VariantKey => "variant_key",
            Self::VariantSku => "variant_sku",
            Self::Modify => "modify",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors emitted by the record generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid generator configuration: {0}")]
    Construction(#[from] catalogen_core::Error),
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: HookKind,
        #[source]
        source: HookError,
    },
    #[error("all {issued} record ids have been issued")]
    IdSpaceExhausted { issued: usize },
}

impl GenerationError {
    pub(crate) fn hook(hook: HookKind) -> impl FnOnce(HookError) -> Self {
        move |source| Self::Hook { hook, source }
    }
}
