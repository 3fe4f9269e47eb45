//! Core contracts for catalogen.
//!
//! This crate defines the product draft model handed to sinks, locale tag
//! normalization, and the structural checks shared by the generator and the CLI.

pub mod error;
pub mod locale;
pub mod product;
pub mod validation;

pub use error::{Error, Result};
pub use locale::{LocaleSpec, LocaleTags};
pub use product::{
    Attribute, Image, ImageDimensions, LocalizedString, PriceDraft, ProductDraft, Reference,
    TypedMoney, VariantDraft, product_draft_schema,
};
pub use validation::validate_draft;

/// Resource type tag used by the import payload for product drafts.
pub const PRODUCT_DRAFT_TYPE: &str = "product-draft";
