use rand::{Rng, RngCore};

use catalogen_core::{PriceDraft, ProductDraft};

use crate::errors::HookError;
use crate::model::PRICE_UNITS;
use crate::text::TextSource;

pub type HookResult<T> = Result<T, HookError>;

pub type IdHook = Box<dyn Fn(u64) -> HookResult<String> + Send + Sync>;
pub type SlugHook = Box<dyn Fn(u64, &str) -> HookResult<String> + Send + Sync>;
pub type PriceHook =
    Box<dyn Fn(Option<&str>, &mut HookContext<'_>) -> HookResult<PriceDraft> + Send + Sync>;
pub type ModifyHook = Box<
    dyn Fn(u64, ProductDraft, &mut HookContext<'_>) -> HookResult<ProductDraft> + Send + Sync,
>;

/// Randomness and filler text available to hooks while a record is built.
pub struct HookContext<'a> {
    rng: &'a mut dyn RngCore,
    text: &'a dyn TextSource,
    currency_code: &'a str,
}

impl<'a> HookContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, text: &'a dyn TextSource, currency_code: &'a str) -> Self {
        Self {
            rng,
            text,
            currency_code,
        }
    }

    /// Currency configured on the generator.
    pub fn currency_code(&self) -> &str {
        self.currency_code
    }

    /// Uniform integer in `[0, bound)`; `0` when `bound` is zero.
    pub fn random_below(&mut self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.rng.random_range(0..bound)
    }

    pub fn word(&mut self) -> String {
        self.text.word(self.rng)
    }

    pub fn product_name(&mut self) -> String {
        self.text.product_name(self.rng)
    }

    pub fn product_description(&mut self) -> String {
        self.text.product_description(self.rng)
    }

    pub fn image_url(&mut self, width: u32, height: u32) -> String {
        self.text.image_url(width, height, self.rng)
    }

    pub fn rng(&mut self) -> &mut dyn RngCore {
        self.rng
    }
}

/// Replaceable generation hooks of a record generator.
pub struct Hooks {
    pub key: IdHook,
    pub slug: SlugHook,
    pub price: PriceHook,
    pub variant_key: IdHook,
    pub variant_sku: IdHook,
    pub modify: ModifyHook,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            key: Box::new(default_key),
            slug: Box::new(default_slug),
            price: Box::new(default_price),
            variant_key: Box::new(default_variant_key),
            variant_sku: Box::new(default_variant_sku),
            modify: Box::new(keep_draft),
        }
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}

pub fn default_key(id: u64) -> HookResult<String> {
    Ok(format!("product-{id}-key"))
}

/// One slug per locale; the default ignores the locale.
pub fn default_slug(id: u64, _locale: &str) -> HookResult<String> {
    Ok(format!("product-{id}-slug"))
}

pub fn default_variant_key(id: u64) -> HookResult<String> {
    Ok(format!("product-variant-{id}-key"))
}

pub fn default_variant_sku(id: u64) -> HookResult<String> {
    Ok(format!("product-variant-SKU-{id}"))
}

pub fn keep_draft(
    _id: u64,
    draft: ProductDraft,
    _ctx: &mut HookContext<'_>,
) -> HookResult<ProductDraft> {
    Ok(draft)
}

/// Whole currency units below [`PRICE_UNITS`], expressed in cents.
pub fn default_price(
    _country: Option<&str>,
    ctx: &mut HookContext<'_>,
) -> HookResult<PriceDraft> {
    let cent_amount = ctx.random_below(PRICE_UNITS) * 100;
    Ok(PriceDraft::cent_precision(ctx.currency_code(), cent_amount))
}
