use std::collections::{BTreeMap, HashSet};

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use catalogen_core::{
    Error as CoreError, LocaleSpec, LocaleTags, PriceDraft, ProductDraft, Reference, VariantDraft,
};

use crate::errors::{GenerationError, HookKind};
use crate::hooks::{HookContext, HookResult, Hooks};
use crate::model::{GeneratorOptions, ID_SPACE, ID_STEP, IdPolicy};
use crate::text::{FakerTextSource, TextSource};

const TEMPLATE_KEY: &str = "product-draft-key";
const TEMPLATE_VARIANT_KEY: &str = "product-variant-draft-key";
const TEMPLATE_VARIANT_SKU: &str = "product-variant-draft-sku";

/// Produces product drafts by cloning a fixed template and filling it through hooks.
pub struct RecordGenerator {
    category_key: String,
    locales: LocaleTags,
    options: GeneratorOptions,
    template: ProductDraft,
    hooks: Hooks,
    rng: Box<dyn RngCore + Send>,
    text: Box<dyn TextSource>,
    issued: HashSet<u64>,
    generated: u64,
}

impl RecordGenerator {
    /// Create a generator with default options.
    ///
    /// `locales` accepts a single tag or an ordered list of tags.
    pub fn new(
        category_key: impl Into<String>,
        locales: impl Into<LocaleSpec>,
    ) -> Result<Self, GenerationError> {
        Self::with_options(category_key, locales, GeneratorOptions::default())
    }

    pub fn with_options(
        category_key: impl Into<String>,
        locales: impl Into<LocaleSpec>,
        options: GeneratorOptions,
    ) -> Result<Self, GenerationError> {
        let category_key = category_key.into();
        if category_key.trim().is_empty() {
            return Err(CoreError::Other("category key must not be empty".to_string()).into());
        }
        let locales = LocaleTags::normalize(locales)?;

        let rng = match options.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            template: build_template(&category_key),
            category_key,
            locales,
            options,
            hooks: Hooks::default(),
            rng: Box::new(rng),
            text: Box::new(FakerTextSource),
            issued: HashSet::new(),
            generated: 0,
        })
    }

    /// Replace the random source, e.g. with a deterministic stream.
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn with_text_source(mut self, text: impl TextSource + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    pub fn category_key(&self) -> &str {
        &self.category_key
    }

    pub fn locales(&self) -> &LocaleTags {
        &self.locales
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Base shape cloned for every record.
    pub fn template(&self) -> &ProductDraft {
        &self.template
    }

    /// Number of records produced so far.
    pub fn generated(&self) -> u64 {
        self.generated
    }

    pub fn set_hooks(&mut self, hooks: Hooks) {
        self.hooks = hooks;
    }

    pub fn set_key_hook<F>(&mut self, hook: F)
    where
        F: Fn(u64) -> HookResult<String> + Send + Sync + 'static,
    {
        self.hooks.key = Box::new(hook);
    }

    pub fn set_slug_hook<F>(&mut self, hook: F)
    where
        F: Fn(u64, &str) -> HookResult<String> + Send + Sync + 'static,
    {
        self.hooks.slug = Box::new(hook);
    }

    pub fn set_price_hook<F>(&mut self, hook: F)
    where
        F: Fn(Option<&str>, &mut HookContext<'_>) -> HookResult<PriceDraft> + Send + Sync + 'static,
    {
        self.hooks.price = Box::new(hook);
    }

    pub fn set_variant_key_hook<F>(&mut self, hook: F)
    where
        F: Fn(u64) -> HookResult<String> + Send + Sync + 'static,
    {
        self.hooks.variant_key = Box::new(hook);
    }

    pub fn set_variant_sku_hook<F>(&mut self, hook: F)
    where
        F: Fn(u64) -> HookResult<String> + Send + Sync + 'static,
    {
        self.hooks.variant_sku = Box::new(hook);
    }

    pub fn set_modify_hook<F>(&mut self, hook: F)
    where
        F: Fn(u64, ProductDraft, &mut HookContext<'_>) -> HookResult<ProductDraft>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.modify = Box::new(hook);
    }

    /// Generate `size` independent records in generation order.
    ///
    /// The first failing record aborts the batch. A failed batch leaves the
    /// counter and the set of issued ids as they were before the call.
    pub fn generate_batch(&mut self, size: usize) -> Result<Vec<ProductDraft>, GenerationError> {
        debug!(size, generated = self.generated, "generating batch");
        let mut batch = Vec::with_capacity(size);
        let mut reserved = Vec::with_capacity(size);
        for _ in 0..size {
            match self.next_record() {
                Ok((id, draft)) => {
                    reserved.push(id);
                    batch.push(draft);
                }
                Err(err) => {
                    self.release(&reserved);
                    return Err(err);
                }
            }
        }
        Ok(batch)
    }

    pub fn generate_one(&mut self) -> Result<ProductDraft, GenerationError> {
        self.next_record().map(|(_, draft)| draft)
    }

    fn next_record(&mut self) -> Result<(u64, ProductDraft), GenerationError> {
        let id = self.draw_id()?;
        let draft = self.build(id)?;
        if self.options.id_policy == IdPolicy::Unique {
            self.issued.insert(id);
        }
        self.generated += 1;
        Ok((id, draft))
    }

    fn release(&mut self, reserved: &[u64]) {
        if self.options.id_policy == IdPolicy::Unique {
            for id in reserved {
                self.issued.remove(id);
            }
        }
        self.generated -= reserved.len() as u64;
    }

    fn draw_id(&mut self) -> Result<u64, GenerationError> {
        match self.options.id_policy {
            IdPolicy::AllowDuplicates => Ok(self.rng.random_range(0..ID_SPACE) * ID_STEP),
            IdPolicy::Unique => {
                if self.issued.len() as u64 >= ID_SPACE {
                    return Err(GenerationError::IdSpaceExhausted {
                        issued: self.issued.len(),
                    });
                }
                loop {
                    let id = self.rng.random_range(0..ID_SPACE) * ID_STEP;
                    if !self.issued.contains(&id) {
                        return Ok(id);
                    }
                }
            }
        }
    }

    fn build(&mut self, id: u64) -> Result<ProductDraft, GenerationError> {
        let hooks = &self.hooks;
        let mut ctx = HookContext::new(&mut *self.rng, &*self.text, &self.options.currency_code);

        let mut draft = self.template.clone();
        draft.key = (hooks.key)(id).map_err(GenerationError::hook(HookKind::Key))?;
        draft.master_variant.key =
            (hooks.variant_key)(id).map_err(GenerationError::hook(HookKind::VariantKey))?;
        draft.master_variant.sku =
            (hooks.variant_sku)(id).map_err(GenerationError::hook(HookKind::VariantSku))?;

        let price = (hooks.price)(None, &mut ctx).map_err(GenerationError::hook(HookKind::Price))?;
        set_first(&mut draft.master_variant.prices, price);

        for tag in &self.locales {
            draft.name.insert(tag.clone(), ctx.product_name());
            draft
                .description
                .insert(tag.clone(), ctx.product_description());
            let slug = (hooks.slug)(id, tag).map_err(GenerationError::hook(HookKind::Slug))?;
            draft.slug.insert(tag.clone(), slug);
        }

        (hooks.modify)(id, draft, &mut ctx).map_err(GenerationError::hook(HookKind::Modify))
    }
}

impl std::fmt::Debug for RecordGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordGenerator")
            .field("category_key", &self.category_key)
            .field("locales", &self.locales)
            .field("options", &self.options)
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}

fn build_template(category_key: &str) -> ProductDraft {
    ProductDraft {
        key: TEMPLATE_KEY.to_string(),
        name: BTreeMap::new(),
        description: BTreeMap::new(),
        slug: BTreeMap::new(),
        product_type: Reference::product_type(category_key),
        master_variant: VariantDraft {
            key: TEMPLATE_VARIANT_KEY.to_string(),
            sku: TEMPLATE_VARIANT_SKU.to_string(),
            prices: Vec::new(),
            attributes: Vec::new(),
            images: Vec::new(),
        },
        categories: Vec::new(),
        tax_category: None,
        publish: None,
    }
}

fn set_first(prices: &mut Vec<PriceDraft>, price: PriceDraft) {
    match prices.first_mut() {
        Some(first) => *first = price,
        None => prices.push(price),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn rejects_blank_category_key() {
        let result = RecordGenerator::new("  ", "nl-BE");
        assert!(matches!(result, Err(GenerationError::Construction(_))));
    }

    #[test]
    fn template_starts_empty() {
        let generator = RecordGenerator::new("default", ["nl-BE", "fr-BE"]).expect("generator");
        let template = generator.template();
        assert!(template.name.is_empty());
        assert!(template.slug.is_empty());
        assert!(template.master_variant.prices.is_empty());
        assert!(template.master_variant.attributes.is_empty());
        assert_eq!(template.product_type, Reference::product_type("default"));
        assert_eq!(generator.generated(), 0);
    }

    #[test]
    fn unique_ids_exhaust_after_full_space() {
        let options = GeneratorOptions {
            id_policy: IdPolicy::Unique,
            seed: Some(5),
            ..GeneratorOptions::default()
        };
        let mut generator =
            RecordGenerator::with_options("default", "nl-BE", options).expect("generator");
        generator.issued = (0..ID_SPACE).map(|draw| draw * ID_STEP).collect();

        let err = generator.generate_one().expect_err("no ids left");
        assert!(matches!(err, GenerationError::IdSpaceExhausted { issued } if issued == ID_SPACE as usize));
        assert_eq!(generator.generated(), 0);
    }

    #[test]
    fn failed_batch_returns_its_ids() {
        let options = GeneratorOptions {
            id_policy: IdPolicy::Unique,
            seed: Some(6),
            ..GeneratorOptions::default()
        };
        let mut generator =
            RecordGenerator::with_options("default", "nl-BE", options).expect("generator");
        generator.generate_batch(3).expect("first batch");
        let issued_before = generator.issued.clone();

        let calls = AtomicUsize::new(0);
        generator.set_modify_hook(move |_, draft, _| {
            if calls.fetch_add(1, Ordering::SeqCst) >= 4 {
                Err("modifier gave up".into())
            } else {
                Ok(draft)
            }
        });
        let err = generator.generate_batch(10).expect_err("fifth record fails");
        assert!(matches!(err, GenerationError::Hook { hook: HookKind::Modify, .. }));
        assert_eq!(generator.issued, issued_before);
        assert_eq!(generator.generated(), 3);
    }
}
