//! Hook sets used by the command-line front end.

use serde::{Deserialize, Serialize};

use catalogen_core::{Attribute, Image, ImageDimensions, ProductDraft, Reference};

use crate::generator::RecordGenerator;
use crate::hooks::{HookContext, HookResult};

/// Text attributes filled with a random word by the import preset.
pub const IMPORT_TEXT_ATTRIBUTES: &[&str] = &[
    "DisplayProductNumber",
    "SearchName",
    "HarmonizedSystemCode",
    "NMFCCode",
];
pub const IMPORT_CATEGORY_KEY: &str = "imported";
pub const IMPORT_TAX_CATEGORY_KEY: &str = "standard";
pub const IMPORT_IMAGE_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Default hooks only.
    #[default]
    Default,
    /// Publishable drafts with attributes, image, category and tax category.
    Import,
}

impl Preset {
    pub fn apply(self, generator: &mut RecordGenerator) {
        match self {
            Preset::Default => {}
            Preset::Import => import_preset(generator),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Default => "default",
            Preset::Import => "import",
        }
    }
}

/// Install the modifier that makes drafts ready for a catalog import.
pub fn import_preset(generator: &mut RecordGenerator) {
    generator.set_modify_hook(enrich_for_import);
}

fn enrich_for_import(
    _id: u64,
    mut draft: ProductDraft,
    ctx: &mut HookContext<'_>,
) -> HookResult<ProductDraft> {
    for name in IMPORT_TEXT_ATTRIBUTES {
        draft
            .master_variant
            .attributes
            .push(Attribute::text(*name, ctx.word()));
    }

    let (w, h) = IMPORT_IMAGE_SIZE;
    draft.master_variant.images = vec![Image {
        url: ctx.image_url(w, h),
        dimensions: ImageDimensions { w, h },
        label: Some("image".to_string()),
    }];

    draft.publish = Some(true);
    draft.categories = vec![Reference::category(IMPORT_CATEGORY_KEY)];
    draft.tax_category = Some(Reference::tax_category(IMPORT_TAX_CATEGORY_KEY));
    Ok(draft)
}
