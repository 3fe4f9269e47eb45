use crate::error::{Error, Result};
use crate::locale::LocaleTags;
use crate::product::{LocalizedString, ProductDraft};

/// Validate the shape of a generated product draft.
///
/// This checks:
/// - `key` and the master variant `sku` are non-empty
/// - `name`, `description` and `slug` hold exactly the given locales, each non-empty
/// - every price carries a currency code
pub fn validate_draft(draft: &ProductDraft, locales: &LocaleTags) -> Result<()> {
    if draft.key.trim().is_empty() {
        return Err(Error::InvalidDraft("product key is empty".to_string()));
    }

    if draft.master_variant.sku.trim().is_empty() {
        return Err(Error::InvalidDraft(format!(
            "{}: master variant sku is empty",
            draft.key
        )));
    }

    check_localized(&draft.key, "name", &draft.name, locales)?;
    check_localized(&draft.key, "description", &draft.description, locales)?;
    check_localized(&draft.key, "slug", &draft.slug, locales)?;

    for (index, price) in draft.master_variant.prices.iter().enumerate() {
        if price.value.currency_code.trim().is_empty() {
            return Err(Error::InvalidDraft(format!(
                "{}: price {index} has no currency code",
                draft.key
            )));
        }
    }

    Ok(())
}

fn check_localized(
    key: &str,
    field: &str,
    values: &LocalizedString,
    locales: &LocaleTags,
) -> Result<()> {
    for tag in locales {
        match values.get(tag) {
            Some(value) if !value.trim().is_empty() => {}
            Some(_) => {
                return Err(Error::InvalidDraft(format!(
                    "{key}: {field}[{tag}] is empty"
                )));
            }
            None => {
                return Err(Error::InvalidDraft(format!(
                    "{key}: {field} is missing locale {tag}"
                )));
            }
        }
    }

    if let Some(extra) = values.keys().find(|tag| !locales.contains(tag)) {
        return Err(Error::InvalidDraft(format!(
            "{key}: {field} has unexpected locale {extra}"
        )));
    }

    Ok(())
}
