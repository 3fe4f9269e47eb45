use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Locale tag to localized text.
pub type LocalizedString = BTreeMap<String, String>;

/// Product draft as accepted by the catalog import API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// User-defined identifier of the product.
    pub key: String,
    pub name: LocalizedString,
    pub description: LocalizedString,
    pub slug: LocalizedString,
    /// Classification shared by every record of one generator.
    pub product_type: Reference,
    pub master_variant: VariantDraft,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_category: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
}

/// Variant carried by a product draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
    pub key: String,
    pub sku: String,
    pub prices: Vec<PriceDraft>,
    pub attributes: Vec<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<Image>,
}

/// Price entry of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceDraft {
    pub value: TypedMoney,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl PriceDraft {
    pub fn cent_precision(currency_code: impl Into<String>, cent_amount: u64) -> Self {
        Self {
            value: TypedMoney::cent_precision(currency_code, cent_amount),
            country: None,
        }
    }
}

/// Money amount expressed in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypedMoney {
    #[serde(rename = "type")]
    pub money_type: String,
    pub currency_code: String,
    pub cent_amount: u64,
}

impl TypedMoney {
    pub fn cent_precision(currency_code: impl Into<String>, cent_amount: u64) -> Self {
        Self {
            money_type: "centPrecision".to_string(),
            currency_code: currency_code.into(),
            cent_amount,
        }
    }
}

/// Typed attribute value attached to a variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub value: serde_json::Value,
}

impl Attribute {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute_type: "text".to_string(),
            value: serde_json::Value::String(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Image {
    pub url: String,
    pub dimensions: ImageDimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImageDimensions {
    pub w: u32,
    pub h: u32,
}

/// Key reference to another catalog resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub type_id: String,
    pub key: String,
}

impl Reference {
    pub fn new(type_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            type_id: type_id.into(),
            key: key.into(),
        }
    }

    pub fn product_type(key: impl Into<String>) -> Self {
        Self::new("product-type", key)
    }

    pub fn category(key: impl Into<String>) -> Self {
        Self::new("category", key)
    }

    pub fn tax_category(key: impl Into<String>) -> Self {
        Self::new("tax-category", key)
    }
}

/// JSON Schema describing a serialized [`ProductDraft`].
pub fn product_draft_schema() -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(schemars::schema_for!(ProductDraft))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> ProductDraft {
        ProductDraft {
            key: "product-100-key".to_string(),
            name: BTreeMap::from([("nl-BE".to_string(), "Stoel".to_string())]),
            description: BTreeMap::from([("nl-BE".to_string(), "Een stoel".to_string())]),
            slug: BTreeMap::from([("nl-BE".to_string(), "product-100-slug".to_string())]),
            product_type: Reference::product_type("default"),
            master_variant: VariantDraft {
                key: "product-variant-100-key".to_string(),
                sku: "product-variant-SKU-100".to_string(),
                prices: vec![PriceDraft::cent_precision("EUR", 4200)],
                attributes: Vec::new(),
                images: Vec::new(),
            },
            categories: Vec::new(),
            tax_category: None,
            publish: None,
        }
    }

    #[test]
    fn serializes_with_import_field_names() {
        let value = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(
            value["productType"],
            json!({"typeId": "product-type", "key": "default"})
        );
        assert_eq!(
            value["masterVariant"]["prices"][0]["value"],
            json!({"type": "centPrecision", "currencyCode": "EUR", "centAmount": 4200})
        );
        assert!(value.get("categories").is_none());
        assert!(value.get("taxCategory").is_none());
        assert!(value["masterVariant"].get("images").is_none());
    }

    #[test]
    fn optional_fields_appear_once_set() {
        let mut draft = sample();
        draft.publish = Some(true);
        draft.categories.push(Reference::category("imported"));
        draft.master_variant.attributes.push(Attribute::text("SearchName", "chair"));

        let value = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(value["publish"], json!(true));
        assert_eq!(value["categories"][0]["typeId"], json!("category"));
        assert_eq!(
            value["masterVariant"]["attributes"][0],
            json!({"name": "SearchName", "type": "text", "value": "chair"})
        );

        let parsed: ProductDraft = serde_json::from_value(value).expect("deserialize");
        assert_eq!(parsed, draft);
    }

    #[test]
    fn schema_lists_draft_properties() {
        let schema = product_draft_schema().expect("schema");
        assert_eq!(schema["title"], json!("ProductDraft"));
        let properties = schema["properties"].as_object().expect("properties");
        for field in ["key", "name", "slug", "productType", "masterVariant"] {
            assert!(properties.contains_key(field), "missing {field}");
        }
    }
}
