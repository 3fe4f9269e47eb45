use serde::{Deserialize, Serialize};

/// Number of distinct record ids; ids are `draw * 100` for `draw` in `[0, ID_SPACE)`.
pub const ID_SPACE: u64 = 100_000;
/// Spacing between consecutive record ids.
pub const ID_STEP: u64 = 100;
/// Exclusive upper bound of the default whole-unit price draw.
pub const PRICE_UNITS: u64 = 1_000;
pub const DEFAULT_CURRENCY: &str = "EUR";

/// How record ids behave across one generator's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdPolicy {
    /// Every record draws independently; keys and SKUs may repeat.
    #[default]
    AllowDuplicates,
    /// Redraw until the id has not been issued by this generator.
    Unique,
}

/// Options for a record generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Currency of the default price hook.
    pub currency_code: String,
    pub id_policy: IdPolicy,
    /// Seed for a reproducible random stream; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            currency_code: DEFAULT_CURRENCY.to_string(),
            id_policy: IdPolicy::AllowDuplicates,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_options_fall_back_to_defaults() {
        let options: GeneratorOptions = toml::from_str("id_policy = \"unique\"").expect("parse");
        assert_eq!(options.id_policy, IdPolicy::Unique);
        assert_eq!(options.currency_code, "EUR");
        assert_eq!(options.seed, None);
    }
}
