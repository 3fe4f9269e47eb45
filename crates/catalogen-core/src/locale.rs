use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Locale input as supplied by a caller: one tag or an ordered list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocaleSpec {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for LocaleSpec {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<String> for LocaleSpec {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<Vec<String>> for LocaleSpec {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<&[&str]> for LocaleSpec {
    fn from(value: &[&str]) -> Self {
        Self::Many(value.iter().map(|tag| tag.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LocaleSpec {
    fn from(value: [&str; N]) -> Self {
        Self::Many(value.iter().map(|tag| tag.to_string()).collect())
    }
}

/// Non-empty ordered sequence of unique locale tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LocaleTags(Vec<String>);

impl LocaleTags {
    /// Normalize caller input, wrapping a single tag into a one-element sequence.
    pub fn normalize(spec: impl Into<LocaleSpec>) -> Result<Self> {
        let tags = match spec.into() {
            LocaleSpec::One(tag) => vec![tag],
            LocaleSpec::Many(tags) => tags,
        };

        if tags.is_empty() {
            return Err(Error::InvalidLocale(
                "at least one locale tag is required".to_string(),
            ));
        }

        let mut seen = BTreeSet::new();
        let mut normalized = Vec::with_capacity(tags.len());
        for tag in tags {
            let tag = tag.trim().to_string();
            validate_tag(&tag)?;
            if !seen.insert(tag.clone()) {
                return Err(Error::InvalidLocale(format!("duplicate locale tag '{tag}'")));
            }
            normalized.push(tag);
        }

        Ok(Self(normalized))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|candidate| candidate == tag)
    }
}

impl<'de> Deserialize<'de> for LocaleTags {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let spec = LocaleSpec::deserialize(deserializer)?;
        LocaleTags::normalize(spec).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a LocaleTags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for LocaleTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Accepts BCP 47 style tags (`nl-BE`, `en`, `de_DE`, `zh-Hant-TW`).
fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(Error::InvalidLocale("locale tag must not be empty".to_string()));
    }

    for (index, subtag) in tag.split(['-', '_']).enumerate() {
        let valid_len = (1..=8).contains(&subtag.len());
        let valid_chars = subtag.chars().all(|ch| ch.is_ascii_alphanumeric());
        if !valid_len || !valid_chars {
            return Err(Error::InvalidLocale(format!("malformed locale tag '{tag}'")));
        }
        if index == 0 && (subtag.len() < 2 || !subtag.chars().all(|ch| ch.is_ascii_alphabetic())) {
            return Err(Error::InvalidLocale(format!(
                "locale tag '{tag}' must start with a language subtag"
            )));
        }
    }

    Ok(())
}
