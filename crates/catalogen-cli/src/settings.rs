use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalogen_core::LocaleSpec;
use catalogen_generate::IdPolicy;
use catalogen_generate::presets::Preset;

/// Settings file looked up in the working directory when `--config` is not given.
pub const DEFAULT_SETTINGS_FILE: &str = "catalogen.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorSettings,
    pub import: ImportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub category_key: String,
    pub locales: LocaleSpec,
    pub currency_code: String,
    pub id_policy: IdPolicy,
    pub preset: Preset,
    pub batch_size: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            category_key: "default".to_string(),
            locales: LocaleSpec::One("nl-BE".to_string()),
            currency_code: "EUR".to_string(),
            id_policy: IdPolicy::AllowDuplicates,
            preset: Preset::Import,
            batch_size: None,
            seed: None,
        }
    }
}

/// Import API endpoints; secrets are normally supplied through the environment.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub auth_url: Option<String>,
    pub api_url: Option<String>,
    pub project_key: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub scopes: Vec<String>,
}

impl std::fmt::Debug for ImportSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportSettings")
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("project_key", &self.project_key)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Load settings from `path`, or from [`DEFAULT_SETTINGS_FILE`] when present.
///
/// An explicitly requested file must exist; the implicit one is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    if !required && !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Io {
        path: path.clone(),
        source,
    })?;
    parse_settings(&content).map_err(|source| SettingsError::Toml { path, source })
}

pub fn parse_settings(content: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse_settings("").expect("parse");
        assert_eq!(settings.generator.category_key, "default");
        assert_eq!(
            settings.generator.locales,
            LocaleSpec::One("nl-BE".to_string())
        );
        assert_eq!(settings.generator.preset, Preset::Import);
        assert!(settings.import.auth_url.is_none());
    }

    #[test]
    fn parses_generator_and_import_tables() {
        let settings = parse_settings(
            r#"
            [generator]
            category_key = "furniture"
            locales = ["nl-BE", "fr-BE"]
            id_policy = "unique"
            preset = "default"
            batch_size = 10

            [import]
            auth_url = "https://auth.example.com"
            api_url = "https://import.example.com"
            project_key = "demo"
            scopes = ["manage_products:demo"]
            "#,
        )
        .expect("parse");

        assert_eq!(settings.generator.category_key, "furniture");
        assert_eq!(
            settings.generator.locales,
            LocaleSpec::Many(vec!["nl-BE".to_string(), "fr-BE".to_string()])
        );
        assert_eq!(settings.generator.id_policy, IdPolicy::Unique);
        assert_eq!(settings.generator.preset, Preset::Default);
        assert_eq!(settings.generator.batch_size, Some(10));
        assert_eq!(settings.import.project_key.as_deref(), Some("demo"));
        assert_eq!(settings.import.scopes, ["manage_products:demo"]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("catalogen_{}.toml", uuid::Uuid::new_v4()));
        let result = load_settings(Some(&path));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn debug_hides_client_secret() {
        let settings = ImportSettings {
            client_secret: Some("hunter2".to_string()),
            ..ImportSettings::default()
        };
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
