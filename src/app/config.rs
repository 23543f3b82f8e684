use crate::period::DEFAULT_PERIOD_COUNT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Complete configuration (read from config/settings.toml)
///
/// The file is optional and read-only: the picker never writes selections back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Extra manifest entries (`"YYYY-MM" = "/file.pdf"`), merged over the built-in ones
    #[serde(default)]
    pub manifest: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    crate::util::i18n::DEFAULT_LOCALE.to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// How many months back the period list reaches (current month included)
    #[serde(default = "default_period_count")]
    pub period_count: usize,
}

fn default_period_count() -> usize {
    DEFAULT_PERIOD_COUNT
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            period_count: default_period_count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory that root-relative manifest hrefs are resolved against
    #[serde(default = "crate::util::paths::resolve_default_published_directory")]
    pub published_dir: PathBuf,
    /// Directory the chosen document is saved into
    #[serde(default = "crate::util::paths::resolve_default_download_directory")]
    pub download_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            published_dir: crate::util::paths::resolve_default_published_directory(),
            download_dir: crate::util::paths::resolve_default_download_directory(),
        }
    }
}

impl Config {
    /// Load configuration from the config directory, falling back to defaults
    /// when no settings.toml exists
    pub fn load() -> anyhow::Result<Self> {
        let config_path = crate::util::paths::get_app_config_path()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!("Application config not found, using defaults");
            Self::default()
        };

        config.storage.published_dir =
            crate::util::paths::resolve_relative_to_config(&config.storage.published_dir);
        config.storage.download_dir =
            crate::util::paths::resolve_relative_to_config(&config.storage.download_dir);

        Ok(config)
    }

    /// Parse and validate a settings file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read {:?}", path))?;
        let config: Config =
            toml::from_str(&content).context(format!("Failed to parse {:?}", path))?;

        if let Err(errors) = crate::app::settings::validate_config(&config) {
            return Err(anyhow::anyhow!(
                "Invalid configuration: {}",
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_config_toml() -> &'static str {
        r#"
[general]
language = "es"

[picker]
period_count = 12

[storage]
published_dir = "/srv/reportes"
download_dir = "/tmp/descargas"

[manifest]
"2025-09" = "/Reporte_complementario_vehiculos_sin_movimiento_2025-09.pdf"
"#
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.general.language, "es-MX");
        assert_eq!(config.picker.period_count, 24);
        assert!(config.manifest.is_empty());
    }

    #[test]
    fn test_config_load_valid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, create_test_config_toml()).unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.general.language, "es");
        assert_eq!(config.picker.period_count, 12);
        assert_eq!(config.storage.published_dir, PathBuf::from("/srv/reportes"));
        assert_eq!(config.storage.download_dir, PathBuf::from("/tmp/descargas"));
        assert_eq!(
            config.manifest.get("2025-09").map(String::as_str),
            Some("/Reporte_complementario_vehiculos_sin_movimiento_2025-09.pdf")
        );
    }

    #[test]
    fn test_config_partial_file_uses_section_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "[picker]\nperiod_count = 6\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.picker.period_count, 6);
        assert_eq!(config.general.language, "es-MX");
    }

    #[test]
    fn test_config_load_invalid_toml_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "[picker\nperiod_count = ").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_config_load_rejects_bad_manifest_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "[manifest]\n\"2025-9\" = \"/x.pdf\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("2025-9"));
    }

    #[test]
    #[serial]
    fn test_config_load_missing_file_uses_default() {
        let temp_dir = TempDir::new().unwrap();
        crate::util::paths::set_config_dir_override(Some(temp_dir.path().to_path_buf()));

        let config = Config::load().unwrap();

        assert_eq!(config.picker.period_count, 24);
        assert!(config.storage.published_dir.is_absolute());

        crate::util::paths::set_config_dir_override(None);
    }

    #[test]
    #[serial]
    fn test_config_load_resolves_relative_dirs_against_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.toml"),
            "[storage]\npublished_dir = \"public\"\ndownload_dir = \"out\"\n",
        )
        .unwrap();
        crate::util::paths::set_config_dir_override(Some(temp_dir.path().to_path_buf()));

        let config = Config::load().unwrap();

        assert_eq!(config.storage.published_dir, temp_dir.path().join("public"));
        assert_eq!(config.storage.download_dir, temp_dir.path().join("out"));

        crate::util::paths::set_config_dir_override(None);
    }
}
