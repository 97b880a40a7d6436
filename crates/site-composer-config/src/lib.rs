use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

const DEFAULT_STORAGE_PATH: &str = "~/.local/share/site-composer";
const DEFAULT_LANG: &str = "en";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the saved document
    pub storage_path: PathBuf,
    /// Directory the exported HTML file is written to
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,
    /// `lang` attribute of the exported page
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_export_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl Default for Config {
    fn default() -> Self {
        let storage_path = PathBuf::from(DEFAULT_STORAGE_PATH);
        Self {
            storage_path: Self::expand_path(&storage_path).unwrap_or(storage_path),
            export_path: default_export_path(),
            lang: default_lang(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded paths
        config.storage_path =
            Self::expand_path(&config.storage_path).unwrap_or(config.storage_path);
        config.export_path = Self::expand_path(&config.export_path).unwrap_or(config.export_path);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// The config file if there is one, otherwise the defaults
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/site-composer");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/site-composer/config.toml"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(!config.storage_path.to_string_lossy().starts_with('~'));
        assert!(
            config
                .storage_path
                .to_string_lossy()
                .ends_with(".local/share/site-composer")
        );
        assert_eq!(config.export_path, PathBuf::from("."));
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            storage_path: PathBuf::from("/tmp/site-store"),
            export_path: PathBuf::from("/tmp/site-out"),
            lang: "zh".to_string(),
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_optional_fields_default() {
        let config: Config = toml::from_str(r#"storage_path = "/tmp/store""#).unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/tmp/store"));
        assert_eq!(config.export_path, PathBuf::from("."));
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("SITE_COMPOSER_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$SITE_COMPOSER_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("SITE_COMPOSER_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("relative/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "storage_path = 42").unwrap();

        let result = Config::load_from_path(&config_file);

        let Err(err) = result else {
            panic!("expected a parse error");
        };
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            storage_path: PathBuf::from("/tmp/site-store"),
            export_path: PathBuf::from("/tmp/site-out"),
            lang: "fr".to_string(),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        unsafe {
            env::set_var("SITE_COMPOSER_ROOT", "/custom/site");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "storage_path = \"$SITE_COMPOSER_ROOT/store\"\nexport_path = \"$SITE_COMPOSER_ROOT/out\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.storage_path, PathBuf::from("/custom/site/store"));
        assert_eq!(config.export_path, PathBuf::from("/custom/site/out"));

        unsafe {
            env::remove_var("SITE_COMPOSER_ROOT");
        }
    }
}
