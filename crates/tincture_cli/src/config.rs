//! Tincture configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tincture_theme::{GeneratorOptions, ThemeSyncSettings};

pub const CONFIG_FILE_NAME: &str = "tincture.toml";

/// Top-level configuration (tincture.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TinctureConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub sync: ThemeSyncSettings,
    #[serde(default)]
    pub generator: GeneratorOptions,
}

/// The theme a scope starts with
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ThemeConfig {
    #[serde(default = "default_base_color_scheme")]
    pub base_color_scheme: String,
    #[serde(default = "default_color_scheme")]
    pub color_scheme: String,
    #[serde(default)]
    pub high_contrast: bool,
}

fn default_base_color_scheme() -> String {
    "Light".to_string()
}

fn default_color_scheme() -> String {
    "Blue".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            base_color_scheme: default_base_color_scheme(),
            color_scheme: default_color_scheme(),
            high_contrast: false,
        }
    }
}

impl TinctureConfig {
    /// Load configuration from a file or a directory holding tincture.toml
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE_NAME)
        } else {
            path.to_path_buf()
        };

        if !config_path.exists() {
            anyhow::bail!("No {} found at {}", CONFIG_FILE_NAME, config_path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load an explicit config file, or tincture.toml in the working
    /// directory if there is one, or the defaults
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            tracing::debug!("using {}", local.display());
            return Self::load_from(&local);
        }
        Ok(Self::default())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tincture_core::Color;
    use tincture_theme::ThemeSyncMode;

    #[test]
    fn empty_file_gives_defaults() {
        let config = TinctureConfig::from_toml("").unwrap();
        assert_eq!(config, TinctureConfig::default());
        assert_eq!(config.theme.color_scheme, "Blue");
        assert_eq!(config.sync.mode, ThemeSyncMode::DO_NOT_SYNC);
        assert!(!config.generator.use_hsl);
    }

    #[test]
    fn parses_all_sections() {
        let config = TinctureConfig::from_toml(
            r##"
[theme]
base_color_scheme = "Dark"
color_scheme = "Mauve"

[sync]
mode = "SyncWithAppMode | SyncWithAccent"
fallback_accent_color = "#FFFE640B"

[generator]
use_hsl = true
"##,
        )
        .unwrap();

        assert_eq!(config.theme.base_color_scheme, "Dark");
        assert!(!config.theme.high_contrast);
        assert_eq!(
            config.sync.mode,
            ThemeSyncMode::SYNC_WITH_APP_MODE | ThemeSyncMode::SYNC_WITH_ACCENT
        );
        assert_eq!(config.sync.default_base_color_scheme, "Light");
        assert_eq!(config.sync.fallback_accent_color, Some(Color::from_hex(0xFE640B)));
        assert!(config.generator.use_hsl);
    }

    #[test]
    fn bad_sync_mode_is_an_error() {
        assert!(TinctureConfig::from_toml("[sync]\nmode = \"SyncSometimes\"").is_err());
    }

    #[test]
    fn serialized_config_reads_back() {
        let mut config = TinctureConfig::default();
        config.sync.mode = ThemeSyncMode::SYNC_ALL;
        let text = config.to_toml().unwrap();
        assert_eq!(TinctureConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = TinctureConfig::discover(Some(Path::new("/nonexistent/tincture.toml"))).unwrap_err();
        assert!(err.to_string().contains("No tincture.toml"));
    }
}
