// ABOUTME: Configuration file loading, validation, and hierarchical merging for the resize CLI
// ABOUTME: Supports TOML config files in the user config dir, XDG config home, and project dir

use anyhow::{anyhow, Context, Result};
use resize_image_url::{constants::proxy, PhotonProxy, ScaleFactor};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

pub const CONFIG_DIR_NAME: &str = "resize-image";
pub const PROJECT_CONFIG_FILE: &str = "resize-image.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Display pixel ratio; anything above 1 requests 2x images
    #[serde(default)]
    pub pixel_ratio: Option<f64>,
    /// Route unknown hosts through Photon (default true)
    #[serde(default)]
    pub make_safe: Option<bool>,
    #[serde(default, deserialize_with = "validate_format")]
    pub preferred_format: Option<String>,
    #[serde(default)]
    pub proxy: Option<ConfigProxy>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigProxy {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub subdomains: Option<u8>,
}

impl Config {
    /// Load configuration from the standard locations
    pub fn load() -> Result<Self> {
        Self::load_from_paths(&Self::get_config_paths())
    }

    /// Load and merge configuration files; later paths override earlier ones.
    /// Missing files are skipped.
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            log::debug!("Loading config from {}", path.display());
            config = config.merge(Self::load_from_file(path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join(CONFIG_DIR_NAME)
                    .join("config.toml"),
            );
        }

        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            paths.push(
                PathBuf::from(config_home)
                    .join(CONFIG_DIR_NAME)
                    .join("config.toml"),
            );
        }

        // Project-specific config wins
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join(PROJECT_CONFIG_FILE));
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            pixel_ratio: other.pixel_ratio.or(self.pixel_ratio),
            make_safe: other.make_safe.or(self.make_safe),
            preferred_format: other.preferred_format.or(self.preferred_format),
            proxy: match (self.proxy, other.proxy) {
                (Some(base), Some(other)) => Some(base.merge(other)),
                (base, other) => other.or(base),
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ratio) = self.pixel_ratio {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(anyhow!(
                    "Invalid pixel_ratio {}. Must be a positive number",
                    ratio
                ));
            }
        }

        if let Some(ref proxy) = self.proxy {
            proxy.validate().context("Invalid proxy configuration")?;
        }

        Ok(())
    }

    pub fn scale_factor(&self) -> Option<ScaleFactor> {
        self.pixel_ratio.map(ScaleFactor::from_pixel_ratio)
    }

    pub fn make_safe(&self) -> bool {
        self.make_safe.unwrap_or(true)
    }

    pub fn output_format(&self) -> OutputFormat {
        self.preferred_format
            .as_deref()
            .and_then(|format| format.parse().ok())
            .unwrap_or_default()
    }

    pub fn photon_proxy(&self) -> PhotonProxy {
        let settings = self.proxy.clone().unwrap_or_default();
        PhotonProxy::new(
            settings
                .domain
                .unwrap_or_else(|| proxy::PHOTON_DOMAIN.to_string()),
            settings.subdomains.unwrap_or(proxy::PHOTON_SUBDOMAINS),
        )
    }
}

impl ConfigProxy {
    pub fn merge(self, other: ConfigProxy) -> ConfigProxy {
        ConfigProxy {
            domain: other.domain.or(self.domain),
            subdomains: other.subdomains.or(self.subdomains),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ref domain) = self.domain {
            let domain = domain.trim();
            if domain.is_empty() || domain.contains('/') || domain.contains(':') {
                return Err(anyhow!(
                    "Invalid proxy domain '{}'. Expected a bare domain like 'wp.com'",
                    domain
                ));
            }
        }

        if let Some(subdomains) = self.subdomains {
            if !(1..=9).contains(&subdomains) {
                return Err(anyhow!(
                    "Invalid proxy subdomains {}. Must be between 1 and 9",
                    subdomains
                ));
            }
        }

        Ok(())
    }
}

fn validate_format<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    match value {
        Some(format) if format.parse::<OutputFormat>().is_err() => Err(D::Error::custom(format!(
            "Invalid format '{}'. Must be one of: text, json",
            format
        ))),
        value => Ok(value),
    }
}
