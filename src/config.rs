//! Configuration for documentation generation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (apiref.toml)
//! - Environment variables (APIREF__*)
//!
//! ## Example config file (apiref.toml):
//! ```toml
//! [site]
//! url_prefix = "api/"
//! key_prefix = "api-"
//!
//! [generation]
//! max_depth = 32
//! duplicate_pages = "skip"
//! trait_merge = "keep_existing"
//! ```

use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{DocError, Result};

/// Main configuration for a generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocConfig {
    /// Link and key settings
    #[serde(default)]
    pub site: SiteConfig,

    /// Traversal and merge policies
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Site-level naming used in page keys and links
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Directory prefix of generated pages (used in every link)
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,

    /// Prefix of every page key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

/// Generation policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Maximum recursion depth for flattening and page expansion
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// What to do when a free-type page name is discovered twice
    #[serde(default)]
    pub duplicate_pages: DuplicatePagePolicy,

    /// How trait query parameters merge with the method's own
    #[serde(default)]
    pub trait_merge: TraitMergePolicy,
}

/// Handling of repeated free-type page names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePagePolicy {
    /// Keep the first page, drop the repeat and its subtree
    #[default]
    Skip,
    /// Fail the method that produced the repeat
    Error,
}

/// Merge direction for trait-declared query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TraitMergePolicy {
    /// Parameters already declared on the method win
    #[default]
    KeepExisting,
    /// Trait parameters replace same-named method parameters
    TraitOverrides,
}

fn default_url_prefix() -> String {
    "api/".to_string()
}

fn default_key_prefix() -> String {
    "api-".to_string()
}

fn default_max_depth() -> usize {
    32
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url_prefix: default_url_prefix(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            duplicate_pages: DuplicatePagePolicy::default(),
            trait_merge: TraitMergePolicy::default(),
        }
    }
}

impl DocConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = ["apiref.toml", ".apiref.toml", "config/apiref.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "apiref", "apiref") {
            let xdg_config = config_dir.config_dir().join("apiref.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("APIREF")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DocError::InvalidDescription(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DocConfig::default();
        assert_eq!(config.site.url_prefix, "api/");
        assert_eq!(config.generation.max_depth, 32);
        assert_eq!(config.generation.duplicate_pages, DuplicatePagePolicy::Skip);
        assert_eq!(config.generation.trait_merge, TraitMergePolicy::KeepExisting);
    }

    #[test]
    fn test_serialize_config() {
        let config = DocConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[site]"));
        assert!(toml_str.contains("[generation]"));
        assert!(toml_str.contains("keep_existing"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DocConfig::from_toml_str(
            r#"
            [generation]
            trait_merge = "trait_overrides"
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.trait_merge, TraitMergePolicy::TraitOverrides);
        assert_eq!(config.generation.max_depth, 32);
        assert_eq!(config.site.key_prefix, "api-");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apiref.toml");
        let path = path.to_str().unwrap();

        let mut config = DocConfig::default();
        config.site.url_prefix = "reference/".to_string();
        config.generation.duplicate_pages = DuplicatePagePolicy::Error;
        config.save(path).unwrap();

        let reloaded = DocConfig::load_from(Some(path)).unwrap();
        assert_eq!(reloaded.site.url_prefix, "reference/");
        assert_eq!(reloaded.generation.duplicate_pages, DuplicatePagePolicy::Error);
    }
}
