//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{
    Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File, FileFormat,
};
use std::path::Path;
use tracing::debug;

use super::defaults::*;
use super::ExtractorConfig;

/// Prefix of environment variables that override file settings
pub(crate) const ENV_PREFIX: &str = "HTMLSTRUCT";

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl ExtractorConfig {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// A missing file is not an error: defaults and environment still apply.
    /// A path that exists but cannot be read is reported as [`Error::Io`].
    /// Environment variables are prefixed with `HTMLSTRUCT_`, for example:
    /// - `HTMLSTRUCT_ANNOTATION_KEY=css`
    /// - `HTMLSTRUCT_STRICT_HTML=true`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();
        let builder = set_config_default(builder, "annotation_key", DEFAULT_ANNOTATION_KEY)?;
        let builder = set_config_default(builder, "id_policy", "name_contains_id")?;
        let mut builder = set_config_default(builder, "strict_html", default_strict_html())?;

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            debug!(path = %path.display(), bytes = content.len(), "loading config file");
            builder = builder.add_source(File::from_str(&content, FileFormat::Toml));
        } else {
            debug!(path = %path.display(), "config file not found, using defaults");
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        debug!(
            annotation_key = %config.annotation_key,
            id_policy = ?config.id_policy,
            strict_html = config.strict_html,
            "loaded extractor config"
        );
        Ok(config)
    }

    /// Creates a config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))?;
        config.validate()?;
        debug!(annotation_key = %config.annotation_key, "parsed extractor config");
        Ok(config)
    }
}
