//! Configuration for extraction
//!
//! Configuration can be built in code, parsed from a TOML string, or loaded
//! from a TOML file with environment variable overrides.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use crate::normalize::IdPolicy;
use serde::{Deserialize, Serialize};

pub use defaults::DEFAULT_ANNOTATION_KEY;

use defaults::*;

/// Settings shared by every build call of an extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Annotation key whose values are used as selectors (default: "xpath")
    #[serde(default = "default_annotation_key")]
    pub annotation_key: String,

    /// Which fields get path-basename reduction
    #[serde(default)]
    pub id_policy: IdPolicy,

    /// Reject HTML that the parser had to repair (default: false)
    #[serde(default = "default_strict_html")]
    pub strict_html: bool,

    /// Reject HTML input larger than this many bytes
    #[serde(default)]
    pub max_document_bytes: Option<usize>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            annotation_key: default_annotation_key(),
            id_policy: IdPolicy::default(),
            strict_html: default_strict_html(),
            max_document_bytes: None,
        }
    }
}

impl ExtractorConfig {
    /// Default configuration reading selectors from `key`
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            annotation_key: key.into(),
            ..Self::default()
        }
    }

    /// Create configuration from builder
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.annotation_key.is_empty() {
            return Err(Error::config("annotation_key must not be empty"));
        }
        if let Some(bad) = self
            .annotation_key
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        {
            return Err(Error::config(format!(
                "Invalid annotation_key '{}': unexpected character {bad:?}",
                self.annotation_key
            )));
        }
        if self.max_document_bytes == Some(0) {
            return Err(Error::config(
                "max_document_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for ExtractorConfig
#[derive(Debug, Default)]
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Set the annotation key
    pub fn annotation_key(mut self, key: impl Into<String>) -> Self {
        self.config.annotation_key = key.into();
        self
    }

    /// Set the ID normalization policy
    pub fn id_policy(mut self, policy: IdPolicy) -> Self {
        self.config.id_policy = policy;
        self
    }

    /// Reject repaired HTML
    pub fn strict_html(mut self, strict: bool) -> Self {
        self.config.strict_html = strict;
        self
    }

    /// Set the maximum accepted document size
    pub fn max_document_bytes(mut self, limit: usize) -> Self {
        self.config.max_document_bytes = Some(limit);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ExtractorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
