//! Configuration for structure inference

use serde::{Deserialize, Serialize};

/// Configuration for structure inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InferenceConfig {
    /// Strings longer than this many characters are mapped as text
    pub keyword_max_len: usize,

    /// Strings with at least this many whitespace characters are mapped as text
    pub keyword_max_spaces: usize,

    /// Maximum number of top hits reported per field
    pub top_hits_limit: usize,

    /// Restrict timestamp detection to this field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_field: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            keyword_max_len: 256,
            keyword_max_spaces: 5,
            top_hits_limit: 10,
            timestamp_field: None,
        }
    }
}

impl InferenceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for custom configuration
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::default()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Set the length above which a string is always text
    pub fn keyword_max_len(mut self, len: usize) -> Self {
        self.config.keyword_max_len = len;
        self
    }

    /// Set the whitespace count at which a string becomes text
    pub fn keyword_max_spaces(mut self, spaces: usize) -> Self {
        self.config.keyword_max_spaces = spaces.max(1);
        self
    }

    /// Set the maximum number of top hits per field
    pub fn top_hits_limit(mut self, limit: usize) -> Self {
        self.config.top_hits_limit = limit.max(1);
        self
    }

    /// Only consider the named field as the timestamp field
    pub fn timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.config.timestamp_field = Some(field.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}
