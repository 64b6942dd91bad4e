//! Embedding configuration and explicit resolution
//!
//! Defaults are resolved once, up front, into a validated
//! [`ResolvedEmbeddingConfig`] before any network call. Call sites never
//! merge optional fields inline.

use serde::{Deserialize, Serialize};

use crate::domain::error::RetrievalError;

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default embedding dimensionality
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// Default provider endpoint
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.openai.com";

/// Base embedding configuration, typically loaded from deployment config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name
    #[serde(default = "default_model")]
    pub model: String,
    /// Target vector dimensionality
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Provider credential; no silent default exists for this field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Provider endpoint override
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_dimensions() -> usize {
    DEFAULT_EMBEDDING_DIMENSIONS
}

fn default_base_url() -> String {
    DEFAULT_EMBEDDING_BASE_URL.to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            dimensions: default_dimensions(),
            api_key: None,
            base_url: default_base_url(),
        }
    }
}

impl EmbeddingConfig {
    /// Create a configuration with default model, dimensions and endpoint
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the target dimensionality
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set the endpoint override
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Apply overrides and validate into a resolved configuration
    pub fn resolve(
        &self,
        overrides: &EmbeddingConfigOverrides,
    ) -> Result<ResolvedEmbeddingConfig, RetrievalError> {
        let model = overrides.model.clone().unwrap_or_else(|| self.model.clone());
        let dimensions = overrides.dimensions.unwrap_or(self.dimensions);
        let base_url = overrides
            .base_url
            .clone()
            .unwrap_or_else(|| self.base_url.clone());
        let api_key = overrides
            .api_key
            .clone()
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                RetrievalError::configuration("no embedding provider credential configured")
            })?;

        if api_key.trim().is_empty() {
            return Err(RetrievalError::configuration(
                "embedding provider credential is empty",
            ));
        }

        if model.trim().is_empty() {
            return Err(RetrievalError::configuration("embedding model is empty"));
        }

        if dimensions == 0 {
            return Err(RetrievalError::configuration(
                "embedding dimensions must be greater than 0",
            ));
        }

        Ok(ResolvedEmbeddingConfig {
            model,
            dimensions,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Per-call or per-tenant overrides applied during resolution
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl EmbeddingConfigOverrides {
    /// No overrides
    pub fn none() -> Self {
        Self::default()
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Override the dimensionality
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Override the credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Fully-resolved, validated embedding configuration
#[derive(Debug, Clone)]
pub struct ResolvedEmbeddingConfig {
    pub model: String,
    pub dimensions: usize,
    pub api_key: String,
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_defaults() {
        let config = EmbeddingConfig::new("sk-test");
        let resolved = config.resolve(&EmbeddingConfigOverrides::none()).unwrap();

        assert_eq!(resolved.model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(resolved.dimensions, DEFAULT_EMBEDDING_DIMENSIONS);
        assert_eq!(resolved.api_key, "sk-test");
        assert_eq!(resolved.base_url, DEFAULT_EMBEDDING_BASE_URL);
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let config = EmbeddingConfig::new("sk-base").with_dimensions(1536);
        let overrides = EmbeddingConfigOverrides::none()
            .with_model("text-embedding-3-large")
            .with_dimensions(3072)
            .with_base_url("http://localhost:8080/");

        let resolved = config.resolve(&overrides).unwrap();

        assert_eq!(resolved.model, "text-embedding-3-large");
        assert_eq!(resolved.dimensions, 3072);
        assert_eq!(resolved.api_key, "sk-base");
        assert_eq!(resolved.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_missing_credential_is_configuration_error() {
        let config = EmbeddingConfig::default();
        let result = config.resolve(&EmbeddingConfigOverrides::none());

        assert!(matches!(
            result,
            Err(RetrievalError::Configuration { .. })
        ));
    }

    #[test]
    fn test_blank_credential_rejected() {
        let config = EmbeddingConfig::new("   ");
        let result = config.resolve(&EmbeddingConfigOverrides::none());

        assert!(matches!(
            result,
            Err(RetrievalError::Configuration { .. })
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = EmbeddingConfig::new("sk-test").with_dimensions(0);
        let result = config.resolve(&EmbeddingConfigOverrides::none());

        assert!(matches!(
            result,
            Err(RetrievalError::Configuration { .. })
        ));
    }
}
