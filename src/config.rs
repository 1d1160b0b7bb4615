use serde::{Deserialize, Serialize};

/// Default base URL for the Nilvera test environment.
pub const TEST_BASE_URL: &str = "https://apitest.nilvera.com";

/// Default base URL for the Nilvera production environment.
pub const PRODUCTION_BASE_URL: &str = "https://api.nilvera.com";

/// Nilvera deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Sandbox environment (`apitest.nilvera.com`).
    Test,
    /// Live environment (`api.nilvera.com`).
    Production,
}

impl Environment {
    /// The fixed default base URL for this environment.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Test => TEST_BASE_URL,
            Self::Production => PRODUCTION_BASE_URL,
        }
    }
}

/// Resolve the effective base URL: an explicit override wins over the
/// environment default, with trailing slashes stripped.
pub fn resolve_base_url(environment: Environment, override_url: Option<&str>) -> String {
    match override_url {
        Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
        _ => environment.default_base_url().to_string(),
    }
}

/// Immutable client configuration: API key, environment, resolved base URL.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Nilvera API key, sent as a bearer token on every request.
    pub api_key: String,
    /// Active environment.
    pub environment: Environment,
    /// Effective base URL, already resolved and without trailing slash.
    pub base_url: String,
}

impl ClientConfig {
    /// Configuration with the environment's default base URL.
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_key: api_key.into(),
            environment,
            base_url: resolve_base_url(environment, None),
        }
    }

    /// Override the base URL for the active environment.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = resolve_base_url(self.environment, Some(&url.into()));
        self
    }
}
