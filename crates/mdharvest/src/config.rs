//! Run configuration
//!
//! All settings are read once at process entry and passed by value into the
//! pipeline. The extractor and cleaner never look at the environment.

use crate::error::HarvestError;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the cleaning API credential
pub const API_KEY_VAR: &str = "MDHARVEST_API_KEY";

/// Default chat-completion endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for the cleaning call
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default pause between URLs
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Configuration for a harvest run
#[derive(Debug, Clone)]
pub struct Config {
    /// API credential for the remote cleaning call
    pub api_key: String,
    /// Base URL of the chat-completion API
    pub api_base_url: String,
    /// Model identifier for the cleaning call
    pub model: String,
    /// Path to the JSON array of URLs
    pub urls_file: PathBuf,
    /// Root of the output tree (raw/, clean/, reports/ live beneath it)
    pub output_dir: PathBuf,
    /// Unconditional pause after each URL
    pub request_delay: Duration,
}

impl Config {
    /// Create a configuration with the given API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            urls_file: PathBuf::from("urls.json"),
            output_dir: PathBuf::from("output"),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Read the credential from [`API_KEY_VAR`]
    ///
    /// Fails before any other input is touched, so a missing key aborts the
    /// run without reading the URL list.
    pub fn from_env() -> Result<Self, HarvestError> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| HarvestError::Config(format!("{} not set", API_KEY_VAR)))?;
        Ok(Self::new(api_key))
    }

    /// Set the URL list file
    pub fn with_urls_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.urls_file = path.into();
        self
    }

    /// Set the output root directory
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Set the API base URL (tests point this at a mock server)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the cleaning model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the inter-URL delay (tests use `Duration::ZERO`)
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Directory for raw converted markdown
    pub fn raw_dir(&self) -> PathBuf {
        self.output_dir.join("raw")
    }

    /// Directory for cleaned markdown
    pub fn clean_dir(&self) -> PathBuf {
        self.output_dir.join("clean")
    }

    /// Directory for run reports
    pub fn reports_dir(&self) -> PathBuf {
        self.output_dir.join("reports")
    }
}
