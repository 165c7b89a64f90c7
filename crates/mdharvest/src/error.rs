//! Error types for mdharvest

use thiserror::Error;

/// Errors produced by the harvest pipeline
///
/// `Config` and `UrlList` are fatal startup conditions. `Extraction` is
/// scoped to a single URL and is absorbed by the runner loop.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Missing or invalid configuration (API key, HTTP client build)
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL list file missing, unparsable, or empty
    #[error("URL list error: {0}")]
    UrlList(String),

    /// A single URL failed somewhere in fetch/convert/clean/persist
    #[error("Extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    /// Filesystem failure outside the per-URL pipeline (output dirs, report)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report could not be serialized
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

impl HarvestError {
    /// Create an extraction error for the given URL
    pub fn extraction(url: impl Into<String>, message: impl Into<String>) -> Self {
        HarvestError::Extraction {
            url: url.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            HarvestError::Config("MDHARVEST_API_KEY not set".to_string()).to_string(),
            "Configuration error: MDHARVEST_API_KEY not set"
        );
        assert_eq!(
            HarvestError::UrlList("URL list is empty".to_string()).to_string(),
            "URL list error: URL list is empty"
        );
        assert_eq!(
            HarvestError::extraction("https://a.test/x", "connection refused").to_string(),
            "Extraction failed for https://a.test/x: connection refused"
        );
    }
}
