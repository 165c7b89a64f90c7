//! Sequential pipeline runner
//!
//! One pass over the URL list, strictly in order, one URL at a time. Each
//! failure is isolated to its URL; only a bad URL list or missing output
//! directories abort the run.

use crate::config::Config;
use crate::error::HarvestError;
use crate::extractor::Extractor;
use crate::report::{OutputDirectories, RunReport};
use std::path::Path;
use tracing::{info, warn};

/// Owns the run loop and the report
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Create a pipeline for the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the full pipeline and return the final report
    ///
    /// The report has already been written to disk when this returns. The
    /// inter-URL delay runs unconditionally, after failures and after the
    /// final URL alike.
    pub async fn run(&self) -> Result<RunReport, HarvestError> {
        let raw_dir = self.config.raw_dir();
        let clean_dir = self.config.clean_dir();
        let reports_dir = self.config.reports_dir();

        tokio::fs::create_dir_all(&raw_dir).await?;
        tokio::fs::create_dir_all(&clean_dir).await?;
        tokio::fs::create_dir_all(&reports_dir).await?;

        let urls = load_url_list(&self.config.urls_file)?;
        info!(count = urls.len(), "loaded URL list");

        let extractor = Extractor::new(&self.config)?;
        let mut report = RunReport::new(
            urls.len(),
            OutputDirectories {
                raw: raw_dir,
                clean: clean_dir,
                reports: reports_dir.clone(),
            },
        );

        for url in &urls {
            info!(url = %url, "processing");
            match extractor.extract(url).await {
                Ok(result) => report.record_success(&result),
                Err(HarvestError::Extraction { message, .. }) => {
                    warn!(url = %url, error = %message, "extraction failed");
                    report.record_error(url.as_str(), message);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "extraction failed");
                    report.record_error(url.as_str(), e.to_string());
                }
            }
            tokio::time::sleep(self.config.request_delay).await;
        }

        let (snapshot, latest) = report.save(&reports_dir).await?;
        info!(
            snapshot = %snapshot.display(),
            latest = %latest.display(),
            successes = report.successes,
            errors = report.errors,
            "run finished"
        );

        Ok(report)
    }
}

/// Load and validate the URL list
///
/// The file must hold a non-empty JSON array of strings; anything else is
/// fatal before any URL is processed.
pub fn load_url_list(path: &Path) -> Result<Vec<String>, HarvestError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| HarvestError::UrlList(format!("cannot read {}: {}", path.display(), e)))?;

    let urls: Vec<String> = serde_json::from_str(&data).map_err(|e| {
        HarvestError::UrlList(format!(
            "{} is not a JSON array of strings: {}",
            path.display(),
            e
        ))
    })?;

    if urls.is_empty() {
        return Err(HarvestError::UrlList("URL list is empty".to_string()));
    }

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_list() {
        let file = write_temp(r#"["https://a.test/x", "https://a.test/y"]"#);
        let urls = load_url_list(file.path()).unwrap();
        assert_eq!(urls, vec!["https://a.test/x", "https://a.test/y"]);
    }

    #[test]
    fn test_empty_list_is_fatal() {
        let file = write_temp("[]");
        let err = load_url_list(file.path()).unwrap_err();
        assert!(matches!(err, HarvestError::UrlList(_)));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_non_array_is_fatal() {
        let file = write_temp(r#"{"urls": []}"#);
        assert!(matches!(
            load_url_list(file.path()),
            Err(HarvestError::UrlList(_))
        ));
    }

    #[test]
    fn test_unparsable_file_is_fatal() {
        let file = write_temp("not json at all");
        assert!(matches!(
            load_url_list(file.path()),
            Err(HarvestError::UrlList(_))
        ));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = load_url_list(Path::new("/nonexistent/urls.json")).unwrap_err();
        assert!(matches!(err, HarvestError::UrlList(_)));
        assert!(err.to_string().contains("cannot read"));
    }
}
