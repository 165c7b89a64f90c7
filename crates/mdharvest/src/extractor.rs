//! Per-URL extraction pipeline
//!
//! Four stages, strictly in order: fetch, convert, remote clean, persist.
//! A failure at any stage is terminal for that URL and none of the later
//! stages run, so a clean failure leaves no files on disk.

use crate::cleaner::MarkdownCleaner;
use crate::config::Config;
use crate::convert::{html_to_markdown, looks_like_html};
use crate::error::HarvestError;
use crate::fetch::PageFetcher;
use std::path::PathBuf;
use tracing::{debug, info};
use url::Url;

/// Outcome of a successful extraction
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The URL that was processed
    pub source_url: String,
    /// Derived file name (without the `.md` extension)
    pub file_name: String,
    /// Markdown straight out of the HTML converter
    pub raw_markdown: String,
    /// Markdown as returned by the cleaning call
    pub clean_markdown: String,
    /// Where the raw markdown was written
    pub raw_path: PathBuf,
    /// Where the cleaned markdown was written
    pub clean_path: PathBuf,
}

/// Runs the fetch/convert/clean/persist sequence for one URL at a time
pub struct Extractor {
    fetcher: PageFetcher,
    cleaner: MarkdownCleaner,
    raw_dir: PathBuf,
    clean_dir: PathBuf,
}

impl Extractor {
    /// Build an extractor from the run configuration
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        Ok(Self {
            fetcher: PageFetcher::new()?,
            cleaner: MarkdownCleaner::new(config),
            raw_dir: config.raw_dir(),
            clean_dir: config.clean_dir(),
        })
    }

    /// Process a single URL end to end
    pub async fn extract(&self, url: &str) -> Result<ExtractionResult, HarvestError> {
        let html = self.fetcher.fetch_page(url).await?;
        if !looks_like_html(&html) {
            debug!(url, "body does not look like an HTML document, converting anyway");
        }

        let raw_markdown = html_to_markdown(&html);
        let clean_markdown = self.cleaner.clean(&raw_markdown, url).await?;

        let file_name = file_name_for(url)?;
        let raw_path = self.raw_dir.join(format!("{}.md", file_name));
        let clean_path = self.clean_dir.join(format!("{}.md", file_name));

        // Overwrites any previous run's files at the same paths
        tokio::fs::write(&raw_path, &raw_markdown)
            .await
            .map_err(|e| {
                HarvestError::extraction(
                    url,
                    format!("failed to write {}: {}", raw_path.display(), e),
                )
            })?;
        tokio::fs::write(&clean_path, &clean_markdown)
            .await
            .map_err(|e| {
                HarvestError::extraction(
                    url,
                    format!("failed to write {}: {}", clean_path.display(), e),
                )
            })?;

        info!(
            url,
            file_name = %file_name,
            raw_size = raw_markdown.len(),
            clean_size = clean_markdown.len(),
            "extracted"
        );

        Ok(ExtractionResult {
            source_url: url.to_string(),
            file_name,
            raw_markdown,
            clean_markdown,
            raw_path,
            clean_path,
        })
    }
}

/// Derive the output file name for a URL
///
/// `hostname + sanitized(path)`: trailing slashes stripped, every character
/// outside `[A-Za-z0-9-_]` replaced with `_`. A bare hostname gets `_index`
/// appended. Distinct URLs can collide on the same name and will overwrite
/// each other's files; this is a known limitation of the scheme.
pub fn file_name_for(url: &str) -> Result<String, HarvestError> {
    let parsed =
        Url::parse(url).map_err(|e| HarvestError::extraction(url, format!("invalid URL: {}", e)))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| HarvestError::extraction(url, "URL has no host"))?;

    let sanitized: String = parsed
        .path()
        .trim_end_matches('/')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        Ok(format!("{}_index", host))
    } else {
        Ok(format!("{}{}", host, sanitized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_url_gets_index_suffix() {
        assert_eq!(
            file_name_for("https://example.com/").unwrap(),
            "example.com_index"
        );
        assert_eq!(
            file_name_for("https://example.com").unwrap(),
            "example.com_index"
        );
    }

    #[test]
    fn test_path_segments_joined_with_underscores() {
        assert_eq!(
            file_name_for("https://example.com/docs/page").unwrap(),
            "example.com_docs_page"
        );
    }

    #[test]
    fn test_trailing_slash_stripped() {
        assert_eq!(
            file_name_for("https://example.com/docs/").unwrap(),
            "example.com_docs"
        );
    }

    #[test]
    fn test_special_characters_replaced() {
        assert_eq!(
            file_name_for("https://example.com/a.b/c%20d").unwrap(),
            "example.com_a_b_c_20d"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = file_name_for("https://docs.rs/serde/latest").unwrap();
        let b = file_name_for("https://docs.rs/serde/latest").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(file_name_for("not a url").is_err());
        assert!(file_name_for("data:text/plain,hi").is_err());
    }
}
