//! MdHarvest - sequential web-to-markdown documentation harvester
//!
//! Fetches a list of URLs one at a time, converts each HTML page to
//! markdown, sends the markdown to a chat-completion API for cleanup, and
//! writes raw and cleaned outputs plus a JSON run report to disk.
//!
//! ## Components
//!
//! - [`Pipeline`] - owns the URL list, the run loop, and the report
//! - [`Extractor`] - fetch, convert, clean, and persist for one URL
//! - [`MarkdownCleaner`] - the remote cleaning call
//!
//! Everything runs on a single logical thread of control; there is no
//! parallel fetching, no caching, and no retry logic.

pub mod cleaner;
pub mod config;
mod convert;
mod error;
mod extractor;
mod fetch;
pub mod metrics;
mod pipeline;
pub mod report;

pub use cleaner::MarkdownCleaner;
pub use config::{Config, API_KEY_VAR, DEFAULT_API_BASE_URL, DEFAULT_MODEL};
pub use convert::{html_to_markdown, looks_like_html};
pub use error::HarvestError;
pub use extractor::{file_name_for, ExtractionResult, Extractor};
pub use fetch::{PageFetcher, DEFAULT_USER_AGENT};
pub use pipeline::{load_url_list, Pipeline};
pub use report::{OutputDirectories, OutputPaths, ReportEntry, RunReport};
