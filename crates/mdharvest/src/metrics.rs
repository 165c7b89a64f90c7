//! Size-reduction figures for the run report
//!
//! These are reporting helpers only; nothing in the pipeline gates behavior
//! on them.

/// Percent size reduction from raw to clean, one decimal place
///
/// A zero-length raw document has no meaningful ratio, so it is reported
/// as `"n/a"` instead of a non-finite number.
pub fn compression_label(raw_size: usize, clean_size: usize) -> String {
    if raw_size == 0 {
        return "n/a".to_string();
    }
    let percent = (1.0 - clean_size as f64 / raw_size as f64) * 100.0;
    format!("{:.1}%", percent)
}

/// Numeric compression percent, when defined
pub fn compression_percent(raw_size: usize, clean_size: usize) -> Option<f64> {
    if raw_size == 0 {
        return None;
    }
    Some((1.0 - clean_size as f64 / raw_size as f64) * 100.0)
}
