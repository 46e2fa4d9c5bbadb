//! Utility functions for logging, slugs, and file system checks.
//!
//! Helpers used across the crate:
//! - Response-body truncation for log lines
//! - JSON error classification for truncated bodies
//! - Query slugification for output filenames
//! - Output-directory validation

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long bodies (error pages, oversized responses) are cut to at most
/// `max` bytes, backed off to a character boundary, with the omitted
/// byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Detect if a serde_json error indicates a truncated body.
///
/// A response cut off mid-transfer fails to parse with an EOF error;
/// distinguishing that from genuinely malformed JSON makes the surfaced
/// failure reason more useful.
pub fn looks_truncated(e: &serde_json::Error) -> bool {
    use serde_json::error::Category;
    matches!(e.classify(), Category::Eof)
}

/// Convert query text to a filename-friendly slug.
///
/// Lowercases, strips special characters, replaces spaces with hyphens,
/// and caps the length so long vector prompts produce sane filenames.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_query("Hello World"), "hello-world");
/// assert_eq!(slugify_query("AI risks, 2025!"), "ai-risks-2025");
/// ```
pub fn slugify_query(query: &str) -> String {
    const MAX_SLUG_LEN: usize = 60;
    let slug: String = query
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    slug.chars().take(MAX_SLUG_LEN).collect()
}

/// Capitalize the first character of a string.
///
/// Used for section headers in text output (e.g. "articles" -> "Articles").
pub fn upcase(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then probes it with a create/delete
/// round trip so a read-only filesystem fails fast at startup instead of
/// after the search has already run.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
