//! Data models for search requests and their typed results.
//!
//! This module defines the structures shared by every search surface:
//! - [`SearchRequest`]: what the caller wants to find and how many hits
//! - [`SearchFilters`]: optional narrowing fields (article id, source)
//! - [`SearchResult`]: the ordered hits returned by one request
//! - [`ResultItem`]: a single hit with tolerant field extraction
//!
//! The provider is free to omit almost any field, so extraction never
//! fails: missing `title`/`url` fall back to the documented default
//! strings, and missing dates or summaries stay absent until rendering.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::Value;

use crate::error::QueryError;

/// Placeholder used when the provider omits an item's title.
pub const NO_TITLE: &str = "No title available";
/// Placeholder used when the provider omits an item's URL.
pub const NO_URL: &str = "No URL available";
/// Placeholder rendered when an item carries no publication date.
pub const NO_DATE: &str = "No date available";
/// Placeholder rendered when an item carries no summary.
pub const NO_SUMMARY: &str = "No summary available";

/// A single search request, constructed per call and never persisted.
///
/// The result limit is clamped to `1..=MAX_RESULT_LIMIT` at construction
/// rather than rejected; the provider caps page sizes at 100, so any
/// larger ask would be truncated server-side anyway.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    query: String,
    result_limit: usize,
    filters: SearchFilters,
}

impl SearchRequest {
    /// Largest result count a single request may ask for.
    pub const MAX_RESULT_LIMIT: usize = 100;

    /// Build a request for `query`, clamping `result_limit` into range.
    pub fn new(query: impl Into<String>, result_limit: usize) -> Self {
        SearchRequest {
            query: query.into(),
            result_limit: result_limit.clamp(1, Self::MAX_RESULT_LIMIT),
            filters: SearchFilters::default(),
        }
    }

    /// Build a request that selects one article by its identifier.
    ///
    /// Used for the second leg of a chained story lookup, where the
    /// reference id is the whole selection and no query text is needed.
    pub fn for_article(article_id: impl Into<String>) -> Self {
        SearchRequest {
            query: String::new(),
            result_limit: 1,
            filters: SearchFilters {
                article_id: Some(article_id.into()),
                source: None,
            },
        }
    }

    /// Narrow results to a single publisher domain (e.g. `cnn.com`).
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.filters.source = Some(source.into());
        self
    }

    /// Narrow results to one article by provider-assigned identifier.
    pub fn with_article_id(mut self, article_id: impl Into<String>) -> Self {
        self.filters.article_id = Some(article_id.into());
        self
    }

    /// Reject requests that select nothing at all.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.query.trim().is_empty() && self.filters.is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        Ok(())
    }

    /// The query text. May be empty when a filter provides the selection.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The clamped result count for this request.
    pub fn result_limit(&self) -> usize {
        self.result_limit
    }

    /// Optional narrowing filters.
    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }
}

/// Optional narrowing fields carried alongside the query text.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Select exactly one article by provider-assigned identifier.
    pub article_id: Option<String>,
    /// Restrict hits to one publisher domain.
    pub source: Option<String>,
}

impl SearchFilters {
    /// True when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.article_id.is_none() && self.source.is_none()
    }
}

/// The ordered hits produced by one search request.
///
/// `total_available` is the provider's count of everything matching the
/// query, which is usually larger than `items.len()`.
#[derive(Debug, Serialize)]
pub struct SearchResult {
    /// Hits in the order the provider returned them.
    pub items: Vec<ResultItem>,
    /// Total matching documents reported by the provider, when present.
    pub total_available: Option<u64>,
}

impl SearchResult {
    /// Number of hits actually returned.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the request matched nothing (or the provider omitted
    /// the results array entirely).
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single search hit with tolerantly extracted fields.
///
/// `raw` preserves the provider's untouched JSON object so callers can
/// reach fields this model does not surface.
#[derive(Debug, Serialize)]
pub struct ResultItem {
    /// Headline, or [`NO_TITLE`] when the provider omitted it.
    pub title: String,
    /// Canonical article URL, or [`NO_URL`] when omitted.
    pub url: String,
    /// Publication timestamp, absent when missing or unparseable.
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Short summary text, absent when the provider has none.
    pub summary: Option<String>,
    /// Identifiers of referenced articles (stories only; empty otherwise).
    pub references: Vec<String>,
    /// The provider's raw JSON object for this hit.
    pub raw: Value,
}

impl ResultItem {
    /// Extract the domain name (before .com/.org/etc) from the item URL
    /// For example: "https://lite.cnn.com/article" -> "cnn"
    pub fn source_tag(&self) -> Option<String> {
        if let Ok(parsed) = url::Url::parse(&self.url) {
            if let Some(host) = parsed.host_str() {
                let parts: Vec<&str> = host.split('.').collect();
                // "lite.cnn.com" -> "cnn", "cnn.com" -> "cnn"
                if parts.len() >= 2 {
                    return Some(parts[parts.len() - 2].to_string());
                }
            }
        }
        None
    }
}

/// Read the first non-empty string field among `keys` from a JSON object.
pub(crate) fn str_field(obj: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse an RFC 3339 timestamp field, tolerating absence and garbage.
pub(crate) fn parse_pub_date(obj: &Value, key: &str) -> Option<DateTime<FixedOffset>> {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_limit_clamped_low() {
        let request = SearchRequest::new("trump", 0);
        assert_eq!(request.result_limit(), 1);
    }

    #[test]
    fn test_result_limit_clamped_high() {
        let request = SearchRequest::new("trump", 500);
        assert_eq!(request.result_limit(), SearchRequest::MAX_RESULT_LIMIT);
    }

    #[test]
    fn test_result_limit_in_range_untouched() {
        let request = SearchRequest::new("trump", 5);
        assert_eq!(request.result_limit(), 5);
    }

    #[test]
    fn test_empty_query_without_filters_is_rejected() {
        let request = SearchRequest::new("   ", 5);
        assert!(matches!(request.validate(), Err(QueryError::EmptyQuery)));
    }

    #[test]
    fn test_article_id_selection_needs_no_query() {
        let request = SearchRequest::for_article("abc123");
        assert!(request.validate().is_ok());
        assert_eq!(request.filters().article_id.as_deref(), Some("abc123"));
        assert_eq!(request.result_limit(), 1);
    }

    #[test]
    fn test_with_source_filter() {
        let request = SearchRequest::new("climate", 10).with_source("cnn.com");
        assert_eq!(request.filters().source.as_deref(), Some("cnn.com"));
        assert!(!request.filters().is_empty());
    }

    #[test]
    fn test_str_field_prefers_earlier_keys() {
        let obj = json!({"short_summary": "short", "summary": "long"});
        assert_eq!(
            str_field(&obj, &["short_summary", "summary"]),
            Some("short".to_string())
        );
    }

    #[test]
    fn test_str_field_skips_empty_values() {
        let obj = json!({"short_summary": "", "summary": "long"});
        assert_eq!(
            str_field(&obj, &["short_summary", "summary"]),
            Some("long".to_string())
        );
        assert_eq!(str_field(&obj, &["missing"]), None);
    }

    #[test]
    fn test_parse_pub_date_valid() {
        let obj = json!({"pubDate": "2025-05-06T14:30:00+00:00"});
        let parsed = parse_pub_date(&obj, "pubDate").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-05-06T14:30:00+00:00");
    }

    #[test]
    fn test_parse_pub_date_garbage_is_absent() {
        let obj = json!({"pubDate": "yesterday-ish"});
        assert_eq!(parse_pub_date(&obj, "pubDate"), None);
        assert_eq!(parse_pub_date(&json!({}), "pubDate"), None);
    }

    #[test]
    fn test_source_tag_subdomain() {
        let item = ResultItem {
            title: "Test".to_string(),
            url: "https://lite.cnn.com/2025/05/06/article".to_string(),
            published_at: None,
            summary: None,
            references: vec![],
            raw: Value::Null,
        };
        assert_eq!(item.source_tag(), Some("cnn".to_string()));
    }

    #[test]
    fn test_source_tag_placeholder_url() {
        let item = ResultItem {
            title: NO_TITLE.to_string(),
            url: NO_URL.to_string(),
            published_at: None,
            summary: None,
            references: vec![],
            raw: Value::Null,
        };
        assert_eq!(item.source_tag(), None);
    }
}
