//! Terminal text rendering for search results.
//!
//! Renders each hit as an aligned block of labelled fields. Fields the
//! provider omitted show their documented placeholder strings here, so
//! the output shape is identical whether or not the provider was
//! forthcoming.

use crate::models::{ResultItem, SearchResult, NO_DATE, NO_SUMMARY};
use crate::utils::upcase;

const SEPARATOR_WIDTH: usize = 60;

/// Render a whole result, header line included.
///
/// `mode` is the surface name ("articles", "stories", "vector");
/// `item_label` names one hit ("Article", "Story", "Result").
pub fn render_result(
    mode: &str,
    item_label: &str,
    query: &str,
    result: &SearchResult,
) -> String {
    let mut out = String::new();
    out.push_str(&header_line(mode, query, result));
    out.push('\n');

    if result.is_empty() {
        out.push_str("No results found for this query.\n");
        return out;
    }

    for (i, item) in result.items.iter().enumerate() {
        out.push_str(&render_item(item_label, i + 1, item));
    }
    out
}

/// Build the one-line result header, e.g.
/// `Articles for "trump" (5 of 1432 available)`.
fn header_line(mode: &str, query: &str, result: &SearchResult) -> String {
    let shown = result.len();
    match result.total_available {
        Some(total) => format!(
            "{} for \"{}\" ({} of {} available)",
            upcase(mode),
            query,
            shown,
            total
        ),
        None => format!("{} for \"{}\" ({} returned)", upcase(mode), query, shown),
    }
}

/// Render one hit as a labelled block.
fn render_item(label: &str, index: usize, item: &ResultItem) -> String {
    let mut out = String::new();
    match item.source_tag() {
        Some(tag) => out.push_str(&format!("{} {} ({}):\n", label, index, tag)),
        None => out.push_str(&format!("{} {}:\n", label, index)),
    }
    out.push_str(&format!("  Title       : {}\n", item.title));
    out.push_str(&format!("  URL         : {}\n", item.url));
    let published = item
        .published_at
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| NO_DATE.to_string());
    out.push_str(&format!("  Published at: {}\n", published));
    let summary = item.summary.as_deref().unwrap_or(NO_SUMMARY);
    out.push_str(&format!("  Summary     : {}\n", summary));
    if !item.references.is_empty() {
        out.push_str(&format!(
            "  References  : {} linked articles\n",
            item.references.len()
        ));
    }
    out.push_str(&format!("{}\n", "-".repeat(SEPARATOR_WIDTH)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NO_TITLE, NO_URL};
    use chrono::DateTime;
    use serde_json::Value;

    fn item(title: &str) -> ResultItem {
        ResultItem {
            title: title.to_string(),
            url: "https://example.com/a".to_string(),
            published_at: DateTime::parse_from_rfc3339("2025-05-06T14:30:00+00:00").ok(),
            summary: Some("A summary".to_string()),
            references: vec![],
            raw: Value::Null,
        }
    }

    #[test]
    fn test_renders_every_item_once() {
        let result = SearchResult {
            items: (1..=5).map(|i| item(&format!("headline {i}"))).collect(),
            total_available: Some(1432),
        };
        let text = render_result("articles", "Article", "trump", &result);
        assert!(text.contains("Articles for \"trump\" (5 of 1432 available)"));
        for i in 1..=5 {
            assert!(text.contains(&format!("headline {i}")));
            assert!(text.contains(&format!("Article {i}")));
        }
    }

    #[test]
    fn test_missing_fields_render_placeholders() {
        let result = SearchResult {
            items: vec![ResultItem {
                title: NO_TITLE.to_string(),
                url: NO_URL.to_string(),
                published_at: None,
                summary: None,
                references: vec![],
                raw: Value::Null,
            }],
            total_available: None,
        };
        let text = render_result("vector", "Result", "ai", &result);
        assert!(text.contains(NO_TITLE));
        assert!(text.contains(NO_URL));
        assert!(text.contains(NO_DATE));
        assert!(text.contains(NO_SUMMARY));
    }

    #[test]
    fn test_empty_result_prints_notice() {
        let result = SearchResult {
            items: vec![],
            total_available: Some(0),
        };
        let text = render_result("articles", "Article", "nothing", &result);
        assert!(text.contains("No results found for this query."));
    }

    #[test]
    fn test_story_references_line() {
        let mut story = item("A story");
        story.url = NO_URL.to_string();
        story.references = vec!["r1".to_string(), "r2".to_string()];
        let result = SearchResult {
            items: vec![story],
            total_available: None,
        };
        let text = render_result("stories", "Story", "trump", &result);
        assert!(text.contains("References  : 2 linked articles"));
    }

    #[test]
    fn test_source_tag_in_item_heading() {
        let mut tagged = item("Tagged");
        tagged.url = "https://lite.cnn.com/article".to_string();
        let result = SearchResult {
            items: vec![tagged],
            total_available: None,
        };
        let text = render_result("articles", "Article", "q", &result);
        assert!(text.contains("Article 1 (cnn):"));
    }
}
