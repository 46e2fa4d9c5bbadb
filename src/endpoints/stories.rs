//! Story (event-cluster) search.
//!
//! GET `/v1/stories/all` with `q`/`size` query parameters. A story is the
//! provider's aggregation of many articles covering one event; each hit
//! carries the identifiers of its referenced source articles in
//! `summaryReferences`, which callers can resolve through the article
//! surface in a second, independent request.

use serde_json::Value;
use tracing::{info, instrument};

use crate::client::QueryClient;
use crate::error::QueryError;
use crate::models::{parse_pub_date, str_field, ResultItem, SearchRequest, SearchResult, NO_TITLE, NO_URL};

/// Wire path of the story search surface.
pub(crate) const STORIES_PATH: &str = "/v1/stories/all";

/// Search stories by keyword.
///
/// `result_limit` maps to the `size` wire parameter.
#[instrument(level = "info", skip_all, fields(query = request.query()))]
pub async fn search(
    client: &QueryClient,
    request: &SearchRequest,
) -> Result<SearchResult, QueryError> {
    request.validate()?;

    let mut params: Vec<(&str, String)> = Vec::new();
    if !request.query().is_empty() {
        params.push(("q", request.query().to_string()));
    }
    params.push(("size", request.result_limit().to_string()));

    let value = client.get_json(STORIES_PATH, &params).await?;
    let result = map_response(value);
    info!(
        count = result.len(),
        total_available = result.total_available,
        "Story search complete"
    );
    Ok(result)
}

/// Map the story response shape into the shared result model.
fn map_response(value: Value) -> SearchResult {
    let total_available = value.get("numResults").and_then(Value::as_u64);
    let items = value
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(to_item)
        .collect();
    SearchResult {
        items,
        total_available,
    }
}

fn to_item(raw: Value) -> ResultItem {
    // Stories are titled by their cluster name; there is no canonical URL.
    let title = str_field(&raw, &["name", "title"]).unwrap_or_else(|| NO_TITLE.to_string());
    let url = str_field(&raw, &["url"]).unwrap_or_else(|| NO_URL.to_string());
    let published_at = parse_pub_date(&raw, "createdAt");
    let summary = str_field(&raw, &["summary"]);
    let references = reference_ids(&raw);
    ResultItem {
        title,
        url,
        published_at,
        summary,
        references,
        raw,
    }
}

/// Collect the referenced-article identifiers of a story hit.
fn reference_ids(raw: &Value) -> Vec<String> {
    raw.get("summaryReferences")
        .and_then(Value::as_array)
        .map(|refs| {
            refs.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_results_key_is_empty_result() {
        let result = map_response(json!({"status": "ok"}));
        assert!(result.is_empty());
    }

    #[test]
    fn test_story_name_becomes_title() {
        let result = map_response(json!({
            "numResults": 40,
            "results": [{
                "name": "Tariff standoff escalates",
                "summary": "Cluster summary",
                "createdAt": "2025-05-06T08:00:00+00:00"
            }]
        }));
        let item = &result.items[0];
        assert_eq!(item.title, "Tariff standoff escalates");
        assert_eq!(item.summary.as_deref(), Some("Cluster summary"));
        assert!(item.published_at.is_some());
        assert_eq!(item.url, NO_URL);
    }

    #[test]
    fn test_references_are_collected_in_order() {
        let result = map_response(json!({
            "results": [{
                "name": "Story",
                "summaryReferences": ["a1", "a2", "a3", "a4", "a5"]
            }]
        }));
        assert_eq!(
            result.items[0].references,
            vec!["a1", "a2", "a3", "a4", "a5"]
        );
    }

    #[test]
    fn test_non_string_references_are_skipped() {
        let result = map_response(json!({
            "results": [{
                "name": "Story",
                "summaryReferences": ["a1", 7, null, "a2"]
            }]
        }));
        assert_eq!(result.items[0].references, vec!["a1", "a2"]);
    }

    #[test]
    fn test_story_without_references_maps_to_empty_list() {
        let result = map_response(json!({"results": [{"name": "Story"}]}));
        assert!(result.items[0].references.is_empty());
        assert_eq!(result.items[0].title, "Story");
    }

    #[test]
    fn test_untitled_story_uses_default() {
        let result = map_response(json!({"results": [{}]}));
        assert_eq!(result.items[0].title, NO_TITLE);
    }
}
