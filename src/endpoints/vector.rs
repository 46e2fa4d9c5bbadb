//! Semantic vector search.
//!
//! POST `/v1/vector/news/all` with a JSON body. This surface names its
//! fields differently from the GET surfaces: the query text travels as
//! `prompt` and the result count as `limit`. Each hit nests its article
//! payload under a `data` object alongside a relevance score; hits with
//! no `data` object carry nothing renderable and are skipped.

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::client::QueryClient;
use crate::error::QueryError;
use crate::models::{parse_pub_date, str_field, ResultItem, SearchRequest, SearchResult, NO_TITLE, NO_URL};

/// Wire path of the vector search surface.
pub(crate) const VECTOR_PATH: &str = "/v1/vector/news/all";

/// Search articles by semantic similarity to the query text.
///
/// `result_limit` maps to the `limit` body field.
#[instrument(level = "info", skip_all, fields(query = request.query()))]
pub async fn search(
    client: &QueryClient,
    request: &SearchRequest,
) -> Result<SearchResult, QueryError> {
    request.validate()?;

    let body = json!({
        "prompt": request.query(),
        "limit": request.result_limit(),
    });

    let value = client.post_json(VECTOR_PATH, &body).await?;
    let result = map_response(value);
    info!(count = result.len(), "Vector search complete");
    Ok(result)
}

/// Map the vector response shape into the shared result model.
///
/// A missing `results` array means an empty result, never an error.
fn map_response(value: Value) -> SearchResult {
    let total_available = value.get("numResults").and_then(Value::as_u64);
    let hits = value
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let hit_count = hits.len();
    let items: Vec<ResultItem> = hits.into_iter().filter_map(to_item).collect();
    if items.len() < hit_count {
        warn!(
            skipped = hit_count - items.len(),
            "Vector hits without a data payload were skipped"
        );
    }

    SearchResult {
        items,
        total_available,
    }
}

fn to_item(raw: Value) -> Option<ResultItem> {
    let data = raw.get("data")?;
    let title = str_field(data, &["title"]).unwrap_or_else(|| NO_TITLE.to_string());
    let url = str_field(data, &["url"]).unwrap_or_else(|| NO_URL.to_string());
    let published_at = parse_pub_date(data, "pubDate");
    let summary = str_field(data, &["short_summary", "summary"]);
    Some(ResultItem {
        title,
        url,
        published_at,
        summary,
        references: Vec::new(),
        raw,
    })
}
