//! Keyword article search.
//!
//! GET `/v1/all` with `q`/`size` query parameters. The same surface
//! selects a single article by identifier via the `articleId` parameter,
//! which is how the second leg of a chained story lookup resolves a
//! reference id into an article.

use serde_json::Value;
use tracing::{info, instrument};

use crate::client::QueryClient;
use crate::error::QueryError;
use crate::models::{parse_pub_date, str_field, ResultItem, SearchRequest, SearchResult, NO_TITLE, NO_URL};

/// Wire path of the article search surface.
pub(crate) const ARTICLES_PATH: &str = "/v1/all";

/// Search articles by keyword or select them by id.
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
    if let Some(article_id) = &request.filters().article_id {
        params.push(("articleId", article_id.clone()));
    }
    if let Some(source) = &request.filters().source {
        params.push(("source", source.clone()));
    }

    let value = client.get_json(ARTICLES_PATH, &params).await?;
    let result = map_response(value);
    info!(
        count = result.len(),
        total_available = result.total_available,
        "Article search complete"
    );
    Ok(result)
}

/// Map the article response shape into the shared result model.
///
/// A missing `articles` array means an empty result, never an error.
fn map_response(value: Value) -> SearchResult {
    let total_available = value.get("numResults").and_then(Value::as_u64);
    let items = value
        .get("articles")
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
    let title = str_field(&raw, &["title"]).unwrap_or_else(|| NO_TITLE.to_string());
    let url = str_field(&raw, &["url"]).unwrap_or_else(|| NO_URL.to_string());
    let published_at = parse_pub_date(&raw, "pubDate");
    let summary = str_field(&raw, &["summary", "description"]);
    ResultItem {
        title,
        url,
        published_at,
        summary,
        references: Vec::new(),
        raw,
    }
}
