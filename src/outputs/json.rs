//! JSON file output for search results.
//!
//! Serializes a `SearchResult` (typed fields plus each hit's raw provider
//! object) into a date-partitioned directory:
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     └── articles_trump.json
//! ```
//!
//! Filenames combine the surface name with a slug of the query so
//! repeated runs on the same day overwrite their own results and nothing
//! else.

use chrono::Local;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::SearchResult;
use crate::utils::slugify_query;

/// Write a [`SearchResult`] to `{dir}/{date}/{mode}_{query-slug}.json`.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir, mode = mode))]
pub async fn write_result(
    result: &SearchResult,
    mode: &str,
    query: &str,
    json_output_dir: &str,
) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(result)?;

    let local_date = Local::now().date_naive().to_string();
    let full_json_dir = format!("{}/{}", json_output_dir, local_date);

    info!(%full_json_dir, "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&full_json_dir).await {
        error!(%full_json_dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let slug = slugify_query(query);
    let output_json_filename = if slug.is_empty() {
        format!("{}/{}.json", full_json_dir, mode)
    } else {
        format!("{}/{}_{}.json", full_json_dir, mode, slug)
    };

    info!(path = %output_json_filename, "Writing JSON");
    fs::write(&output_json_filename, json).await?;
    info!(path = %output_json_filename, "Wrote JSON result file");

    Ok(())
}
