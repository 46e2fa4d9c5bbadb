//! # Perigon Search
//!
//! A command-line search tool for the Perigon news API. It queries three
//! search surfaces (keyword article search, story search, and semantic
//! vector search), prints selected response fields as formatted text,
//! and optionally writes results as JSON files.
//!
//! ## Features
//!
//! - Keyword, story, and semantic vector search with a unified result model
//! - Chained lookup: fetch a story, then resolve its referenced articles
//! - Tolerant field extraction with documented placeholder defaults
//! - Bounded request timeout and an opt-in retry budget (default: none)
//! - Optional date-partitioned JSON output alongside the terminal text
//!
//! ## Usage
//!
//! ```sh
//! perigon_search articles "artificial intelligence" --limit 5
//! perigon_search follow trump --all-references
//! ```
//!
//! ## Architecture
//!
//! One authenticated request per search: the CLI builds a
//! [`SearchRequest`], [`api::search_with_policy`] dispatches it to the
//! surface module that owns the wire naming, and the response is mapped
//! into a shared [`models::SearchResult`] before rendering. The chained
//! `follow` flow is plain sequencing of two independent searches; the
//! client itself never joins results.

use clap::Parser;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod api;
mod cli;
mod client;
mod config;
mod endpoints;
mod error;
mod models;
mod outputs;
mod utils;

use api::search_with_policy;
use cli::{Cli, Command};
use client::QueryClient;
use config::Credentials;
use endpoints::Surface;
use models::{ResultItem, SearchRequest, SearchResult};
use utils::ensure_writable_dir;

/// How many reference lookups `follow --all-references` keeps in flight.
const FOLLOW_BATCH_SIZE: usize = 6;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("perigon_search starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.command, retries = args.retries, timeout_secs = args.timeout_secs, "Parsed CLI arguments");

    // Early check: ensure JSON output dir is writable
    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Resolve credential and build the client ----
    let credentials = match Credentials::resolve(args.api_key.clone()) {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "No usable API credential");
            return Err(e.into());
        }
    };

    let base_url = match &args.base_url {
        Some(raw) => match Url::parse(raw) {
            Ok(url) => url,
            Err(e) => {
                error!(url = %raw, error = %e, "Invalid base URL");
                return Err(e.into());
            }
        },
        None => client::default_base_url().clone(),
    };

    let client = QueryClient::new(
        credentials,
        base_url,
        Duration::from_secs(args.timeout_secs),
    )?;
    debug!(?client, "Query client ready");

    // ---- Dispatch ----
    match &args.command {
        Command::Articles {
            query,
            limit,
            article_id,
            source,
        } => {
            let mut request = SearchRequest::new(query.clone().unwrap_or_default(), *limit);
            if let Some(id) = article_id {
                request = request.with_article_id(id.clone());
            }
            if let Some(src) = source {
                request = request.with_source(src.clone());
            }
            run_search(&client, Surface::Articles, &request, &args).await?;
        }
        Command::Stories { query, limit } => {
            let request = SearchRequest::new(query.clone(), *limit);
            run_search(&client, Surface::Stories, &request, &args).await?;
        }
        Command::Vector { query, limit } => {
            let request = SearchRequest::new(query.clone(), *limit);
            run_search(&client, Surface::Vector, &request, &args).await?;
        }
        Command::Follow {
            query,
            limit,
            reference_index,
            all_references,
        } => {
            run_follow(
                &client,
                query,
                *limit,
                *reference_index,
                *all_references,
                &args,
            )
            .await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Run one search and emit its outputs.
///
/// Failures are logged with their raw detail and then propagated, so the
/// process exits nonzero without swallowing what the provider said.
async fn run_search(
    client: &QueryClient,
    surface: Surface,
    request: &SearchRequest,
    args: &Cli,
) -> Result<(), Box<dyn Error>> {
    let result = match search_with_policy(client, surface, request, args.retries).await {
        Ok(result) => result,
        Err(e) => {
            error!(surface = surface.mode(), error = %e, "Search failed");
            return Err(e.into());
        }
    };

    print!(
        "{}",
        outputs::text::render_result(
            surface.mode(),
            surface.item_label(),
            request.query(),
            &result
        )
    );

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) =
            outputs::json::write_result(&result, surface.mode(), request.query(), dir).await
        {
            error!(error = %e, "Failed to write JSON result");
        }
    }

    Ok(())
}

/// Chained lookup: a story search followed by article lookups for its
/// reference identifiers.
///
/// This is caller-side sequencing of independent searches: the second
/// leg simply reuses a reference id as the next request's selection.
async fn run_follow(
    client: &QueryClient,
    query: &str,
    limit: usize,
    reference_index: usize,
    all_references: bool,
    args: &Cli,
) -> Result<(), Box<dyn Error>> {
    let story_request = SearchRequest::new(query, limit);
    let stories =
        match search_with_policy(client, Surface::Stories, &story_request, args.retries).await {
            Ok(stories) => stories,
            Err(e) => {
                error!(error = %e, "Story search failed");
                return Err(e.into());
            }
        };

    print!(
        "{}",
        outputs::text::render_result("stories", "Story", query, &stories)
    );

    let Some(story) = stories.items.first() else {
        info!("No stories to follow");
        return Ok(());
    };

    let references: Vec<String> = story.references.iter().unique().cloned().collect();
    if references.is_empty() {
        info!(story = %story.title, "Story carries no references to follow");
        return Ok(());
    }

    let selected: Vec<String> = if all_references {
        references
    } else {
        match references.get(reference_index) {
            Some(reference) => vec![reference.clone()],
            None => {
                warn!(
                    reference_index,
                    available = references.len(),
                    "Reference index out of range; nothing to follow"
                );
                return Ok(());
            }
        }
    };

    info!(
        count = selected.len(),
        story = %story.title,
        "Following story references"
    );

    // Each lookup is its own stateless request; only the concurrency is shared.
    let lookups: Vec<Option<ResultItem>> = stream::iter(selected)
        .map(|reference| async move {
            let request = SearchRequest::for_article(reference.as_str());
            match search_with_policy(client, Surface::Articles, &request, args.retries).await {
                Ok(mut result) => {
                    if result.is_empty() {
                        warn!(%reference, "Reference resolved to no article");
                        None
                    } else {
                        Some(result.items.remove(0))
                    }
                }
                Err(e) => {
                    error!(%reference, error = %e, "Reference lookup failed; skipping");
                    None
                }
            }
        })
        .buffered(FOLLOW_BATCH_SIZE)
        .collect()
        .await;

    let followed = SearchResult {
        items: lookups.into_iter().flatten().collect(),
        total_available: None,
    };
    info!(count = followed.len(), "Resolved story references");

    print!(
        "{}",
        outputs::text::render_result("followed", "Article", query, &followed)
    );

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = outputs::json::write_result(&followed, "followed", query, dir).await {
            error!(error = %e, "Failed to write JSON result");
        }
    }

    Ok(())
}
