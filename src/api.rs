//! Search execution with opt-in exponential backoff retry.
//!
//! This module wires a [`Surface`] and a [`QueryClient`] together behind
//! a small trait-based design:
//! - [`SearchAsync`]: core trait for one async search execution
//! - [`SurfaceSearch`]: dispatches a request to its surface module
//! - [`RetrySearch`]: decorator adding retry logic to any `SearchAsync`
//!
//! # Retry Strategy
//!
//! The retry budget defaults to **zero**: one request per call, matching
//! the client's stateless contract. Operators opt in with `--retries`.
//! When enabled:
//! - Exponential backoff starting at the base delay
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//! - Only transient failures (timeout, transport, HTTP 5xx) are retried;
//!   4xx rejections and malformed responses fail immediately

use rand::{rng, Rng};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::client::QueryClient;
use crate::endpoints::{articles, stories, vector, Surface};
use crate::error::QueryError;
use crate::models::{SearchRequest, SearchResult};

/// Trait for one async search execution.
///
/// Implementors take a request and produce a typed result or a typed
/// failure. The abstraction exists so decorators (like retry logic) can
/// wrap any execution path.
pub trait SearchAsync {
    /// Execute the search request.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, QueryError>;
}

/// Dispatches a request to the module owning its search surface.
#[derive(Debug)]
pub struct SurfaceSearch<'a> {
    /// The transport to issue the request through.
    pub client: &'a QueryClient,
    /// Which search surface to target.
    pub surface: Surface,
}

impl SearchAsync for SurfaceSearch<'_> {
    #[instrument(level = "info", skip_all, fields(surface = self.surface.mode()))]
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, QueryError> {
        let t0 = Instant::now();
        let res = match self.surface {
            Surface::Articles => articles::search(self.client, request).await,
            Surface::Stories => stories::search(self.client, request).await,
            Surface::Vector => vector::search(self.client, request).await,
        };
        let dt = t0.elapsed();

        if let Err(e) = &res {
            warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "Search call failed");
        }
        res
    }
}

/// Decorator that adds exponential backoff retry to any [`SearchAsync`].
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
///
/// With a zero retry budget the decorator is a pass-through: the first
/// failure is returned untouched and no delay is ever applied.
pub struct RetrySearch<T> {
    /// The underlying search execution to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetrySearch<T>
where
    T: SearchAsync,
{
    /// Wrap an execution path with a retry budget.
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying search execution to wrap
    /// * `max_retries` - Maximum number of retry attempts (0 disables retries)
    /// * `base_delay` - Initial delay between retries
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }
}

impl<T> fmt::Debug for RetrySearch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrySearch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> SearchAsync for RetrySearch<T>
where
    T: SearchAsync + fmt::Debug,
{
    #[instrument(level = "info", skip_all)]
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult, QueryError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.search(request).await {
                Ok(result) => {
                    return Ok(result);
                }
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if !e.is_transient() || attempt > self.max_retries {
                        if attempt > 1 {
                            error!(
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                                elapsed_ms_total = total_dt.as_millis() as u128,
                                error = %e,
                                "search() exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    // backoff calc
                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        elapsed_ms_total = total_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "search() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// High-level entry point: search one surface under a retry budget.
///
/// This is the primary call path for the CLI subcommands. The retry
/// budget comes straight from the operator (`--retries`, default 0);
/// everything else about the request is untouched.
#[instrument(level = "info", skip_all, fields(surface = surface.mode()))]
pub async fn search_with_policy(
    client: &QueryClient,
    surface: Surface,
    request: &SearchRequest,
    max_retries: usize,
) -> Result<SearchResult, QueryError> {
    let t0 = Instant::now();
    let exec = SurfaceSearch { client, surface };
    let api = RetrySearch::new(exec, max_retries, StdDuration::from_secs(1));
    let res = api.search(request).await;
    let dt = t0.elapsed();

    match &res {
        Ok(result) => info!(
            elapsed_ms_total = dt.as_millis() as u128,
            count = result.len(),
            "search_with_policy succeeded"
        ),
        Err(e) => {
            error!(elapsed_ms_total = dt.as_millis() as u128, error = %e, "search_with_policy failed")
        }
    }
    res
}
