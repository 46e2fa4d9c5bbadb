//! Command-line interface definitions for Perigon Search.
//!
//! This module defines the CLI arguments and options using the `clap`
//! crate. The API key can come from a flag, the `PERIGON_API_KEY`
//! environment variable, or the secrets file (resolved later in
//! [`crate::config`]).

use clap::{Parser, Subcommand};

use crate::client::DEFAULT_TIMEOUT;

/// Command-line arguments for the Perigon Search application.
///
/// # Examples
///
/// ```sh
/// # Keyword article search
/// perigon_search articles "artificial intelligence" --limit 5
///
/// # Semantic search with JSON files written alongside the text output
/// perigon_search -j ./json vector "regulatory risks of AI in healthcare"
///
/// # Chained lookup: story search, then resolve its 5th reference
/// perigon_search follow trump
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Perigon API key (falls back to the secrets file when unset)
    #[arg(long, env = "PERIGON_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Override the API base URL (defaults to the production endpoint)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    pub timeout_secs: u64,

    /// Retry budget for transient failures (0 disables retries)
    #[arg(long, default_value_t = 0, global = true)]
    pub retries: usize,

    /// Also write results as JSON files under this directory
    #[arg(short, long, global = true)]
    pub json_output_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// One search surface invocation.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Keyword search over articles
    Articles {
        /// Query text (optional when --article-id is given)
        query: Option<String>,

        /// Number of results to return (clamped to 1..=100)
        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        /// Select one article by provider-assigned identifier
        #[arg(long)]
        article_id: Option<String>,

        /// Restrict hits to one publisher domain (e.g. cnn.com)
        #[arg(long)]
        source: Option<String>,
    },

    /// Search stories (event clusters aggregating many articles)
    Stories {
        /// Query text
        query: String,

        /// Number of results to return (clamped to 1..=100)
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Semantic vector search
    Vector {
        /// Query text (a natural-language prompt)
        query: String,

        /// Number of results to return (clamped to 1..=100)
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },

    /// Chained lookup: search stories, then fetch referenced articles
    Follow {
        /// Story query text
        query: String,

        /// Number of stories to return (clamped to 1..=100)
        #[arg(short, long, default_value_t = 5)]
        limit: usize,

        /// Zero-based index of the reference to resolve
        #[arg(long, default_value_t = 4)]
        reference_index: usize,

        /// Resolve every reference of the first story instead of one
        #[arg(long)]
        all_references: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_articles_parsing() {
        let cli = Cli::parse_from(&["perigon_search", "articles", "artificial intelligence", "--limit", "7"]);
        match cli.command {
            Command::Articles { query, limit, .. } => {
                assert_eq!(query.as_deref(), Some("artificial intelligence"));
                assert_eq!(limit, 7);
            }
            other => panic!("expected Articles, got {other:?}"),
        }
    }

    #[test]
    fn test_articles_by_id_needs_no_query() {
        let cli = Cli::parse_from(&["perigon_search", "articles", "--article-id", "abc123"]);
        match cli.command {
            Command::Articles { query, article_id, .. } => {
                assert_eq!(query, None);
                assert_eq!(article_id.as_deref(), Some("abc123"));
            }
            other => panic!("expected Articles, got {other:?}"),
        }
    }

    #[test]
    fn test_follow_defaults_to_fifth_reference() {
        let cli = Cli::parse_from(&["perigon_search", "follow", "trump"]);
        match cli.command {
            Command::Follow {
                query,
                limit,
                reference_index,
                all_references,
            } => {
                assert_eq!(query, "trump");
                assert_eq!(limit, 5);
                assert_eq!(reference_index, 4);
                assert!(!all_references);
            }
            other => panic!("expected Follow, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(&[
            "perigon_search",
            "vector",
            "ai in healthcare",
            "--retries",
            "2",
            "--timeout-secs",
            "10",
        ]);
        assert_eq!(cli.retries, 2);
        assert_eq!(cli.timeout_secs, 10);
        assert!(matches!(cli.command, Command::Vector { .. }));
    }

    #[test]
    fn test_json_output_dir_short_flag() {
        let cli = Cli::parse_from(&["perigon_search", "-j", "./json", "stories", "trump"]);
        assert_eq!(cli.json_output_dir.as_deref(), Some("./json"));
    }
}
