//! Search surfaces of the Perigon API.
//!
//! This module contains one submodule per search surface. Each surface
//! owns its path, HTTP method, wire-field naming, and response shape, and
//! maps everything into the shared [`crate::models::SearchResult`] model.
//!
//! # Supported Surfaces
//!
//! | Surface | Module | Method | Notes |
//! |---------|--------|--------|-------|
//! | Articles | [`articles`] | GET `/v1/all` | Keyword search; also selects by article id |
//! | Stories | [`stories`] | GET `/v1/stories/all` | Event clusters with referenced-article ids |
//! | Vector | [`vector`] | POST `/v1/vector/news/all` | Semantic search; payload nested under `data` |
//!
//! # Common Patterns
//!
//! Each surface module exports one entry point:
//! - `search(client, request)`: one authenticated request, mapped into
//!   `SearchResult`
//!
//! Surfaces differ in wire naming (`q`/`size` on the GET surfaces,
//! `prompt`/`limit` on the vector body); the shared `result_limit` field
//! maps to whichever name the surface expects, so callers never see the
//! difference. Response mapping is tolerant throughout: a missing results
//! array is an empty result, and per-item gaps fall back to the documented
//! defaults.

pub mod articles;
pub mod stories;
pub mod vector;

/// Which search surface a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Keyword article search.
    Articles,
    /// Story (event-cluster) search.
    Stories,
    /// Semantic vector search.
    Vector,
}

impl Surface {
    /// Lowercase surface name, used in log fields and output filenames.
    pub fn mode(&self) -> &'static str {
        match self {
            Surface::Articles => "articles",
            Surface::Stories => "stories",
            Surface::Vector => "vector",
        }
    }

    /// Singular label for one rendered hit.
    pub fn item_label(&self) -> &'static str {
        match self {
            Surface::Articles => "Article",
            Surface::Stories => "Story",
            Surface::Vector => "Result",
        }
    }
}
