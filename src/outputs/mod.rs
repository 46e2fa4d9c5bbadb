//! Output generation for terminal text and JSON files.
//!
//! # Submodules
//!
//! - [`text`]: Renders a `SearchResult` as formatted terminal text
//! - [`json`]: Writes a `SearchResult` to a date-partitioned JSON file
//!
//! # JSON Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── articles_trump.json
//!     ├── stories_trump.json
//!     └── vector_ai-regulation.json
//! ```

pub mod json;
pub mod text;
