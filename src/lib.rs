//! # DSQ - Documentation Search Index Query Tool
//!
//! DSQ loads the search index emitted by Documenter-style documentation
//! builds (a `search_index.js` file carrying a single JSON object of
//! doc-string records) and answers keyword, phrase, and regex queries
//! against it from the terminal.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Record model, index loading/serialization, validation, stats
//! - [`query`] - Query parsing, scoring, and execution
//! - [`output`] - Result formatting (colored terminal + JSON)
//!
//! ## Quick Start
//!
//! ```ignore
//! use dsq::index::load_index;
//! use dsq::query::{parse_query, QueryExecutor};
//! use std::path::Path;
//!
//! // Load a search index (raw JSON or the JS wrapper form)
//! let index = load_index(Path::new("docs/build/search_index.js")).unwrap();
//!
//! // Parse and execute a query
//! let query = parse_query("cat:function psf");
//! let executor = QueryExecutor::new(&index);
//! let matches = executor.execute(&query).unwrap();
//!
//! for m in matches {
//!     println!("{} [{}]", m.record.title, m.record.category.as_str());
//! }
//! ```
//!
//! ## Relevance
//!
//! Results are ordered by score: an exact title match dominates, then a
//! title substring bonus, then a log-scaled count of matches in the
//! doc-string text. Ties fall back to the original index order, which is
//! the render order of the documentation pages.

pub mod index;
pub mod output;
pub mod query;
