//! Search index loading, model, validation, and statistics.
//!
//! The index is a flat, ordered list of doc-string records parsed from
//! the `search_index.js` a documentation build emits. It is immutable
//! after loading; everything else in the crate borrows it read-only.

pub mod loader;
pub mod record;
pub mod stats;
pub mod validate;

pub use loader::{load_index, parse_index};
pub use record::{Category, DocRecord, SearchIndex};
#[allow(unused_imports)]
pub use validate::{validate_index, ValidationIssue};
