pub mod executor;
pub mod parser;
pub mod scorer;

pub use executor::{QueryExecutor, SearchMatch};
pub use parser::parse_query;
// Re-exports for public API
#[allow(unused_imports)]
pub use parser::{FieldScope, Query, QueryNode, SortOrder};
#[allow(unused_imports)]
pub use scorer::{ScoreContext, Scorer, ScoringWeights};
