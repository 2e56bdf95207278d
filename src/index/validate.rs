//! Index invariant checks.
//!
//! Category validity is already enforced at parse time; the checks here
//! cover the invariants the data format cannot express: fragment syntax
//! and the uniqueness of API-entry anchors. Navigational entries (`page`,
//! `section`) legitimately share the empty location, so uniqueness is
//! only required of API entries.

use crate::index::record::SearchIndex;
use std::collections::HashMap;

/// A single invariant violation, tied to a record position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Position of the offending record in the index.
    pub index: usize,
    pub location: String,
    pub message: String,
}

/// Check all index invariants, returning every violation found.
pub fn validate_index(index: &SearchIndex) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (i, record) in index.docs.iter().enumerate() {
        if !is_valid_fragment(&record.location) {
            issues.push(ValidationIssue {
                index: i,
                location: record.location.clone(),
                message: "location is not a valid URL fragment".to_string(),
            });
        }

        if record.category.is_api_entry() {
            if record.location.is_empty() {
                issues.push(ValidationIssue {
                    index: i,
                    location: record.location.clone(),
                    message: "API entry has an empty location".to_string(),
                });
            } else if let Some(&first) = seen.get(record.location.as_str()) {
                issues.push(ValidationIssue {
                    index: i,
                    location: record.location.clone(),
                    message: format!("duplicate API location (first seen at record {first})"),
                });
            } else {
                seen.insert(&record.location, i);
            }
        }
    }

    issues
}

/// Fragment syntax check.
///
/// Doc-build anchors carry method signatures verbatim, including braces,
/// commas, spaces, and non-ASCII type parameters; those are all legal once
/// percent-encoded for a URL. Rejected are only the characters that can
/// never survive into a fragment: control characters, and a `#` anywhere
/// but the leading position.
pub fn is_valid_fragment(location: &str) -> bool {
    for (i, ch) in location.char_indices() {
        if ch.is_control() {
            return false;
        }
        if ch == '#' && i != 0 {
            return false;
        }
    }
    true
}
