//! Loading and serializing documentation search indexes.
//!
//! Doc builds ship the index either as raw JSON or wrapped in a JavaScript
//! assignment (`var documenterSearchIndex = {...};`) so the client-side
//! search script can include it directly. Both forms are accepted here;
//! serialization always produces the plain JSON object.

use crate::index::record::SearchIndex;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load a search index from a file.
pub fn load_index(path: &Path) -> Result<SearchIndex> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read index file: {}", path.display()))?;
    parse_index(&raw).with_context(|| format!("failed to parse index file: {}", path.display()))
}

/// Parse a search index from its raw file contents.
///
/// Malformed JSON fails fast with the underlying serde error; the index is
/// static data and there is nothing to recover partially.
pub fn parse_index(raw: &str) -> Result<SearchIndex> {
    let json = strip_js_wrapper(raw).unwrap_or(raw);
    let index: SearchIndex =
        serde_json::from_str(json).context("malformed search index JSON")?;
    Ok(index)
}

/// Serialize an index to compact JSON.
///
/// Parse followed by serialize is idempotent: serializing a reparsed
/// output yields byte-identical JSON.
pub fn to_json_string(index: &SearchIndex) -> Result<String> {
    serde_json::to_string(index).context("failed to serialize search index")
}

/// Serialize an index to pretty-printed JSON.
pub fn to_json_string_pretty(index: &SearchIndex) -> Result<String> {
    serde_json::to_string_pretty(index).context("failed to serialize search index")
}

/// Strip a `var <ident> = {...};` wrapper, returning the inner JSON.
///
/// Returns `None` when the input does not look like the wrapper form, in
/// which case the caller treats it as raw JSON.
fn strip_js_wrapper(raw: &str) -> Option<&str> {
    let rest = raw.trim_start().strip_prefix("var")?;
    // the keyword must be followed by whitespace, not an identifier char
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let rest = rest.trim_start();
    let ident_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(rest.len());
    if ident_len == 0 {
        return None;
    }
    let rest = rest[ident_len..].trim_start();
    let rest = rest.strip_prefix('=')?;
    let rest = rest.trim_start().trim_end();
    Some(rest.strip_suffix(';').map(str::trim_end).unwrap_or(rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::record::Category;

    const RAW_JSON: &str = r##"{"docs":
[{"location":"","page":"Home","title":"Home","text":"Documentation.","category":"page"},{"location":"#Optics.psf","page":"Home","title":"Optics.psf","text":"point spread function","category":"function"}]
}"##;

    fn wrapped(json: &str) -> String {
        format!("var documenterSearchIndex = {json};\n")
    }

    #[test]
    fn test_parse_raw_json() {
        let index = parse_index(RAW_JSON).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.docs[1].category, Category::Function);
    }

    #[test]
    fn test_parse_js_wrapper() {
        let index = parse_index(&wrapped(RAW_JSON)).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.docs[1].title, "Optics.psf");
    }

    #[test]
    fn test_parse_js_wrapper_without_semicolon() {
        let raw = format!("var searchIndex = {RAW_JSON}");
        let index = parse_index(&raw).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_malformed_json_fails_fast() {
        let err = parse_index("{\"docs\": [{\"location\":").unwrap_err();
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_unknown_category_is_an_error() {
        let raw = r#"{"docs":[{"location":"","page":"Home","title":"Home","text":"","category":"macro"}]}"#;
        assert!(parse_index(raw).is_err());
    }

    #[test]
    fn test_missing_docs_key_is_an_error() {
        assert!(parse_index("{}").is_err());
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let index = parse_index(&wrapped(RAW_JSON)).unwrap();
        let first = to_json_string(&index).unwrap();
        let reparsed = parse_index(&first).unwrap();
        let second = to_json_string(&reparsed).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_preserves_order_and_keys() {
        let index = parse_index(RAW_JSON).unwrap();
        let json = to_json_string(&index).unwrap();
        // key order follows the record declaration: location first
        let psf_pos = json.find("Optics.psf").unwrap();
        let home_pos = json.find("\"Home\"").unwrap();
        assert!(home_pos < psf_pos);
        assert!(json.starts_with("{\"docs\":[{\"location\":"));
    }

    #[test]
    fn test_strip_wrapper_rejects_non_wrapper() {
        assert!(strip_js_wrapper(RAW_JSON).is_none());
        assert!(strip_js_wrapper("variable = {}").is_none());
    }
}
