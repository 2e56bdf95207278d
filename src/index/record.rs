use serde::{Deserialize, Serialize};

/// A single entry in the documentation search index.
///
/// Field declaration order matches the JSON key order emitted by the doc
/// build (`location`, `page`, `title`, `text`, `category`), so a loaded
/// index serializes back with the same key layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    /// URL fragment anchoring this record on its page. Empty for
    /// page-level prose, otherwise `#`-prefixed.
    pub location: String,
    /// Human-readable page name.
    pub page: String,
    /// Display title, typically the fully qualified symbol name.
    pub title: String,
    /// Doc-string content (plain text, may embed usage examples and
    /// admonitions).
    pub text: String,
    /// Record classification.
    pub category: Category,
}

/// Record classification.
///
/// `Page` and `Section` are navigational entries; `Module`, `Type`,
/// `Function`, and `Method` document API symbols. Anything else in the
/// input is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Page,
    Section,
    Module,
    Type,
    Function,
    Method,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Page,
        Category::Section,
        Category::Module,
        Category::Type,
        Category::Function,
        Category::Method,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Page => "page",
            Category::Section => "section",
            Category::Module => "module",
            Category::Type => "type",
            Category::Function => "function",
            Category::Method => "method",
        }
    }

    /// Whether this record documents an API symbol rather than
    /// page/section navigation.
    pub fn is_api_entry(&self) -> bool {
        matches!(
            self,
            Category::Module | Category::Type | Category::Function | Category::Method
        )
    }

    /// Parse a category name as written in `cat:` query filters.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "page" => Some(Category::Page),
            "section" => Some(Category::Section),
            "module" => Some(Category::Module),
            "type" => Some(Category::Type),
            "function" | "func" | "fn" => Some(Category::Function),
            "method" => Some(Category::Method),
            _ => None,
        }
    }
}

/// A documentation search index: an ordered list of records under the
/// `docs` key. The list order is the render order of the docs pages and
/// is preserved through load/serialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub docs: Vec<DocRecord>,
}

impl SearchIndex {
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Record at an exact location anchor, if any.
    ///
    /// Navigational entries share the empty location, so lookups only
    /// make sense for the `#`-prefixed anchors of API entries; the first
    /// record wins for duplicated locations.
    pub fn record_at(&self, location: &str) -> Option<&DocRecord> {
        self.docs.iter().find(|r| r.location == location)
    }

    /// Page names in first-appearance order.
    pub fn pages(&self) -> Vec<&str> {
        let mut pages: Vec<&str> = Vec::new();
        for record in &self.docs {
            if !pages.contains(&record.page.as_str()) {
                pages.push(&record.page);
            }
        }
        pages
    }
}
