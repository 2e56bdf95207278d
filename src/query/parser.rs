use crate::index::record::Category;

/// Parsed query representation
#[derive(Debug, Clone)]
pub struct Query {
    pub root: QueryNode,
    pub filters: QueryFilters,
    pub options: QueryOptions,
}

/// Query AST node
#[derive(Debug, Clone)]
pub enum QueryNode {
    /// Simple literal search
    Literal(String),
    /// Simple literal search with boost
    BoostedLiteral { text: String, boost: f32 },
    /// Exact phrase search (quoted)
    Phrase(String),
    /// Regex pattern
    Regex(String),
    /// Boolean AND (all must match)
    And(Vec<QueryNode>),
    /// Boolean OR (any can match)
    Or(Vec<QueryNode>),
    /// Boolean NOT (exclude matches)
    Not(Box<QueryNode>),
    /// Empty query
    Empty,
}

/// Query filters
#[derive(Debug, Clone, Default)]
pub struct QueryFilters {
    /// Page name substring (page:Home)
    pub page: Option<String>,
    /// Record category (cat:function)
    pub category: Option<Category>,
    /// Which record fields terms are matched against (in:title, in:text)
    pub scope: FieldScope,
}

impl QueryFilters {
    /// Check if any filter is set
    pub fn has_any(&self) -> bool {
        self.page.is_some() || self.category.is_some() || self.scope != FieldScope::Both
    }
}

/// Fields a term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldScope {
    #[default]
    Both,
    TitleOnly,
    TextOnly,
}

/// Query options
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Sort order
    pub sort: SortOrder,
    /// Maximum results (0 = unlimited)
    pub limit: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            sort: SortOrder::Score,
            limit: 0,
        }
    }
}

/// Sort order for results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Relevance score, original list order as tie-break
    Score,
    /// Original list order (the docs render order)
    Order,
}

/// Parse a query string into a Query structure
pub fn parse_query(input: &str) -> Query {
    let mut parser = QueryParser::new(input);
    parser.parse()
}

/// Query parser
struct QueryParser<'a> {
    input: &'a str,
    pos: usize,
    filters: QueryFilters,
    options: QueryOptions,
}

impl<'a> QueryParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            filters: QueryFilters::default(),
            options: QueryOptions::default(),
        }
    }

    fn parse(&mut self) -> Query {
        let root = self.parse_or();
        Query {
            root,
            filters: self.filters.clone(),
            options: self.options.clone(),
        }
    }

    fn parse_or(&mut self) -> QueryNode {
        let mut nodes = vec![self.parse_and()];

        self.skip_whitespace();
        while self.consume_char('|') {
            self.skip_whitespace();
            nodes.push(self.parse_and());
            self.skip_whitespace();
        }

        if nodes.len() == 1 {
            nodes.pop().unwrap()
        } else {
            QueryNode::Or(nodes)
        }
    }

    fn parse_and(&mut self) -> QueryNode {
        let mut nodes = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_eof() || self.peek_char() == Some(')') || self.peek_char() == Some('|') {
                break;
            }

            nodes.push(self.parse_unary());
        }

        // filters leave Empty placeholders behind
        nodes.retain(|n| !matches!(n, QueryNode::Empty));

        match nodes.len() {
            0 => QueryNode::Empty,
            1 => nodes.pop().unwrap(),
            _ => QueryNode::And(nodes),
        }
    }

    fn parse_unary(&mut self) -> QueryNode {
        self.skip_whitespace();

        if self.consume_char('-') {
            let inner = self.parse_primary();
            return QueryNode::Not(Box::new(inner));
        }

        // Handle boost prefix ^term or ^N:term (e.g., ^psf, ^2:psf, ^1.5:term)
        if self.consume_char('^') {
            let mut boost = 2.0_f32; // Default boost value
            let boost_start = self.pos;

            // Check for explicit boost value like ^2:term or ^1.5:term
            while !self.is_eof() {
                let ch = self.peek_char().unwrap();
                if ch.is_ascii_digit() || ch == '.' {
                    self.advance();
                } else if ch == ':' {
                    let boost_str = &self.input[boost_start..self.pos];
                    if let Ok(b) = boost_str.parse::<f32>() {
                        boost = b;
                    }
                    self.advance(); // consume ':'
                    break;
                } else {
                    // No explicit boost value, reset position
                    self.pos = boost_start;
                    break;
                }
            }

            let inner = self.parse_primary();
            return match inner {
                QueryNode::Literal(text) => QueryNode::BoostedLiteral { text, boost },
                QueryNode::Phrase(text) => QueryNode::BoostedLiteral { text, boost },
                other => other, // Can't boost complex nodes, return as-is
            };
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> QueryNode {
        self.skip_whitespace();

        // Parenthesized expression
        if self.consume_char('(') {
            let node = self.parse_or();
            self.consume_char(')');
            return node;
        }

        // Quoted phrase
        if self.peek_char() == Some('"') {
            return self.parse_phrase();
        }

        // Regex
        if self.remaining().starts_with("re:/") {
            return self.parse_regex();
        }

        // Field filter or literal
        self.parse_term()
    }

    fn parse_phrase(&mut self) -> QueryNode {
        self.consume_char('"');
        let start = self.pos;

        while !self.is_eof() && self.peek_char() != Some('"') {
            self.advance();
        }

        let phrase = self.input[start..self.pos].to_string();
        self.consume_char('"');

        QueryNode::Phrase(phrase)
    }

    fn parse_regex(&mut self) -> QueryNode {
        // Skip "re:/"
        self.pos += 4;
        let start = self.pos;

        // Find closing /
        while !self.is_eof() && self.peek_char() != Some('/') {
            self.advance();
        }

        let pattern = self.input[start..self.pos].to_string();
        self.consume_char('/');

        QueryNode::Regex(pattern)
    }

    fn parse_term(&mut self) -> QueryNode {
        let start = self.pos;

        // Check for field prefix. Dots are term characters: titles are
        // dotted symbol names like Optics.psf.
        while !self.is_eof() {
            let ch = self.peek_char().unwrap();
            if ch.is_alphanumeric() || ch == '_' || ch == '.' || ch == ':' {
                self.advance();
                if ch == ':' {
                    let field = &self.input[start..self.pos - 1];
                    return self.parse_field(field);
                }
            } else {
                break;
            }
        }

        // Regular word
        let word = self.input[start..self.pos].to_string();
        if word.is_empty() {
            // Try to consume any non-whitespace
            while !self.is_eof() {
                let ch = self.peek_char().unwrap();
                if ch.is_whitespace() || ch == '|' || ch == ')' || ch == '(' {
                    break;
                }
                self.advance();
            }
            let word = self.input[start..self.pos].to_string();
            if word.is_empty() {
                return QueryNode::Empty;
            }
            return QueryNode::Literal(word);
        }

        QueryNode::Literal(word)
    }

    fn parse_field(&mut self, field: &str) -> QueryNode {
        let value_start = self.pos;

        // Read value until whitespace or special char
        while !self.is_eof() {
            let ch = self.peek_char().unwrap();
            if ch.is_whitespace() || ch == '|' || ch == ')' {
                break;
            }
            self.advance();
        }

        let value = self.input[value_start..self.pos].to_string();

        match field.to_lowercase().as_str() {
            "page" => {
                self.filters.page = Some(value);
                QueryNode::Empty
            }
            "cat" | "category" => match Category::from_name(&value) {
                Some(cat) => {
                    self.filters.category = Some(cat);
                    QueryNode::Empty
                }
                // Unknown category, treat the whole token as a literal
                None => QueryNode::Literal(format!("{}:{}", field, value)),
            },
            "in" => {
                match value.to_lowercase().as_str() {
                    "title" => self.filters.scope = FieldScope::TitleOnly,
                    "text" => self.filters.scope = FieldScope::TextOnly,
                    _ => {}
                }
                QueryNode::Empty
            }
            "sort" => {
                self.parse_sort(&value);
                QueryNode::Empty
            }
            "top" => {
                if let Ok(n) = value.parse() {
                    self.options.limit = n;
                }
                QueryNode::Empty
            }
            _ => {
                // Unknown field, treat as literal
                QueryNode::Literal(format!("{}:{}", field, value))
            }
        }
    }

    fn parse_sort(&mut self, value: &str) {
        self.options.sort = match value.to_lowercase().as_str() {
            "order" | "index" | "page" => SortOrder::Order,
            _ => SortOrder::Score,
        };
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.peek_char().map(|c| c.is_whitespace()).unwrap_or(false) {
            self.advance();
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn remaining(&self) -> &str {
        &self.input[self.pos..]
    }
}

impl Query {
    /// Get the raw text for simple literal/phrase queries
    #[allow(dead_code)]
    pub fn get_search_text(&self) -> Option<&str> {
        match &self.root {
            QueryNode::Literal(s) | QueryNode::Phrase(s) => Some(s),
            _ => None,
        }
    }

    /// Check if query is empty (no search term AND no filters)
    pub fn is_empty(&self) -> bool {
        matches!(self.root, QueryNode::Empty) && !self.filters.has_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_query() {
        let q = parse_query("pupil");
        assert!(matches!(q.root, QueryNode::Literal(s) if s == "pupil"));
    }

    #[test]
    fn test_dotted_title_is_one_term() {
        let q = parse_query("Optics.psf");
        assert!(matches!(q.root, QueryNode::Literal(s) if s == "Optics.psf"));
    }

    #[test]
    fn test_phrase_query() {
        let q = parse_query("\"point spread function\"");
        assert!(matches!(q.root, QueryNode::Phrase(s) if s == "point spread function"));
    }

    #[test]
    fn test_and_query() {
        let q = parse_query("pupil aperture");
        assert!(matches!(q.root, QueryNode::And(_)));
    }

    #[test]
    fn test_or_query() {
        let q = parse_query("psf | otf");
        assert!(matches!(q.root, QueryNode::Or(_)));
    }

    #[test]
    fn test_not_query() {
        let q = parse_query("-defocus");
        assert!(matches!(q.root, QueryNode::Not(_)));
    }

    #[test]
    fn test_regex() {
        let q = parse_query("re:/[mp]tf/");
        assert!(matches!(q.root, QueryNode::Regex(p) if p == "[mp]tf"));
    }

    #[test]
    fn test_page_filter() {
        let q = parse_query("page:Home psf");
        assert_eq!(q.filters.page, Some("Home".to_string()));
        assert!(matches!(q.root, QueryNode::Literal(s) if s == "psf"));
    }

    #[test]
    fn test_category_filter() {
        let q = parse_query("cat:function psf");
        assert_eq!(q.filters.category, Some(Category::Function));
    }

    #[test]
    fn test_category_filter_alias() {
        let q = parse_query("category:method");
        assert_eq!(q.filters.category, Some(Category::Method));
        assert!(matches!(q.root, QueryNode::Empty));
    }

    #[test]
    fn test_unknown_category_is_literal() {
        let q = parse_query("cat:macro");
        assert!(q.filters.category.is_none());
        assert!(matches!(q.root, QueryNode::Literal(s) if s == "cat:macro"));
    }

    #[test]
    fn test_scope_filter() {
        let q = parse_query("in:title psf");
        assert_eq!(q.filters.scope, FieldScope::TitleOnly);

        let q = parse_query("in:text aberration");
        assert_eq!(q.filters.scope, FieldScope::TextOnly);
    }

    #[test]
    fn test_boost_simple() {
        let q = parse_query("^psf");
        assert!(
            matches!(q.root, QueryNode::BoostedLiteral { ref text, boost } if text == "psf" && boost == 2.0)
        );
    }

    #[test]
    fn test_boost_with_value() {
        let q = parse_query("^3:psf");
        assert!(
            matches!(q.root, QueryNode::BoostedLiteral { ref text, boost } if text == "psf" && boost == 3.0)
        );
    }

    #[test]
    fn test_boost_float_value() {
        let q = parse_query("^1.5:term");
        assert!(
            matches!(q.root, QueryNode::BoostedLiteral { ref text, boost } if text == "term" && (boost - 1.5).abs() < 0.01)
        );
    }

    #[test]
    fn test_sort_order() {
        let q = parse_query("sort:order psf");
        assert_eq!(q.options.sort, SortOrder::Order);
    }

    #[test]
    fn test_sort_score_default() {
        let q = parse_query("psf");
        assert_eq!(q.options.sort, SortOrder::Score);
    }

    #[test]
    fn test_top_limit() {
        let q = parse_query("top:5 psf");
        assert_eq!(q.options.limit, 5);
    }

    #[test]
    fn test_filters_leave_no_empty_nodes() {
        let q = parse_query("cat:function page:Home psf");
        // the two filter tokens must not turn the root into an And of Emptys
        assert!(matches!(q.root, QueryNode::Literal(s) if s == "psf"));
    }

    #[test]
    fn test_query_is_empty() {
        assert!(parse_query("").is_empty());
        assert!(!parse_query("psf").is_empty());
        assert!(!parse_query("cat:function").is_empty());
        assert!(!parse_query("page:Home").is_empty());
    }

    #[test]
    fn test_combined_filters() {
        let q = parse_query("cat:method page:Home in:title top:3 ^2:psf");
        assert_eq!(q.filters.category, Some(Category::Method));
        assert_eq!(q.filters.page, Some("Home".to_string()));
        assert_eq!(q.filters.scope, FieldScope::TitleOnly);
        assert_eq!(q.options.limit, 3);
        assert!(
            matches!(q.root, QueryNode::BoostedLiteral { ref text, boost } if text == "psf" && boost == 2.0)
        );
    }
}
