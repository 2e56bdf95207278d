//! Query execution against a loaded index.
//!
//! The query AST is compiled once (lowercasing terms, building regexes),
//! then evaluated against every record in parallel. Records are only ever
//! borrowed; matches reference them by position and pointer.

use crate::index::record::{DocRecord, SearchIndex};
use crate::query::parser::{FieldScope, Query, QueryNode, SortOrder};
use crate::query::scorer::{ScoreContext, Scorer, ScoringWeights};
use anyhow::{Context, Result};
use memchr::memmem;
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::cmp::Ordering;

/// A record matched by a query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch<'a> {
    /// Position of the record in the index (the docs render order)
    pub index: usize,
    /// Relevance score
    pub score: f32,
    /// Byte range of the first match in `record.text`, if any
    pub text_span: Option<(usize, usize)>,
    pub record: &'a DocRecord,
}

/// Executes parsed queries against a search index
pub struct QueryExecutor<'a> {
    index: &'a SearchIndex,
    scorer: Scorer,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            scorer: Scorer::with_defaults(),
        }
    }

    #[allow(dead_code)]
    pub fn with_weights(index: &'a SearchIndex, weights: ScoringWeights) -> Self {
        Self {
            index,
            scorer: Scorer::new(weights),
        }
    }

    /// Execute a query, returning matches ordered by relevance (score
    /// descending, original list order as tie-break).
    pub fn execute(&self, query: &Query) -> Result<Vec<SearchMatch<'a>>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let compiled = compile_node(&query.root)?;
        let scope = query.filters.scope;

        let mut matches: Vec<SearchMatch<'a>> = self
            .index
            .docs
            .par_iter()
            .enumerate()
            .filter(|(_, record)| self.passes_filters(record, query))
            .filter_map(|(i, record)| {
                let hay = Haystack {
                    title: record.title.to_lowercase(),
                    text: record.text.to_lowercase(),
                };
                let eval = eval_node(&compiled, &hay, scope)?;
                let ctx = ScoreContext {
                    exact_title: eval.exact_title,
                    title_match: eval.title_match,
                    text_match_count: eval.text_match_count,
                    boost: eval.boost,
                };
                Some(SearchMatch {
                    index: i,
                    score: self.scorer.calculate_score(&ctx),
                    text_span: eval.text_span,
                    record,
                })
            })
            .collect();

        match query.options.sort {
            SortOrder::Score => matches.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(Ordering::Equal)
                    .then(a.index.cmp(&b.index))
            }),
            SortOrder::Order => matches.sort_by_key(|m| m.index),
        }

        if query.options.limit > 0 {
            matches.truncate(query.options.limit);
        }

        Ok(matches)
    }

    fn passes_filters(&self, record: &DocRecord, query: &Query) -> bool {
        if let Some(cat) = query.filters.category {
            if record.category != cat {
                return false;
            }
        }
        if let Some(page) = &query.filters.page {
            if !record.page.to_lowercase().contains(&page.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

/// Lowercased record fields, built once per record per query
struct Haystack {
    title: String,
    text: String,
}

/// Compiled query node: terms lowercased, regexes built
enum CompiledNode {
    Term { text: String, boost: f32 },
    Phrase(String),
    Regex(Regex),
    And(Vec<CompiledNode>),
    Or(Vec<CompiledNode>),
    Not(Box<CompiledNode>),
    Empty,
}

fn compile_node(node: &QueryNode) -> Result<CompiledNode> {
    Ok(match node {
        QueryNode::Literal(s) => CompiledNode::Term {
            text: s.to_lowercase(),
            boost: 1.0,
        },
        QueryNode::BoostedLiteral { text, boost } => CompiledNode::Term {
            text: text.to_lowercase(),
            boost: *boost,
        },
        QueryNode::Phrase(s) => CompiledNode::Phrase(s.to_lowercase()),
        QueryNode::Regex(pattern) => CompiledNode::Regex(
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("invalid regex in query: {pattern}"))?,
        ),
        QueryNode::And(nodes) => {
            CompiledNode::And(nodes.iter().map(compile_node).collect::<Result<_>>()?)
        }
        QueryNode::Or(nodes) => {
            CompiledNode::Or(nodes.iter().map(compile_node).collect::<Result<_>>()?)
        }
        QueryNode::Not(inner) => CompiledNode::Not(Box::new(compile_node(inner)?)),
        QueryNode::Empty => CompiledNode::Empty,
    })
}

/// Per-record match evidence, merged across query nodes
#[derive(Debug, Default, Clone)]
struct Eval {
    exact_title: bool,
    title_match: bool,
    text_match_count: usize,
    text_span: Option<(usize, usize)>,
    boost: f32,
}

impl Eval {
    fn merge(mut self, other: Eval) -> Eval {
        self.exact_title |= other.exact_title;
        self.title_match |= other.title_match;
        self.text_match_count += other.text_match_count;
        self.text_span = match (self.text_span, other.text_span) {
            (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
            (a, b) => a.or(b),
        };
        if other.boost > self.boost {
            self.boost = other.boost;
        }
        self
    }
}

/// Evaluate a compiled node against one record. `None` means no match.
fn eval_node(node: &CompiledNode, hay: &Haystack, scope: FieldScope) -> Option<Eval> {
    match node {
        CompiledNode::Term { text, boost } => {
            let mut eval = match_needle(hay, text, scope)?;
            eval.boost = *boost;
            Some(eval)
        }
        CompiledNode::Phrase(phrase) => match_needle(hay, phrase, scope),
        CompiledNode::Regex(re) => {
            let mut eval = Eval::default();
            if scope != FieldScope::TextOnly {
                eval.title_match = re.is_match(&hay.title);
            }
            if scope != FieldScope::TitleOnly {
                for m in re.find_iter(&hay.text) {
                    if eval.text_span.is_none() {
                        eval.text_span = Some((m.start(), m.end()));
                    }
                    eval.text_match_count += 1;
                }
            }
            if eval.title_match || eval.text_match_count > 0 {
                Some(eval)
            } else {
                None
            }
        }
        CompiledNode::And(nodes) => {
            let mut merged = Eval::default();
            for child in nodes {
                merged = merged.merge(eval_node(child, hay, scope)?);
            }
            Some(merged)
        }
        CompiledNode::Or(nodes) => {
            let mut merged: Option<Eval> = None;
            for child in nodes {
                if let Some(eval) = eval_node(child, hay, scope) {
                    merged = Some(match merged {
                        Some(acc) => acc.merge(eval),
                        None => eval,
                    });
                }
            }
            merged
        }
        CompiledNode::Not(inner) => match eval_node(inner, hay, scope) {
            Some(_) => None,
            None => Some(Eval::default()),
        },
        // Match-all: filters strip their tokens down to Empty
        CompiledNode::Empty => Some(Eval::default()),
    }
}

/// Case-insensitive substring match of one needle against a record
fn match_needle(hay: &Haystack, needle: &str, scope: FieldScope) -> Option<Eval> {
    if needle.is_empty() {
        return Some(Eval::default());
    }

    let mut eval = Eval::default();

    if scope != FieldScope::TextOnly {
        eval.exact_title = hay.title == needle;
        eval.title_match = memmem::find(hay.title.as_bytes(), needle.as_bytes()).is_some();
    }

    if scope != FieldScope::TitleOnly {
        let mut hits = memmem::find_iter(hay.text.as_bytes(), needle.as_bytes());
        if let Some(first) = hits.next() {
            eval.text_span = Some((first, first + needle.len()));
            eval.text_match_count = 1 + hits.count();
        }
    }

    if eval.title_match || eval.text_match_count > 0 {
        Some(eval)
    } else {
        None
    }
}
