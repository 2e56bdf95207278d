//! Output formatting for query results

use crate::index::record::DocRecord;
use crate::query::executor::SearchMatch;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Bytes of context shown either side of the matched span in a snippet
const SNIPPET_CONTEXT: usize = 60;

/// Print matches as colored result blocks: title line, page/anchor line,
/// and a doc-text snippet with the match highlighted.
pub fn print_matches(matches: &[SearchMatch], color: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);

    for (i, m) in matches.iter().enumerate() {
        if i > 0 {
            writeln!(stdout)?;
        }
        print_heading(&mut stdout, m.record)?;
        if let Some(snippet) = build_snippet(&m.record.text, m.text_span) {
            print_snippet(&mut stdout, &snippet)?;
        }
    }

    Ok(())
}

/// Print a single record in full (for exact-anchor lookups)
pub fn print_record(record: &DocRecord, color: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color);
    print_heading(&mut stdout, record)?;
    if !record.text.is_empty() {
        writeln!(stdout)?;
        writeln!(stdout, "{}", record.text.trim_end())?;
    }
    Ok(())
}

/// Print matches as a JSON array (machine-readable output)
pub fn print_json(matches: &[SearchMatch]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(matches)?);
    Ok(())
}

/// Print a single record as JSON
pub fn print_record_json(record: &DocRecord) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

fn print_heading(stdout: &mut StandardStream, record: &DocRecord) -> io::Result<()> {
    stdout.set_color(ColorSpec::new().set_bold(true))?;
    write!(stdout, "{}", record.title)?;
    stdout.reset()?;
    write!(stdout, " ")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    writeln!(stdout, "[{}]", record.category.as_str())?;
    stdout.reset()?;

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
    write!(stdout, "{}", record.page)?;
    stdout.reset()?;
    if !record.location.is_empty() {
        write!(stdout, " ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(stdout, "{}", record.location)?;
        stdout.reset()?;
    }
    writeln!(stdout)?;

    Ok(())
}

fn print_snippet(stdout: &mut StandardStream, snippet: &Snippet) -> io::Result<()> {
    write!(stdout, "  ")?;
    if snippet.leading_ellipsis {
        write!(stdout, "...")?;
    }
    write!(stdout, "{}", snippet.before)?;
    if !snippet.matched.is_empty() {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stdout, "{}", snippet.matched)?;
        stdout.reset()?;
    }
    write!(stdout, "{}", snippet.after)?;
    if snippet.trailing_ellipsis {
        write!(stdout, "...")?;
    }
    writeln!(stdout)?;

    Ok(())
}

/// A one-line excerpt of a record's doc text around its first match
#[derive(Debug, PartialEq, Eq)]
struct Snippet {
    before: String,
    matched: String,
    after: String,
    leading_ellipsis: bool,
    trailing_ellipsis: bool,
}

/// Cut a snippet around `span`. Spans come from matching against the
/// lowercased text, so both ends are clamped to char boundaries of the
/// original before slicing.
fn build_snippet(text: &str, span: Option<(usize, usize)>) -> Option<Snippet> {
    if text.is_empty() {
        return None;
    }

    let (start, end) = match span {
        Some((s, e)) => {
            let start = floor_boundary(text, s);
            let end = ceil_boundary(text, e.max(s));
            (start, end)
        }
        None => (0, 0),
    };

    let window_start = floor_boundary(text, start.saturating_sub(SNIPPET_CONTEXT));
    let window_end = ceil_boundary(text, (end + SNIPPET_CONTEXT).min(text.len()));

    Some(Snippet {
        before: flatten(&text[window_start..start]),
        matched: flatten(&text[start..end]),
        after: flatten(&text[end..window_end]),
        leading_ellipsis: window_start > 0,
        trailing_ellipsis: window_end < text.len(),
    })
}

/// Collapse newlines and other control characters to spaces so the
/// snippet stays on one line
fn flatten(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn floor_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
