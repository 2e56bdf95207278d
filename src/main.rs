mod index;
mod output;
mod query;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use index::record::SearchIndex;
use std::path::PathBuf;
use termcolor::ColorChoice;

#[derive(Parser)]
#[command(name = "dsq")]
#[command(about = "Query tool for Documenter-style documentation search indexes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search query (when no subcommand is given)
    #[arg(trailing_var_arg = true)]
    query: Vec<String>,

    /// Path to the search index file
    #[arg(short, long, default_value = "search_index.js", global = true)]
    index: PathBuf,

    /// Emit machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// When to use colored output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search the index
    Search {
        /// Query terms (supports "phrases", re:/regex/, cat:, page:, in:,
        /// sort:, top:, ^boost, -, |)
        query: Vec<String>,
    },
    /// Look up the record at an exact location anchor
    Get {
        /// Location anchor, e.g. "#TransferFunctions.psf"
        location: String,
    },
    /// List documentation pages
    Pages,
    /// Show index statistics
    Stats,
    /// Check index invariants
    Validate,
    /// Normalize the index to plain JSON (strips the JS wrapper)
    Export {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let color = cli.color.choice();
    let idx = index::load_index(&cli.index)?;

    match cli.command {
        Some(Commands::Search { query }) => {
            run_search(&idx, &query.join(" "), cli.json, color)?;
        }
        Some(Commands::Get { location }) => {
            run_get(&idx, &location, cli.json, color)?;
        }
        Some(Commands::Pages) => {
            for page in idx.pages() {
                println!("{}", page);
            }
        }
        Some(Commands::Stats) => {
            index::stats::show_stats(&idx, &cli.index)?;
        }
        Some(Commands::Validate) => {
            run_validate(&idx)?;
        }
        Some(Commands::Export { output, pretty }) => {
            run_export(&idx, output, pretty)?;
        }
        None => {
            if cli.query.is_empty() {
                Cli::command().print_help()?;
                std::process::exit(2);
            }
            run_search(&idx, &cli.query.join(" "), cli.json, color)?;
        }
    }

    Ok(())
}

fn run_search(idx: &SearchIndex, input: &str, json: bool, color: ColorChoice) -> Result<()> {
    let parsed = query::parse_query(input);
    let executor = query::QueryExecutor::new(idx);
    let matches = executor.execute(&parsed)?;

    if json {
        output::print_json(&matches)?;
    } else {
        output::print_matches(&matches, color)?;
    }

    // grep convention: no matches is exit code 1
    if matches.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_get(idx: &SearchIndex, location: &str, json: bool, color: ColorChoice) -> Result<()> {
    match idx.record_at(location) {
        Some(record) => {
            if json {
                output::print_record_json(record)?;
            } else {
                output::print_record(record, color)?;
            }
            Ok(())
        }
        None => {
            eprintln!("no record at location: {}", location);
            std::process::exit(1);
        }
    }
}

fn run_validate(idx: &SearchIndex) -> Result<()> {
    let issues = index::validate::validate_index(idx);

    if issues.is_empty() {
        println!("OK: {} records, no issues", idx.len());
        return Ok(());
    }

    for issue in &issues {
        println!(
            "record {} ({}): {}",
            issue.index,
            if issue.location.is_empty() {
                "<empty>"
            } else {
                issue.location.as_str()
            },
            issue.message
        );
    }
    eprintln!("{} issue(s) found", issues.len());
    std::process::exit(1);
}

fn run_export(idx: &SearchIndex, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    let json = if pretty {
        index::loader::to_json_string_pretty(idx)?
    } else {
        index::loader::to_json_string(idx)?
    };

    match output {
        Some(path) => {
            use anyhow::Context;
            std::fs::write(&path, json + "\n")
                .with_context(|| format!("failed to write: {}", path.display()))?;
        }
        None => println!("{}", json),
    }

    Ok(())
}
