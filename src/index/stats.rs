use crate::index::record::{Category, SearchIndex};
use anyhow::Result;
use std::path::Path;

/// Display index statistics
pub fn show_stats(index: &SearchIndex, path: &Path) -> Result<()> {
    println!("Index Statistics");
    println!("================");
    println!();
    println!("Index file:       {}", path.display());
    if let Ok(meta) = std::fs::metadata(path) {
        println!("File size:        {}", format_size(meta.len()));
    }
    println!("Record count:     {}", index.len());

    let api_entries = index.docs.iter().filter(|r| r.category.is_api_entry()).count();
    println!("API entries:      {}", api_entries);

    let text_bytes: u64 = index.docs.iter().map(|r| r.text.len() as u64).sum();
    println!("Doc text size:    {}", format_size(text_bytes));

    println!();
    println!("Records by category:");
    for cat in Category::ALL {
        let count = index.docs.iter().filter(|r| r.category == cat).count();
        println!("  {:10} {}", cat.as_str(), count);
    }

    println!();
    println!("Records by page:");
    for page in index.pages() {
        let count = index.docs.iter().filter(|r| r.page == page).count();
        println!("  {:20} {}", page, count);
    }

    Ok(())
}

/// Format byte size to human readable
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
