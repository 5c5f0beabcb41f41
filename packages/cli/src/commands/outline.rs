use anyhow::Result;
use clap::Args;
use colored::Colorize;
use folio_editor::OutlineEntry;
use std::path::PathBuf;

use super::load_document;

#[derive(Args, Debug)]
pub struct OutlineArgs {
    /// Document JSON file
    pub document: PathBuf,
}

pub fn outline(args: OutlineArgs, cwd: &str) -> Result<()> {
    let document = load_document(&args.document, cwd)?;
    let entries = document.outline();

    if entries.is_empty() {
        println!("{} No headings", "ℹ".blue());
        return Ok(());
    }
    for entry in entries {
        print_entry(entry, 0);
    }
    Ok(())
}

fn print_entry(entry: &OutlineEntry, depth: usize) {
    let marker = format!("H{}", entry.level);
    println!("{}{} {} {}", "  ".repeat(depth), marker.dimmed(), entry.title.bold(), format!("#{}", entry.id).dimmed());
    for child in &entry.children {
        print_entry(child, depth + 1);
    }
}
