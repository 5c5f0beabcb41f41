use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::load_document;

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Document JSON file
    pub document: PathBuf,
}

pub fn index(args: IndexArgs, cwd: &str) -> Result<()> {
    let document = load_document(&args.document, cwd)?;
    let groups = document.grouped_index();

    if groups.is_empty() {
        println!("{} Index is empty", "ℹ".blue());
        return Ok(());
    }
    for group in groups {
        println!("{}", group.letter.bold());
        for entry in group.entries {
            println!("   {}  {}", entry.terms.join(", "), entry.page_number.to_string().dimmed());
        }
    }
    Ok(())
}
