use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::load_document;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Document JSON file
    pub document: PathBuf,
}

pub fn stats(args: StatsArgs, cwd: &str) -> Result<()> {
    let document = load_document(&args.document, cwd)?;
    let stats = document.stats();

    println!("📄 {}", document.name.bold());
    println!("   Words:         {}", stats.words);
    println!("   Characters:    {}", stats.characters);
    println!("   Blocks:        {}", stats.blocks);
    println!("   Headings:      {}", document.headings().len());
    println!("   Index entries: {}", document.index_entries().len());
    println!("   Modified:      {}", document.modified.to_rfc3339());
    Ok(())
}
