use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::load_document;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document JSON file
    pub document: PathBuf,
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let document = load_document(&args.document, cwd)?;
    let stats = document.stats();

    println!("{} {}", "✓".green(), args.document.display());
    println!("   Name:     {}", document.name);
    println!("   Blocks:   {}", stats.blocks);
    println!("   Headings: {}", document.headings().len());
    println!("   Styles:   {}", document.paragraph_styles().len() + document.character_styles().len());
    Ok(())
}
