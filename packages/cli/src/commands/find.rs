use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{EditSession, SearchOptions};
use folio_model::node::node_at;
use std::fs;
use std::path::PathBuf;

use super::{load_document, resolve};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Document JSON file
    pub document: PathBuf,

    /// Text or pattern to look for
    pub query: String,

    /// Treat the query as a regular expression
    #[arg(long)]
    pub regex: bool,

    #[arg(long)]
    pub case_sensitive: bool,

    /// Only match whole words
    #[arg(long)]
    pub whole_word: bool,

    /// Replace every match and write the document back
    #[arg(long)]
    pub replace: Option<String>,
}

pub fn find(args: FindArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let document = load_document(&args.document, cwd)?;
    let mut session = EditSession::with_settings(document, config.editor_settings());

    let options = SearchOptions {
        case_sensitive: args.case_sensitive,
        whole_word: args.whole_word,
        use_regex: args.regex,
    };
    let count = session.find(&args.query, options);

    if count == 0 {
        println!("{} No matches for {}", "ℹ".blue(), args.query.bold());
        return Ok(());
    }

    for hit in session.search().matches() {
        let run = node_at(session.document().content(), &hit.path).map(|node| node.text_content()).unwrap_or_default();
        let before: String = run.chars().take(hit.offset).collect();
        let found: String = run.chars().skip(hit.offset).take(hit.length).collect();
        let after: String = run.chars().skip(hit.offset + hit.length).collect();
        println!("   {:?}:{}  {}{}{}", hit.path, hit.offset, before.dimmed(), found.yellow().bold(), after.dimmed());
    }

    let Some(replacement) = args.replace else {
        println!();
        println!("   {} {}", "Matches:".green(), count);
        return Ok(());
    };

    let replaced = session.replace_all(&replacement)?;
    let path = resolve(&args.document, cwd);
    let json = session.document().to_json()?;
    fs::write(&path, json).with_context(|| format!("Cannot write {}", path.display()))?;

    println!();
    println!("✨ {} {} matches in {}", "Replaced".green().bold(), replaced, path.display());
    Ok(())
}
