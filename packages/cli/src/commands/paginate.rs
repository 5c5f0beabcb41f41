use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use folio_layout::LayoutStore;
use folio_render::{MonospaceMeasurer, NoAssets, Renderer};
use std::fs;
use std::path::PathBuf;

use super::{load_document, resolve};
use crate::config::Config;

#[derive(Args, Debug)]
pub struct PaginateArgs {
    /// Layout JSON file
    pub layout: PathBuf,

    /// Document flowed into frames marked `flowDocument`
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Write the display lists as JSON
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

pub fn paginate(args: PaginateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let layout_path = resolve(&args.layout, cwd);
    let json = fs::read_to_string(&layout_path).with_context(|| format!("Cannot read {}", layout_path.display()))?;
    let mut store = LayoutStore::from_json(&json, config.layout_settings())
        .with_context(|| format!("Invalid layout {}", layout_path.display()))?;

    let document = args.document.as_deref().map(|path| load_document(path, cwd)).transpose()?;

    let measurer = MonospaceMeasurer::new(config.char_width_ratio);
    let output = Renderer::new(&measurer, &NoAssets).paginate(&mut store, document.as_ref());

    println!("📐 {} {}", "Paginated".green().bold(), layout_path.display());
    for page in &output.pages {
        println!("   Page {}: {} paint ops", page.page_number, page.ops.len());
    }
    for frame_id in &output.overflowed {
        println!("   {} Text overflows frame {}", "⚠".yellow(), frame_id.yellow());
    }

    if let Some(out) = args.out {
        let out = resolve(&out, cwd);
        fs::write(&out, serde_json::to_string_pretty(&output)?).with_context(|| format!("Cannot write {}", out.display()))?;
        println!("   Output: {}", out.display());
    }
    Ok(())
}
