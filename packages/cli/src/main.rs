mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    find, index, outline, paginate, stats, validate, FindArgs, IndexArgs, OutlineArgs, PaginateArgs, StatsArgs,
    ValidateArgs,
};
use tracing_subscriber::EnvFilter;

/// Folio CLI - structured documents and page layout
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a document loads and passes validation
    Validate(ValidateArgs),

    /// Print the heading outline
    Outline(OutlineArgs),

    /// Search document text, optionally replacing matches
    Find(FindArgs),

    /// Print the sorted, grouped index
    Index(IndexArgs),

    /// Word and block counts
    Stats(StatsArgs),

    /// Flow text through a layout and report overflow
    Paginate(PaginateArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Validate(args) => validate(args, &cwd),
        Command::Outline(args) => outline(args, &cwd),
        Command::Find(args) => find(args, &cwd),
        Command::Index(args) => index(args, &cwd),
        Command::Stats(args) => stats(args, &cwd),
        Command::Paginate(args) => paginate(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
