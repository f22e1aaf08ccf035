//! Command-line arguments for the `comicgrab` binary.

use std::path::PathBuf;

use clap::Parser;

/// Search getcomics.org and download the comics you pick.
#[derive(Parser, Debug)]
#[command(name = "comicgrab")]
#[command(author, version, about)]
pub struct Args {
    /// Search term, e.g. "batman"
    pub search: String,

    /// Maximum number of results to collect
    #[arg(short = 'm', long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_results: u32,

    /// Write search results to search_results_<term>.json
    #[arg(long)]
    pub auto_save: bool,

    /// Download into ./Comics without asking
    #[arg(long, conflicts_with = "download_dir")]
    pub cwd: bool,

    /// Download into this directory without asking
    #[arg(short = 'd', long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Override the site root
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write log records to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
