use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Stream the entries of one directory through a plugin pipeline.
#[derive(Clone, Parser)]
#[command(name = "dirstream")]
#[command(about = "List one directory (no recursion) through ordered plugins; one entry per line.")]
pub struct Cli {
    /// Directory to list. Resolved against --cwd. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Working directory DIR is resolved against. Default: process working directory.
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Built-in plugins, run in the given order: no-hidden, exclude:GLOB, ext:.a,.b, tag:K=V, match:GLOB
    #[arg(long, short = 'p', num_args = 1..)]
    pub plugin: Vec<String>,

    /// Exclude entries whose name matches (glob syntax). Can specify multiple: -e pattern1 pattern2
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Only list entries whose name matches (glob syntax; leading ! negates). Applied before records are built.
    #[arg(long = "match", short = 'm', num_args = 1..)]
    pub matches: Vec<String>,

    /// Print one JSON object per entry instead of its path.
    #[arg(long, short = 'j', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Follow a symlinked DIR.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Records buffered between the lister and the printer.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub channel_cap: Option<usize>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
