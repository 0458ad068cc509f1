//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::Parser;

/// Blade template client-script pipeline.
#[derive(Debug, Parser)]
#[command(name = "amalgam")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Project root directory
    #[arg(long, default_value = ".")]
    pub root: Utf8PathBuf,

    /// Views directory to scan, relative to the root (overrides the config
    /// file)
    #[arg(long)]
    pub views: Option<Utf8PathBuf>,

    /// Output directory for generated modules, relative to the root
    #[arg(long = "out-dir", default_value = ".amalgam")]
    pub out_dir: Utf8PathBuf,

    /// Watch mode
    #[arg(long)]
    pub watch: bool,

    /// Disable watch-file registration (overrides the config file)
    #[arg(long = "no-watch-files")]
    pub no_watch_files: bool,

    /// Glob patterns to ignore during discovery
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Print generated module sources to stdout
    #[arg(long)]
    pub emit: bool,
}
