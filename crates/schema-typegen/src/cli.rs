use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate type definitions for every JSON Schema under a directory"
)]
pub struct TypegenArgs {
    /// Root folder containing the schema directory
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Path to KDL config file (default: <ROOT>/typegen.kdl, if present)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Schema directory, relative to the root
    #[arg(short = 's', long)]
    pub schemas: Option<PathBuf>,

    /// Output directory, relative to the root
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Target language (ts, typescript, swift)
    #[arg(short = 'l', long)]
    pub language: Option<String>,

    /// Skip schemas whose path contains this text; repeatable, replaces the default "ignore"
    #[arg(long = "exclude", value_name = "MARKER")]
    pub exclude: Vec<String>,

    /// quicktype executable to run
    #[arg(long, value_name = "PROGRAM")]
    pub quicktype: Option<PathBuf>,

    /// Exit with a non-zero status if any schema failed to generate
    #[arg(long)]
    pub fail_on_error: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
