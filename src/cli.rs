use std::path::PathBuf;

use clap::Parser;

/// A small interactive shell with pipelines, redirections and `&&`/`||` chaining
#[derive(Parser, Debug)]
#[command(name = "shoal", version)]
pub struct Cli {
    /// Read settings from this file instead of ~/.config/shoal/config.shoal
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Evaluate a single line and exit with its status
    #[arg(short = 'c', value_name = "COMMAND")]
    pub command: Option<String>,
}
