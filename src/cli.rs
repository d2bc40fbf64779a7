use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Raw syntax tree (.json) produced by the BAF parser
    pub input: PathBuf,
    /// Output directory
    pub output: PathBuf,
    /// Trigger/action signature catalog (.json)
    #[arg(short, long)]
    pub catalog: PathBuf,
    /// IDS tables: a .json bundle or a directory of .ids files
    #[arg(short, long)]
    pub ids: PathBuf,
    /// Transform options (.json)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Object target layout preset (bg, iwd2)
    #[arg(long)]
    pub target: Option<String>,
    /// Warn about long strings, non-ASCII text and out-of-range values
    #[arg(long)]
    pub pedantic: bool,
    /// Require exact function and symbol names
    #[arg(long)]
    pub exact: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
