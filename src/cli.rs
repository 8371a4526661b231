use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Firefox,
    Chrome,
}

impl Browser {
    pub fn label(self) -> &'static str {
        match self {
            Browser::Firefox => "firefox",
            Browser::Chrome => "chrome",
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ExportFormat {
    Csv,
    Jsonl,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Browser to inspect (prompted interactively when omitted)
    #[arg(short, long, value_enum)]
    pub browser: Option<Browser>,

    /// Maximum number of visit records to fetch, or "all"
    #[arg(short, long)]
    pub limit: Option<String>,

    /// Export results to this file without prompting
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Export format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Read this history database directly instead of searching profiles
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Never prompt; unanswered options take their defaults
    #[arg(long)]
    pub non_interactive: bool,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}
