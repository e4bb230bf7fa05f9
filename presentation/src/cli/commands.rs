//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for one-shot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The answer as formatted text
    Text,
    /// The final session snapshot as JSON
    Json,
}

/// CLI arguments for docqa
#[derive(Parser, Debug)]
#[command(name = "docqa")]
#[command(author, version, about = "Ask questions about a PDF document")]
#[command(long_about = r#"
docqa uploads a PDF to a document question-answering service and lets you
ask questions about it.

Configuration is merged from (highest priority first):
1. Command line flags   --api-url, --timeout, --transcript
2. Environment          DOCQA_API_URL, DOCQA_<SECTION>__<KEY>
3. --config <path>      Explicit config file
4. ./docqa.toml         Project-level config
5. ~/.config/docqa/config.toml   Global config

Example:
  docqa --file report.pdf "What is the total?"
  docqa --file report.pdf --output json "Who signed it?"
  docqa --chat --file report.pdf
"#)]
pub struct Cli {
    /// The question to ask (not used in chat mode)
    pub question: Option<String>,

    /// PDF document to upload before asking
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Base URL of the document service
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Append the conversation to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
