use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pdftext_parse::InterpretOptions;

/// Extract text and dump tokens from decoded PDF content streams.
#[derive(Debug, Parser)]
#[command(name = "pdftext", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract text runs from the parts of one content stream
    Text {
        /// Content-stream parts, in order
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,

        /// Decode strings as two-byte UTF-16BE codes instead of Latin-1
        #[arg(long)]
        two_byte: bool,

        #[command(flatten)]
        limits: LimitArgs,
    },

    /// Dump assembled objects or grouped commands
    Tokens {
        /// Content-stream file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Group operands with their operator, one command per line
        #[arg(long)]
        commands: bool,

        #[command(flatten)]
        limits: LimitArgs,
    },
}

/// Tokenizer and interpreter limits shared by all subcommands.
#[derive(Debug, Clone, Args)]
pub struct LimitArgs {
    /// Concatenate parts without a separating space
    #[arg(long)]
    pub no_part_separator: bool,

    /// Deepest array/dictionary nesting accepted
    #[arg(long, value_name = "N", default_value_t = 64)]
    pub max_depth: usize,
}

impl LimitArgs {
    pub fn to_options(&self) -> InterpretOptions {
        InterpretOptions {
            separate_parts: !self.no_part_separator,
            max_nesting_depth: self.max_depth,
            ..InterpretOptions::default()
        }
    }
}

/// Output format for the text subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum TextFormat {
    /// One decoded run per line
    Text,
    /// One JSON object per run
    Json,
}
