use crate::config::Preset;
use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,

    /// Configuration file; defaults to the usual lookup locations.
    #[clap(long, value_parser)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank records from a JSON file against a query
    Search {
        query: String,

        #[clap(short, long, value_parser)]
        input: PathBuf,

        #[clap(long, value_enum)]
        preset: Option<Preset>,

        #[clap(long, value_parser, use_value_delimiter = true)]
        fields: Option<Vec<String>>,

        #[clap(long, value_parser)]
        threshold: Option<f64>,

        #[clap(long, value_parser)]
        max_results: Option<usize>,

        #[clap(long, value_parser, default_value_t = false)]
        case_sensitive: bool,

        #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Print only the ranked results, without summary or suggestions
        #[clap(short, long, value_parser, default_value_t = false)]
        quiet: bool,
    },
    /// List the field paths discovered on the first record
    Fields {
        #[clap(short, long, value_parser)]
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
