//! Command line argument parsing for the fieldprobe CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalyzerKind;

/// fieldprobe - field existence queries over an in-memory full-text index
#[derive(Parser, Debug, Clone)]
#[command(name = "fieldprobe")]
#[command(about = "Field existence and non-existence queries over an in-memory full-text index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FieldprobeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Index configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "FIELDPROBE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Name of the meta field listing each document's fields
    #[arg(long, global = true)]
    pub meta_field: Option<String>,

    /// Analyzer for indexed text and query terms
    #[arg(long, global = true)]
    pub analyzer: Option<AnalyzerKind>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FieldprobeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Index the two sample documents and run the three existence queries
    Demo,

    /// Run a query string against documents loaded from a JSONL file
    Search(SearchArgs),

    /// Find documents that have a field
    Exists(ExistsArgs),

    /// Find documents that lack a field
    Missing(FieldArgs),

    /// Print the meta value of every document in a JSONL file
    Synthesize(DocumentsArgs),

    /// Show statistics of the index built from a JSONL file
    Stats(DocumentsArgs),
}

/// A JSONL document file.
#[derive(Parser, Debug, Clone)]
pub struct DocumentsArgs {
    /// Document file, one JSON object per line
    #[arg(value_name = "DOCUMENT_FILE")]
    pub documents: PathBuf,
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Document file, one JSON object per line
    #[arg(value_name = "DOCUMENT_FILE")]
    pub documents: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Field searched by terms without a field prefix (default: the meta field)
    #[arg(short = 'd', long)]
    pub default_field: Option<String>,

    /// Accept terms starting with '*' or '?'
    #[arg(long)]
    pub allow_leading_wildcard: bool,

    /// Maximum number of results to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// A field to test in a JSONL document file.
#[derive(Parser, Debug, Clone)]
pub struct FieldArgs {
    /// Document file, one JSON object per line
    #[arg(value_name = "DOCUMENT_FILE")]
    pub documents: PathBuf,

    /// Field whose presence is tested
    #[arg(value_name = "FIELD")]
    pub field: String,

    /// Maximum number of results to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the exists command
#[derive(Parser, Debug, Clone)]
pub struct ExistsArgs {
    #[command(flatten)]
    pub target: FieldArgs,

    /// Query the field itself with `*` instead of the meta field
    #[arg(long)]
    pub native: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_basic_search_command() {
        let args = FieldprobeArgs::try_parse_from([
            "fieldprobe",
            "search",
            "docs.jsonl",
            "* AND -origin",
            "--limit",
            "20",
            "--allow-leading-wildcard",
        ])
        .unwrap();

        if let Command::Search(search_args) = args.command {
            assert_eq!(search_args.documents, PathBuf::from("docs.jsonl"));
            assert_eq!(search_args.query, "* AND -origin");
            assert_eq!(search_args.limit, Some(20));
            assert!(search_args.allow_leading_wildcard);
            assert!(search_args.default_field.is_none());
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_exists_and_missing_commands() {
        let args = FieldprobeArgs::try_parse_from([
            "fieldprobe",
            "exists",
            "docs.jsonl",
            "source",
            "--native",
        ])
        .unwrap();
        if let Command::Exists(exists_args) = args.command {
            assert_eq!(exists_args.target.field, "source");
            assert!(exists_args.native);
        } else {
            panic!("Expected Exists command");
        }

        let args =
            FieldprobeArgs::try_parse_from(["fieldprobe", "missing", "docs.jsonl", "origin"])
                .unwrap();
        assert!(matches!(args.command, Command::Missing(ref a) if a.field == "origin"));
    }

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = FieldprobeArgs::try_parse_from(["fieldprobe", "demo"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Verbose flag
        let args = FieldprobeArgs::try_parse_from(["fieldprobe", "-v", "demo"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = FieldprobeArgs::try_parse_from(["fieldprobe", "-vv", "demo"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args = FieldprobeArgs::try_parse_from(["fieldprobe", "--quiet", "demo"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_global_options() {
        let args = FieldprobeArgs::try_parse_from([
            "fieldprobe",
            "demo",
            "--format",
            "json",
            "--pretty",
            "--analyzer",
            "whitespace",
            "--meta-field",
            "_fields",
        ])
        .unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.pretty);
        assert_eq!(args.analyzer, Some(AnalyzerKind::Whitespace));
        assert_eq!(args.meta_field.as_deref(), Some("_fields"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(FieldprobeArgs::try_parse_from(["fieldprobe", "--format", "yaml", "demo"]).is_err());
    }
}
