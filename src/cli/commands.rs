//! Command implementations for the fieldprobe CLI.

use std::io;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::demo::run_demo;
use crate::document::converter::DocumentConverter;
use crate::document::converter::jsonl::JsonlDocumentConverter;
use crate::error::Result;
use crate::index::config::IndexConfig;
use crate::index::ram::{IndexStats, RamIndex};
use crate::meta::{ExistenceQuery, MetaFieldSynthesizer};
use crate::query::QueryParser;
use crate::search::{IndexSearcher, QueryReport};

/// Execute a CLI command.
pub fn execute_command(args: FieldprobeArgs) -> Result<()> {
    let config = load_config(&args)?;

    match &args.command {
        Command::Demo => demo(&config, &args),
        Command::Search(search_args) => {
            let report = search_documents(search_args, &config)?;
            output_report(&report, &args)
        }
        Command::Exists(exists_args) => {
            let report = exists(exists_args, &config)?;
            output_report(&report, &args)
        }
        Command::Missing(field_args) => {
            let report = missing(field_args, &config)?;
            output_report(&report, &args)
        }
        Command::Synthesize(documents_args) => {
            let entries = synthesize_file(&documents_args.documents, &config)?;
            output_result("Meta values", &entries, &args)
        }
        Command::Stats(documents_args) => {
            let stats = stats_for_file(&documents_args.documents, &config)?;
            output_result("Index statistics", &stats, &args)
        }
    }
}

/// Build the index configuration from `--config` and the override flags.
pub fn load_config(args: &FieldprobeArgs) -> Result<IndexConfig> {
    let mut config = match &args.config {
        Some(path) => IndexConfig::from_file(path)?,
        None => IndexConfig::default(),
    };

    if let Some(meta_field) = &args.meta_field {
        config.meta_field = meta_field.clone();
    }
    if let Some(analyzer) = args.analyzer {
        config.analyzer = analyzer;
    }

    config.validate()?;
    Ok(config)
}

/// Read a JSONL file into a fresh index, attaching the meta field to every
/// document. Returns the index and the meta values in file order.
pub fn load_index<P: AsRef<Path>>(path: P, config: &IndexConfig) -> Result<(RamIndex, Vec<String>)> {
    let path = path.as_ref();
    let index = RamIndex::create(config.clone())?;
    let synthesizer = MetaFieldSynthesizer::new(config.meta_field.clone());

    let mut field_names = Vec::new();
    let mut writer = index.writer()?;
    for doc in JsonlDocumentConverter::new().convert(path)? {
        let mut doc = doc?;
        field_names.push(synthesizer.attach(&mut doc)?);
        writer.add_document(doc)?;
    }
    writer.close()?;

    info!(
        "Indexed {} documents from {}",
        field_names.len(),
        path.display()
    );
    Ok((index, field_names))
}

fn searcher_for<P: AsRef<Path>>(path: P, config: &IndexConfig) -> Result<IndexSearcher> {
    let (index, _) = load_index(path, config)?;
    Ok(IndexSearcher::new(index.reader()?))
}

/// Run a free-form query string.
pub fn search_documents(args: &SearchArgs, config: &IndexConfig) -> Result<QueryReport> {
    let searcher = searcher_for(&args.documents, config)?;
    let default_field = args
        .default_field
        .clone()
        .unwrap_or_else(|| config.meta_field.clone());
    let parser = QueryParser::new(searcher.reader().analyzer())
        .with_default_field(default_field)
        .with_allow_leading_wildcard(args.allow_leading_wildcard || config.allow_leading_wildcard);

    searcher.run_query_string(
        &args.query,
        &parser,
        &args.query,
        args.limit.unwrap_or(config.max_results),
    )
}

/// Find documents that have a field.
pub fn exists(args: &ExistsArgs, config: &IndexConfig) -> Result<QueryReport> {
    let target = &args.target;
    let query = if args.native {
        ExistenceQuery::native_exists(target.field.clone())
    } else {
        ExistenceQuery::exists(config.meta_field.clone(), target.field.clone())
    };

    searcher_for(&target.documents, config)?
        .run_existence(&query, target.limit.unwrap_or(config.max_results))
}

/// Find documents that lack a field.
pub fn missing(args: &FieldArgs, config: &IndexConfig) -> Result<QueryReport> {
    let query = ExistenceQuery::missing(config.meta_field.clone(), args.field.clone());
    searcher_for(&args.documents, config)?
        .run_existence(&query, args.limit.unwrap_or(config.max_results))
}

/// The meta value computed for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesizedDocument {
    /// Position of the document in the file, starting at 0.
    pub doc_id: u32,
    /// The synthesized value.
    pub field_names: String,
}

/// Compute the meta value of every document in a JSONL file.
pub fn synthesize_file<P: AsRef<Path>>(
    path: P,
    config: &IndexConfig,
) -> Result<Vec<SynthesizedDocument>> {
    let (_, values) = load_index(path, config)?;
    Ok(values
        .into_iter()
        .zip(0u32..)
        .map(|(field_names, doc_id)| SynthesizedDocument {
            doc_id,
            field_names,
        })
        .collect())
}

/// Index statistics of a JSONL file.
pub fn stats_for_file<P: AsRef<Path>>(path: P, config: &IndexConfig) -> Result<IndexStats> {
    let (index, _) = load_index(path, config)?;
    Ok(index.stats())
}

fn demo(config: &IndexConfig, args: &FieldprobeArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            run_demo(config, &mut io::stdout().lock())?;
            Ok(())
        }
        OutputFormat::Json => {
            let report = run_demo(config, &mut io::sink())?;
            output_result("Demo", &report, args)
        }
    }
}
