mod config;
pub use config::{
    DEFAULT_MAX_FLUSH_ATTEMPTS, DEFAULT_PERSISTENCE_BATCH_SIZE, DEFAULT_PROGRESS_INTERVAL,
    DEFAULT_TOP_K,
};
mod constants;
pub mod models;
#[cfg(feature = "sqlite")]
pub use models::SqliteTechnologyStore;
pub use models::{
    write_daily_trends, write_detail_report, write_technology_reports, AnalysisOutcome,
    AnalyzerConfig, BatchWriteStats, BoundedRanking, DailyTrendAggregator, DailyTrendExport,
    DailyTrendRow, DateRange, Document, DocumentConsumer, DocumentFilter, DocumentReader,
    DocumentSortOrder, Error, FilteredDocumentExport, MatchEmitter, MentionAnalyzer,
    PendingDocument, PersistenceAdapter, PostType, RankedPost, ReaderStats, RunSummary,
    TechnologyAggregate, TechnologyAggregator, TechnologyReport, TechnologyStore,
    TechnologyTokenMapper, TechnologyTokenProcessor, TokenMapper, Tokenizer, Vocabulary,
    VocabularyEntry,
};
pub mod types;
pub mod utils;
pub use types::{
    DocumentId, DocumentSequence, MentionCount, StoreTechnologyId, TechnologyIndex,
    TechnologyName, Token, TokenId, TokenRef, ViewCount,
};

use chrono::Utc;
use log::info;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Counts technology mentions in already-parsed documents with the default filter
/// (primary posts only, no date window).
///
/// Returns one report per surviving vocabulary entry, by total views descending.
pub fn analyze_documents<N, S, D>(
    technology_names: N,
    documents: D,
    top_k: usize,
) -> Result<Vec<TechnologyReport>, Error>
where
    N: IntoIterator<Item = S>,
    S: AsRef<str>,
    D: IntoIterator<Item = Document>,
{
    let vocabulary = Vocabulary::from_names(technology_names)?;
    let mention_analyzer =
        MentionAnalyzer::new(vocabulary, DocumentFilter::primary_posts(), top_k)?;

    let mut no_consumers: [&mut dyn DocumentConsumer; 0] = [];
    let analysis_outcome = mention_analyzer.run_documents(documents, &mut no_consumers)?;

    Ok(analysis_outcome.reports)
}

/// Runs a complete analysis as described by `config`.
///
/// All configuration problems (missing inputs, bad dates, an empty vocabulary, an unknown
/// detail technology, an empty target store, unwritable outputs) are reported before the
/// corpus is opened for scanning.
pub fn run_analysis(config: &AnalyzerConfig) -> Result<RunSummary, Error> {
    config.validate()?;

    let today = Utc::now().date_naive();

    let vocabulary = Vocabulary::from_csv_path(&config.vocabulary_path)?;
    info!(
        "Loaded {} technologies ({} excluded as noise)",
        vocabulary.len(),
        vocabulary.excluded().len()
    );

    let document_filter = match config.date_range(today)? {
        Some(date_range) => {
            info!("Date window: {}", date_range);
            DocumentFilter::with_date_range(date_range)
        }
        None => DocumentFilter::primary_posts(),
    };

    let detail_technology_index = match &config.detail_technology {
        Some(detail_technology) => Some(vocabulary.find(detail_technology).ok_or_else(|| {
            Error::ConfigError(format!(
                "Detail technology '{}' is not in the filtered vocabulary",
                detail_technology
            ))
        })?),
        None => None,
    };

    let mut consumers: Vec<Box<dyn DocumentConsumer>> = Vec::new();

    if let Some(persistence_adapter) = open_persistence_adapter(config, &vocabulary)? {
        consumers.push(persistence_adapter);
    }

    if let Some(matches_output_path) = &config.matches_output_path {
        consumers.push(Box::new(MatchEmitter::new(create_output(
            matches_output_path,
        )?)));
    }

    if let Some(filtered_output_path) = &config.filtered_output_path {
        consumers.push(Box::new(FilteredDocumentExport::new(
            create_output(filtered_output_path)?,
            config.filtered_sort,
        )));
    }

    if let Some(trends_output_path) = &config.trends_output_path {
        consumers.push(Box::new(DailyTrendExport::new(create_output(
            trends_output_path,
        )?)));
    }

    let main_output = create_output(&config.output_path)?;

    let detail_output = match detail_technology_index.and_then(|index| vocabulary.get(index)) {
        Some(entry) => Some(create_output(
            &config.resolve_detail_output_path(&entry.normalized_name),
        )?),
        None => None,
    };

    let mut document_reader =
        DocumentReader::from_path(&config.corpus_path)?.with_row_limit(config.row_limit);

    let mention_analyzer = MentionAnalyzer::new(vocabulary, document_filter, config.top_k)?
        .with_progress_interval(config.progress_interval);

    let mut consumer_refs: Vec<&mut dyn DocumentConsumer> = consumers
        .iter_mut()
        .map(|consumer| consumer.as_mut() as &mut dyn DocumentConsumer)
        .collect();

    let analysis_outcome = mention_analyzer.run(&mut document_reader, &mut consumer_refs)?;

    write_technology_reports(
        main_output,
        &analysis_outcome.reports,
        config.include_top_posts,
    )?;
    info!("Wrote {}", config.output_path.display());

    if let (Some(detail_technology_index), Some(detail_output)) =
        (detail_technology_index, detail_output)
    {
        if let Some(report) = analysis_outcome
            .reports
            .iter()
            .find(|report| report.technology_index == detail_technology_index)
        {
            write_detail_report(detail_output, report)?;
            info!(
                "Wrote detail extract for {} ({} posts)",
                report.name,
                report.top_posts.len()
            );
        }
    }

    Ok(analysis_outcome.summary)
}

/// Creates an output file, including missing parent directories.
fn create_output(path: &Path) -> Result<BufWriter<File>, Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigError(format!(
                    "Cannot create output directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(|e| {
        Error::ConfigError(format!("Cannot create output file {}: {}", path.display(), e))
    })?;

    Ok(BufWriter::new(file))
}

#[cfg(feature = "sqlite")]
fn open_persistence_adapter(
    config: &AnalyzerConfig,
    vocabulary: &Vocabulary,
) -> Result<Option<Box<dyn DocumentConsumer>>, Error> {
    if !config.persist {
        return Ok(None);
    }

    let store_path = config.store_path.as_deref().ok_or_else(|| {
        Error::ConfigError("Persisting results requires a store path".to_string())
    })?;

    let store = SqliteTechnologyStore::open(store_path)?;
    let persistence_adapter = PersistenceAdapter::new(
        store,
        vocabulary,
        config.batch_size,
        config.max_flush_attempts,
    )?;

    Ok(Some(Box::new(persistence_adapter)))
}

#[cfg(not(feature = "sqlite"))]
fn open_persistence_adapter(
    config: &AnalyzerConfig,
    _vocabulary: &Vocabulary,
) -> Result<Option<Box<dyn DocumentConsumer>>, Error> {
    if config.persist {
        return Err(Error::ConfigError(
            "This build has no persistence backend; enable the `sqlite` feature".to_string(),
        ));
    }

    Ok(None)
}
