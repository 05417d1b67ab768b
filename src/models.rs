pub mod analyzer_config;
pub use analyzer_config::AnalyzerConfig;

pub mod bounded_ranking;
pub use bounded_ranking::{BoundedRanking, RankedPost};

pub mod daily_trend_aggregator;
pub use daily_trend_aggregator::{DailyTrendAggregator, DailyTrendRow};

pub mod document;
pub use document::{Document, PostType};

pub mod document_consumer;
pub use document_consumer::DocumentConsumer;

pub mod document_filter;
pub use document_filter::{DateRange, DocumentFilter};

pub mod document_reader;
pub use document_reader::{DocumentReader, ReaderStats};

pub mod error;
pub use error::Error;

pub mod mention_analyzer;
pub use mention_analyzer::{AnalysisOutcome, MentionAnalyzer, RunSummary};

pub mod persistence;
#[cfg(feature = "sqlite")]
pub use persistence::SqliteTechnologyStore;
pub use persistence::{BatchWriteStats, PendingDocument, PersistenceAdapter, TechnologyStore};

pub mod report_writer;
pub use report_writer::{
    write_daily_trends, write_detail_report, write_technology_reports, DailyTrendExport,
    DocumentSortOrder, FilteredDocumentExport, MatchEmitter,
};

pub mod technology_aggregator;
pub use technology_aggregator::{TechnologyAggregate, TechnologyAggregator, TechnologyReport};

pub mod technology_token_mapper;
pub use technology_token_mapper::TechnologyTokenMapper;

pub mod technology_token_processor;
pub use technology_token_processor::TechnologyTokenProcessor;

pub mod token_mapper;
pub use token_mapper::TokenMapper;

pub mod tokenizer;
pub use tokenizer::Tokenizer;

pub mod vocabulary;
pub use vocabulary::{Vocabulary, VocabularyEntry};
