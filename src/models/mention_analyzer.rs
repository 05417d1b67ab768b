use crate::types::{DocumentSequence, TechnologyIndex};
use crate::{
    Document, DocumentConsumer, DocumentFilter, DocumentReader, Error, TechnologyAggregator,
    TechnologyReport, TechnologyTokenProcessor, Vocabulary,
};
use log::info;
use std::io::BufRead;

/// Counters of a finished pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Units read from the corpus, whatever their type.
    pub scanned: u64,
    /// Documents which passed the type/date filter.
    pub processed: u64,
    /// Processed documents mentioning at least one technology.
    pub matched: u64,
    /// Malformed units plus fields that fell back to a default.
    pub anomalies: u64,
    pub malformed: u64,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// One report per vocabulary entry, by total views descending.
    pub reports: Vec<TechnologyReport>,
    pub summary: RunSummary,
}

/// Mutable state of one pass. Lives only as long as the pass does.
struct PassState {
    technology_aggregator: TechnologyAggregator,
    processed: u64,
    matched: u64,
}

/// The single-pass pipeline: filter, match, aggregate, and hand results to the attached
/// consumers.
///
/// The analyzer itself is immutable; all run state belongs to the pass in progress, so
/// the same analyzer can run several passes.
pub struct MentionAnalyzer {
    vocabulary: Vocabulary,
    technology_token_processor: TechnologyTokenProcessor,
    document_filter: DocumentFilter,
    top_k: usize,
    progress_interval: u64,
}

impl MentionAnalyzer {
    pub fn new(
        vocabulary: Vocabulary,
        document_filter: DocumentFilter,
        top_k: usize,
    ) -> Result<Self, Error> {
        let technology_token_processor = TechnologyTokenProcessor::new(&vocabulary)?;

        Ok(MentionAnalyzer {
            vocabulary,
            technology_token_processor,
            document_filter,
            top_k,
            progress_interval: 0,
        })
    }

    /// Logs progress every `progress_interval` scanned rows; `0` disables it.
    pub fn with_progress_interval(mut self, progress_interval: u64) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn document_filter(&self) -> &DocumentFilter {
        &self.document_filter
    }

    /// Matches a single document, or returns `None` if the filter rejects it.
    pub fn match_document(&self, document: &Document) -> Option<Vec<TechnologyIndex>> {
        if !self.document_filter.accepts(document) {
            return None;
        }

        Some(self.technology_token_processor.process_document(document))
    }

    /// Runs one pass over a corpus reader.
    ///
    /// Consumer failures abort the pass; per-document anomalies never do.
    pub fn run<R: BufRead>(
        &self,
        document_reader: &mut DocumentReader<R>,
        consumers: &mut [&mut dyn DocumentConsumer],
    ) -> Result<AnalysisOutcome, Error> {
        let mut pass_state = self.start_pass();
        let mut next_progress_at = self.progress_interval;

        while let Some(document) = document_reader.next() {
            self.process(&mut pass_state, &document, consumers)?;

            if self.progress_interval > 0 {
                let reader_stats = document_reader.stats();

                if reader_stats.scanned >= next_progress_at {
                    info!(
                        "scanned={} processed={} anomalies={}",
                        reader_stats.scanned, pass_state.processed, reader_stats.anomalies
                    );

                    while next_progress_at <= reader_stats.scanned {
                        next_progress_at += self.progress_interval;
                    }
                }
            }
        }

        let reader_stats = document_reader.stats();

        self.finish_pass(
            pass_state,
            consumers,
            RunSummary {
                scanned: reader_stats.scanned,
                anomalies: reader_stats.anomalies,
                malformed: reader_stats.malformed,
                ..RunSummary::default()
            },
        )
    }

    /// Runs one pass over already-parsed documents.
    pub fn run_documents<I>(
        &self,
        documents: I,
        consumers: &mut [&mut dyn DocumentConsumer],
    ) -> Result<AnalysisOutcome, Error>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut pass_state = self.start_pass();
        let mut scanned = 0;

        for document in documents {
            scanned += 1;
            self.process(&mut pass_state, &document, consumers)?;
        }

        self.finish_pass(
            pass_state,
            consumers,
            RunSummary {
                scanned,
                ..RunSummary::default()
            },
        )
    }

    fn start_pass(&self) -> PassState {
        PassState {
            technology_aggregator: TechnologyAggregator::new(&self.vocabulary, self.top_k),
            processed: 0,
            matched: 0,
        }
    }

    fn process(
        &self,
        pass_state: &mut PassState,
        document: &Document,
        consumers: &mut [&mut dyn DocumentConsumer],
    ) -> Result<(), Error> {
        let Some(matches) = self.match_document(document) else {
            return Ok(());
        };

        // Position among processed documents; breaks top-K ties in corpus order
        let sequence: DocumentSequence = pass_state.processed;
        pass_state.processed += 1;

        if !matches.is_empty() {
            pass_state.matched += 1;
        }

        pass_state
            .technology_aggregator
            .record(document, sequence, &matches);

        for consumer in consumers.iter_mut() {
            consumer.consume(document, sequence, &matches, &self.vocabulary)?;
        }

        Ok(())
    }

    fn finish_pass(
        &self,
        pass_state: PassState,
        consumers: &mut [&mut dyn DocumentConsumer],
        mut summary: RunSummary,
    ) -> Result<AnalysisOutcome, Error> {
        for consumer in consumers.iter_mut() {
            consumer.finish(&self.vocabulary)?;
        }

        summary.processed = pass_state.processed;
        summary.matched = pass_state.matched;

        info!(
            "Done. scanned={} processed={} matched={} anomalies={}",
            summary.scanned, summary.processed, summary.matched, summary.anomalies
        );

        Ok(AnalysisOutcome {
            reports: pass_state.technology_aggregator.finalize(&self.vocabulary),
            summary,
        })
    }
}
