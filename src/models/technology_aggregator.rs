use crate::types::{DocumentSequence, MentionCount, TechnologyIndex, TechnologyName, ViewCount};
use crate::{BoundedRanking, Document, RankedPost, Vocabulary};

/// Running statistics of one technology.
#[derive(Debug, Clone)]
pub struct TechnologyAggregate {
    pub mention_count: MentionCount,
    pub total_views: ViewCount,
    pub top_posts: BoundedRanking,
}

impl TechnologyAggregate {
    pub fn new(top_k: usize) -> Self {
        TechnologyAggregate {
            mention_count: 0,
            total_views: 0,
            top_posts: BoundedRanking::new(top_k),
        }
    }
}

/// Final statistics of one technology, ready for output.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnologyReport {
    pub technology_index: TechnologyIndex,
    pub name: TechnologyName,
    pub normalized_name: TechnologyName,
    pub mention_count: MentionCount,
    pub total_views: ViewCount,
    pub top_posts: Vec<RankedPost>,
}

impl TechnologyReport {
    /// `total_views / mention_count`, or `0.0` for a technology never mentioned.
    pub fn avg_views_per_mention(&self) -> f64 {
        if self.mention_count == 0 {
            0.0
        } else {
            self.total_views as f64 / self.mention_count as f64
        }
    }
}

/// Folds matched documents into per-technology statistics.
///
/// One aggregate exists for every vocabulary entry from the start, so technologies that
/// are never mentioned still report zeros. The aggregator is the only owner of these
/// statistics.
pub struct TechnologyAggregator {
    aggregates: Vec<TechnologyAggregate>,
}

impl TechnologyAggregator {
    pub fn new(vocabulary: &Vocabulary, top_k: usize) -> Self {
        TechnologyAggregator {
            aggregates: (0..vocabulary.len())
                .map(|_| TechnologyAggregate::new(top_k))
                .collect(),
        }
    }

    /// Records one document against each technology it mentions.
    ///
    /// `matches` must already be deduplicated; each entry counts exactly once.
    pub fn record(
        &mut self,
        document: &Document,
        sequence: DocumentSequence,
        matches: &[TechnologyIndex],
    ) {
        if matches.is_empty() {
            return;
        }

        let title = document.normalized_title();

        for technology_index in matches {
            if let Some(aggregate) = self.aggregates.get_mut(*technology_index) {
                aggregate.mention_count += 1;
                aggregate.total_views = aggregate.total_views.saturating_add(document.view_count);
                aggregate
                    .top_posts
                    .offer(document.view_count, sequence, &document.id, &title);
            }
        }
    }

    pub fn get(&self, technology_index: TechnologyIndex) -> Option<&TechnologyAggregate> {
        self.aggregates.get(technology_index)
    }

    /// Consumes the aggregator and produces one report per vocabulary entry, sorted by
    /// total views descending. Ties keep vocabulary order.
    pub fn finalize(self, vocabulary: &Vocabulary) -> Vec<TechnologyReport> {
        let mut reports: Vec<TechnologyReport> = self
            .aggregates
            .into_iter()
            .zip(vocabulary.entries())
            .enumerate()
            .map(|(technology_index, (aggregate, entry))| TechnologyReport {
                technology_index,
                name: entry.canonical_name.clone(),
                normalized_name: entry.normalized_name.clone(),
                mention_count: aggregate.mention_count,
                total_views: aggregate.total_views,
                top_posts: aggregate.top_posts.into_sorted_vec(),
            })
            .collect();

        // Stable sort keeps vocabulary order among equal totals
        reports.sort_by(|a, b| b.total_views.cmp(&a.total_views));

        reports
    }
}
