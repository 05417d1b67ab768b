use crate::types::{MentionCount, TechnologyIndex, TechnologyName};
use crate::Vocabulary;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Mentions of one technology on one day, and its share of that day's mentions.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTrendRow {
    pub date: NaiveDate,
    pub tech: TechnologyName,
    pub mention_count: MentionCount,
    /// Percentage of all mentions recorded that day, rounded to two decimals.
    pub share_percent: f64,
}

/// Counts mentions per calendar day and technology.
///
/// Storage is sparse: only (day, technology) pairs that occurred are kept, so memory
/// depends on the number of distinct days, not on the number of documents.
#[derive(Debug, Default)]
pub struct DailyTrendAggregator {
    daily_counts: BTreeMap<NaiveDate, BTreeMap<TechnologyIndex, MentionCount>>,
}

impl DailyTrendAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, date: NaiveDate, matches: &[TechnologyIndex]) {
        if matches.is_empty() {
            return;
        }

        let counts = self.daily_counts.entry(date).or_default();

        for technology_index in matches {
            *counts.entry(*technology_index).or_insert(0) += 1;
        }
    }

    pub fn day_count(&self) -> usize {
        self.daily_counts.len()
    }

    /// Rows ordered by date, then by vocabulary order.
    pub fn rows(&self, vocabulary: &Vocabulary) -> Vec<DailyTrendRow> {
        let mut rows = Vec::new();

        for (date, counts) in &self.daily_counts {
            let day_total: MentionCount = counts.values().sum();

            for (technology_index, mention_count) in counts {
                let Some(entry) = vocabulary.get(*technology_index) else {
                    continue;
                };

                let share_percent = if day_total == 0 {
                    0.0
                } else {
                    (*mention_count as f64 / day_total as f64 * 100.0 * 100.0).round() / 100.0
                };

                rows.push(DailyTrendRow {
                    date: *date,
                    tech: entry.canonical_name.clone(),
                    mention_count: *mention_count,
                    share_percent,
                });
            }
        }

        rows
    }
}
