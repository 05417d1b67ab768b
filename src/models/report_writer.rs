use crate::types::{DocumentSequence, TechnologyIndex, TechnologyName, ViewCount};
use crate::utils::canonical_post_url;
use crate::{DailyTrendAggregator, Document, DocumentConsumer, Error, TechnologyReport, Vocabulary};
use chrono::{DateTime, SecondsFormat, Utc};
use csv::Writer;
use serde::Serialize;
use std::cmp::Ordering;
use std::io::Write;
use std::str::FromStr;

const TECHNOLOGY_SEPARATOR: &str = ";";

#[derive(Debug, Serialize)]
struct TopPostRecord<'a> {
    view_count: ViewCount,
    url: String,
    title: &'a str,
}

/// Writes the main output: one row per technology, in the order given.
///
/// Columns: `tech`, `mentions`, `total_views`, `avg_views_per_mention` and, when
/// `include_top_posts` is set, `top_posts` holding a JSON array of
/// `{view_count, url, title}` objects.
pub fn write_technology_reports<W: Write>(
    writer: W,
    reports: &[TechnologyReport],
    include_top_posts: bool,
) -> Result<(), Error> {
    let mut csv_writer = Writer::from_writer(writer);

    let mut header = vec!["tech", "mentions", "total_views", "avg_views_per_mention"];
    if include_top_posts {
        header.push("top_posts");
    }
    csv_writer.write_record(&header)?;

    for report in reports {
        let mut record = vec![
            report.name.clone(),
            report.mention_count.to_string(),
            report.total_views.to_string(),
            format!("{:.2}", report.avg_views_per_mention()),
        ];

        if include_top_posts {
            let top_posts: Vec<TopPostRecord> = report
                .top_posts
                .iter()
                .map(|ranked_post| TopPostRecord {
                    view_count: ranked_post.view_count,
                    url: canonical_post_url(&ranked_post.document_id),
                    title: &ranked_post.title,
                })
                .collect();

            record.push(serde_json::to_string(&top_posts)?);
        }

        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Writes the ranked extract of a single technology, most viewed first.
pub fn write_detail_report<W: Write>(writer: W, report: &TechnologyReport) -> Result<(), Error> {
    let mut csv_writer = Writer::from_writer(writer);

    csv_writer.write_record(["post_id", "url", "view_count", "title"])?;

    for ranked_post in &report.top_posts {
        csv_writer.write_record([
            ranked_post.document_id.as_str(),
            canonical_post_url(&ranked_post.document_id).as_str(),
            ranked_post.view_count.to_string().as_str(),
            ranked_post.title.as_str(),
        ])?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Writes the daily trend rows of an aggregator.
pub fn write_daily_trends<W: Write>(
    writer: W,
    daily_trend_aggregator: &DailyTrendAggregator,
    vocabulary: &Vocabulary,
) -> Result<(), Error> {
    let mut csv_writer = Writer::from_writer(writer);

    csv_writer.write_record(["date", "tech", "mention_count", "share_percent"])?;

    for row in daily_trend_aggregator.rows(vocabulary) {
        csv_writer.write_record([
            row.date.to_string(),
            row.tech,
            row.mention_count.to_string(),
            format!("{:.2}", row.share_percent),
        ])?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// Streams one row per mention event as documents are matched.
pub struct MatchEmitter<W: Write> {
    csv_writer: Writer<W>,
    has_header: bool,
    emitted: u64,
}

impl<W: Write> MatchEmitter<W> {
    pub fn new(writer: W) -> Self {
        MatchEmitter {
            csv_writer: Writer::from_writer(writer),
            has_header: false,
            emitted: 0,
        }
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn write_header(&mut self) -> Result<(), Error> {
        if !self.has_header {
            self.csv_writer
                .write_record(["tech", "post_id", "view_count", "title"])?;
            self.has_header = true;
        }

        Ok(())
    }
}

impl<W: Write> DocumentConsumer for MatchEmitter<W> {
    fn consume(
        &mut self,
        document: &Document,
        _sequence: DocumentSequence,
        matches: &[TechnologyIndex],
        vocabulary: &Vocabulary,
    ) -> Result<(), Error> {
        self.write_header()?;

        if matches.is_empty() {
            return Ok(());
        }

        let title = document.normalized_title();
        let view_count = document.view_count.to_string();

        for technology_index in matches {
            if let Some(entry) = vocabulary.get(*technology_index) {
                self.csv_writer.write_record([
                    entry.canonical_name.as_str(),
                    document.id.as_str(),
                    view_count.as_str(),
                    title.as_str(),
                ])?;
                self.emitted += 1;
            }
        }

        Ok(())
    }

    fn finish(&mut self, _vocabulary: &Vocabulary) -> Result<(), Error> {
        self.write_header()?;
        self.csv_writer.flush()?;

        Ok(())
    }
}

/// Ordering of the filtered-document export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSortOrder {
    /// Most viewed first.
    Views,
    /// Oldest first; documents without a creation date last.
    Date,
}

impl FromStr for DocumentSortOrder {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "views" => Ok(DocumentSortOrder::Views),
            "date" => Ok(DocumentSortOrder::Date),
            other => Err(Error::ConfigError(format!(
                "Unknown sort order '{}', expected 'views' or 'date'",
                other
            ))),
        }
    }
}

/// The lightweight part of a filtered document kept for sorting.
#[derive(Debug, Clone)]
struct FilteredRow {
    sequence: DocumentSequence,
    document_id: String,
    view_count: ViewCount,
    created_at: Option<DateTime<Utc>>,
    title: String,
    technologies: Vec<TechnologyName>,
}

impl FilteredRow {
    fn compare(&self, other: &Self, sort_order: DocumentSortOrder) -> Ordering {
        let primary = match sort_order {
            DocumentSortOrder::Views => other.view_count.cmp(&self.view_count),
            DocumentSortOrder::Date => match (self.created_at, other.created_at) {
                (Some(created_at), Some(other_created_at)) => created_at.cmp(&other_created_at),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };

        primary.then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Exports every document which passed the filter, with the technologies it mentions.
///
/// Without a sort order rows are written as they arrive. With one, only the row fields
/// (never bodies) are buffered and written at the end.
pub struct FilteredDocumentExport<W: Write> {
    csv_writer: Writer<W>,
    sort_order: Option<DocumentSortOrder>,
    buffered_rows: Vec<FilteredRow>,
    has_header: bool,
    exported: u64,
}

impl<W: Write> FilteredDocumentExport<W> {
    pub fn new(writer: W, sort_order: Option<DocumentSortOrder>) -> Self {
        FilteredDocumentExport {
            csv_writer: Writer::from_writer(writer),
            sort_order,
            buffered_rows: Vec::new(),
            has_header: false,
            exported: 0,
        }
    }

    pub fn exported(&self) -> u64 {
        self.exported
    }

    fn write_header(&mut self) -> Result<(), Error> {
        if !self.has_header {
            self.csv_writer.write_record([
                "post_id",
                "url",
                "view_count",
                "created_at",
                "title",
                "techs",
            ])?;
            self.has_header = true;
        }

        Ok(())
    }

    fn write_row(&mut self, row: &FilteredRow) -> Result<(), Error> {
        let created_at = row
            .created_at
            .map(|created_at| created_at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default();

        self.csv_writer.write_record([
            row.document_id.as_str(),
            canonical_post_url(&row.document_id).as_str(),
            row.view_count.to_string().as_str(),
            created_at.as_str(),
            row.title.as_str(),
            row.technologies.join(TECHNOLOGY_SEPARATOR).as_str(),
        ])?;
        self.exported += 1;

        Ok(())
    }
}

impl<W: Write> DocumentConsumer for FilteredDocumentExport<W> {
    fn consume(
        &mut self,
        document: &Document,
        sequence: DocumentSequence,
        matches: &[TechnologyIndex],
        vocabulary: &Vocabulary,
    ) -> Result<(), Error> {
        let row = FilteredRow {
            sequence,
            document_id: document.id.clone(),
            view_count: document.view_count,
            created_at: document.created_at,
            title: document.normalized_title(),
            technologies: matches
                .iter()
                .filter_map(|technology_index| vocabulary.get(*technology_index))
                .map(|entry| entry.canonical_name.clone())
                .collect(),
        };

        if self.sort_order.is_some() {
            self.buffered_rows.push(row);
            return Ok(());
        }

        self.write_header()?;
        self.write_row(&row)
    }

    fn finish(&mut self, _vocabulary: &Vocabulary) -> Result<(), Error> {
        self.write_header()?;

        if let Some(sort_order) = self.sort_order {
            let mut buffered_rows = std::mem::take(&mut self.buffered_rows);
            buffered_rows.sort_by(|a, b| a.compare(b, sort_order));

            for row in &buffered_rows {
                self.write_row(row)?;
            }
        }

        self.csv_writer.flush()?;

        Ok(())
    }
}

/// Feeds a `DailyTrendAggregator` during the pass and writes its rows at the end.
pub struct DailyTrendExport<W: Write> {
    writer: Option<W>,
    daily_trend_aggregator: DailyTrendAggregator,
}

impl<W: Write> DailyTrendExport<W> {
    pub fn new(writer: W) -> Self {
        DailyTrendExport {
            writer: Some(writer),
            daily_trend_aggregator: DailyTrendAggregator::new(),
        }
    }

    pub fn daily_trend_aggregator(&self) -> &DailyTrendAggregator {
        &self.daily_trend_aggregator
    }
}

impl<W: Write> DocumentConsumer for DailyTrendExport<W> {
    fn consume(
        &mut self,
        document: &Document,
        _sequence: DocumentSequence,
        matches: &[TechnologyIndex],
        _vocabulary: &Vocabulary,
    ) -> Result<(), Error> {
        if let Some(created_date) = document.created_date() {
            self.daily_trend_aggregator.record(created_date, matches);
        }

        Ok(())
    }

    fn finish(&mut self, vocabulary: &Vocabulary) -> Result<(), Error> {
        // Writer is consumed by the first call
        match self.writer.take() {
            Some(writer) => write_daily_trends(writer, &self.daily_trend_aggregator, vocabulary),
            None => Ok(()),
        }
    }
}
