use crate::config::{
    DEFAULT_MAX_FLUSH_ATTEMPTS, DEFAULT_PERSISTENCE_BATCH_SIZE, DEFAULT_PROGRESS_INTERVAL,
    DEFAULT_TOP_K,
};
use crate::utils::slugify;
use crate::{DateRange, DocumentSortOrder, Error};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Everything a single analysis run needs to know.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Post dump (`.xml`, optionally `.gz`).
    pub corpus_path: PathBuf,
    /// Technology list: CSV with a `Name` column (optionally `.gz`).
    pub vocabulary_path: PathBuf,
    pub output_path: PathBuf,

    /// Rows to scan before stopping; `0` scans everything.
    pub row_limit: u64,
    /// Rows between progress log lines; `0` disables progress logging.
    pub progress_interval: u64,
    pub top_k: usize,
    pub include_top_posts: bool,

    pub detail_technology: Option<String>,
    pub detail_output_path: Option<PathBuf>,

    pub persist: bool,
    pub store_path: Option<PathBuf>,
    pub batch_size: usize,
    pub max_flush_attempts: u32,

    pub filtered_output_path: Option<PathBuf>,
    pub filtered_sort: Option<DocumentSortOrder>,
    pub matches_output_path: Option<PathBuf>,
    pub trends_output_path: Option<PathBuf>,

    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Last N calendar days ending today; exclusive with `date_from`/`date_to`.
    pub days: Option<u32>,
}

impl AnalyzerConfig {
    pub fn new(corpus_path: &Path, vocabulary_path: &Path, output_path: &Path) -> Self {
        AnalyzerConfig {
            corpus_path: corpus_path.to_path_buf(),
            vocabulary_path: vocabulary_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            row_limit: 0,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            top_k: DEFAULT_TOP_K,
            include_top_posts: false,
            detail_technology: None,
            detail_output_path: None,
            persist: false,
            store_path: None,
            batch_size: DEFAULT_PERSISTENCE_BATCH_SIZE,
            max_flush_attempts: DEFAULT_MAX_FLUSH_ATTEMPTS,
            filtered_output_path: None,
            filtered_sort: None,
            matches_output_path: None,
            trends_output_path: None,
            date_from: None,
            date_to: None,
            days: None,
        }
    }

    /// Checks everything that can be checked without reading the inputs.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` describing the first problem found.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.corpus_path.is_file() {
            return Err(Error::ConfigError(format!(
                "Corpus file not found: {}",
                self.corpus_path.display()
            )));
        }

        if !self.vocabulary_path.is_file() {
            return Err(Error::ConfigError(format!(
                "Vocabulary file not found: {}",
                self.vocabulary_path.display()
            )));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(Error::ConfigError("Output path is empty".to_string()));
        }

        if self.persist {
            if self.store_path.is_none() {
                return Err(Error::ConfigError(
                    "Persisting results requires a store path".to_string(),
                ));
            }

            if self.batch_size == 0 {
                return Err(Error::ConfigError(
                    "Persistence batch size must be at least 1".to_string(),
                ));
            }
        }

        if self.days.is_some() && (self.date_from.is_some() || self.date_to.is_some()) {
            return Err(Error::ConfigError(
                "A relative day window cannot be combined with explicit from/to dates"
                    .to_string(),
            ));
        }

        if self.filtered_sort.is_some() && self.filtered_output_path.is_none() {
            return Err(Error::ConfigError(
                "A sort order was given without a filtered output path".to_string(),
            ));
        }

        if let Some(detail_technology) = &self.detail_technology {
            if detail_technology.trim().is_empty() {
                return Err(Error::ConfigError(
                    "Detail technology name is empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The date window of this run relative to `today`, or `None` when no window was
    /// requested.
    pub fn date_range(&self, today: NaiveDate) -> Result<Option<DateRange>, Error> {
        if let Some(days) = self.days {
            return DateRange::last_days(days, today).map(Some);
        }

        if self.date_from.is_none() && self.date_to.is_none() {
            return Ok(None);
        }

        DateRange::new(self.date_from, self.date_to, today).map(Some)
    }

    /// Where the detail extract of `technology_name` is written: the explicit detail path,
    /// or `<main-stem>.<slug>.detail.csv` next to the main output.
    pub fn resolve_detail_output_path(&self, technology_name: &str) -> PathBuf {
        if let Some(detail_output_path) = &self.detail_output_path {
            return detail_output_path.clone();
        }

        let stem = self
            .output_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());

        self.output_path
            .with_file_name(format!("{}.{}.detail.csv", stem, slugify(technology_name)))
    }
}
