use crate::constants::{
    KNOWN_SHORT_TECHNOLOGY_NAMES, MAX_AMBIGUOUS_TOKEN_LENGTH, NOISE_TECHNOLOGY_NAMES,
    VOCABULARY_NAME_COLUMN,
};
use crate::types::{TechnologyIndex, TechnologyName, Token};
use crate::utils::open_input;
use crate::{Error, Tokenizer};
use csv::ReaderBuilder;
use log::{debug, info};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// One technology to search for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    /// The name as it appeared in the source list (trimmed, whitespace-collapsed).
    pub canonical_name: TechnologyName,

    /// Lowercased, whitespace-collapsed form used for matching and deduplication.
    pub normalized_name: TechnologyName,

    /// Tokens of the normalized name, in order.
    pub tokens: Vec<Token>,
}

impl VocabularyEntry {
    /// Whether this entry needs the contiguous multi-token check.
    pub fn is_multi_token(&self) -> bool {
        self.tokens.len() > 1
    }
}

/// The filtered, deduplicated list of technologies a run searches for.
///
/// Order is the order of first appearance in the source list and is what every
/// `TechnologyIndex` refers to.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,

    /// Normalized names which were dropped by the noise rules, in source order.
    excluded: Vec<TechnologyName>,
}

impl Vocabulary {
    /// Builds a vocabulary from raw technology names.
    ///
    /// Names are normalized, deduplicated (first occurrence wins) and noise-filtered.
    ///
    /// # Errors
    /// Returns `Error::EmptyVocabulary` if nothing survives filtering.
    pub fn from_names<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokenizer = Tokenizer::technology_name_parser();

        let mut seen: HashSet<TechnologyName> = HashSet::new();
        let mut entries = Vec::new();
        let mut excluded = Vec::new();

        for name in names {
            let canonical_name = Tokenizer::normalize_whitespace(name.as_ref());
            let normalized_name = Self::normalize_name(&canonical_name);

            if normalized_name.is_empty() || !seen.insert(normalized_name.clone()) {
                continue;
            }

            let tokens = tokenizer.tokenize(&normalized_name);

            if Self::is_noise(&normalized_name, &tokens) {
                debug!("Excluding noise technology name: {}", normalized_name);
                excluded.push(normalized_name);
                continue;
            }

            entries.push(VocabularyEntry {
                canonical_name,
                normalized_name,
                tokens,
            });
        }

        if entries.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        info!(
            "Vocabulary ready: {} technologies, {} excluded as noise",
            entries.len(),
            excluded.len()
        );

        Ok(Vocabulary { entries, excluded })
    }

    /// Loads a vocabulary from a CSV file with a `Name` column. Gzip-compressed files
    /// (`*.gz`) are decompressed transparently.
    pub fn from_csv_path(path: &Path) -> Result<Self, Error> {
        let reader = open_input(path)?;
        let names = Self::read_names_from_csv(reader)?;

        Self::from_names(names)
    }

    /// Reads the `Name` column of a CSV document.
    ///
    /// # Errors
    /// Returns a parser error if the header row lacks a `Name` column or a record cannot
    /// be read.
    pub fn read_names_from_csv<R: Read>(reader: R) -> Result<Vec<String>, Error> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::ParserError(format!("Failed to read headers: {}", e)))?
            .clone();

        let name_column = headers
            .iter()
            .position(|h| h.trim() == VOCABULARY_NAME_COLUMN)
            .ok_or_else(|| {
                Error::ParserError(format!(
                    "CSV must contain a '{}' column. Found: {:?}",
                    VOCABULARY_NAME_COLUMN,
                    headers.iter().collect::<Vec<_>>()
                ))
            })?;

        let mut names = Vec::new();

        for record in reader.records() {
            let record =
                record.map_err(|e| Error::ParserError(format!("Failed to read record: {}", e)))?;

            if let Some(name) = record.get(name_column) {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    /// Trims, collapses internal whitespace and lowercases a technology name.
    pub fn normalize_name(name: &str) -> TechnologyName {
        Tokenizer::normalize_whitespace(name).to_lowercase()
    }

    /// Determines whether a normalized name should be kept out of the index.
    ///
    /// Allow-listed short names are always kept. Otherwise a name is noise if it is
    /// empty, on the exclusion list, has no tokens, or is a single purely alphabetic
    /// token of at most two characters.
    pub fn is_noise(normalized_name: &str, tokens: &[Token]) -> bool {
        if KNOWN_SHORT_TECHNOLOGY_NAMES.contains(&normalized_name) {
            return false;
        }

        if normalized_name.is_empty() || NOISE_TECHNOLOGY_NAMES.contains(&normalized_name) {
            return true;
        }

        match tokens {
            [] => true,
            [token] => {
                Tokenizer::is_alphabetic_token(token)
                    && token.chars().count() <= MAX_AMBIGUOUS_TOKEN_LENGTH
            }
            _ => false,
        }
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn get(&self, technology_index: TechnologyIndex) -> Option<&VocabularyEntry> {
        self.entries.get(technology_index)
    }

    /// Finds a technology by name. The name is normalized before comparison.
    pub fn find(&self, name: &str) -> Option<TechnologyIndex> {
        let normalized_name = Self::normalize_name(name);

        self.entries
            .iter()
            .position(|entry| entry.normalized_name == normalized_name)
    }

    /// Normalized names dropped by the noise rules.
    pub fn excluded(&self) -> &[TechnologyName] {
        &self.excluded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
