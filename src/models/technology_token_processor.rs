use crate::types::{TechnologyIndex, TokenId};
use crate::{Document, Error, TechnologyTokenMapper, Tokenizer, Vocabulary};

use std::collections::{BTreeSet, HashSet};

/// Resolves which technologies a document mentions.
///
/// The processor only reads its index, so one instance serves the whole corpus.
pub struct TechnologyTokenProcessor {
    technology_token_mapper: TechnologyTokenMapper,
}

impl TechnologyTokenProcessor {
    /// Creates a new `TechnologyTokenProcessor` for the given vocabulary.
    ///
    /// # Errors
    /// Returns `Error::EmptyVocabulary` if nothing in the vocabulary can be indexed.
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, Error> {
        let technology_token_mapper = TechnologyTokenMapper::new(vocabulary)?;

        Ok(TechnologyTokenProcessor {
            technology_token_mapper,
        })
    }

    pub fn technology_token_mapper(&self) -> &TechnologyTokenMapper {
        &self.technology_token_mapper
    }

    /// Returns the technologies mentioned by a post, searching its title, body and tags.
    ///
    /// # Returns
    /// Distinct technology indices in ascending (vocabulary) order.
    pub fn process_document(&self, document: &Document) -> Vec<TechnologyIndex> {
        let text =
            Tokenizer::build_searchable_text(&document.title, &document.body, &document.tags);

        self.process_text_doc(&text)
    }

    /// Returns the technologies mentioned by a text document.
    ///
    /// # Returns
    /// Distinct technology indices in ascending (vocabulary) order.
    pub fn process_text_doc(&self, text: &str) -> Vec<TechnologyIndex> {
        let mapper = &self.technology_token_mapper;

        let text_doc_tokens = mapper.text_doc_tokenizer.tokenize(text);
        let query_token_ids = mapper
            .token_mapper
            .get_positional_token_ids(&text_doc_tokens);

        // Tokens outside the vocabulary can neither match nor start a match
        let distinct_token_ids: HashSet<TokenId> =
            query_token_ids.iter().flatten().copied().collect();

        let mut seen_technologies: BTreeSet<TechnologyIndex> = BTreeSet::new();

        for token_id in &distinct_token_ids {
            seen_technologies.extend(mapper.get_single_token_technologies(token_id));
        }

        for token_id in &distinct_token_ids {
            for technology_index in mapper.get_multi_token_candidates(token_id) {
                if seen_technologies.contains(technology_index) {
                    continue;
                }

                let technology_token_ids =
                    mapper.get_technology_token_sequence(*technology_index);

                if Self::contains_contiguous_sequence(&query_token_ids, technology_token_ids) {
                    seen_technologies.insert(*technology_index);
                }
            }
        }

        seen_technologies.into_iter().collect()
    }

    /// Checks whether `technology_token_ids` appears, contiguous and in order, somewhere in
    /// `query_token_ids`.
    ///
    /// An empty sequence never matches, and neither does one longer than the document.
    pub fn contains_contiguous_sequence(
        query_token_ids: &[Option<TokenId>],
        technology_token_ids: &[TokenId],
    ) -> bool {
        let sequence_length = technology_token_ids.len();

        if sequence_length == 0 || sequence_length > query_token_ids.len() {
            return false;
        }

        query_token_ids.windows(sequence_length).any(|window| {
            window
                .iter()
                .zip(technology_token_ids)
                .all(|(query_token_id, technology_token_id)| {
                    *query_token_id == Some(*technology_token_id)
                })
        })
    }
}
