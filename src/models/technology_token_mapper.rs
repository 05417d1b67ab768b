use std::collections::HashMap;

use crate::types::{TechnologyIndex, TokenId};
use crate::{Error, TokenMapper, Tokenizer, Vocabulary};

/// The immutable lookup structure consulted for every document.
///
/// Technologies are split by token count: one-token names are found by plain token
/// membership, multi-token names are bucketed under their first token and confirmed by a
/// contiguous sequence check.
pub struct TechnologyTokenMapper {
    pub token_mapper: TokenMapper,
    pub text_doc_tokenizer: Tokenizer,

    /// Token ID -> one-token technologies consisting of exactly that token.
    pub single_token_index: HashMap<TokenId, Vec<TechnologyIndex>>,

    /// First token ID -> multi-token technologies starting with that token.
    pub multi_token_index: HashMap<TokenId, Vec<TechnologyIndex>>,

    /// Token ID sequence of every technology, addressed by `TechnologyIndex`.
    pub technology_token_sequences: Vec<Vec<TokenId>>,
}

impl TechnologyTokenMapper {
    /// Creates a new instance of `TechnologyTokenMapper` by indexing the vocabulary.
    ///
    /// Bucket contents follow vocabulary order, so the index is identical across runs
    /// for the same vocabulary.
    ///
    /// # Errors
    /// Returns `Error::EmptyVocabulary` if the vocabulary yields no indexable entry.
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, Error> {
        let mut instance = TechnologyTokenMapper {
            token_mapper: TokenMapper::new(),
            text_doc_tokenizer: Tokenizer::text_doc_parser(),
            single_token_index: HashMap::new(),
            multi_token_index: HashMap::new(),
            technology_token_sequences: Vec::with_capacity(vocabulary.len()),
        };

        instance.ingest_technology_tokens(vocabulary);

        if instance.single_token_index.is_empty() && instance.multi_token_index.is_empty() {
            return Err(Error::EmptyVocabulary);
        }

        Ok(instance)
    }

    fn ingest_technology_tokens(&mut self, vocabulary: &Vocabulary) {
        for (technology_index, entry) in vocabulary.entries().iter().enumerate() {
            let token_ids: Vec<TokenId> = entry
                .tokens
                .iter()
                .map(|token| self.token_mapper.upsert_token(token))
                .collect();

            match token_ids.as_slice() {
                [] => {}
                [token_id] => self
                    .single_token_index
                    .entry(*token_id)
                    .or_default()
                    .push(technology_index),
                [first_token_id, ..] => self
                    .multi_token_index
                    .entry(*first_token_id)
                    .or_default()
                    .push(technology_index),
            }

            self.technology_token_sequences.push(token_ids);
        }
    }

    /// One-token technologies consisting of the given token.
    pub fn get_single_token_technologies(&self, token_id: &TokenId) -> &[TechnologyIndex] {
        self.single_token_index
            .get(token_id)
            .map(|technologies| technologies.as_slice())
            .unwrap_or(&[])
    }

    /// Multi-token technologies whose first token is the given token.
    pub fn get_multi_token_candidates(&self, first_token_id: &TokenId) -> &[TechnologyIndex] {
        self.multi_token_index
            .get(first_token_id)
            .map(|technologies| technologies.as_slice())
            .unwrap_or(&[])
    }

    /// Token ID sequence of a technology.
    pub fn get_technology_token_sequence(&self, technology_index: TechnologyIndex) -> &[TokenId] {
        self.technology_token_sequences
            .get(technology_index)
            .map(|sequence| sequence.as_slice())
            .unwrap_or(&[])
    }
}
