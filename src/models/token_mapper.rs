use crate::types::{Token, TokenId, TokenRef};
use std::collections::HashMap;

/// A struct to map tokens to unique identifiers and vice versa.
///
/// Only vocabulary tokens are ever upserted. Document tokens are looked up, and tokens
/// which no technology name contains have no ID.
pub struct TokenMapper {
    /// A map of tokens to their unique IDs.
    pub token_map: HashMap<Token, TokenId>,

    /// A reverse map of unique IDs back to their tokens. The ID is the position.
    pub reverse_token_map: Vec<Token>,
}

impl TokenMapper {
    /// Creates a new, empty `TokenMapper`.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        TokenMapper {
            token_map: HashMap::new(),
            reverse_token_map: Vec::new(),
        }
    }

    /// Adds a token to the map if it doesn't already exist, and returns its unique ID.
    ///
    /// IDs are handed out sequentially, so a fixed insertion order always produces the
    /// same IDs.
    pub fn upsert_token(&mut self, token: &TokenRef) -> TokenId {
        if let Some(&id) = self.token_map.get(token) {
            id
        } else {
            let id = self.reverse_token_map.len();
            self.token_map.insert(token.to_string(), id);
            self.reverse_token_map.push(token.to_string());
            id
        }
    }

    /// Gets the unique ID for a token if it exists in the map.
    pub fn get_token_id(&self, token: &TokenRef) -> Option<TokenId> {
        self.token_map.get(token).copied()
    }

    /// Maps a token sequence to IDs while preserving every position.
    ///
    /// Unknown tokens become `None` rather than being dropped, so two known tokens
    /// separated by an unknown one are never mistaken for neighbors.
    ///
    /// # Arguments
    /// * `tokens` - The tokens, in document order.
    ///
    /// # Returns
    /// * One entry per input token.
    pub fn get_positional_token_ids(&self, tokens: &[Token]) -> Vec<Option<TokenId>> {
        tokens
            .iter()
            .map(|token| self.get_token_id(token))
            .collect()
    }

    /// Retrieves the token string for a given unique ID.
    pub fn get_token_by_id(&self, token_id: TokenId) -> Option<&TokenRef> {
        self.reverse_token_map
            .get(token_id)
            .map(|token| token.as_str())
    }

    /// Gets the total number of unique tokens in the map.
    pub fn get_token_count(&self) -> usize {
        self.reverse_token_map.len()
    }
}
