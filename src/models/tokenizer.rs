use crate::constants::TOKEN_PUNCTUATION_CHARS;
use crate::types::{Token, TokenRef};

/// A utility struct for tokenizing text, shared by the vocabulary indexer and the
/// document matcher so both sides agree on token boundaries.
///
/// A token is a maximal run of characters drawn from `[a-z0-9+#.-]`. Everything else
/// (whitespace, markup, other punctuation, non-ASCII letters) separates tokens.
pub struct Tokenizer {
    /// Whether the input should be lowercased before splitting. Vocabulary names are
    /// normalized before they reach the tokenizer, so only documents need this.
    lowercase_input: bool,
}

impl Tokenizer {
    /// Creates a tokenizer configured for already-normalized technology names.
    pub fn technology_name_parser() -> Self {
        Self {
            lowercase_input: false,
        }
    }

    /// Creates a tokenizer configured for arbitrary text documents.
    ///
    /// Lowercases the input so matching is case-insensitive.
    pub fn text_doc_parser() -> Self {
        Self {
            lowercase_input: true,
        }
    }

    /// Splits the input text into tokens based on the tokenizer's configuration.
    ///
    /// # Arguments
    /// * `text` - The input text to tokenize.
    ///
    /// # Returns
    /// * A vector of tokens, in order of appearance.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        if self.lowercase_input {
            Self::split_tokens(&text.to_lowercase())
        } else {
            Self::split_tokens(text)
        }
    }

    fn split_tokens(text: &str) -> Vec<Token> {
        text.split(|c: char| !Self::is_token_char(c))
            .filter(|token| !token.is_empty())
            .map(|token| token.to_string())
            .collect()
    }

    /// Determines whether a character can be part of a token.
    pub fn is_token_char(c: char) -> bool {
        c.is_ascii_lowercase() || c.is_ascii_digit() || TOKEN_PUNCTUATION_CHARS.contains(&c)
    }

    /// Determines whether a token consists only of alphabetic characters.
    pub fn is_alphabetic_token(token: &TokenRef) -> bool {
        !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic())
    }

    /// Trims the text and collapses every whitespace run to a single space.
    pub fn normalize_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Converts raw tag markup into space-separated lowercase tags.
    ///
    /// Two conventions are understood:
    /// - pipe-delimited: `|python|django-rest-framework|`
    /// - angle-bracket-delimited: `<python><django-rest-framework>`
    ///
    /// Hyphenated tags are additionally emitted with their hyphens replaced by spaces, so
    /// the tag `react-native` also yields the words `react native`.
    pub fn normalize_tags(tags: &str) -> String {
        let separated = if tags.contains('|') {
            tags.replace('|', " ")
        } else {
            tags.replace(['<', '>'], " ")
        };

        let mut normalized: Vec<String> = Vec::new();

        for tag in separated.split_whitespace() {
            let tag = tag.to_lowercase();

            if tag.contains('-') {
                let spaced = Self::normalize_whitespace(&tag.replace('-', " "));
                normalized.push(tag);
                if !spaced.is_empty() {
                    normalized.push(spaced);
                }
            } else {
                normalized.push(tag);
            }
        }

        normalized.join(" ")
    }

    /// Builds the searchable text of a post: title, body and normalized tags, joined,
    /// whitespace-collapsed and lowercased.
    pub fn build_searchable_text(title: &str, body: &str, tags: &str) -> String {
        let text = format!("{} {} {}", title, body, Self::normalize_tags(tags));

        Self::normalize_whitespace(&text).to_lowercase()
    }
}
