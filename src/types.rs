// Types listed here are either shared across multiple files and/or exposed via the library.

/// Represents a token as an owned `String`. Tokens are the basic units used for processing text.
pub type Token = String;

/// Represents a borrowed view of a token as a `str`. This is used when ownership is not required.
pub type TokenRef = str;

/// A unique identifier for a token, represented as a `usize`. Token IDs are assigned by the
/// `TokenMapper` while the vocabulary is indexed and are stable for the duration of a run.
pub type TokenId = usize;

/// Position of a technology within the filtered `Vocabulary`. Aggregates, index buckets and
/// output rows are all addressed by this index, so iteration order always follows the
/// vocabulary order.
pub type TechnologyIndex = usize;

/// Represents the name of a technology as an owned `String`.
pub type TechnologyName = String;

/// Opaque identifier of a document within the corpus (the `Id` attribute of a post row).
pub type DocumentId = String;

/// Number of views recorded for a document.
pub type ViewCount = u64;

/// Number of documents mentioning a technology.
pub type MentionCount = u64;

/// Zero-based position of a document within the processed stream. Used to break ties in
/// rankings so that earlier documents win.
pub type DocumentSequence = u64;

/// Identifier of a technology entity inside the external persistence store.
pub type StoreTechnologyId = i64;
