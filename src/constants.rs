/// Generic English words which collide with unrelated technology names and drown the real
/// mentions in ordinary prose. Compared against the normalized (lowercased) name.
pub const NOISE_TECHNOLOGY_NAMES: &[&str] = &[
    "d",
    "q",
    "make",
    "simple",
    "mean",
    "parse",
    "render",
    "echo",
    "stream",
    "buffer",
    "heap",
    "box",
    "hub",
    "dash",
    "flux",
    "salt",
    "ent",
    "tower",
    "buddy",
    "play",
    "linear",
    "segment",
    "prism",
    "foundation",
    "slick",
    "realm",
    "crystal",
];

/// Short names which are genuine technologies and bypass every noise rule.
pub const KNOWN_SHORT_TECHNOLOGY_NAMES: &[&str] = &["go", "r", "d3", "qt", "c", "c#", "c++"];

/// Single alphabetic tokens up to this length are treated as noise unless allow-listed.
pub const MAX_AMBIGUOUS_TOKEN_LENGTH: usize = 2;

/// Characters, besides ASCII lowercase letters and digits, which may appear inside a token.
pub const TOKEN_PUNCTUATION_CHARS: &[char] = &['+', '#', '.', '-'];

/// Column of the vocabulary CSV holding the technology names.
pub const VOCABULARY_NAME_COLUMN: &str = "Name";

/// Name of the markup element carrying one document.
pub const DOCUMENT_ROW_ELEMENT: &[u8] = b"row";

/// `PostTypeId` of a question (primary post).
pub const PRIMARY_POST_TYPE_ID: &str = "1";

/// `PostTypeId` of an answer.
pub const ANSWER_POST_TYPE_ID: &str = "2";

/// Canonical document URLs are built by appending the document identifier.
pub const CANONICAL_POST_URL_PREFIX: &str = "https://stackoverflow.com/questions/";

/// Value written to the `source` column of persisted document records.
#[cfg(feature = "sqlite")]
pub const PERSISTED_DOCUMENT_SOURCE: &str = "stackoverflow";
