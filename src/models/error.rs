use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Parser Error: {0}")]
    ParserError(String),

    /// Invalid run configuration. Always raised before the corpus scan starts.
    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Vocabulary Error: no technology names left after noise filtering")]
    EmptyVocabulary,

    #[error("Target Store Error: the store holds no technology entities matching the vocabulary")]
    EmptyTargetStore,

    /// A persistence batch could not be written, even after retrying.
    #[error("Persistence Error: {0}")]
    PersistenceError(String),

    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Other Error: {0}")]
    Other(String),
}
