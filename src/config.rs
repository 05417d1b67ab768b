/// Number of most-viewed posts retained per technology.
pub const DEFAULT_TOP_K: usize = 10;

/// Rows scanned between two progress log lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Matched documents buffered before the persistence adapter flushes a batch.
pub const DEFAULT_PERSISTENCE_BATCH_SIZE: usize = 500;

/// Attempts made to write a single batch before the run is aborted.
pub const DEFAULT_MAX_FLUSH_ATTEMPTS: u32 = 3;
