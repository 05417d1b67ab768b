use crate::types::{DocumentSequence, StoreTechnologyId, TechnologyIndex, TechnologyName, ViewCount};
use crate::{Document, DocumentConsumer, Error, Vocabulary};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;

/// A matched document waiting in the write buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDocument {
    pub url: String,
    pub title: String,
    pub view_count: ViewCount,
    pub created_at: Option<DateTime<Utc>>,
    /// Store ids of every resolved technology mentioned by the document.
    pub technology_ids: Vec<StoreTechnologyId>,
}

/// What a store reported for the batches written so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchWriteStats {
    pub documents_created: u64,
    pub documents_updated: u64,
    /// Association rows actually inserted; duplicates of existing pairs are not counted.
    pub associations_created: u64,
}

impl BatchWriteStats {
    pub fn merge(&mut self, other: BatchWriteStats) {
        self.documents_created += other.documents_created;
        self.documents_updated += other.documents_updated;
        self.associations_created += other.associations_created;
    }
}

/// The target of persisted analysis results.
pub trait TechnologyStore {
    /// Technology entities available for association, as `(id, name)`.
    fn load_technologies(&mut self) -> Result<Vec<(StoreTechnologyId, TechnologyName)>, Error>;

    /// Writes a batch atomically: either every document and association of the batch is
    /// stored, or nothing is.
    ///
    /// Documents are upserted by URL (the view count is refreshed when it changed) and
    /// already existing associations are ignored, so writing the same batch twice is
    /// harmless.
    fn write_batch(&mut self, batch: &[PendingDocument]) -> Result<BatchWriteStats, Error>;
}

/// Buffers matched documents and writes them to a `TechnologyStore` in batches.
///
/// Vocabulary entries are resolved to store entities once, by normalized name. Entries
/// without a store entity are still aggregated but never persisted.
pub struct PersistenceAdapter<S: TechnologyStore> {
    store: S,
    store_ids: Vec<Option<StoreTechnologyId>>,
    buffer: Vec<PendingDocument>,
    batch_size: usize,
    max_flush_attempts: u32,
    stats: BatchWriteStats,
}

impl<S: TechnologyStore> PersistenceAdapter<S> {
    /// # Errors
    /// * `Error::EmptyTargetStore` if no vocabulary entry resolves to a store entity.
    /// * `Error::ConfigError` if `batch_size` is zero.
    pub fn new(
        mut store: S,
        vocabulary: &Vocabulary,
        batch_size: usize,
        max_flush_attempts: u32,
    ) -> Result<Self, Error> {
        if batch_size == 0 {
            return Err(Error::ConfigError(
                "Persistence batch size must be at least 1".to_string(),
            ));
        }

        let mut ids_by_name: HashMap<TechnologyName, StoreTechnologyId> = HashMap::new();

        for (store_id, name) in store.load_technologies()? {
            // First entity wins for duplicated names
            ids_by_name
                .entry(Vocabulary::normalize_name(&name))
                .or_insert(store_id);
        }

        let store_ids: Vec<Option<StoreTechnologyId>> = vocabulary
            .entries()
            .iter()
            .map(|entry| {
                let store_id = ids_by_name.get(&entry.normalized_name).copied();

                if store_id.is_none() {
                    debug!("No store entity for technology: {}", entry.canonical_name);
                }

                store_id
            })
            .collect();

        let resolved_count = store_ids.iter().filter(|store_id| store_id.is_some()).count();

        if resolved_count == 0 {
            return Err(Error::EmptyTargetStore);
        }

        info!(
            "Persisting {} of {} technologies, in batches of {}",
            resolved_count,
            vocabulary.len(),
            batch_size
        );

        Ok(PersistenceAdapter {
            store,
            store_ids,
            buffer: Vec::with_capacity(batch_size),
            batch_size,
            max_flush_attempts: max_flush_attempts.max(1),
            stats: BatchWriteStats::default(),
        })
    }

    pub fn resolved_technology_count(&self) -> usize {
        self.store_ids.iter().filter(|store_id| store_id.is_some()).count()
    }

    pub fn store_id(&self, technology_index: TechnologyIndex) -> Option<StoreTechnologyId> {
        self.store_ids.get(technology_index).copied().flatten()
    }

    pub fn pending_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn stats(&self) -> BatchWriteStats {
        self.stats
    }

    /// Queues a matched document, flushing once the buffer reaches the batch size.
    ///
    /// Documents which mention no resolved technology are not queued.
    pub fn record(
        &mut self,
        document: &Document,
        matches: &[TechnologyIndex],
    ) -> Result<(), Error> {
        let technology_ids: Vec<StoreTechnologyId> = matches
            .iter()
            .filter_map(|technology_index| self.store_id(*technology_index))
            .collect();

        if technology_ids.is_empty() {
            return Ok(());
        }

        self.buffer.push(PendingDocument {
            url: document.canonical_url(),
            title: document.normalized_title(),
            view_count: document.view_count,
            created_at: document.created_at,
            technology_ids,
        });

        if self.buffer.len() >= self.batch_size {
            self.flush()?;
        }

        Ok(())
    }

    /// Writes the buffered documents.
    ///
    /// A failed write is retried up to `max_flush_attempts` times in total. The buffer is
    /// kept until a write succeeds, so nothing is dropped between attempts.
    ///
    /// # Errors
    /// Returns `Error::PersistenceError` once every attempt failed.
    pub fn flush(&mut self) -> Result<(), Error> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let mut last_error = None;

        for attempt in 1..=self.max_flush_attempts {
            match self.store.write_batch(&self.buffer) {
                Ok(batch_stats) => {
                    debug!(
                        "Flushed {} documents ({} new associations)",
                        self.buffer.len(),
                        batch_stats.associations_created
                    );

                    self.stats.merge(batch_stats);
                    self.buffer.clear();

                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        "Flush attempt {}/{} of {} documents failed: {}",
                        attempt,
                        self.max_flush_attempts,
                        self.buffer.len(),
                        e
                    );

                    last_error = Some(e);
                }
            }
        }

        Err(Error::PersistenceError(format!(
            "Giving up on a batch of {} documents after {} attempts: {}",
            self.buffer.len(),
            self.max_flush_attempts,
            last_error.map_or_else(|| "unknown failure".to_string(), |e| e.to_string())
        )))
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: TechnologyStore> DocumentConsumer for PersistenceAdapter<S> {
    fn consume(
        &mut self,
        document: &Document,
        _sequence: DocumentSequence,
        matches: &[TechnologyIndex],
        _vocabulary: &Vocabulary,
    ) -> Result<(), Error> {
        self.record(document, matches)
    }

    fn finish(&mut self, _vocabulary: &Vocabulary) -> Result<(), Error> {
        self.flush()?;

        info!(
            "Persisted {} new and {} updated documents, {} new associations",
            self.stats.documents_created,
            self.stats.documents_updated,
            self.stats.associations_created
        );

        Ok(())
    }
}

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteTechnologyStore;

#[cfg(feature = "sqlite")]
mod sqlite_store {
    use super::{BatchWriteStats, PendingDocument, TechnologyStore};
    use crate::constants::PERSISTED_DOCUMENT_SOURCE;
    use crate::types::{StoreTechnologyId, TechnologyName};
    use crate::Error;
    use rusqlite::{params, Connection, OptionalExtension};
    use std::path::Path;

    fn sqlite_error(action: &str, e: rusqlite::Error) -> Error {
        Error::PersistenceError(format!("Failed to {}: {}", action, e))
    }

    /// SQLite-backed store with `tech_stack`, `article` and `article_stack` tables.
    pub struct SqliteTechnologyStore {
        connection: Connection,
    }

    impl SqliteTechnologyStore {
        /// Opens (or creates) a store at the given file path.
        pub fn open(path: &Path) -> Result<Self, Error> {
            let connection =
                Connection::open(path).map_err(|e| sqlite_error("open store database", e))?;

            let store = SqliteTechnologyStore { connection };
            store.init_schema()?;
            Ok(store)
        }

        pub fn open_in_memory() -> Result<Self, Error> {
            let connection = Connection::open_in_memory()
                .map_err(|e| sqlite_error("create in-memory store", e))?;

            let store = SqliteTechnologyStore { connection };
            store.init_schema()?;
            Ok(store)
        }

        fn init_schema(&self) -> Result<(), Error> {
            self.connection
                .execute_batch(
                    "CREATE TABLE IF NOT EXISTS tech_stack (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        name TEXT NOT NULL,
                        is_deleted INTEGER NOT NULL DEFAULT 0
                    );
                    CREATE TABLE IF NOT EXISTS article (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        url TEXT NOT NULL UNIQUE,
                        title TEXT NOT NULL,
                        view_count INTEGER NOT NULL DEFAULT 0,
                        source TEXT NOT NULL,
                        created_at TEXT
                    );
                    CREATE TABLE IF NOT EXISTS article_stack (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        article_id INTEGER NOT NULL REFERENCES article(id),
                        tech_stack_id INTEGER NOT NULL REFERENCES tech_stack(id),
                        count INTEGER NOT NULL DEFAULT 1,
                        UNIQUE (article_id, tech_stack_id)
                    );",
                )
                .map_err(|e| sqlite_error("create schema", e))
        }

        /// Adds a technology entity and returns its id.
        pub fn insert_technology(&self, name: &str) -> Result<StoreTechnologyId, Error> {
            self.connection
                .execute(
                    "INSERT INTO tech_stack (name, is_deleted) VALUES (?1, 0)",
                    params![name],
                )
                .map_err(|e| sqlite_error("insert technology", e))?;

            Ok(self.connection.last_insert_rowid())
        }

        /// Soft-deletes a technology entity; deleted entities are not offered for
        /// association.
        pub fn delete_technology(&self, store_id: StoreTechnologyId) -> Result<(), Error> {
            self.connection
                .execute(
                    "UPDATE tech_stack SET is_deleted = 1 WHERE id = ?1",
                    params![store_id],
                )
                .map_err(|e| sqlite_error("delete technology", e))?;

            Ok(())
        }

        pub fn article_count(&self) -> Result<u64, Error> {
            self.count_rows("SELECT COUNT(*) FROM article")
        }

        pub fn association_count(&self) -> Result<u64, Error> {
            self.count_rows("SELECT COUNT(*) FROM article_stack")
        }

        /// The stored view count of the document at `url`, if present.
        pub fn article_view_count(&self, url: &str) -> Result<Option<u64>, Error> {
            let view_count: Option<i64> = self
                .connection
                .query_row(
                    "SELECT view_count FROM article WHERE url = ?1",
                    params![url],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|e| sqlite_error("read article", e))?;

            Ok(view_count.map(|view_count| view_count.max(0) as u64))
        }

        fn count_rows(&self, sql: &str) -> Result<u64, Error> {
            let count: i64 = self
                .connection
                .query_row(sql, [], |row| row.get(0))
                .map_err(|e| sqlite_error("count rows", e))?;

            Ok(count.max(0) as u64)
        }
    }

    impl TechnologyStore for SqliteTechnologyStore {
        fn load_technologies(
            &mut self,
        ) -> Result<Vec<(StoreTechnologyId, TechnologyName)>, Error> {
            let mut statement = self
                .connection
                .prepare("SELECT id, name FROM tech_stack WHERE is_deleted = 0 ORDER BY id")
                .map_err(|e| sqlite_error("prepare technology query", e))?;

            let technologies = statement
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
                .map_err(|e| sqlite_error("query technologies", e))?
                .collect::<Result<Vec<(StoreTechnologyId, TechnologyName)>, _>>()
                .map_err(|e| sqlite_error("read technology row", e))?;

            Ok(technologies)
        }

        fn write_batch(&mut self, batch: &[PendingDocument]) -> Result<BatchWriteStats, Error> {
            let transaction = self
                .connection
                .transaction()
                .map_err(|e| sqlite_error("begin transaction", e))?;

            let mut stats = BatchWriteStats::default();

            {
                let mut select_article = transaction
                    .prepare_cached("SELECT id, view_count FROM article WHERE url = ?1")
                    .map_err(|e| sqlite_error("prepare article lookup", e))?;
                let mut insert_article = transaction
                    .prepare_cached(
                        "INSERT INTO article (url, title, view_count, source, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5)",
                    )
                    .map_err(|e| sqlite_error("prepare article insert", e))?;
                let mut update_article = transaction
                    .prepare_cached("UPDATE article SET view_count = ?1 WHERE id = ?2")
                    .map_err(|e| sqlite_error("prepare article update", e))?;
                let mut insert_association = transaction
                    .prepare_cached(
                        "INSERT OR IGNORE INTO article_stack (article_id, tech_stack_id, count)
                         VALUES (?1, ?2, 1)",
                    )
                    .map_err(|e| sqlite_error("prepare association insert", e))?;

                for pending in batch {
                    let view_count = i64::try_from(pending.view_count).unwrap_or(i64::MAX);

                    let existing: Option<(i64, i64)> = select_article
                        .query_row(params![pending.url], |row| Ok((row.get(0)?, row.get(1)?)))
                        .optional()
                        .map_err(|e| sqlite_error("look up article", e))?;

                    let article_id = match existing {
                        Some((article_id, stored_view_count)) => {
                            if stored_view_count != view_count {
                                update_article
                                    .execute(params![view_count, article_id])
                                    .map_err(|e| sqlite_error("update article", e))?;
                                stats.documents_updated += 1;
                            }

                            article_id
                        }
                        None => {
                            insert_article
                                .execute(params![
                                    pending.url,
                                    pending.title,
                                    view_count,
                                    PERSISTED_DOCUMENT_SOURCE,
                                    pending.created_at.map(|created_at| created_at.to_rfc3339()),
                                ])
                                .map_err(|e| sqlite_error("insert article", e))?;
                            stats.documents_created += 1;

                            transaction.last_insert_rowid()
                        }
                    };

                    for technology_id in &pending.technology_ids {
                        let inserted = insert_association
                            .execute(params![article_id, technology_id])
                            .map_err(|e| sqlite_error("insert association", e))?;

                        stats.associations_created += inserted as u64;
                    }
                }
            }

            transaction
                .commit()
                .map_err(|e| sqlite_error("commit batch", e))?;

            Ok(stats)
        }
    }
}
