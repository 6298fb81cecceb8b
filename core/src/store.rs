//! Local persistent storage for favorite books.
//!
//! # Design
//! Records live in a single redb table keyed by a `u64` the store allocates
//! on insert from a counter persisted in a `meta` table, so iteration order
//! is insertion order and a key is never handed out twice, even after the
//! newest record is removed. Values are the JSON-serialized `FavoriteRecord`. Every operation runs in
//! its own transaction and commits independently; nothing is batched.
//!
//! The book `id` is stored but never used as a key: adding the same book
//! twice yields two records.

use std::path::Path;

use redb::backends::InMemoryBackend;
use redb::{Database, ReadableTable, TableDefinition};

use crate::error::StorageError;
use crate::types::{Book, FavoriteRecord};

const FAVORITES: TableDefinition<u64, &str> = TableDefinition::new("favorites");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");
const NEXT_KEY: &str = "next_key";

/// A collection of saved books.
pub trait FavoritesStore {
    /// All records, in store order.
    fn list(&self) -> Result<Vec<FavoriteRecord>, StorageError>;

    /// Persist a new record built from `book`.
    fn add(&self, book: &Book) -> Result<FavoriteRecord, StorageError>;

    /// Delete `record` by its key. Returns `false` if it was already gone.
    fn remove(&self, record: &FavoriteRecord) -> Result<bool, StorageError>;
}

/// `FavoritesStore` backed by a redb database.
pub struct RedbFavoritesStore {
    db: Database,
}

impl RedbFavoritesStore {
    /// Open the database at `path`, creating the file and table if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = Database::create(path)?;
        tracing::info!(path = %path.display(), "opened favorites store");
        Self::init(db)
    }

    /// A store that lives only as long as the returned value.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = Database::builder().create_with_backend(InMemoryBackend::new())?;
        Self::init(db)
    }

    /// Delete the record stored under `key`. Returns `false` if there was none.
    pub fn remove_key(&self, key: u64) -> Result<bool, StorageError> {
        let txn = self.db.begin_write()?;
        let removed = txn.open_table(FAVORITES)?.remove(key)?.is_some();
        txn.commit()?;
        tracing::debug!(key, removed, "removed favorite");
        Ok(removed)
    }

    fn init(db: Database) -> Result<Self, StorageError> {
        // Readers fail on a missing table, so create both up front.
        let txn = db.begin_write()?;
        txn.open_table(FAVORITES)?;
        txn.open_table(META)?;
        txn.commit()?;
        Ok(Self { db })
    }
}

impl FavoritesStore for RedbFavoritesStore {
    fn list(&self) -> Result<Vec<FavoriteRecord>, StorageError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(FAVORITES)?;
        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            records.push(serde_json::from_str(value.value())?);
        }
        Ok(records)
    }

    fn add(&self, book: &Book) -> Result<FavoriteRecord, StorageError> {
        let txn = self.db.begin_write()?;
        let record = {
            let mut table = txn.open_table(FAVORITES)?;
            let mut meta = txn.open_table(META)?;
            let counter = meta.get(NEXT_KEY)?.map(|next| next.value()).unwrap_or(1);
            // Files written before the counter existed only have their keys.
            let after_last = table.last()?.map(|(last, _)| last.value() + 1).unwrap_or(1);
            let key = counter.max(after_last);

            let record = FavoriteRecord::from_book(key, book);
            let json = serde_json::to_string(&record)?;
            table.insert(key, json.as_str())?;
            meta.insert(NEXT_KEY, key + 1)?;
            record
        };
        txn.commit()?;
        tracing::debug!(key = record.key, id = %record.id, "added favorite");
        Ok(record)
    }

    fn remove(&self, record: &FavoriteRecord) -> Result<bool, StorageError> {
        self.remove_key(record.key)
    }
}
