//! Single-file store backing every cache.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use redb::{Database, DatabaseError, ReadableTable, TableDefinition};
use tracing::debug;

use super::tables::{APP_MAPPING, DEVICES, TOKENS};
use crate::error::StorageError;

/// One of the three independent tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Tokens,
    Apps,
    Devices,
}

impl Namespace {
    fn table(self) -> TableDefinition<'static, &'static str, &'static str> {
        match self {
            Namespace::Tokens => TOKENS,
            Namespace::Apps => APP_MAPPING,
            Namespace::Devices => DEVICES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Tokens => "tokens",
            Namespace::Apps => "app_mapping",
            Namespace::Devices => "devices",
        }
    }
}

/// How `find_by_partial` compares the substring against stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    #[default]
    CaseInsensitive,
    CaseSensitive,
}

/// Attempts made while another invocation holds the file lock.
const LOCK_ATTEMPTS: u32 = 50;
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(20);

impl MatchMode {
    pub(crate) fn contains(self, haystack: &str, needle: &str) -> bool {
        match self {
            MatchMode::CaseSensitive => haystack.contains(needle),
            MatchMode::CaseInsensitive => haystack.to_lowercase().contains(&needle.to_lowercase()),
        }
    }
}

/// Handle to the persistent store.
///
/// Lent to the credential cache, device directory and app registry. The
/// file is only locked for the duration of a single operation, so
/// concurrent invocations interleave and the last write wins. Every write
/// commits before returning.
pub struct Store {
    path: PathBuf,
    match_mode: MatchMode,
}

impl Store {
    /// Open or create the store file at `path` and ensure all tables exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |message: String| StorageError::Unavailable {
            path: path.display().to_string(),
            message,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| unavailable(e.to_string()))?;
        }

        let store = Self {
            path,
            match_mode: MatchMode::default(),
        };
        store.initialize()?;
        debug!(path = %store.path.display(), "store opened");
        Ok(store)
    }

    /// Open the file for one operation, waiting briefly while another
    /// process holds it.
    fn connect(&self) -> Result<Database, StorageError> {
        let mut attempt = 1;
        loop {
            match Database::create(&self.path) {
                Ok(db) => return Ok(db),
                Err(DatabaseError::DatabaseAlreadyOpen) if attempt < LOCK_ATTEMPTS => {
                    attempt += 1;
                    thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(e) => {
                    return Err(StorageError::Unavailable {
                        path: self.path.display().to_string(),
                        message: e.to_string(),
                    })
                }
            }
        }
    }

    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Create any missing table. Existing rows are never touched.
    pub fn initialize(&self) -> Result<(), StorageError> {
        let db = self.connect()?;
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TOKENS)?;
            let _ = write_txn.open_table(APP_MAPPING)?;
            let _ = write_txn.open_table(DEVICES)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Insert or fully replace the value stored under `key`.
    pub fn upsert(&self, ns: Namespace, key: &str, value: &str) -> Result<(), StorageError> {
        self.upsert_many(ns, [(key, value)])
    }

    /// Upsert several rows in one commit.
    pub fn upsert_many<'a, I>(&self, ns: Namespace, rows: I) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let db = self.connect()?;
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(ns.table())?;
            for (key, value) in rows {
                table.insert(key, value)?;
                debug!(table = ns.as_str(), key, "upsert");
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Point lookup. A missing key is `Ok(None)`.
    pub fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>, StorageError> {
        let db = self.connect()?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(ns.table())?;
        let value = table.get(key)?.map(|v| v.value().to_string());
        Ok(value)
    }

    /// Key of the first row, in key order, whose value contains `substring`.
    ///
    /// When several rows match, which one wins depends only on key order;
    /// callers must tolerate that.
    pub fn find_by_partial(
        &self,
        ns: Namespace,
        substring: &str,
    ) -> Result<Option<String>, StorageError> {
        let db = self.connect()?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(ns.table())?;

        for entry in table.iter()? {
            let (key, value) = entry?;
            if self.match_mode.contains(value.value(), substring) {
                return Ok(Some(key.value().to_string()));
            }
        }

        Ok(None)
    }

    /// All rows of a table, in key order.
    pub fn entries(&self, ns: Namespace) -> Result<Vec<(String, String)>, StorageError> {
        let db = self.connect()?;
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(ns.table())?;

        let mut rows = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            rows.push((key.value().to_string(), value.value().to_string()));
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::setup_store;

    #[test]
    fn test_get_missing_is_none() {
        let (store, _tmp) = setup_store();
        assert_eq!(store.get(Namespace::Tokens, "10.0.0.5").unwrap(), None);
    }

    #[test]
    fn test_upsert_replaces() {
        let (store, _tmp) = setup_store();

        store.upsert(Namespace::Devices, "tv", "first").unwrap();
        store.upsert(Namespace::Devices, "tv", "second").unwrap();

        assert_eq!(
            store.get(Namespace::Devices, "tv").unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(store.entries(Namespace::Devices).unwrap().len(), 1);
    }

    #[test]
    fn test_namespaces_are_independent() {
        let (store, _tmp) = setup_store();

        store.upsert(Namespace::Tokens, "tv", "token").unwrap();

        assert_eq!(store.get(Namespace::Devices, "tv").unwrap(), None);
        assert_eq!(store.get(Namespace::Apps, "tv").unwrap(), None);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (store, _tmp) = setup_store();
        store.upsert(Namespace::Tokens, "tv", "abc").unwrap();

        store.initialize().unwrap();
        store.initialize().unwrap();

        assert_eq!(
            store.get(Namespace::Tokens, "tv").unwrap().as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_rows_survive_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("tv-tokens.redb");

        {
            let store = Store::open(&path).unwrap();
            store.upsert(Namespace::Apps, "111", "Netflix").unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert_eq!(
            store.get(Namespace::Apps, "111").unwrap().as_deref(),
            Some("Netflix")
        );
    }

    #[test]
    fn test_find_by_partial_first_in_key_order() {
        let (store, _tmp) = setup_store();
        store
            .upsert_many(
                Namespace::Apps,
                [("2", "YouTube Kids"), ("1", "YouTube"), ("3", "Netflix")],
            )
            .unwrap();

        assert_eq!(
            store.find_by_partial(Namespace::Apps, "YouTube").unwrap().as_deref(),
            Some("1")
        );
        assert_eq!(
            store.find_by_partial(Namespace::Apps, "Kids").unwrap().as_deref(),
            Some("2")
        );
        assert_eq!(store.find_by_partial(Namespace::Apps, "Disney").unwrap(), None);
    }

    #[test]
    fn test_find_by_partial_match_mode() {
        let (store, _tmp) = setup_store();
        store.upsert(Namespace::Apps, "1", "Netflix").unwrap();

        assert_eq!(
            store.find_by_partial(Namespace::Apps, "netf").unwrap().as_deref(),
            Some("1")
        );

        let store = store.with_match_mode(MatchMode::CaseSensitive);
        assert_eq!(store.find_by_partial(Namespace::Apps, "netf").unwrap(), None);
        assert_eq!(
            store.find_by_partial(Namespace::Apps, "Netf").unwrap().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn test_overlapping_handles_last_write_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("tv-tokens.redb");

        let first = Store::open(&path).unwrap();
        let second = Store::open(&path).unwrap();

        first.upsert(Namespace::Tokens, "tv", "from-first").unwrap();
        second.upsert(Namespace::Tokens, "tv", "from-second").unwrap();

        assert_eq!(
            first.get(Namespace::Tokens, "tv").unwrap().as_deref(),
            Some("from-second")
        );
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = Store::open(blocker.join("tv-tokens.redb"));
        assert!(matches!(result, Err(StorageError::Unavailable { .. })));
    }
}
