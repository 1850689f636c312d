//! Keyed persistence for tracker records.
//!
//! Every tracker stores its records under a key made of the tracker kind
//! and, for day-scoped trackers, a calendar day. Absent keys are not an
//! error; they read as `None`.

use crate::{Error, Result};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Which tracker a persisted key belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackerKind {
    /// Day-scoped exercise entry list
    Exercise,
    /// Day-scoped glass count
    Water,
    /// Global water goal and glass size
    WaterSettings,
    /// Global weight entry collection
    Weight,
    /// Global goal weight
    WeightGoal,
}

impl TrackerKind {
    const DAY_SCOPED: [TrackerKind; 2] = [TrackerKind::Exercise, TrackerKind::Water];

    fn prefix(&self) -> &'static str {
        match self {
            TrackerKind::Exercise => "exercises",
            TrackerKind::Water => "water",
            TrackerKind::WaterSettings => "water-settings",
            TrackerKind::Weight => "weight-entries",
            TrackerKind::WeightGoal => "goal-weight",
        }
    }

    pub fn is_day_scoped(&self) -> bool {
        Self::DAY_SCOPED.contains(self)
    }
}

/// A (tracker, day) key; `day` is `None` for global settings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StoreKey {
    pub kind: TrackerKind,
    pub day: Option<NaiveDate>,
}

impl StoreKey {
    pub fn daily(kind: TrackerKind, day: NaiveDate) -> Self {
        debug_assert!(kind.is_day_scoped(), "{:?} is not day-scoped", kind);
        Self {
            kind,
            day: Some(day),
        }
    }

    pub fn global(kind: TrackerKind) -> Self {
        Self { kind, day: None }
    }

    /// Storage name, e.g. `exercises-2024-01-01` or `goal-weight`
    pub fn name(&self) -> String {
        match self.day {
            Some(day) => format!("{}-{}", self.kind.prefix(), day.format(DAY_FORMAT)),
            None => self.kind.prefix().to_string(),
        }
    }

    /// Parse a storage name back into a day-scoped key.
    pub fn parse_daily(name: &str) -> Option<Self> {
        TrackerKind::DAY_SCOPED.iter().find_map(|kind| {
            let rest = name.strip_prefix(kind.prefix())?.strip_prefix('-')?;
            let day = NaiveDate::parse_from_str(rest, DAY_FORMAT).ok()?;
            Some(Self::daily(*kind, day))
        })
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Raw keyed storage.
///
/// Writes replace the whole value for a key; a reader never observes a
/// partially written value. Keys are independent of each other.
pub trait KeyedStore {
    fn read(&self, key: &StoreKey) -> Result<Option<String>>;
    fn write(&self, key: &StoreKey, contents: &str) -> Result<()>;
    /// Days that have a stored value for a day-scoped tracker, ascending
    fn days_with_records(&self, kind: TrackerKind) -> Result<Vec<NaiveDate>>;
}

impl<S: KeyedStore + ?Sized> KeyedStore for &S {
    fn read(&self, key: &StoreKey) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &StoreKey, contents: &str) -> Result<()> {
        (**self).write(key, contents)
    }

    fn days_with_records(&self, kind: TrackerKind) -> Result<Vec<NaiveDate>> {
        (**self).days_with_records(kind)
    }
}

/// Load and decode a single value, `None` when the key is absent
pub fn load_value<T, S>(store: &S, key: &StoreKey) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyedStore + ?Sized,
{
    let Some(contents) = store.read(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| Error::CorruptRecord {
            key: key.name(),
            source,
        })
}

/// Load a record list, empty when the key is absent
pub fn load_records<T, S>(store: &S, key: &StoreKey) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyedStore + ?Sized,
{
    Ok(load_value(store, key)?.unwrap_or_default())
}

/// Encode and save a value under `key`
pub fn save_value<T, S>(store: &S, key: &StoreKey, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyedStore + ?Sized,
{
    let contents = serde_json::to_string(value)?;
    store.write(key, &contents)
}

// ============================================================================
// File-backed store
// ============================================================================

/// One JSON file per key under a root directory, with file locking
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &StoreKey) -> PathBuf {
        self.root.join(format!("{}.json", key.name()))
    }

    fn read_locked(path: &Path) -> std::io::Result<String> {
        let file = File::open(path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let result = std::io::BufReader::new(&file).read_to_string(&mut contents);
        let _ = file.unlock();
        result.map(|_| contents)
    }

    fn write_atomic(&self, path: &Path, contents: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;

        // Temp file in the same directory so the rename stays atomic
        let temp = NamedTempFile::new_in(&self.root)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl KeyedStore for FileStore {
    fn read(&self, key: &StoreKey) -> Result<Option<String>> {
        let path = self.path_for(key);
        match Self::read_locked(&path) {
            Ok(contents) => {
                tracing::debug!("Read {} ({} bytes)", key, contents.len());
                Ok(Some(contents))
            }
            // Only a missing file is an absent key; anything else is unreachable storage
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No record for {} at {:?}", key, path);
                Ok(None)
            }
            Err(source) => Err(Error::StorageUnavailable {
                key: key.name(),
                source,
            }),
        }
    }

    fn write(&self, key: &StoreKey, contents: &str) -> Result<()> {
        let path = self.path_for(key);
        self.write_atomic(&path, contents)
            .map_err(|source| Error::StorageUnavailable {
                key: key.name(),
                source,
            })?;
        tracing::debug!("Saved {} to {:?}", key, path);
        Ok(())
    }

    fn days_with_records(&self, kind: TrackerKind) -> Result<Vec<NaiveDate>> {
        let unavailable = |source: std::io::Error| Error::StorageUnavailable {
            key: self.root.display().to_string(),
            source,
        };

        if !self.root.try_exists().map_err(unavailable)? {
            return Ok(Vec::new());
        }

        let mut days = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(unavailable)? {
            let path = entry.map_err(unavailable)?.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let parsed = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(StoreKey::parse_daily);
            if let Some(StoreKey { kind: k, day: Some(day) }) = parsed {
                if k == kind {
                    days.push(day);
                }
            }
        }

        days.sort();
        Ok(days)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store, used for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyedStore for MemoryStore {
    fn read(&self, key: &StoreKey) -> Result<Option<String>> {
        Ok(self.values.borrow().get(&key.name()).cloned())
    }

    fn write(&self, key: &StoreKey, contents: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.name(), contents.to_string());
        Ok(())
    }

    fn days_with_records(&self, kind: TrackerKind) -> Result<Vec<NaiveDate>> {
        // BTreeMap keys sort lexically, which is chronological for ISO days
        Ok(self
            .values
            .borrow()
            .keys()
            .filter_map(|name| StoreKey::parse_daily(name))
            .filter(|key| key.kind == kind)
            .filter_map(|key| key.day)
            .collect())
    }
}
