// SPDX-License-Identifier: GPL-3.0-only

//! Persisted favorites: an insertion ordered set of [`PokemonRecord`] keyed by id.
//!
//! Every mutation that changes the set is written to the storage before the
//! call returns. A failed write rolls the in-memory change back, so what a
//! restarted process reads is always what the last successful call left.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    entities::PokemonRecord,
    error::{DexError, DexResult},
    utils::write_atomically,
};

/// Name of the persisted record
pub const FAVORITES_RECORD_NAME: &str = "pokemon-favorites";
/// Current snapshot layout
pub const FAVORITES_VERSION: u32 = 1;

/// What gets written to the storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesSnapshot {
    pub favorites: Vec<PokemonRecord>,
    pub version: u32,
}

/// Durable home of the favorites snapshot
pub trait FavoritesStorage {
    /// The stored snapshot as written, `None` when nothing has been stored yet
    fn read(&self) -> DexResult<Option<String>>;

    /// Replaces the stored snapshot
    fn write(&self, contents: &str) -> DexResult<()>;
}

/// Stores the snapshot as a JSON file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesStorage for FileStorage {
    fn read(&self) -> DexResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, contents: &str) -> DexResult<()> {
        write_atomically(&self.path, contents.as_bytes())?;
        Ok(())
    }
}

/// In-memory storage, clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // The slot is a plain string, a panic elsewhere can't leave it half updated
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl FavoritesStorage for MemoryStorage {
    fn read(&self) -> DexResult<Option<String>> {
        Ok(self.lock().clone())
    }

    fn write(&self, contents: &str) -> DexResult<()> {
        *self.lock() = Some(contents.to_string());
        Ok(())
    }
}

/// The favorites of the user
#[derive(Debug)]
pub struct FavoritesStore<S: FavoritesStorage> {
    storage: S,
    favorites: Vec<PokemonRecord>,
}

impl<S: FavoritesStorage> FavoritesStore<S> {
    /// Restores the favorites from the storage, empty when nothing was stored yet
    pub fn open(storage: S) -> DexResult<Self> {
        let favorites = match storage.read()? {
            Some(contents) => decode_snapshot(&contents)?,
            None => Vec::new(),
        };

        debug!("Loaded {} favorites", favorites.len());
        Ok(Self { storage, favorites })
    }

    /// Adds the Pokémon unless one with the same id is already there, the
    /// stored record is kept in that case. Returns whether it was added.
    pub fn add(&mut self, record: PokemonRecord) -> DexResult<bool> {
        if self.is_favorite(record.id) {
            return Ok(false);
        }

        self.favorites.push(record);
        if let Err(e) = self.persist() {
            self.favorites.pop();
            return Err(e);
        }

        Ok(true)
    }

    /// Removes the Pokémon with that id. Returns whether it was there.
    pub fn remove(&mut self, id: i64) -> DexResult<bool> {
        let Some(index) = self.favorites.iter().position(|p| p.id == id) else {
            return Ok(false);
        };

        let removed = self.favorites.remove(index);
        if let Err(e) = self.persist() {
            self.favorites.insert(index, removed);
            return Err(e);
        }

        Ok(true)
    }

    /// Adds the Pokémon if it is not a favorite, removes it otherwise.
    /// Returns whether it is a favorite afterwards.
    pub fn toggle(&mut self, record: PokemonRecord) -> DexResult<bool> {
        if self.is_favorite(record.id) {
            self.remove(record.id)?;
            Ok(false)
        } else {
            self.add(record)
        }
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.iter().any(|p| p.id == id)
    }

    pub fn get(&self, id: i64) -> Option<&PokemonRecord> {
        self.favorites.iter().find(|p| p.id == id)
    }

    /// Removes every favorite
    pub fn clear(&mut self) -> DexResult<()> {
        let previous = std::mem::take(&mut self.favorites);
        if let Err(e) = self.persist() {
            self.favorites = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.favorites.len()
    }

    /// Favorites in the order they were added
    pub fn favorites(&self) -> &[PokemonRecord] {
        &self.favorites
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&self) -> DexResult<()> {
        let snapshot = FavoritesSnapshotRef {
            favorites: &self.favorites,
            version: FAVORITES_VERSION,
        };
        let contents = serde_json::to_string(&snapshot)?;
        self.storage.write(&contents)
    }
}

#[derive(Serialize)]
struct FavoritesSnapshotRef<'a> {
    favorites: &'a [PokemonRecord],
    version: u32,
}

/// Reads any snapshot layout we know about into the current one
fn decode_snapshot(contents: &str) -> DexResult<Vec<PokemonRecord>> {
    let mut value: serde_json::Value = serde_json::from_str(contents)?;

    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);

    if version > u64::from(FAVORITES_VERSION) {
        warn!(
            "Favorites were stored by a newer version ({version}), reading the fields we know"
        );
    }

    // Browser builds kept the set inside a `state` envelope
    if let Some(state) = value.get_mut("state").map(serde_json::Value::take) {
        debug!("Migrating favorites out of the legacy state envelope");
        value = state;
    }

    let favorites = match value.get_mut("favorites").map(serde_json::Value::take) {
        Some(favorites) => serde_json::from_value::<Vec<PokemonRecord>>(favorites)?,
        None => {
            return Err(DexError::InvalidPayload(format!(
                "stored {FAVORITES_RECORD_NAME} has no favorites list"
            )));
        }
    };

    Ok(dedup_by_id(favorites))
}

/// Keeps the first record of every id
fn dedup_by_id(favorites: Vec<PokemonRecord>) -> Vec<PokemonRecord> {
    let mut seen = HashSet::with_capacity(favorites.len());
    let before = favorites.len();
    let unique: Vec<PokemonRecord> = favorites
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .collect();

    if unique.len() != before {
        warn!(
            "Dropped {} duplicated favorites from the stored snapshot",
            before - unique.len()
        );
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PokemonStats;

    fn record(id: i64, name: &str) -> PokemonRecord {
        PokemonRecord {
            id,
            name: name.to_string(),
            image: format!("https://img/{id}.png"),
            types: vec!["normal".into()],
            height: 0.7,
            weight: 6.9,
            abilities: vec!["run-away".into()],
            description: String::from("A Pokémon."),
            stats: PokemonStats {
                hp: 45,
                speed: 45,
                ..Default::default()
            },
        }
    }

    /// Storage that refuses every write
    struct ReadOnlyStorage;

    impl FavoritesStorage for ReadOnlyStorage {
        fn read(&self) -> DexResult<Option<String>> {
            Ok(None)
        }

        fn write(&self, _contents: &str) -> DexResult<()> {
            Err(DexError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read only",
            )))
        }
    }

    #[test]
    fn add_then_is_favorite() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        assert!(store.add(record(25, "pikachu")).unwrap());
        assert!(store.is_favorite(25));
        assert!(!store.is_favorite(26));
    }

    #[test]
    fn remove_then_not_favorite() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        store.add(record(25, "pikachu")).unwrap();

        assert!(store.remove(25).unwrap());
        assert!(!store.is_favorite(25));
        assert!(!store.remove(25).unwrap());
    }

    #[test]
    fn add_is_idempotent_and_first_write_wins() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        store.add(record(25, "pikachu")).unwrap();

        assert!(!store.add(record(25, "raichu")).unwrap());
        assert_eq!(store.count(), 1);
        assert_eq!(store.get(25).map(|p| p.name.as_str()), Some("pikachu"));
    }

    #[test]
    fn clear_empties_the_set() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        store.add(record(1, "bulbasaur")).unwrap();
        store.add(record(4, "charmander")).unwrap();

        store.clear().unwrap();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut store = FavoritesStore::open(MemoryStorage::new()).unwrap();
        assert!(store.toggle(record(7, "squirtle")).unwrap());
        assert!(!store.toggle(record(7, "squirtle")).unwrap());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn reopening_keeps_records_and_order() {
        let storage = MemoryStorage::new();
        let mut store = FavoritesStore::open(storage.clone()).unwrap();
        store.add(record(150, "mewtwo")).unwrap();
        store.add(record(1, "bulbasaur")).unwrap();
        store.add(record(25, "pikachu")).unwrap();
        store.remove(1).unwrap();

        let reopened = FavoritesStore::open(storage).unwrap();
        assert_eq!(reopened.favorites(), store.favorites());
        let ids: Vec<i64> = reopened.favorites().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![150, 25]);
    }

    #[test]
    fn snapshot_carries_the_version() {
        let storage = MemoryStorage::new();
        let mut store = FavoritesStore::open(storage.clone()).unwrap();
        store.add(record(25, "pikachu")).unwrap();

        let stored = storage.read().unwrap().unwrap();
        let snapshot: FavoritesSnapshot = serde_json::from_str(&stored).unwrap();
        assert_eq!(snapshot.version, FAVORITES_VERSION);
        assert_eq!(snapshot.favorites.len(), 1);
    }

    #[test]
    fn failed_write_rolls_back() {
        let mut store = FavoritesStore::open(ReadOnlyStorage).unwrap();
        assert!(store.add(record(25, "pikachu")).is_err());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn failed_remove_and_clear_keep_the_set() {
        let mut store = FavoritesStore {
            storage: ReadOnlyStorage,
            favorites: vec![record(1, "bulbasaur"), record(4, "charmander")],
        };

        assert!(store.remove(1).is_err());
        assert!(store.clear().is_err());
        let ids: Vec<i64> = store.favorites().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn reads_the_legacy_state_envelope() {
        let storage = MemoryStorage::new();
        storage
            .write(r#"{"state":{"favorites":[{"id":25,"name":"pikachu","height":0.4}]},"version":1}"#)
            .unwrap();

        let store = FavoritesStore::open(storage).unwrap();
        assert!(store.is_favorite(25));
        assert_eq!(store.get(25).unwrap().height, 0.4);
    }

    #[test]
    fn newer_versions_and_unknown_fields_are_read_best_effort() {
        let storage = MemoryStorage::new();
        storage
            .write(r#"{"favorites":[{"id":4,"name":"charmander","nickname":"char"}],"version":7,"sortedBy":"name"}"#)
            .unwrap();

        let store = FavoritesStore::open(storage).unwrap();
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn duplicated_ids_in_storage_collapse_first_wins() {
        let storage = MemoryStorage::new();
        storage
            .write(r#"{"favorites":[{"id":4,"name":"charmander"},{"id":4,"name":"charmeleon"}],"version":1}"#)
            .unwrap();

        let store = FavoritesStore::open(storage).unwrap();
        assert_eq!(store.count(), 1);
        assert_eq!(store.get(4).unwrap().name, "charmander");
    }

    #[test]
    fn snapshot_without_favorites_is_rejected() {
        let storage = MemoryStorage::new();
        storage.write(r#"{"version":1}"#).unwrap();

        assert!(FavoritesStore::open(storage).is_err());
    }

    #[test]
    fn file_storage_survives_a_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dexview").join("pokemon-favorites.json");

        let mut store = FavoritesStore::open(FileStorage::new(&path)).unwrap();
        assert_eq!(store.count(), 0);
        store.add(record(94, "gengar")).unwrap();
        store.add(record(132, "ditto")).unwrap();
        drop(store);

        let reopened = FavoritesStore::open(FileStorage::new(&path)).unwrap();
        let ids: Vec<i64> = reopened.favorites().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![94, 132]);
        assert_eq!(reopened.get(94), Some(&record(94, "gengar")));
    }
}
