//! The persisted name -> place mapping shared by every profession.
//!
//! Locations are created by setup commands, read by every profession at the
//! start of each work cycle, and never mutated by the core beyond what a
//! setup command writes. The store is a flat JSON file, lazily loaded on
//! first access, tolerant of a missing or corrupt file (it starts empty and
//! rewrites on the next save).
//!
//! Multiple agent processes coordinate indirectly through this file; there
//! is no cross-process locking, which is an accepted race for setup data
//! that changes rarely.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::warn;

use overseer_types::Place;

/// Conventional name of the home zone.
pub const BASE_ZONE: &str = "base";

/// Conventional name of the central stockpile zone.
pub const STOCK_ZONE: &str = "estoque";

/// Conventional name of the crafting-station location.
pub const WORKBENCH: &str = "workbench";

/// Conventional name of the farming zone.
pub const FARM_ZONE: &str = "fazenda";

/// Errors produced by the location store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("location file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the mapping for persistence failed.
    #[error("location serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Lazily-loaded, file-backed store of named places.
#[derive(Debug)]
pub struct LocationStore {
    path: PathBuf,
    inner: Mutex<Option<BTreeMap<String, Place>>>,
}

impl LocationStore {
    /// Create a store backed by the given file path. Nothing is read until
    /// the first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(None),
        }
    }

    /// Look up a place by name.
    pub async fn get(&self, name: &str) -> Result<Option<Place>, StoreError> {
        let mut guard = self.inner.lock().await;
        let map = Self::ensure_loaded(&self.path, &mut guard).await?;
        Ok(map.get(name).copied())
    }

    /// Whether a place with the given name exists.
    pub async fn has(&self, name: &str) -> Result<bool, StoreError> {
        let mut guard = self.inner.lock().await;
        let map = Self::ensure_loaded(&self.path, &mut guard).await?;
        Ok(map.contains_key(name))
    }

    /// Create or replace a named place and persist immediately.
    pub async fn set(&self, name: &str, place: Place) -> Result<(), StoreError> {
        let mut guard = self.inner.lock().await;
        let map = Self::ensure_loaded(&self.path, &mut guard).await?;
        map.insert(name.to_owned(), place);
        Self::persist(&self.path, map).await
    }

    /// Remove a named place, persisting when something was removed.
    pub async fn remove(&self, name: &str) -> Result<bool, StoreError> {
        let mut guard = self.inner.lock().await;
        let map = Self::ensure_loaded(&self.path, &mut guard).await?;
        if map.remove(name).is_some() {
            Self::persist(&self.path, map).await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// All known place names, sorted.
    pub async fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut guard = self.inner.lock().await;
        let map = Self::ensure_loaded(&self.path, &mut guard).await?;
        Ok(map.keys().cloned().collect())
    }

    async fn ensure_loaded<'a>(
        path: &PathBuf,
        guard: &'a mut Option<BTreeMap<String, Place>>,
    ) -> Result<&'a mut BTreeMap<String, Place>, StoreError> {
        if guard.is_none() {
            let map = match tokio::fs::read_to_string(path).await {
                Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
                Ok(raw) => match serde_json::from_str(&raw) {
                    Ok(map) => map,
                    Err(err) => {
                        warn!(path = %path.display(), error = %err, "location file corrupt, starting empty");
                        BTreeMap::new()
                    }
                },
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
                Err(err) => return Err(StoreError::Io(err)),
            };
            *guard = Some(map);
        }
        Ok(guard.get_or_insert_with(BTreeMap::new))
    }

    async fn persist(path: &PathBuf, map: &BTreeMap<String, Place>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(map)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(tag: &str) -> PathBuf {
        let unique = uuid::Uuid::new_v4();
        std::env::temp_dir().join(format!("overseer-locations-{tag}-{unique}.json"))
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let store = LocationStore::new(temp_file("missing"));
        assert_eq!(store.get("base").await.ok().flatten(), None);
        assert_eq!(store.has("base").await.ok(), Some(false));
    }

    #[tokio::test]
    async fn set_then_get_roundtrip() {
        let path = temp_file("roundtrip");
        let store = LocationStore::new(path.clone());
        let place = Place::region(0, 64, 0, 5, 5);
        assert!(store.set("estoque", place).await.is_ok());
        assert_eq!(store.get("estoque").await.ok().flatten(), Some(place));

        // A second store instance reads what the first persisted.
        let reread = LocationStore::new(path.clone());
        assert_eq!(reread.get("estoque").await.ok().flatten(), Some(place));
        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn corrupt_file_recovers_empty() {
        let path = temp_file("corrupt");
        let write = tokio::fs::write(&path, "{not json at all").await;
        assert!(write.is_ok());

        let store = LocationStore::new(path.clone());
        assert_eq!(store.get("base").await.ok().flatten(), None);

        // A save after recovery rewrites the file cleanly.
        assert!(store.set("base", Place::point(1, 2, 3)).await.is_ok());
        let reread = LocationStore::new(path.clone());
        assert!(reread.get("base").await.ok().flatten().is_some());
        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn remove_reports_presence() {
        let path = temp_file("remove");
        let store = LocationStore::new(path.clone());
        let set = store.set("fazenda", Place::point(9, 64, 9)).await;
        assert!(set.is_ok());
        assert_eq!(store.remove("fazenda").await.ok(), Some(true));
        assert_eq!(store.remove("fazenda").await.ok(), Some(false));
        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn names_are_sorted() {
        let path = temp_file("names");
        let store = LocationStore::new(path.clone());
        let _ = store.set("estoque", Place::point(0, 0, 0)).await;
        let _ = store.set("base", Place::point(1, 1, 1)).await;
        assert_eq!(
            store.names().await.ok(),
            Some(vec!["base".to_owned(), "estoque".to_owned()])
        );
        let _ = tokio::fs::remove_file(path).await;
    }
}
