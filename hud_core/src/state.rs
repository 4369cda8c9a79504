//! Macro snapshot persistence with file locking.
//!
//! The snapshot is a single JSON document, overwritten wholesale on every
//! save.

use crate::{Error, MacroSnapshot, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl MacroSnapshot {
    /// Load a snapshot from a file with shared locking
    ///
    /// Returns a zeroed snapshot if the file doesn't exist.
    /// If the file is unreadable or corrupted, logs a warning and returns
    /// a zeroed snapshot.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No macro cache found at {:?}, starting from zero", path);
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open macro cache {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock macro cache {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read macro cache {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<MacroSnapshot>(&contents) {
            Ok(snapshot) => {
                tracing::debug!("Loaded macro snapshot from {:?}", path);
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!("Failed to parse macro cache {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }

    /// Save the snapshot atomically
    ///
    /// Writes to a temp file in the same directory, syncs it, then renames
    /// it over the original.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("macro cache path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved macro snapshot to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("macro-cache.json");

        let snapshot = MacroSnapshot {
            calories: 2100,
            protein: 160,
            carbs: 210,
            fat: 70,
            updated_at: Some(chrono::Utc::now()),
        };
        snapshot.save(&path).unwrap();

        let loaded = MacroSnapshot::load(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let snapshot = MacroSnapshot::load(&path).unwrap();
        assert_eq!(snapshot, MacroSnapshot::default());
    }

    #[test]
    fn test_load_legacy_document_without_all_fields() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("macro-cache.json");
        std::fs::write(&path, r#"{"calories": 900, "protein": 60}"#).unwrap();

        let snapshot = MacroSnapshot::load(&path).unwrap();
        assert_eq!(snapshot.calories, 900);
        assert_eq!(snapshot.protein, 60);
        assert_eq!(snapshot.carbs, 0);
        assert_eq!(snapshot.fat, 0);
        assert!(snapshot.updated_at.is_none());
    }

    #[test]
    fn test_corrupted_cache_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("corrupted.json");
        std::fs::write(&path, "{ invalid json }").unwrap();

        let snapshot = MacroSnapshot::load(&path).unwrap();
        assert_eq!(snapshot, MacroSnapshot::default());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("macro-cache.json");

        MacroSnapshot::default().save(&path).unwrap();
        MacroSnapshot::default().save(&path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "macro-cache.json")
            .collect();
        assert!(extras.is_empty(), "Found extras: {:?}", extras);
    }
}
