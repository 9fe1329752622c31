#![deny(warnings)]

//! Persistence layer: versioned JSON snapshots with a backup slot.
//!
//! A save writes `{ "state", "savedAt", "version" }` to the primary key
//! after mirroring the previous primary into the backup key. Loading
//! validates the primary and falls back to the backup when the primary is
//! missing or corrupt.

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use serde::{Deserialize, Serialize};
use sim_core::{validate_state, GameState, ValidationError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Snapshot format version. A different major version is rejected.
pub const SAVE_VERSION: &str = "1.2.0";
/// Largest serialized snapshot accepted by [`SaveManager::save`].
pub const MAX_SAVE_BYTES: usize = 5 * 1024 * 1024;
pub const PRIMARY_KEY: &str = "hitmaker_save";
pub const BACKUP_KEY: &str = "hitmaker_save_backup";

/// The persisted record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub state: GameState,
    /// Wall-clock time of the save (epoch ms).
    #[serde(rename = "savedAt")]
    pub saved_at: i64,
    pub version: String,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a GameState,
    #[serde(rename = "savedAt")]
    saved_at: i64,
    version: &'a str,
}

/// Errors raised while saving, loading, exporting or importing.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    /// Malformed JSON or missing/mistyped fields.
    #[error("failed to parse snapshot: {0}")]
    Parse(#[source] serde_json::Error),
    /// Parsed, but the state breaks an invariant.
    #[error("invalid snapshot: {0}")]
    Invalid(#[from] ValidationError),
    #[error("incompatible save version {found} (expected {expected})", expected = SAVE_VERSION)]
    IncompatibleVersion { found: String },
    #[error("snapshot of {size} bytes exceeds the {max} byte limit", max = MAX_SAVE_BYTES)]
    TooLarge { size: usize },
    #[error("no save found")]
    NoSave,
}

/// Which slot a loaded state came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveSlot {
    Primary,
    Backup,
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Parses and validates a snapshot. Derived fields (control score,
/// experience multiplier) are recomputed from their sources.
pub fn decode(text: &str) -> Result<SaveEnvelope, PersistError> {
    let mut envelope: SaveEnvelope = serde_json::from_str(text).map_err(PersistError::Parse)?;
    if major(&envelope.version) != major(SAVE_VERSION) {
        return Err(PersistError::IncompatibleVersion {
            found: envelope.version,
        });
    }
    validate_state(&envelope.state)?;
    envelope.state.recompute_control();
    envelope.state.recompute_experience();
    Ok(envelope)
}

/// Serializes a snapshot of `state` taken at `saved_at`.
pub fn encode(state: &GameState, saved_at: i64) -> Result<String, PersistError> {
    let text = serde_json::to_string(&EnvelopeRef {
        state,
        saved_at,
        version: SAVE_VERSION,
    })
    .map_err(PersistError::Encode)?;
    if text.len() > MAX_SAVE_BYTES {
        return Err(PersistError::TooLarge { size: text.len() });
    }
    Ok(text)
}

/// Save/load front end over a [`Storage`] backend.
#[derive(Debug)]
pub struct SaveManager<S: Storage> {
    storage: S,
    primary_key: String,
    backup_key: String,
}

impl<S: Storage> SaveManager<S> {
    pub fn new(storage: S) -> Self {
        Self::with_keys(storage, PRIMARY_KEY, BACKUP_KEY)
    }

    pub fn with_keys(storage: S, primary: impl Into<String>, backup: impl Into<String>) -> Self {
        Self {
            storage,
            primary_key: primary.into(),
            backup_key: backup.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Copies the current primary into the backup slot. Failures are only
    /// logged.
    fn back_up_primary(&mut self) {
        match self.storage.get(&self.primary_key) {
            Ok(Some(previous)) => {
                if let Err(e) = self.storage.set(&self.backup_key, &previous) {
                    warn!(error = %e, "failed to copy primary save to backup");
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read primary save for backup"),
        }
    }

    /// Writes `state` to the primary slot. Returns the snapshot size.
    ///
    /// When the backend reports a full quota, the backup is dropped and the
    /// write retried once.
    pub fn save(&mut self, state: &GameState, now: i64) -> Result<usize, PersistError> {
        let text = encode(state, now)?;
        self.back_up_primary();
        match self.storage.set(&self.primary_key, &text) {
            Ok(()) => {}
            Err(StorageError::QuotaExceeded { .. }) => {
                warn!("storage quota exceeded, clearing backup and retrying");
                self.storage.remove(&self.backup_key)?;
                self.storage.set(&self.primary_key, &text)?;
            }
            Err(e) => return Err(e.into()),
        }
        debug!(bytes = text.len(), "game saved");
        Ok(text.len())
    }

    fn read_slot(&self, key: &str) -> Result<Option<SaveEnvelope>, PersistError> {
        match self.storage.get(key)? {
            Some(text) => decode(&text).map(Some),
            None => Ok(None),
        }
    }

    /// Loads the newest usable state and reports which slot it came from.
    pub fn load_with_slot(&self) -> Option<(GameState, SaveSlot)> {
        match self.read_slot(&self.primary_key) {
            Ok(Some(envelope)) => return Some((envelope.state, SaveSlot::Primary)),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "primary save unusable, trying backup"),
        }
        match self.read_slot(&self.backup_key) {
            Ok(Some(envelope)) => {
                info!(saved_at = envelope.saved_at, "restored game from backup");
                Some((envelope.state, SaveSlot::Backup))
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "backup save unusable");
                None
            }
        }
    }

    /// Loads the newest usable state, or `None` when no slot is usable.
    pub fn load(&self) -> Option<GameState> {
        self.load_with_slot().map(|(state, _)| state)
    }

    pub fn has_save(&self) -> bool {
        matches!(self.storage.get(&self.primary_key), Ok(Some(_)))
    }

    /// Pretty-printed copy of the validated primary save.
    pub fn export(&self) -> Result<String, PersistError> {
        let envelope = self
            .read_slot(&self.primary_key)?
            .ok_or(PersistError::NoSave)?;
        serde_json::to_string_pretty(&envelope).map_err(PersistError::Encode)
    }

    /// Replaces the primary save with `text` after validating it. The
    /// previous primary is kept as the backup.
    pub fn import(&mut self, text: &str) -> Result<GameState, PersistError> {
        let envelope = decode(text)?;
        let normalized = encode(&envelope.state, envelope.saved_at)?;
        self.back_up_primary();
        self.storage.set(&self.primary_key, &normalized)?;
        info!(saved_at = envelope.saved_at, "save imported");
        Ok(envelope.state)
    }

    /// Deletes both slots.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.storage.remove(&self.primary_key)?;
        self.storage.remove(&self.backup_key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::{Genre, Song};

    fn sample() -> GameState {
        let mut s = GameState::new("Nova", 1_000);
        s.money = 1234.5678;
        s.gain_fans(321.125);
        s.songs.push(Song {
            id: 9,
            name: "Neon Echo".into(),
            genre: Genre::Electronic,
            created_at: 2_000,
            income_per_second: 1.0 / 3.0,
            fans_per_second: 0.1,
        });
        s
    }

    #[test]
    fn save_then_load_reproduces_state() {
        let mut m = SaveManager::new(MemoryStorage::new());
        let s = sample();
        m.save(&s, 5_000).unwrap();
        assert_eq!(m.load(), Some(s));
    }

    #[test]
    fn envelope_uses_saved_at_field_name() {
        let text = encode(&sample(), 42).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["savedAt"], 42);
        assert_eq!(value["version"], SAVE_VERSION);
        assert!(value["state"].is_object());
    }

    #[test]
    fn previous_primary_becomes_backup() {
        let mut m = SaveManager::new(MemoryStorage::new());
        let first = sample();
        m.save(&first, 1).unwrap();
        let mut second = first.clone();
        second.money = 1.0;
        m.save(&second, 2).unwrap();
        let backup = m.storage().get(BACKUP_KEY).unwrap().unwrap();
        assert_eq!(decode(&backup).unwrap().state, first);
    }

    #[test]
    fn clear_removes_both_slots() {
        let mut m = SaveManager::new(MemoryStorage::new());
        let s = sample();
        m.save(&s, 1).unwrap();
        m.save(&s, 2).unwrap();
        assert!(m.storage().contains(BACKUP_KEY));
        m.clear().unwrap();
        assert!(!m.has_save());
        assert_eq!(m.load(), None);
        assert!(!m.storage().contains(BACKUP_KEY));
        m.clear().unwrap();
    }

    #[test]
    fn corrupt_primary_falls_back_to_backup() {
        let mut m = SaveManager::new(MemoryStorage::new());
        let s = sample();
        m.save(&s, 1).unwrap();
        m.save(&s, 2).unwrap();
        m.storage_mut().set(PRIMARY_KEY, "{not json").unwrap();
        assert_eq!(m.load_with_slot(), Some((s, SaveSlot::Backup)));
    }

    #[test]
    fn invalid_primary_falls_back_to_backup() {
        let mut m = SaveManager::new(MemoryStorage::new());
        let s = sample();
        m.save(&s, 1).unwrap();
        m.save(&s, 2).unwrap();
        let mut bad = s.clone();
        bad.tier = 9;
        let text = serde_json::to_string(&SaveEnvelope {
            state: bad,
            saved_at: 3,
            version: SAVE_VERSION.into(),
        })
        .unwrap();
        m.storage_mut().set(PRIMARY_KEY, &text).unwrap();
        assert_eq!(m.load_with_slot().map(|(_, slot)| slot), Some(SaveSlot::Backup));
    }

    #[test]
    fn nothing_usable_loads_none() {
        let mut m = SaveManager::new(MemoryStorage::new());
        assert_eq!(m.load(), None);
        m.storage_mut().set(PRIMARY_KEY, "[]").unwrap();
        m.storage_mut().set(BACKUP_KEY, "null").unwrap();
        assert_eq!(m.load(), None);
    }

    #[test]
    fn other_major_version_is_rejected() {
        let text = serde_json::to_string(&SaveEnvelope {
            state: sample(),
            saved_at: 0,
            version: "2.0.0".into(),
        })
        .unwrap();
        assert!(matches!(
            decode(&text),
            Err(PersistError::IncompatibleVersion { .. })
        ));

        let text = text.replace("\"2.0.0\"", "\"1.0.3\"");
        assert!(decode(&text).is_ok());
    }

    #[test]
    fn quota_exceeded_clears_backup_and_retries() {
        let small = sample();
        let mut big = sample();
        big.artist.name.push_str(&"!".repeat(200));
        let size = encode(&small, 0).unwrap().len();
        // Fits two small snapshots but not a small backup next to a big primary.
        let mut m = SaveManager::new(MemoryStorage::with_quota(2 * size + 100));
        m.save(&small, 0).unwrap();
        m.save(&small, 1).unwrap();
        assert!(m.storage().contains(BACKUP_KEY));

        m.save(&big, 2).unwrap();
        assert!(!m.storage().contains(BACKUP_KEY));
        assert_eq!(m.load(), Some(big));
    }

    #[test]
    fn quota_failure_after_retry_is_reported() {
        let mut m = SaveManager::new(MemoryStorage::with_quota(16));
        assert!(matches!(
            m.save(&sample(), 0),
            Err(PersistError::Storage(StorageError::QuotaExceeded { .. }))
        ));
    }

    #[test]
    fn oversized_snapshot_is_rejected() {
        let mut s = sample();
        s.artist.name = "x".repeat(MAX_SAVE_BYTES);
        let mut m = SaveManager::new(MemoryStorage::new());
        assert!(matches!(m.save(&s, 0), Err(PersistError::TooLarge { .. })));
        assert!(!m.has_save());
    }

    #[test]
    fn export_then_import_roundtrips() {
        let mut m = SaveManager::new(MemoryStorage::new());
        assert!(matches!(m.export(), Err(PersistError::NoSave)));
        let s = sample();
        m.save(&s, 10).unwrap();
        let text = m.export().unwrap();
        assert!(text.contains('\n'));

        let mut other = SaveManager::new(MemoryStorage::new());
        other.save(&GameState::new("Old", 0), 0).unwrap();
        assert_eq!(other.import(&text).unwrap(), s);
        assert_eq!(other.load(), Some(s));
        let backup = other.storage().get(BACKUP_KEY).unwrap().unwrap();
        assert_eq!(decode(&backup).unwrap().state.artist.name, "Old");
    }

    #[test]
    fn invalid_import_changes_nothing() {
        let mut m = SaveManager::new(MemoryStorage::new());
        let s = sample();
        m.save(&s, 0).unwrap();
        assert!(matches!(m.import("{}"), Err(PersistError::Parse(_))));
        assert_eq!(m.load(), Some(s));
    }

    #[test]
    fn load_recomputes_control() {
        let mut s = sample();
        s.platforms.push(sim_core::OwnedPlatform {
            kind: sim_core::PlatformKind::IndieStreaming,
            acquired_at: 0,
        });
        s.control_score = 0.0;
        let text = encode(&s, 0).unwrap();
        assert_eq!(decode(&text).unwrap().state.control_score, 10.0);
    }
}
