//! Persistence: whole tournament documents keyed by tournament id.
//!
//! Stores hold JSON text. Every load goes through [`Tournament::from_json`];
//! a document that fails it is dropped and reported as absent.

use crate::models::{Tournament, TournamentId};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Errors from a tournament store. The in-memory tournament stays valid.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StorageError {
    /// No room left for the document.
    Full,
    /// Reading or writing the backing storage failed.
    Io(String),
    /// The document could not be serialized.
    Encode(String),
    /// Internal lock poisoned.
    Lock,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Full => write!(f, "Error saving results. Storage might be full"),
            StorageError::Io(msg) => write!(f, "Storage error: {}", msg),
            StorageError::Encode(msg) => write!(f, "Could not encode tournament: {}", msg),
            StorageError::Lock => write!(f, "lock error"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::StorageFull {
            StorageError::Full
        } else {
            StorageError::Io(e.to_string())
        }
    }
}

/// Load/save/clear of whole tournament documents.
pub trait TournamentStore {
    /// `Ok(None)` when nothing is stored or the stored document was corrupt.
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, StorageError>;

    fn save(&self, tournament: &Tournament) -> Result<(), StorageError>;

    /// Remove the document; clearing a missing one is not an error.
    fn clear(&self, id: TournamentId) -> Result<(), StorageError>;
}

fn encode(tournament: &Tournament) -> Result<String, StorageError> {
    tournament.to_json().map_err(|e| StorageError::Encode(e.to_string()))
}

/// Decode a stored document, `None` when it is corrupt.
fn decode_or_discard(id: TournamentId, json: &str) -> Option<Tournament> {
    match Tournament::from_json(json) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("Discarding stored tournament {}: {}", id, e);
            None
        }
    }
}

/// In-process store, optionally limited to a number of bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<TournamentId, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that reports [`StorageError::Full`] once documents would exceed
    /// `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Put raw text under `id`, bypassing encoding (e.g. documents written by
    /// another version).
    pub fn insert_raw(&self, id: TournamentId, json: impl Into<String>) -> Result<(), StorageError> {
        self.docs
            .write()
            .map_err(|_| StorageError::Lock)?
            .insert(id, json.into());
        Ok(())
    }

    pub fn contains(&self, id: TournamentId) -> bool {
        self.docs.read().map(|d| d.contains_key(&id)).unwrap_or(false)
    }
}

impl TournamentStore for MemoryStore {
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, StorageError> {
        let raw = self
            .docs
            .read()
            .map_err(|_| StorageError::Lock)?
            .get(&id)
            .cloned();
        let Some(json) = raw else {
            return Ok(None);
        };
        let decoded = decode_or_discard(id, &json);
        if decoded.is_none() {
            self.clear(id)?;
        }
        Ok(decoded)
    }

    fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let json = encode(tournament)?;
        let mut docs = self.docs.write().map_err(|_| StorageError::Lock)?;
        if let Some(quota) = self.quota {
            let others: usize = docs
                .iter()
                .filter(|(id, _)| **id != tournament.id)
                .map(|(_, doc)| doc.len())
                .sum();
            if others + json.len() > quota {
                return Err(StorageError::Full);
            }
        }
        docs.insert(tournament.id, json);
        Ok(())
    }

    fn clear(&self, id: TournamentId) -> Result<(), StorageError> {
        self.docs.write().map_err(|_| StorageError::Lock)?.remove(&id);
        Ok(())
    }
}

/// One `<id>.json` file per tournament inside a directory.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl TournamentStore for JsonFileStore {
    fn load(&self, id: TournamentId) -> Result<Option<Tournament>, StorageError> {
        let path = self.path(id);
        let json = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let decoded = decode_or_discard(id, &json);
        if decoded.is_none() {
            self.clear(id)?;
        }
        Ok(decoded)
    }

    fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
        let json = encode(tournament)?;
        // Write then rename so a failed write never leaves half a document.
        let tmp = self.dir.join(format!("{}.json.tmp", tournament.id));
        if let Err(e) = fs::write(&tmp, json) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        fs::rename(&tmp, self.path(tournament.id))?;
        Ok(())
    }

    fn clear(&self, id: TournamentId) -> Result<(), StorageError> {
        match fs::remove_file(self.path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
