//! File Registry Module
//! Holds the set of ingested report files and persists them as a single
//! opaque blob through an injected storage boundary.

use crate::data::{FileKind, FileRecord, Row};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("storage failure: {0}")]
    Persist(#[from] anyhow::Error),
    #[error("malformed registry blob: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Storage boundary for the persisted registry: one blob, whole-value
/// replacement on every write. The medium behind it is deliberately opaque.
pub trait BlobStore {
    /// `None` when nothing has been persisted yet.
    fn load(&self) -> anyhow::Result<Option<Vec<u8>>>;
    fn save(&self, bytes: &[u8]) -> anyhow::Result<()>;
}

/// Blob store backed by a single JSON file under a data directory.
pub struct FsBlobStore {
    path: PathBuf,
}

impl FsBlobStore {
    /// Store the registry blob as `<dir>/loss_reports.json`, creating the
    /// directory on demand.
    pub fn new(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(Self {
            path: dir.join("loss_reports.json"),
        })
    }
}

impl BlobStore for FsBlobStore {
    fn load(&self) -> anyhow::Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, bytes: &[u8]) -> anyhow::Result<()> {
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// In-memory blob store for tests and not-yet-persistent sessions.
#[derive(Default)]
pub struct MemoryBlobStore {
    blob: Mutex<Option<Vec<u8>>>,
}

impl BlobStore for MemoryBlobStore {
    fn load(&self) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blob.lock().unwrap().clone())
    }

    fn save(&self, bytes: &[u8]) -> anyhow::Result<()> {
        *self.blob.lock().unwrap() = Some(bytes.to_vec());
        Ok(())
    }
}

/// A successfully parsed upload, as delivered by the external file-parsing
/// collaborator. Parse failures never produce one of these, which is what
/// keeps the registry untouched by unparseable files.
#[derive(Debug, Clone)]
pub struct ParsedUpload {
    pub name: String,
    pub kind: FileKind,
    pub rows: Vec<Row>,
}

/// The set of ingested files, kept in memory and mirrored to the blob
/// store on every change. Single writer by construction; no locking.
pub struct FileRegistry<S: BlobStore> {
    store: S,
    files: Vec<FileRecord>,
}

impl<S: BlobStore> FileRegistry<S> {
    /// Load the persisted registry. A missing blob yields an empty
    /// registry; a corrupt blob is an error rather than silent data loss.
    pub fn load(store: S) -> Result<Self, RegistryError> {
        let files = match store.load()? {
            Some(bytes) => serde_json::from_slice::<Vec<FileRecord>>(&bytes)?,
            None => Vec::new(),
        };
        info!(files = files.len(), "registry loaded");
        Ok(Self { store, files })
    }

    /// Ingest a parsed upload: assign an id and upload timestamp, append,
    /// and persist the whole registry. On a persistence failure the append
    /// is rolled back so memory and blob never diverge.
    pub fn ingest(&mut self, upload: ParsedUpload) -> Result<&FileRecord, RegistryError> {
        let record = FileRecord {
            id: Uuid::new_v4().to_string(),
            name: upload.name,
            kind: upload.kind,
            uploaded_at: Utc::now(),
            rows: upload.rows,
        };
        debug!(name = %record.name, rows = record.rows.len(), "ingesting file");

        self.files.push(record);
        if let Err(e) = self.persist() {
            self.files.pop();
            warn!("ingest rolled back: {e}");
            return Err(e);
        }
        Ok(self.files.last().expect("record appended above"))
    }

    /// Remove a file by id. Returns whether anything was removed; the
    /// no-op case does not rewrite the blob.
    pub fn remove(&mut self, id: &str) -> Result<bool, RegistryError> {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        if self.files.len() == before {
            return Ok(false);
        }
        self.persist()?;
        info!(%id, "file removed");
        Ok(true)
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn get(&self, id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn persist(&self) -> Result<(), RegistryError> {
        let bytes = serde_json::to_vec(&self.files)?;
        self.store.save(&bytes)?;
        debug!(bytes = bytes.len(), "registry persisted");
        Ok(())
    }
}
