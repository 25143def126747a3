//! JSON file backend

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use super::base::KnowledgeBase;
use super::error::{StoreError, StoreResult};
use super::traits::KnowledgeStore;

/// Default location, relative to the working directory
pub const DEFAULT_PATH: &str = "knowledge_base.json";

/// Knowledge base stored as a single JSON document.
///
/// The file is opened, fully read or written, and closed on every call.
/// Saves overwrite in place: no temp file, no backup, no locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

impl KnowledgeStore for JsonFileStore {
    fn load(&self) -> StoreResult<KnowledgeBase> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no knowledge base yet, starting empty");
                return Ok(KnowledgeBase::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let kb: KnowledgeBase =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Parse {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), entries = kb.len(), "loaded knowledge base");
        Ok(kb)
    }

    fn save(&mut self, kb: &KnowledgeBase) -> StoreResult<()> {
        let write_error = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(write_error)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, kb).map_err(|source| StoreError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        writer.flush().map_err(write_error)?;

        info!(path = %self.path.display(), entries = kb.len(), "saved knowledge base");
        Ok(())
    }
}

/// Load the knowledge base at `path`, empty if the file does not exist
pub fn load(path: impl AsRef<Path>) -> StoreResult<KnowledgeBase> {
    JsonFileStore::new(path.as_ref()).load()
}

/// Overwrite the file at `path` with `kb`
pub fn save(path: impl AsRef<Path>, kb: &KnowledgeBase) -> StoreResult<()> {
    JsonFileStore::new(path.as_ref()).save(kb)
}
