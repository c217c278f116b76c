use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::io::lock::FileLock;
use crate::model::tab::TabCollection;
use crate::store::Persist;

/// File name of the persisted collection inside the data directory
pub const TABS_FILE: &str = "tabs.json";

/// How long the TUI waits for another writer before writing anyway
const SAVE_LOCK_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize tabs: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl StorageError {
    fn is_not_found(&self) -> bool {
        matches!(self, StorageError::ReadError { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub fn tabs_path(data_dir: &Path) -> PathBuf {
    data_dir.join(TABS_FILE)
}

/// Read and parse a persisted collection
pub fn read_collection(path: &Path) -> Result<TabCollection, StorageError> {
    let bytes = fs::read(path).map_err(|e| StorageError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_collection(path, &bytes)
}

fn parse_collection(path: &Path, bytes: &[u8]) -> Result<TabCollection, StorageError> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load the collection, falling back to a single "Home" tab when the file
/// is missing or unreadable. A file that exists but doesn't parse is copied
/// aside first so the fallback state can't destroy it.
pub fn load_or_default(path: &Path) -> TabCollection {
    match read_collection(path) {
        Ok(collection) => collection,
        Err(e) if e.is_not_found() => {
            debug!(path = %path.display(), "no saved tabs, starting fresh");
            TabCollection::default()
        }
        Err(e) => {
            warn!(error = %e, "saved tabs unusable, starting fresh");
            if matches!(e, StorageError::ParseError { .. }) {
                match backup_corrupt(path) {
                    Ok(backup) => warn!(backup = %backup.display(), "kept a copy of the unreadable file"),
                    Err(err) => warn!(error = %err, "could not back up unreadable file"),
                }
            }
            TabCollection::default()
        }
    }
}

/// Copy `path` to `<path>.corrupt-<timestamp>`
pub fn backup_corrupt(path: &Path) -> io::Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".corrupt-{}", stamp));
    let backup = path.with_file_name(name);
    fs::copy(path, &backup)?;
    Ok(backup)
}

/// Serialize the collection exactly as it is written to disk
pub fn serialize_collection(collection: &TabCollection) -> Result<Vec<u8>, StorageError> {
    let mut bytes = serde_json::to_vec_pretty(collection)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write the collection atomically, creating the parent directory.
/// Returns the bytes written.
pub fn write_collection(path: &Path, collection: &TabCollection) -> Result<Vec<u8>, StorageError> {
    let bytes = serialize_collection(collection)?;
    let write_err = |e| StorageError::WriteError {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(write_err)?;
    }
    atomic_write(path, &bytes).map_err(write_err)?;
    Ok(bytes)
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Best-effort persistence to `tabs.json`.
///
/// Failures are logged and dropped. The last written bytes are remembered
/// so the file watcher can tell our own writes from external edits. The
/// data-dir lock is held from `refresh` to `release`, so a CLI write can't
/// land between reading the file and overwriting it.
pub struct JsonFile {
    path: PathBuf,
    last_written: Option<Vec<u8>>,
    held: Option<FileLock>,
}

impl JsonFile {
    /// Persist to `<data_dir>/tabs.json`, locking around each write
    pub fn new(data_dir: &Path) -> Self {
        JsonFile {
            path: tabs_path(data_dir),
            last_written: None,
            held: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `bytes` is exactly what we last wrote
    pub fn is_own_write(&self, bytes: &[u8]) -> bool {
        self.last_written.as_deref() == Some(bytes)
    }

    /// Load the current file, or the default collection
    pub fn load(&mut self) -> TabCollection {
        let collection = load_or_default(&self.path);
        // Remember what's on disk so an unchanged file isn't reloaded
        self.last_written = fs::read(&self.path).ok();
        collection
    }

    /// Read the file if it was changed by someone else
    pub fn read_external_change(&mut self) -> Option<TabCollection> {
        let bytes = fs::read(&self.path).ok()?;
        if self.is_own_write(&bytes) {
            return None;
        }
        match parse_collection(&self.path, &bytes) {
            Ok(collection) => {
                self.last_written = Some(bytes);
                Some(collection)
            }
            Err(e) => {
                // Likely a partial write from a non-atomic editor; keep ours
                debug!(error = %e, "ignoring unparsable external change");
                None
            }
        }
    }

    fn lock(&mut self) {
        if self.held.is_some() {
            return;
        }
        let dir = self.path.parent().unwrap_or(Path::new("."));
        match FileLock::acquire(dir, SAVE_LOCK_TIMEOUT) {
            Ok(lock) => self.held = Some(lock),
            Err(e) => warn!(error = %e, "writing without lock"),
        }
    }
}

impl Persist for JsonFile {
    fn refresh(&mut self) -> Option<TabCollection> {
        self.lock();
        self.read_external_change()
    }

    fn save(&mut self, collection: &TabCollection) {
        self.lock();
        match write_collection(&self.path, collection) {
            Ok(bytes) => self.last_written = Some(bytes),
            Err(e) => warn!(error = %e, "could not save tabs"),
        }
        self.held = None;
    }

    fn release(&mut self) {
        self.held = None;
    }
}
