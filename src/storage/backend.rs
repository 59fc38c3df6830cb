//! Storage backend trait and implementations.
//!
//! Two backends persist the same documents:
//! - `FolderBackend` - per-cycle folders holding `cycle_data.json` (default)
//! - `KvBackend` - a single flat directory keyed by cycle id
//!
//! The folder backend treats permission errors as soft failures and falls
//! back to a flat copy under the data dir, mirroring how a sandboxed
//! directory handle degrades to plain key-value storage.

use crate::models::{AppIndex, CycleData, CycleMeta};
use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the per-cycle document inside its folder.
pub const CYCLE_FILE: &str = "cycle_data.json";

/// File name of the global index inside the data dir.
pub const INDEX_FILE: &str = "index.json";

/// Trait for storage backends that persist the index and cycle documents.
pub trait StorageBackend {
    /// Load the global index. Missing or unparseable files load as empty.
    fn load_index(&self) -> Result<AppIndex>;

    /// Persist the global index.
    fn save_index(&self, index: &AppIndex) -> Result<()>;

    /// Prepare storage for a brand-new cycle and return the folder path to
    /// record in its `CycleMeta` (None for flat storage).
    fn init_cycle(&self, meta: &CycleMeta, parent: Option<&Path>) -> Result<Option<String>>;

    /// Read a cycle document. Ok(None) when no document exists yet.
    fn read_document(&self, meta: &CycleMeta) -> Result<Option<CycleData>>;

    /// Write a cycle document (pretty-printed JSON).
    fn write_document(&self, meta: &CycleMeta, data: &CycleData) -> Result<()>;

    /// Storage location description for display purposes.
    fn location(&self) -> String;

    /// Backend type name.
    fn backend_type(&self) -> BackendType;
}

/// Available storage backend types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendType {
    /// Per-cycle folders chosen by the user (default)
    #[default]
    Folder,
    /// Flat key-value files under the data dir
    Kv,
}

impl BackendType {
    /// Parse a backend type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "folder" | "file" | "default" => Some(Self::Folder),
            "kv" | "flat" | "local" => Some(Self::Kv),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Kv => "kv",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn read_index_file(path: &Path) -> Result<AppIndex> {
    if !path.exists() {
        return Ok(AppIndex::default());
    }
    let raw = fs::read_to_string(path)?;
    // A corrupt index degrades to empty rather than locking the user out.
    Ok(serde_json::from_str(&raw).unwrap_or_default())
}

fn write_index_file(path: &Path, index: &AppIndex) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let raw = serde_json::to_string_pretty(index)?;
    fs::write(path, raw)?;
    Ok(())
}

fn write_document_file(path: &Path, data: &CycleData) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;
    }
    let raw = serde_json::to_string_pretty(data)?;
    fs::write(path, raw).map_err(|e| io_error(path, e))?;
    Ok(())
}

/// Surface access problems as `PermissionDenied` so callers can degrade.
fn io_error(path: &Path, err: std::io::Error) -> Error {
    if err.kind() == ErrorKind::PermissionDenied {
        Error::PermissionDenied(path.display().to_string())
    } else {
        Error::Io(err)
    }
}

fn is_permission_denied(err: &Error) -> bool {
    match err {
        Error::PermissionDenied(_) => true,
        Error::Io(io) => io.kind() == ErrorKind::PermissionDenied,
        _ => false,
    }
}

/// Default backend: each cycle lives in its own user-chosen folder.
pub struct FolderBackend {
    data_dir: PathBuf,
}

impl FolderBackend {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE)
    }

    /// Flat copy used when the cycle folder denies access.
    fn fallback_path(&self, cycle_id: &str) -> PathBuf {
        self.data_dir
            .join("fallback")
            .join(format!("{}.json", cycle_id))
    }

    fn folder_document_path(&self, meta: &CycleMeta) -> Option<PathBuf> {
        meta.folder_path
            .as_deref()
            .map(|folder| Path::new(folder).join(CYCLE_FILE))
    }

    fn try_read(path: &Path) -> Result<Option<CycleData>> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(path, e)),
        }
    }
}

impl StorageBackend for FolderBackend {
    fn load_index(&self) -> Result<AppIndex> {
        read_index_file(&self.index_path())
    }

    fn save_index(&self, index: &AppIndex) -> Result<()> {
        write_index_file(&self.index_path(), index)
    }

    fn init_cycle(&self, meta: &CycleMeta, parent: Option<&Path>) -> Result<Option<String>> {
        let parent = parent.ok_or_else(|| {
            Error::InvalidInput(
                "A parent folder is required: pass --parent or set default-parent-dir".to_string(),
            )
        })?;
        if !parent.is_dir() {
            return Err(Error::InvalidInput(format!(
                "The selected parent folder is not valid: {}",
                parent.display()
            )));
        }

        let suffix: String = meta
            .id
            .chars()
            .rev()
            .take(6)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let folder_name = format!("{}_{}", super::sanitize_folder_name(&meta.name), suffix);
        let folder_path = parent.join(folder_name);
        fs::create_dir_all(&folder_path)?;

        Ok(Some(super::normalize_display_path(
            &folder_path.to_string_lossy(),
        )))
    }

    fn read_document(&self, meta: &CycleMeta) -> Result<Option<CycleData>> {
        // A fallback copy only exists while the cycle folder rejects
        // writes, so it is always at least as fresh as the folder copy.
        if let Some(data) = Self::try_read(&self.fallback_path(&meta.id))? {
            return Ok(Some(data));
        }
        if let Some(path) = self.folder_document_path(meta) {
            return match Self::try_read(&path) {
                Ok(found) => Ok(found),
                Err(e) if is_permission_denied(&e) => Ok(None),
                Err(e) => Err(e),
            };
        }
        Ok(None)
    }

    fn write_document(&self, meta: &CycleMeta, data: &CycleData) -> Result<()> {
        if let Some(path) = self.folder_document_path(meta) {
            match write_document_file(&path, data) {
                Ok(()) => {
                    // The folder accepted the write; the degraded copy is
                    // now stale and must not shadow it on the next read.
                    let _ = fs::remove_file(self.fallback_path(&meta.id));
                    return Ok(());
                }
                Err(e) if is_permission_denied(&e) => {
                    // Folder unwritable: keep the data in the flat fallback.
                    return write_document_file(&self.fallback_path(&meta.id), data);
                }
                Err(e) => return Err(e),
            }
        }
        write_document_file(&self.fallback_path(&meta.id), data)
    }

    fn location(&self) -> String {
        format!("{} (per-cycle folders)", self.data_dir.display())
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Folder
    }
}

/// Flat backend: index plus one `cycle_<id>.json` per cycle, all under
/// the data dir. No per-cycle folders, no `folderPath` recorded.
pub struct KvBackend {
    data_dir: PathBuf,
}

impl KvBackend {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE)
    }

    fn document_path(&self, cycle_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", cycle_id))
    }
}

impl StorageBackend for KvBackend {
    fn load_index(&self) -> Result<AppIndex> {
        read_index_file(&self.index_path())
    }

    fn save_index(&self, index: &AppIndex) -> Result<()> {
        write_index_file(&self.index_path(), index)
    }

    fn init_cycle(&self, _meta: &CycleMeta, _parent: Option<&Path>) -> Result<Option<String>> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(None)
    }

    fn read_document(&self, meta: &CycleMeta) -> Result<Option<CycleData>> {
        match fs::read_to_string(self.document_path(&meta.id)) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, meta: &CycleMeta, data: &CycleData) -> Result<()> {
        write_document_file(&self.document_path(&meta.id), data)
    }

    fn location(&self) -> String {
        format!("{} (flat key-value)", self.data_dir.display())
    }

    fn backend_type(&self) -> BackendType {
        BackendType::Kv
    }
}
