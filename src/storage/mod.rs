//! Storage layer for Cadence data.
//!
//! Persistence is a set of plain JSON documents:
//!
//! - `index.json` in the data dir - the global `AppIndex` (cycle registry
//!   plus the selected cycle id)
//! - `cycle_data.json` in each cycle's folder (folder backend), or
//!   `cycle_<id>.json` in the data dir (kv backend)
//!
//! The index is resilient by design: missing or corrupt files load as the
//! empty index. Cycle documents missing on disk are materialized as empty
//! documents carrying the index metadata.

pub mod backend;

pub use backend::{BackendType, FolderBackend, KvBackend, StorageBackend, CYCLE_FILE, INDEX_FILE};

use crate::models::{uid, AppIndex, CycleData, CycleMeta};
use crate::{Error, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory (test isolation).
pub const DATA_DIR_ENV: &str = "CADENCE_DATA_DIR";

/// Resolve the data directory: `CADENCE_DATA_DIR` env var, else the
/// platform data dir joined with `cadence`.
pub fn resolve_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(base.join("cadence"))
}

/// Replace characters outside `[A-Za-z0-9_-]` with `_`, trim leading and
/// trailing underscores, and fall back to "cycle" for empty results.
pub fn sanitize_folder_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "cycle".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Strip Windows extended-length path prefixes for display and storage.
pub fn normalize_display_path(path: &str) -> String {
    #[cfg(windows)]
    {
        if let Some(stripped) = path.strip_prefix(r"\\?\UNC\") {
            return format!(r"\\{}", stripped);
        }
        if let Some(stripped) = path.strip_prefix(r"\\?\") {
            return stripped.to_string();
        }
    }
    path.to_string()
}

/// Storage manager bound to a data directory and a backend.
pub struct Storage {
    data_dir: PathBuf,
    backend: Box<dyn StorageBackend>,
}

impl Storage {
    /// Open storage rooted at the given data dir, creating it if needed.
    pub fn open(data_dir: &Path, backend_type: BackendType) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let backend: Box<dyn StorageBackend> = match backend_type {
            BackendType::Folder => Box::new(FolderBackend::new(data_dir)),
            BackendType::Kv => Box::new(KvBackend::new(data_dir)),
        };
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            backend,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backend_type(&self) -> BackendType {
        self.backend.backend_type()
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Load the global index; missing or corrupt files load as empty.
    pub fn load_index(&self) -> Result<AppIndex> {
        self.backend.load_index()
    }

    /// Mark a cycle as selected and persist the index.
    pub fn select_cycle(&self, cycle_id: &str) -> Result<AppIndex> {
        let mut index = self.load_index()?;
        if index.find_cycle(cycle_id).is_none() {
            return Err(Error::NotFound(format!("cycle {}", cycle_id)));
        }
        index.selected_cycle_id = Some(cycle_id.to_string());
        self.backend.save_index(&index)?;
        Ok(index)
    }

    /// Create a new cycle: storage location, empty document, index entry.
    /// The new cycle becomes selected when nothing was selected before.
    pub fn create_cycle(&self, name: &str, parent: Option<&Path>) -> Result<AppIndex> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("Cycle name must not be empty".to_string()));
        }

        let mut index = self.load_index()?;
        let mut meta = CycleMeta {
            id: uid("cycle"),
            name: name.to_string(),
            created_at: Utc::now(),
            folder_path: None,
        };
        meta.folder_path = self.backend.init_cycle(&meta, parent)?;

        let data = CycleData::empty(meta.id.clone(), meta.name.clone(), meta.created_at);
        self.backend.write_document(&meta, &data)?;

        let id = meta.id.clone();
        index.cycles.push(meta);
        if index.selected_cycle_id.is_none() {
            index.selected_cycle_id = Some(id);
        }
        self.backend.save_index(&index)?;
        Ok(index)
    }

    /// Register an existing cycle folder: read its document, fill missing
    /// identity fields, update or append the index entry, select it.
    pub fn import_cycle(&self, folder: &Path) -> Result<AppIndex> {
        let file = folder.join(CYCLE_FILE);
        let raw = fs::read_to_string(&file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(format!("{} in {}", CYCLE_FILE, folder.display()))
            } else {
                e.into()
            }
        })?;
        let mut data: CycleData = serde_json::from_str(&raw)?;

        if data.id.is_empty() {
            data.id = uid("cycle");
        }
        if data.name.is_empty() {
            data.name = "Imported Cycle".to_string();
        }
        let id = data.id.clone();
        data.normalize(&id);

        let mut index = self.load_index()?;
        // The imported folder is adopted as-is; the kv backend keeps
        // documents flat and records no folder.
        let folder_path = match self.backend.backend_type() {
            BackendType::Folder => Some(normalize_display_path(&folder.to_string_lossy())),
            BackendType::Kv => None,
        };

        if let Some(existing) = index.cycles.iter_mut().find(|c| c.id == data.id) {
            existing.name = data.name.clone();
            existing.created_at = data.created_at;
            existing.folder_path = folder_path.clone();
        } else {
            index.cycles.push(CycleMeta {
                id: data.id.clone(),
                name: data.name.clone(),
                created_at: data.created_at,
                folder_path: folder_path.clone(),
            });
        }
        index.selected_cycle_id = Some(data.id.clone());

        let meta = index
            .find_cycle(&data.id)
            .cloned()
            .ok_or_else(|| Error::Other("Failed to register cycle".to_string()))?;
        self.backend.write_document(&meta, &data)?;
        self.backend.save_index(&index)?;
        Ok(index)
    }

    /// The currently selected cycle entry, or `NoCycleSelected`.
    pub fn selected_cycle(&self) -> Result<CycleMeta> {
        let index = self.load_index()?;
        index.selected_cycle().cloned().ok_or(Error::NoCycleSelected)
    }

    /// Load a cycle document. Index metadata wins over the stored copy for
    /// name/createdAt; a missing document materializes as empty.
    pub fn load_cycle_data(&self, cycle_id: &str) -> Result<CycleData> {
        let index = self.load_index()?;
        let meta = index
            .find_cycle(cycle_id)
            .ok_or_else(|| Error::NotFound(format!("cycle {}", cycle_id)))?;

        let mut data = match self.backend.read_document(meta)? {
            Some(data) => data,
            None => {
                let data = CycleData::empty(meta.id.clone(), meta.name.clone(), meta.created_at);
                self.backend.write_document(meta, &data)?;
                data
            }
        };

        data.name = meta.name.clone();
        data.created_at = meta.created_at;
        data.normalize(&meta.id);
        Ok(data)
    }

    /// Persist a cycle document, pinning id and name from the index entry.
    pub fn save_cycle_data(&self, cycle_id: &str, data: &CycleData) -> Result<()> {
        let index = self.load_index()?;
        let meta = index
            .find_cycle(cycle_id)
            .ok_or_else(|| Error::NotFound(format!("cycle {}", cycle_id)))?;

        let mut next = data.clone();
        next.name = meta.name.clone();
        next.normalize(&meta.id);
        self.backend.write_document(meta, &next)
    }
}
