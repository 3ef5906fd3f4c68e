//! Byte-level object operations over a local directory.
//!
//! Keys are relative slash-separated paths such as `sessions/<id>.json`.
//! Writes go to a uniquely named temp file in the target directory and are
//! then renamed over the object, so readers never see a partial object.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::error::StorageError;

const TMP_SUFFIX: &str = ".tmp";

#[derive(Debug, Clone)]
pub struct ObjectStore {
    root: PathBuf,
}

impl ObjectStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::PutObject {
            key: root.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let well_formed = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !well_formed {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    pub fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path(key)?;
        std::fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound {
                    key: key.to_string(),
                }
            } else {
                StorageError::GetObject {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    pub fn put_object(&self, key: &str, body: &[u8]) -> Result<(), StorageError> {
        let path = self.path(key)?;
        let put_err = |e: std::io::Error| StorageError::PutObject {
            key: key.to_string(),
            message: e.to_string(),
        };

        let dir = path.parent().unwrap_or(&self.root);
        std::fs::create_dir_all(dir).map_err(put_err)?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = dir.join(format!(
            ".{file_name}.{}{TMP_SUFFIX}",
            Uuid::new_v4().simple()
        ));
        std::fs::write(&tmp_path, body).map_err(put_err)?;

        if let Err(e) = std::fs::rename(&tmp_path, &path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(put_err(e));
        }

        tracing::debug!(key, bytes = body.len(), "object written");
        Ok(())
    }

    /// Delete an object. Returns `false` when it did not exist.
    pub fn delete_object(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(key, "object deleted");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteObject {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// List object keys directly under `prefix` (a directory key ending in
    /// `/`), sorted. In-flight temp files are skipped.
    pub fn list_objects(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.path(prefix.trim_end_matches('/'))?;
        let list_err = |e: std::io::Error| StorageError::ListObjects {
            prefix: prefix.to_string(),
            message: e.to_string(),
        };

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(list_err(e)),
        };

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(list_err)?;
            if !entry.file_type().map_err(list_err)?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || name.ends_with(TMP_SUFFIX) {
                continue;
            }
            keys.push(format!("{}/{name}", prefix.trim_end_matches('/')));
        }
        keys.sort();
        Ok(keys)
    }
}
