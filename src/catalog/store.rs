//! Flat-file catalog persistence.
//!
//! # Responsibilities
//! - Load the full course list from a JSON file
//! - Append a course via read-modify-write of the whole file
//!
//! # Design Decisions
//! - A missing file is an empty catalog, not an error
//! - Appends serialize behind an internal mutex so two concurrent adds
//!   cannot interleave their read-modify-write cycles
//! - Loads take no lock; the catalog is read-mostly and a reader observing
//!   the file between appends is acceptable
//! - Duplicate course codes are representable; `find` returns the first match

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::catalog::model::Course;

/// Error produced by catalog storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON-file-backed course store.
pub struct JsonFileStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            append_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all courses in insertion order.
    pub async fn load(&self) -> Result<Vec<Course>, StorageError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Append a course, rewriting the full file.
    pub async fn append(&self, course: Course) -> Result<(), StorageError> {
        let _guard = self.append_lock.lock().await;

        let mut courses = self.load().await?;
        courses.push(course);

        let json = serde_json::to_string_pretty(&courses).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;

        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StorageError::Io {
                path: self.path.clone(),
                source: e,
            })
    }

    /// First course with the given code, if any.
    pub async fn find(&self, code: &str) -> Result<Option<Course>, StorageError> {
        let courses = self.load().await?;
        Ok(courses.into_iter().find(|course| course.code == code))
    }
}
