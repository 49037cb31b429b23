use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::domain::Subject;

/// Storage abstraction for the full subject collection, loaded and saved as one unit.
pub trait SubjectRepository: Send + Sync {
    fn load(&self) -> Result<Vec<Subject>, RepositoryError>;
    fn save(&self, subjects: &[Subject]) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("stored subjects at {} could not be parsed: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize subjects: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySubjectRepository {
    subjects: Arc<Mutex<Vec<Subject>>>,
}

impl InMemorySubjectRepository {
    pub fn with_subjects(subjects: Vec<Subject>) -> Self {
        Self {
            subjects: Arc::new(Mutex::new(subjects)),
        }
    }
}

impl SubjectRepository for InMemorySubjectRepository {
    fn load(&self) -> Result<Vec<Subject>, RepositoryError> {
        let guard = self
            .subjects
            .lock()
            .map_err(|_| RepositoryError::Unavailable("subject mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, subjects: &[Subject]) -> Result<(), RepositoryError> {
        let mut guard = self
            .subjects
            .lock()
            .map_err(|_| RepositoryError::Unavailable("subject mutex poisoned".to_string()))?;
        *guard = subjects.to_vec();
        Ok(())
    }
}

/// Stores the collection as a JSON array in `<data_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubjectRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<Subject>, RepositoryError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error("read", &self.path, err)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| RepositoryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, subjects: &[Subject]) -> Result<(), RepositoryError> {
        let bytes = serde_json::to_vec_pretty(subjects).map_err(RepositoryError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| io_error("create directory", parent, err))?;
        }

        // Write beside the target and rename so a crash never leaves a torn file.
        let temp_path = self.path.with_extension("json.tmp");
        let mut file =
            File::create(&temp_path).map_err(|err| io_error("create", &temp_path, err))?;
        file.write_all(&bytes)
            .map_err(|err| io_error("write", &temp_path, err))?;
        file.sync_all()
            .map_err(|err| io_error("sync", &temp_path, err))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|err| io_error("rename", &self.path, err))?;

        tracing::debug!(path = %self.path.display(), count = subjects.len(), "saved subjects");
        Ok(())
    }
}

fn io_error(operation: &'static str, path: &Path, source: std::io::Error) -> RepositoryError {
    RepositoryError::Io {
        operation,
        path: path.to_path_buf(),
        source,
    }
}
