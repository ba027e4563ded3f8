use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use samalook_core::domain::catalog::Catalog;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not read catalog document `{path}`: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not parse catalog document `{path}`: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("could not serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("could not write catalog document `{path}`: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("catalog writer task failed: {0}")]
    Task(String),
}

/// The single JSON file holding the whole catalog.
#[derive(Clone, Debug)]
pub struct CatalogDocument {
    path: PathBuf,
}

impl CatalogDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the document. A missing file yields `Ok(None)`.
    pub async fn read(&self) -> Result<Option<Catalog>, DocumentError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(DocumentError::Read { path: self.path.clone(), source }),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| DocumentError::Parse { path: self.path.clone(), source })
    }

    /// Catalog as seen by readers: a missing, unreadable, or malformed document is an
    /// empty catalog. Only the last two are logged.
    pub async fn load_or_empty(&self) -> Catalog {
        match self.read().await {
            Ok(catalog) => catalog.unwrap_or_default(),
            Err(error) => {
                warn!(
                    event_name = "store.document.unreadable",
                    path = %self.path.display(),
                    error = %error,
                    "catalog document unreadable, serving empty catalog"
                );
                Catalog::default()
            }
        }
    }

    /// Replaces the whole document. The new content lands in a sibling temp file that
    /// is renamed over the target, so readers see either the old or the new catalog.
    pub async fn write(&self, catalog: &Catalog) -> Result<(), DocumentError> {
        let mut encoded = serde_json::to_vec_pretty(catalog).map_err(DocumentError::Serialize)?;
        encoded.push(b'\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, &encoded))
            .await
            .map_err(|error| DocumentError::Task(error.to_string()))?
    }
}

fn replace_file(path: &Path, contents: &[u8]) -> Result<(), DocumentError> {
    let write_error = |source| DocumentError::Write { path: path.to_path_buf(), source };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut staged = NamedTempFile::new_in(parent).map_err(write_error)?;
    staged.write_all(contents).map_err(write_error)?;
    staged.as_file().sync_all().map_err(write_error)?;
    staged.persist(path).map_err(|error| write_error(error.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use samalook_core::domain::catalog::Catalog;
    use samalook_core::domain::product::ProductInput;
    use tempfile::TempDir;

    use super::{CatalogDocument, DocumentError};

    #[tokio::test]
    async fn missing_document_reads_as_none() {
        let dir = TempDir::new().expect("temp dir");
        let document = CatalogDocument::new(dir.path().join("products.json"));

        assert!(document.read().await.expect("read").is_none());
        assert_eq!(document.load_or_empty().await, Catalog::default());
    }

    #[tokio::test]
    async fn malformed_document_is_a_parse_error_but_loads_empty() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("products.json");
        fs::write(&path, "{ not json").expect("write fixture");
        let document = CatalogDocument::new(&path);

        assert!(matches!(document.read().await, Err(DocumentError::Parse { .. })));
        assert!(document.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn write_creates_parent_directories_and_indents() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("nested").join("products.json");
        let document = CatalogDocument::new(&path);

        let mut catalog = Catalog::default();
        catalog.insert("shoes", ProductInput::new("A", "100", "x")).expect("insert");
        document.write(&catalog).await.expect("write");

        let raw = fs::read_to_string(&path).expect("document should exist");
        assert!(raw.starts_with("{\n  \"shoes\": ["));
        assert_eq!(document.read().await.expect("read"), Some(catalog));
    }

    #[tokio::test]
    async fn write_into_unwritable_location_fails() {
        let dir = TempDir::new().expect("temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").expect("write blocker");
        let document = CatalogDocument::new(blocker.join("products.json"));

        let result = document.write(&Catalog::default()).await;

        assert!(matches!(result, Err(DocumentError::Write { .. })));
    }
}
