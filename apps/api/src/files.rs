//! File Store — persists uploaded job-posting files on local disk.
//!
//! Layout: `<root>/<owner namespace>/<stored name>`. The owner namespace is
//! derived from the submitter identity with path-unsafe characters replaced,
//! and stored names are random, so the write path never touches
//! caller-controlled path segments. Retrieval is by stored name alone and
//! scans every namespace directory; no reverse index is kept, so writes are
//! O(1) and reads are O(number of namespaces).

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::errors::AppError;

/// Handle returned by `save`. Ephemeral; not tied to any job record's
/// lifecycle (a stored file and its job record are deleted independently).
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub stored_name: String,
    pub namespace: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Writes `bytes` under the owner's namespace with a generated name that
    /// keeps the original extension for content-type inference.
    pub async fn save(
        &self,
        bytes: &[u8],
        owner_identity: &str,
        original_name: &str,
    ) -> Result<StoredFile, AppError> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                AppError::Validation(format!("File name '{original_name}' has no extension"))
            })?;

        let namespace = namespace_for(owner_identity);
        let dir = self.root.join(&namespace);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create {}: {e}", dir.display())))?;

        let stored_name = format!("{}.{}", Uuid::new_v4(), extension.to_lowercase());
        let path = dir.join(&stored_name);
        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {e}", path.display())))?;

        Ok(StoredFile {
            stored_name,
            namespace,
            path,
        })
    }

    /// Finds `stored_name` in any owner namespace and returns its bytes,
    /// inferred content type, and display name.
    pub async fn retrieve(
        &self,
        stored_name: &str,
    ) -> Result<(Vec<u8>, &'static str, String), AppError> {
        let path = self
            .find(stored_name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File '{stored_name}' not found")))?;

        let bytes = fs::read(&path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to read {}: {e}", path.display())))?;

        Ok((bytes, content_type_for(stored_name), stored_name.to_string()))
    }

    /// Removes `stored_name` if present. Absence is not an error.
    pub async fn delete(&self, stored_name: &str) -> Result<bool, AppError> {
        match self.find(stored_name).await? {
            Some(path) => {
                fs::remove_file(&path).await.map_err(|e| {
                    AppError::Storage(format!("Failed to delete {}: {e}", path.display()))
                })?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Retrieval path for a stored file. Pure formatting, no I/O.
    pub fn url_for(stored_name: &str) -> String {
        format!("/api/v1/files/{stored_name}/download")
    }

    /// Scans every namespace directory for `stored_name`.
    async fn find(&self, stored_name: &str) -> Result<Option<PathBuf>, AppError> {
        let mut namespaces = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            // Nothing was ever stored.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to list {}: {e}",
                    self.root.display()
                )))
            }
        };

        while let Some(entry) = namespaces
            .next_entry()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to scan upload root: {e}")))?
        {
            let file_type = entry.file_type().await.map_err(|e| {
                AppError::Storage(format!("Failed to stat {}: {e}", entry.path().display()))
            })?;
            if !file_type.is_dir() {
                continue;
            }

            let candidate = entry.path().join(stored_name);
            match fs::try_exists(&candidate).await {
                Ok(true) => return Ok(Some(candidate)),
                Ok(false) => {}
                // A degraded namespace (e.g. permissions) is a storage
                // fault, not absence.
                Err(e) => {
                    return Err(AppError::Storage(format!(
                        "Failed to probe {}: {e}",
                        candidate.display()
                    )))
                }
            }
        }

        Ok(None)
    }
}

/// Derives a path-safe namespace from a submitter identity.
pub fn namespace_for(owner_identity: &str) -> String {
    owner_identity.replace(['@', '.'], "_")
}

/// Content type inferred purely from the file extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") => "text/plain",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_replaces_unsafe_characters() {
        assert_eq!(namespace_for("user@example.com"), "user_example_com");
        assert_eq!(namespace_for("plain"), "plain");
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("cv.pdf"), "application/pdf");
        assert_eq!(content_type_for("cv.PDF"), "application/pdf");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("archive.zip"), "application/octet-stream");
        assert_eq!(content_type_for("noextension"), "application/octet-stream");
    }

    #[test]
    fn url_is_pure_formatting() {
        assert_eq!(
            FileStore::url_for("abc.pdf"),
            "/api/v1/files/abc.pdf/download"
        );
    }

    #[tokio::test]
    async fn same_original_name_for_two_owners_never_collides() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let a = store
            .save(b"first owner bytes", "alice@example.com", "posting.txt")
            .await
            .unwrap();
        let b = store
            .save(b"second owner bytes", "bob@example.com", "posting.txt")
            .await
            .unwrap();

        assert_ne!(a.stored_name, b.stored_name);
        assert_ne!(a.namespace, b.namespace);
        assert!(a.path.exists() && b.path.exists());

        let (bytes_a, _, _) = store.retrieve(&a.stored_name).await.unwrap();
        let (bytes_b, _, _) = store.retrieve(&b.stored_name).await.unwrap();
        assert_eq!(bytes_a, b"first owner bytes");
        assert_eq!(bytes_b, b"second owner bytes");

        // Deleting one owner's file leaves the other intact.
        assert!(store.delete(&a.stored_name).await.unwrap());
        assert!(store.retrieve(&a.stored_name).await.is_err());
        assert!(store.retrieve(&b.stored_name).await.is_ok());
    }

    #[tokio::test]
    async fn retrieve_reports_content_type_and_display_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let stored = store
            .save(b"%PDF-1.4", "carol@example.com", "Job Posting.pdf")
            .await
            .unwrap();

        let (bytes, content_type, display_name) =
            store.retrieve(&stored.stored_name).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4");
        assert_eq!(content_type, "application/pdf");
        assert_eq!(display_name, stored.stored_name);
    }

    #[tokio::test]
    async fn retrieve_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let err = store.retrieve("missing.pdf").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_returns_false_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(!store.delete("missing.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn stray_files_in_the_root_do_not_break_retrieval() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        // A non-directory entry alongside the namespace dirs must be
        // skipped by the scan, not probed as a namespace.
        tokio::fs::write(dir.path().join("stray.tmp"), b"junk")
            .await
            .unwrap();

        let stored = store
            .save(b"real bytes", "erin@example.com", "posting.txt")
            .await
            .unwrap();

        let (bytes, _, _) = store.retrieve(&stored.stored_name).await.unwrap();
        assert_eq!(bytes, b"real bytes");
        assert!(matches!(
            store.retrieve("missing.txt").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn save_without_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let err = store
            .save(b"bytes", "dave@example.com", "posting")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
