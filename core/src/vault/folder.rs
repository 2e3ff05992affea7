use crate::vault::{Error, Result, DOCUMENT_EXTENSION, INTERNAL_DIR_NAME};
use crate::vault::document::Document;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, instrument, warn};

use super::Vault;

/// Represents a directory within a Vault or another Folder,
/// which can contain Documents and other Folders.
#[derive(Debug, Clone)]
pub struct Folder {
    // Absolute path to the folder
    absolute_path: PathBuf,
    // Vault owning this folder
    vault: Arc<Vault>,
}

impl Folder {
    /// Creates a Folder instance. Intended for internal use.
    /// Assumes the path already points to a valid, existing directory *inside* the vault.
    pub(crate) fn new(absolute_path: PathBuf, vault: Arc<Vault>) -> Self {
        Folder { absolute_path, vault }
    }

    /// Returns the vault-relative path of this folder, slash-delimited.
    /// The vault root is the empty string.
    pub fn path(&self) -> Result<String> {
        self.vault.rel_path(&self.absolute_path)
    }

    /// Returns the name of the folder.
    pub fn name(&self) -> Option<&str> {
        self.absolute_path.file_name()?.to_str()
    }

    /// Opens the document with the specified name within this folder.
    ///
    /// The document name should not include the `.md` extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be opened or does not exist.
    #[instrument(skip(self), fields(folder_path = %self.absolute_path.display()))]
    pub async fn document_by_name(&self, name: &str) -> Result<Document> {
        let document_path = self
            .absolute_path
            .join(format!("{}.{}", name, DOCUMENT_EXTENSION));
        Document::open(document_path, self.vault.clone()).await
    }

    /// Creates a new subfolder within this folder with the specified name.
    #[instrument(skip(self), fields(folder_path = %self.absolute_path.display()))]
    pub async fn create_subfolder(&self, name: &str) -> Result<Folder> {
        let subfolder_path = self.absolute_path.join(name);
        fs::create_dir_all(&subfolder_path).await.map_err(Error::Io)?;
        Ok(Folder::new(subfolder_path, self.vault.clone()))
    }

    /// Lists the documents directly contained within this folder (non-recursive).
    ///
    /// Markdown files that fail to open will be skipped and logged as warnings.
    #[instrument(skip(self), fields(folder_path = %self.absolute_path.display()))]
    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        debug!("Listing documents in directory");
        let mut documents = Vec::new();
        let mut read_dir = match fs::read_dir(&self.absolute_path).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // The list of documents in a non-existent dir is empty.
                debug!("Directory not found, returning empty document list.");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        while let Some(entry) = read_dir.next_entry().await.map_err(Error::Io)? {
            let path = entry.path();
            if path.is_file() {
                if path.extension().and_then(OsStr::to_str) == Some(DOCUMENT_EXTENSION) {
                    match Document::open(path.clone(), self.vault.clone()).await {
                        Ok(doc) => documents.push(doc),
                        Err(e) => {
                            // Log and skip invalid/inaccessible files
                            warn!(
                                "Skipping invalid or inaccessible document '{}': {}",
                                path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }
        debug!("Found {} valid documents", documents.len());
        Ok(documents)
    }

    /// Lists the subfolders directly contained within this folder (non-recursive).
    #[instrument(skip(self), fields(folder_path = %self.absolute_path.display()))]
    pub async fn list_folders(&self) -> Result<Vec<Folder>> {
        debug!("Listing subfolders");
        let mut folders = Vec::new();
        let mut read_dir = match fs::read_dir(&self.absolute_path).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Directory not found, returning empty folder list.");
                return Ok(Vec::new());
            }
            Err(e) => return Err(Error::Io(e)),
        };

        while let Some(entry) = read_dir.next_entry().await.map_err(Error::Io)? {
            let path = entry.path();
            if path.is_dir() {
                if entry.file_name().to_str() == Some(INTERNAL_DIR_NAME) {
                    debug!("Skipping excluded directory: {}", path.display());
                    continue;
                }
                folders.push(Folder::new(path, self.vault.clone()));
            }
        }
        debug!("Found {} subfolders", folders.len());
        Ok(folders)
    }
}
