use crate::vault::{Error, Result, DOCUMENT_EXTENSION};
use crate::vault::frontmatter::{extract_frontmatter, MetadataRecord};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, instrument};

use super::Vault;

/// Represents a markdown document inside a vault.
///
/// A document is addressed by its vault-relative, slash-delimited path. The
/// containing folder of a root-level document is the empty string.
#[derive(Debug, Clone)]
pub struct Document {
    // Absolute path to the markdown file
    pub(crate) absolute_path: PathBuf,
    // Vault-relative path, slash-delimited
    rel_path: String,
    // Vault owning this document
    vault: Arc<Vault>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.absolute_path == other.absolute_path
    }
}

impl Document {
    /// Opens an existing document.
    ///
    /// Checks that the file exists, is a regular file, and carries the
    /// markdown extension.
    #[instrument(skip(absolute_path, vault), fields(path = %absolute_path.display()))]
    pub(crate) async fn open(absolute_path: PathBuf, vault: Arc<Vault>) -> Result<Self> {
        validate_document_path(&absolute_path)?;

        if !fs::try_exists(&absolute_path).await.map_err(Error::Io)? {
            return Err(Error::FileNotFound(absolute_path));
        }
        if !fs::metadata(&absolute_path).await.map_err(Error::Io)?.is_file() {
            return Err(Error::InvalidPath(format!(
                "Path is not a file: {}",
                absolute_path.display()
            )));
        }

        let rel_path = vault.rel_path(&absolute_path)?;

        debug!("Document opened successfully");
        Ok(Document { absolute_path, rel_path, vault })
    }

    /// Returns the vault-relative path of the document, slash-delimited.
    pub fn path(&self) -> &str {
        &self.rel_path
    }

    /// Returns the vault-relative path of the containing folder.
    ///
    /// The empty string for documents at the vault root.
    pub fn parent_path(&self) -> &str {
        parent_of(&self.rel_path)
    }

    /// Returns the name of the document (file stem, no extension).
    pub fn name(&self) -> &str {
        stem_of(&self.rel_path)
    }

    /// Returns the absolute filesystem path, for handing to host-level
    /// operations (external openers, tree panels).
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    pub fn vault(&self) -> &Arc<Vault> {
        &self.vault
    }

    /// Reads the document and parses its YAML frontmatter block, if any.
    #[instrument(skip(self), fields(path = %self.rel_path))]
    pub async fn read_frontmatter(&self) -> Result<Option<MetadataRecord>> {
        let content = fs::read_to_string(&self.absolute_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(self.absolute_path.clone())
            } else {
                Error::Io(e)
            }
        })?;
        Ok(extract_frontmatter(&content))
    }
}

// --- Standalone Helper Functions ---

/// Validates that a path points to a potential markdown document.
pub(crate) fn validate_document_path(path: &Path) -> Result<()> {
    if path.extension().and_then(OsStr::to_str) != Some(DOCUMENT_EXTENSION) {
        return Err(Error::NotMarkdownFile(path.to_path_buf()));
    }
    if path.file_stem().is_none() {
        return Err(Error::InvalidPath(format!(
            "Path has no file stem: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Containing-folder portion of a vault-relative path.
fn parent_of(rel_path: &str) -> &str {
    match rel_path.rsplit_once('/') {
        Some((parent, _)) => parent,
        None => "",
    }
}

/// File stem of a vault-relative path.
fn stem_of(rel_path: &str) -> &str {
    let file_name = match rel_path.rsplit_once('/') {
        Some((_, name)) => name,
        None => rel_path,
    };
    match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    }
}
