//! Provides filesystem storage abstractions for vaults of markdown documents.
//!
//! This module defines the core structures for interacting with a document
//! tree on disk. A vault is a plain directory of markdown files; Trellis adds
//! a thin layer of conventions on top so that the rest of the system can
//! reason about folders, documents, and their frontmatter metadata.
//!
//! # Core Concepts
//!
//! *   **[`Vault`]:** The root container for all managed documents. A vault
//!     corresponds to a directory on the filesystem and contains a special
//!     `.trellis` subdirectory for internal configuration (`vault.json`) and
//!     host-owned settings (`settings.json`). Users typically start by
//!     [`Vault::create`]ing or [`Vault::open`]ing a vault.
//! *   **[`Folder`]:** A directory within a vault used for organizing
//!     documents and other folders, discovered via [`Vault::root`] or
//!     [`Folder::list_folders`].
//! *   **[`Document`]:** A single markdown file inside the vault. Documents
//!     are addressed by vault-relative, slash-delimited paths; the containing
//!     folder of a document at the vault root is the empty string.
//! *   **[`MetadataRecord`]:** The parsed YAML frontmatter of a document, a
//!     read-only mapping from field name to value.
//! *   **[`MetadataIndex`]:** A point-in-time snapshot of every document in
//!     the vault together with its metadata, playing the role of the host's
//!     metadata cache. Lookups never fail; an unknown path is simply absent.
//!
//! # Paths
//!
//! All paths surfaced by this module are vault-relative and slash-delimited,
//! regardless of platform. Absolute paths stay internal except where the host
//! explicitly needs them (e.g. to hand a document to an external opener).
//!
//! # Asynchronous API
//!
//! All filesystem I/O is `async` on the `tokio` runtime. Methods performing
//! I/O return `Result<T, Error>`, where [`Error`] covers I/O failures,
//! malformed configuration, and path violations.

pub use self::document::Document;
pub use self::folder::Folder;
pub use self::frontmatter::{extract_frontmatter, value_display, MetadataRecord};
pub use self::index::MetadataIndex;
pub use self::vault::Vault;

mod document;
mod folder;
mod frontmatter;
mod index;
mod vault;

use std::path::PathBuf;
use thiserror::Error;

use crate::event::Event;

pub const DOCUMENT_EXTENSION: &str = "md";
pub const INTERNAL_DIR_NAME: &str = ".trellis";
pub const VAULT_CONFIG_FILENAME: &str = "vault.json";
pub const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid path provided: {0}")]
    InvalidPath(String),

    #[error("Path does not refer to a markdown document: {0}")]
    NotMarkdownFile(PathBuf),

    #[error("Path is not valid unicode: {0}")]
    NonUnicodePath(PathBuf),

    #[error("Settings serialization/deserialization error")]
    Settings(#[from] serde_json::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Path is not a valid vault (missing '.trellis' subdirectory): {0}")]
    NotAVault(PathBuf),

    #[error("Cannot create vault: path exists and is not an empty directory: {0}")]
    VaultCreationConflict(PathBuf),

    #[error("Cannot create vault: path exists and is a file: {0}")]
    PathIsFile(PathBuf),

    #[error("Path is outside the vault: {0}")]
    PathOutsideVault(PathBuf),

    #[error("Vault configuration file is missing or invalid: {0}")]
    InvalidVaultConfig(PathBuf),
}

// Define a standard Result type for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Dispatched by the host whenever a document is opened in the editor
/// surface. Carries the opened document; handlers run synchronously in
/// registration order.
#[derive(Debug, Clone)]
pub struct FileOpened {
    pub document: Document,
}

impl Event for FileOpened {}
