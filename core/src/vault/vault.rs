use crate::event::define_event_listeners;
use crate::vault::{
    Error, FileOpened, Result, INTERNAL_DIR_NAME, SETTINGS_FILENAME, VAULT_CONFIG_FILENAME,
};
use crate::vault::document::Document;
use crate::vault::folder::Folder;
use clap::crate_version;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Represents the root vault directory containing documents and folders,
/// along with internal configuration storage.
#[derive(Debug)]
pub struct Vault {
    // Absolute path to the vault root
    pub(crate) absolute_path: PathBuf,
    pub(crate) internal_dir: PathBuf,
    config: VaultConfig,
    pub on: VaultEvents,
}

define_event_listeners! { VaultEvents {
    file_opened: FileOpened,
}}

impl Vault {
    /// Returns the root path of the vault.
    pub fn path(&self) -> &Path {
        &self.absolute_path
    }

    /// Returns the unique identifier of the vault.
    pub fn id(&self) -> &Uuid {
        &self.config.id
    }

    /// Returns the root folder of the vault.
    pub fn root(self: &Arc<Self>) -> Folder {
        Folder::new(self.absolute_path.clone(), self.clone())
    }

    /// Returns a folder instance for the specified path within the vault.
    ///
    /// Relative paths are taken as vault-relative.
    pub async fn folder(self: &Arc<Self>, path: &Path) -> Result<Folder> {
        let joined = self.join(path);
        let abs_path = fs::canonicalize(&joined).await.map_err(Error::Io)?;
        if !abs_path.starts_with(&self.absolute_path) {
            return Err(Error::PathOutsideVault(path.to_path_buf()));
        }
        if !abs_path.is_dir() {
            return Err(Error::NotADirectory(abs_path));
        }
        Ok(Folder::new(abs_path, self.clone()))
    }

    /// Opens the document at the specified path within the vault.
    ///
    /// Relative paths are taken as vault-relative; the `.md` extension is
    /// appended when missing.
    pub async fn document(self: &Arc<Self>, path: &Path) -> Result<Document> {
        // TODO: Be consistent about extension handling
        let with_ext = self.join(path).with_extension("md");

        let abs_path = fs::canonicalize(&with_ext).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(with_ext.clone())
            } else {
                Error::Io(e)
            }
        })?;
        if !abs_path.starts_with(&self.absolute_path) {
            return Err(Error::PathOutsideVault(path.to_path_buf()));
        }
        // Remaining checks are carried out in Document::open()
        Document::open(abs_path, self.clone()).await
    }

    /// Lists every document in the vault, walking folders recursively and
    /// skipping the internal `.trellis` directory.
    ///
    /// The returned list is sorted by vault-relative path so that consumers
    /// relying on list order (e.g. same-folder tie-breaks) see a stable,
    /// reproducible ordering.
    #[instrument(skip(self), fields(vault = %self.absolute_path.display()))]
    pub async fn list_documents(self: &Arc<Self>) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut pending = vec![self.root()];

        while let Some(folder) = pending.pop() {
            documents.extend(folder.list_documents().await?);
            pending.extend(folder.list_folders().await?);
        }

        documents.sort_by(|a, b| a.path().cmp(b.path()));
        debug!("Found {} documents in vault", documents.len());
        Ok(documents)
    }

    /// Dispatches a [`FileOpened`] event to all registered listeners.
    ///
    /// Called by the host when a document is opened in its editor surface.
    /// Handlers run synchronously, in registration order, before this
    /// method returns.
    pub fn emit_file_opened(&self, document: &Document) {
        let event = FileOpened { document: document.clone() };
        self.on.file_opened.dispatch(&event);
    }

    /// Reads the host-owned settings blob from `.trellis/settings.json`.
    ///
    /// A missing file yields `Value::Null`; consumers merge against their
    /// defaults.
    pub async fn read_settings(&self) -> Result<Value> {
        let path = self.settings_path();
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                return Ok(Value::Null);
            }
            Err(e) => return Err(Error::Io(e)),
        };
        Ok(serde_json::from_slice(&content)?)
    }

    /// Serializes and writes the whole settings blob to
    /// `.trellis/settings.json`. Settings are always saved whole.
    pub async fn write_settings(&self, settings: &Value) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(self.settings_path(), content).await.map_err(Error::Io)?;
        debug!("Settings written successfully");
        Ok(())
    }

    fn settings_path(&self) -> PathBuf {
        self.internal_dir.join(SETTINGS_FILENAME)
    }

    /// Converts an absolute path inside the vault to its vault-relative,
    /// slash-delimited form. The vault root itself maps to the empty string.
    pub(crate) fn rel_path(&self, absolute: &Path) -> Result<String> {
        let relative = absolute
            .strip_prefix(&self.absolute_path)
            .map_err(|_| Error::PathOutsideVault(absolute.to_path_buf()))?;

        let mut segments = Vec::new();
        for component in relative.components() {
            let segment = component
                .as_os_str()
                .to_str()
                .ok_or_else(|| Error::NonUnicodePath(absolute.to_path_buf()))?;
            segments.push(segment);
        }
        Ok(segments.join("/"))
    }

    fn join(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.absolute_path.join(path)
        }
    }

    /// Returns the path to the internal `.trellis` directory used for
    /// configuration and settings.
    pub(crate) fn internal_dir_path(&self) -> &Path {
        &self.internal_dir
    }

    /// Opens an existing vault directory.
    ///
    /// Checks that the directory exists and contains the `.trellis` subdirectory.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub async fn open(path: &Path) -> Result<Arc<Vault>> {
        debug!("Attempting to open vault");

        // Check if the path exists (necessary prior to canonicalization)
        let meta = fs::metadata(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::DirectoryNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        if !meta.is_dir() {
            return Err(Error::NotADirectory(path.to_path_buf()));
        }

        // Canonicalization ensures consistent vault-relative paths
        let absolute_path = fs::canonicalize(path).await.map_err(Error::Io)?;
        debug!("Canonicalized vault path: {}", absolute_path.display());

        let internal_dir = absolute_path.join(INTERNAL_DIR_NAME);
        let internal_meta = fs::metadata(&internal_dir).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                // .trellis dir missing means not a vault
                Error::NotAVault(absolute_path.clone())
            } else {
                Error::Io(e)
            }
        })?;

        if !internal_meta.is_dir() {
            // .trellis exists but isn't a directory
            return Err(Error::NotAVault(absolute_path));
        }

        let config_path = internal_dir.join(VAULT_CONFIG_FILENAME);
        debug!("Reading vault config from {}", config_path.display());
        let config = read_vault_config(&config_path).await?;

        debug!("Vault opened successfully");
        Ok(Arc::new(Vault {
            absolute_path,
            internal_dir,
            config,
            on: VaultEvents::new(),
        }))
    }

    /// Creates a new vault at the specified path.
    ///
    /// - If the path does not exist, creates the directory and the `.trellis` subdirectory.
    /// - If the path exists and is an empty directory, creates the `.trellis` subdirectory.
    /// - Fails if the path exists and is a file, is a non-empty directory,
    ///   or already contains a `.trellis` file/directory.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub async fn create(path: &Path) -> Result<Arc<Vault>> {
        debug!("Attempting to create vault");

        let internal_dir = path.join(INTERNAL_DIR_NAME);

        match fs::metadata(&path).await {
            Ok(meta) => {
                // Path exists
                if !meta.is_dir() {
                    debug!("Vault creation failed: path exists and is a file");
                    return Err(Error::PathIsFile(path.to_path_buf()));
                }

                if fs::metadata(&internal_dir).await.is_ok() {
                    debug!("Vault creation failed: '.trellis' directory already exists");
                    return Err(Error::VaultCreationConflict(path.to_path_buf()));
                }

                // Check if directory is empty
                let mut read_dir = fs::read_dir(&path).await.map_err(Error::Io)?;
                if read_dir.next_entry().await.map_err(Error::Io)?.is_some() {
                    debug!("Vault creation failed: directory is not empty");
                    return Err(Error::VaultCreationConflict(path.to_path_buf()));
                }

                debug!("Path exists and is an empty directory. Creating internal directory.");
                fs::create_dir(&internal_dir).await.map_err(Error::Io)?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Path does not exist. Creating vault directory and internal directory.");
                fs::create_dir_all(&path).await.map_err(Error::Io)?;
                fs::create_dir(&internal_dir).await.map_err(Error::Io)?;
            }
            Err(e) => {
                return Err(Error::Io(e));
            }
        }

        let config = VaultConfig::new();
        let config_path = internal_dir.join(VAULT_CONFIG_FILENAME);
        write_vault_config(&config_path, &config).await?;
        debug!("Vault created successfully");

        let absolute_path = fs::canonicalize(path).await.map_err(Error::Io)?;
        debug!("Canonicalized vault path: {}", absolute_path.display());

        Ok(Arc::new(Vault {
            absolute_path,
            internal_dir,
            config,
            on: VaultEvents::new(),
        }))
    }
}

/// Represents metadata associated with a Vault.
/// Stored in `.trellis/vault.json` within the vault directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct VaultConfig {
    /// A unique identifier for the vault instance.
    id: Uuid,
    /// A version number for the config format, useful for future migrations.
    version: u32,
    /// The Trellis version that created the vault.
    trellis_version: String,
}

impl VaultConfig {
    /// Creates a new config instance with default values.
    pub(crate) fn new() -> Self {
        VaultConfig {
            id: Uuid::new_v4(),
            version: 1, // Start at version 1
            trellis_version: crate_version!().to_string(),
        }
    }
}

/// Helper to read and deserialize the vault config.
pub(crate) async fn read_vault_config(path: &Path) -> Result<VaultConfig> {
    let content = fs::read(path).await.map_err(|e| {
        warn!("Failed to read vault config file '{}': {}", path.display(), e);
        Error::InvalidVaultConfig(path.to_path_buf()) // Config missing or unreadable
    })?;

    serde_json::from_slice(&content).map_err(|e| {
        warn!("Failed to parse vault config file '{}': {}", path.display(), e);
        Error::InvalidVaultConfig(path.to_path_buf()) // Config malformed
    })
}

/// Helper to serialize and write the vault config.
pub(crate) async fn write_vault_config(path: &Path, config: &VaultConfig) -> Result<()> {
    let content = serde_json::to_string_pretty(config).map_err(Error::Settings)?;
    fs::write(path, content).await.map_err(Error::Io)?;
    debug!("Vault config written successfully to {}", path.display());
    Ok(())
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // Helper to create a dummy file/dir
    async fn create_dummy(path: &Path, is_dir: bool) {
        if is_dir {
            fs::create_dir_all(path).await.expect("Failed to create dummy dir");
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await.expect("Failed to create parent dir");
            }
            fs::write(path, "").await.expect("Failed to create dummy file");
        }
    }

    #[tokio::test]
    async fn test_vault_create_new() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("new_vault");

        let vault = Vault::create(&vault_path).await.unwrap();
        assert!(vault_path.exists());
        assert!(vault_path.is_dir());
        assert!(vault.internal_dir_path().exists());
        assert!(vault.internal_dir_path().is_dir());
        assert_eq!(vault.internal_dir_path().file_name().unwrap(), INTERNAL_DIR_NAME);
        // check for vault.json
        let config_path = vault.internal_dir_path().join(VAULT_CONFIG_FILENAME);
        assert!(config_path.exists(), "Vault config file should exist");
        let content = fs::read_to_string(&config_path).await.unwrap();
        let config: serde_json::Value =
            serde_json::from_str(&content).expect("Config file should be valid JSON");
        assert!(config.get("id").is_some());
    }

    #[tokio::test]
    async fn test_vault_create_in_empty_dir() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("empty_dir_vault");
        create_dummy(&vault_path, true).await; // Create empty dir first

        let vault = Vault::create(&vault_path).await.unwrap();
        assert!(vault_path.exists());
        assert!(vault.internal_dir_path().exists());
    }

    #[tokio::test]
    async fn test_vault_create_fails_if_file() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("file_path_vault");
        create_dummy(&vault_path, false).await; // Create a file

        let result = Vault::create(&vault_path).await;
        assert!(matches!(result, Err(Error::PathIsFile(_))));
    }

    #[tokio::test]
    async fn test_vault_create_fails_if_non_empty() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("non_empty_vault");
        create_dummy(&vault_path.join("some_file.txt"), false).await;

        let result = Vault::create(&vault_path).await;
        assert!(matches!(result, Err(Error::VaultCreationConflict(_))));
    }

    #[tokio::test]
    async fn test_vault_create_fails_if_internal_dir_exists() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("already_vault");
        create_dummy(&vault_path.join(INTERNAL_DIR_NAME), true).await;

        let result = Vault::create(&vault_path).await;
        assert!(matches!(result, Err(Error::VaultCreationConflict(_))));
    }

    #[tokio::test]
    async fn test_vault_open_ok() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("existing_vault");

        Vault::create(&vault_path).await.unwrap();

        let vault = Vault::open(&vault_path).await.unwrap();
        assert_eq!(vault.path(), fs::canonicalize(&vault_path).await.unwrap());
        assert!(vault.internal_dir_path().exists());
    }

    #[tokio::test]
    async fn test_vault_open_fails_if_not_dir() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("not_a_dir_vault");
        create_dummy(&vault_path, false).await;

        let result = Vault::open(&vault_path).await;
        assert!(matches!(result, Err(Error::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_vault_open_fails_if_no_internal_dir() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("no_internal_dir_vault");
        create_dummy(&vault_path, true).await;

        let result = Vault::open(&vault_path).await;
        assert!(matches!(result, Err(Error::NotAVault(_))));
    }

    #[tokio::test]
    async fn test_vault_open_fails_if_config_missing() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("config_missing_vault");

        // Create vault structure manually *without* vault.json
        create_dummy(&vault_path, true).await;
        create_dummy(&vault_path.join(INTERNAL_DIR_NAME), true).await;

        let open_err = Vault::open(&vault_path).await;
        assert!(
            matches!(open_err, Err(Error::InvalidVaultConfig(_))),
            "Opening vault without config should fail"
        );
    }

    #[tokio::test]
    async fn test_vault_open_fails_if_config_malformed() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("config_malformed_vault");
        let internal_dir_path = vault_path.join(INTERNAL_DIR_NAME);
        let config_path = internal_dir_path.join(VAULT_CONFIG_FILENAME);

        create_dummy(&vault_path, true).await;
        create_dummy(&internal_dir_path, true).await;
        fs::write(&config_path, "{ not json }").await.unwrap();

        let open_err = Vault::open(&vault_path).await;
        assert!(
            matches!(open_err, Err(Error::InvalidVaultConfig(_))),
            "Opening vault with malformed config should fail"
        );
    }

    #[tokio::test]
    async fn test_rel_path_conversion() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("rel_vault");
        let vault = Vault::create(&vault_path).await.unwrap();

        let abs = vault.path().join("a").join("b").join("c.md");
        assert_eq!(vault.rel_path(&abs).unwrap(), "a/b/c.md");
        assert_eq!(vault.rel_path(vault.path()).unwrap(), "");

        let outside = dir.path().join("elsewhere.md");
        assert!(matches!(
            vault.rel_path(&outside),
            Err(Error::PathOutsideVault(_))
        ));
    }

    #[tokio::test]
    async fn test_list_documents_recursive_and_sorted() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("list_vault");
        let vault = Vault::create(&vault_path).await.unwrap();

        create_dummy(&vault.path().join("b.md"), false).await;
        create_dummy(&vault.path().join("sub/a.md"), false).await;
        create_dummy(&vault.path().join("sub/deep/z.md"), false).await;
        create_dummy(&vault.path().join("ignored.txt"), false).await;
        // Internal directory must be excluded from the walk
        create_dummy(&vault.path().join(INTERNAL_DIR_NAME).join("x.md"), false).await;

        let docs = vault.list_documents().await.unwrap();
        let paths: Vec<_> = docs.iter().map(|d| d.path().to_string()).collect();
        assert_eq!(paths, vec!["b.md", "sub/a.md", "sub/deep/z.md"]);
    }

    #[tokio::test]
    async fn test_document_parent_paths() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("doc_vault");
        let vault = Vault::create(&vault_path).await.unwrap();

        create_dummy(&vault.path().join("root.md"), false).await;
        create_dummy(&vault.path().join("a/b/nested.md"), false).await;

        let root_doc = vault.document(Path::new("root.md")).await.unwrap();
        assert_eq!(root_doc.path(), "root.md");
        assert_eq!(root_doc.parent_path(), "");
        assert_eq!(root_doc.name(), "root");

        let nested = vault.document(Path::new("a/b/nested")).await.unwrap();
        assert_eq!(nested.path(), "a/b/nested.md");
        assert_eq!(nested.parent_path(), "a/b");
    }
}
