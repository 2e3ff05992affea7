use crate::vault::{Document, MetadataRecord, Result, Vault};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// A point-in-time snapshot of the vault's documents and their frontmatter,
/// playing the role of the host application's metadata cache.
///
/// The index is rebuilt on demand by the host; it performs no file watching
/// of its own. Lookups are infallible: an unknown path, or a document
/// without a frontmatter block, is simply absent.
#[derive(Debug, Default)]
pub struct MetadataIndex {
    // Full document list, sorted by vault-relative path (the order is the
    // tie-break for same-folder matches and must stay stable).
    documents: Vec<Document>,
    records: HashMap<String, MetadataRecord>,
}

impl MetadataIndex {
    /// Scans the vault and builds the index.
    ///
    /// Documents whose content cannot be read are skipped with a warning;
    /// documents without a frontmatter block are listed but carry no record.
    #[instrument(skip(vault), fields(vault = %vault.path().display()))]
    pub async fn build(vault: &Arc<Vault>) -> Result<Self> {
        let documents = vault.list_documents().await?;
        let mut records = HashMap::new();

        for document in &documents {
            match document.read_frontmatter().await {
                Ok(Some(record)) => {
                    records.insert(document.path().to_string(), record);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        "Skipping frontmatter of unreadable document '{}': {}",
                        document.path(),
                        e
                    );
                }
            }
        }

        debug!(
            "Indexed {} documents, {} with metadata",
            documents.len(),
            records.len()
        );
        Ok(MetadataIndex { documents, records })
    }

    /// The full document list, sorted by vault-relative path.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Returns the metadata record for the document at the given
    /// vault-relative path, or `None` if the document is unknown or has no
    /// frontmatter.
    pub fn get(&self, path: &str) -> Option<&MetadataRecord> {
        self.records.get(path)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
