use std::path::Path;
use std::sync::Arc;

use console::style;
use trellis_core::extension::{ActiveExtension, ExtensionSet, Host};
use trellis_core::vault::{MetadataIndex, Vault};
use trellis_extensions::relations::{RelationsExtension, RelationsSettings};

mod terminal;
pub use terminal::{TerminalShell, TerminalStatusBar};

/// Application context: the vault (or the reason it couldn't be found) plus
/// the terminal implementations of the host UI surfaces.
pub struct Trellis {
    pub vault: anyhow::Result<Arc<Vault>>,
    pub status_bar: Arc<TerminalStatusBar>,
    pub shell: Arc<TerminalShell>,
}

impl Trellis {
    pub fn new(vault: anyhow::Result<Arc<Vault>>) -> Self {
        Trellis {
            vault,
            status_bar: Arc::new(TerminalStatusBar::new()),
            shell: Arc::new(TerminalShell),
        }
    }

    fn vault(&self) -> anyhow::Result<&Arc<Vault>> {
        self.vault
            .as_ref()
            .map_err(|e| anyhow::anyhow!("No vault available: {}", e))
    }

    /// Simulates a document-open event: loads the relations extension,
    /// dispatches the event, and prints the resulting status line. With
    /// `click`, additionally simulates a click on the n-th visible slot.
    pub async fn open(&self, document: &Path, click: Option<usize>) -> anyhow::Result<()> {
        let vault = self.vault()?;

        let index = Arc::new(MetadataIndex::build(vault).await?);
        let settings = RelationsSettings::load(vault).await?;

        let host = Host::new(
            vault.clone(),
            index,
            self.status_bar.clone(),
            self.shell.clone(),
        );
        let extensions = ExtensionSet::new(vec![ActiveExtension::new(
            RelationsExtension::new(settings),
            serde_json::Value::Null,
        )]);
        extensions.load_all(&host)?;

        let doc = vault.document(document).await?;
        vault.emit_file_opened(&doc);

        let line = self.status_bar.render();
        if line.is_empty() {
            println!("{}", style("(no matching relations)").dim());
        } else {
            println!("{}", line);
        }

        if let Some(slot) = click {
            match self.status_bar.click(slot) {
                Some(Some(action)) => action.invoke(self.shell.as_ref()),
                Some(None) => println!("Slot {} is not clickable.", slot),
                None => println!("No visible slot {}.", slot),
            }
        }

        extensions.unload_all();
        Ok(())
    }

    /// Prints vault identity and document count.
    pub async fn info(&self) -> anyhow::Result<()> {
        let vault = self.vault()?;
        let documents = vault.list_documents().await?;

        println!("Vault: {}", vault.path().display());
        println!("  Id: {}", vault.id());
        println!("  Documents: {}", documents.len());
        Ok(())
    }
}
