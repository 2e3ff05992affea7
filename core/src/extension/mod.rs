mod active_extension;
mod extension_set;

pub use active_extension::ActiveExtension;
pub use extension_set::ExtensionSet;

use std::sync::Arc;

use thiserror::Error;

use crate::ui::{Shell, StatusBar};
use crate::vault::{MetadataIndex, Vault};

/// Everything the host hands an extension at load time: the vault, the
/// metadata index snapshot, and the UI surfaces.
pub struct Host {
    vault: Arc<Vault>,
    index: Arc<MetadataIndex>,
    status_bar: Arc<dyn StatusBar>,
    shell: Arc<dyn Shell>,
}

impl Host {
    pub fn new(
        vault: Arc<Vault>,
        index: Arc<MetadataIndex>,
        status_bar: Arc<dyn StatusBar>,
        shell: Arc<dyn Shell>,
    ) -> Self {
        Host { vault, index, status_bar, shell }
    }

    pub fn vault(&self) -> &Arc<Vault> {
        &self.vault
    }

    pub fn index(&self) -> &Arc<MetadataIndex> {
        &self.index
    }

    pub fn status_bar(&self) -> &Arc<dyn StatusBar> {
        &self.status_bar
    }

    pub fn shell(&self) -> &Arc<dyn Shell> {
        &self.shell
    }
}

#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("Extension configuration error")]
    Config(#[from] serde_json::Error),

    #[error("Vault error")]
    Vault(#[from] crate::vault::Error),

    #[error("Extension failed: {0}")]
    Failed(String),
}

/// A loadable host-application extension.
///
/// Extensions are loaded once per session; `on_load` is where they read
/// their configuration, build state, and register event listeners.
/// `on_unload` is the explicit teardown boundary: dropping listener handles
/// there deregisters them.
pub trait Extension: Send + Sync {
    fn uri(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    fn on_load(&self, host: &Host) -> Result<(), ExtensionError>;
    fn on_unload(&self) {}
}
