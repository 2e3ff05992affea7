use tracing::info;

use super::{ActiveExtension, ExtensionError, Host};

/// The set of extensions active in a session, in load order.
pub struct ExtensionSet {
    extensions: Vec<ActiveExtension>,
}

impl ExtensionSet {
    pub fn new(extensions: Vec<ActiveExtension>) -> Self {
        Self { extensions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveExtension> {
        self.extensions.iter()
    }

    /// Loads every extension in order. Fails on the first extension that
    /// refuses to load; already-loaded extensions stay loaded.
    pub fn load_all(&self, host: &Host) -> Result<(), ExtensionError> {
        for active in &self.extensions {
            let extension = active.extension();
            info!("Loading extension '{}'", extension.name());
            extension.on_load(host)?;
        }
        Ok(())
    }

    /// Unloads every extension in reverse load order.
    pub fn unload_all(&self) {
        for active in self.extensions.iter().rev() {
            let extension = active.extension();
            info!("Unloading extension '{}'", extension.name());
            extension.on_unload();
        }
    }
}
