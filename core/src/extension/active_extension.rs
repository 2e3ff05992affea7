use std::sync::Arc;

use serde_json::Value;

use super::Extension;

/// An extension paired with its persisted configuration blob.
///
/// The configuration is an opaque JSON value owned by the host settings
/// store; the extension itself decides what to make of it at load time.
pub struct ActiveExtension {
    extension: Arc<dyn Extension>,
    config: Value,
}

impl ActiveExtension {
    pub fn new(extension: impl Extension + 'static, config: Value) -> Self {
        Self {
            extension: Arc::new(extension),
            config,
        }
    }

    pub fn extension(&self) -> &Arc<dyn Extension> {
        &self.extension
    }

    pub fn config(&self) -> &Value {
        &self.config
    }
}
