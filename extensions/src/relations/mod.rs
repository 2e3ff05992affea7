//! The Relations extension.
//!
//! For every configured relation, finds the nearest ancestor document whose
//! frontmatter satisfies the relation's match rule and shows a rendered
//! summary in its own status-bar slot. Slots appear in configured order,
//! are hidden when a relation has no match, and optionally carry a click
//! action (open the matched document, or reveal it in the host's tree
//! panel).
//!
//! Resolution runs on every [`FileOpened`] event, synchronously and from
//! scratch: the result depends only on the document tree and metadata index
//! at that moment.

pub use behavior::{status_behavior_parse, StatusBehavior};
pub use resolver::{candidates, resolve_all, resolve_relation, ResolvedMatch};
pub use settings::{RelationSettings, RelationsSettings};
pub use status::{RelationId, RelationStatus, SlotContent};
pub use template::{render, MISSING_VALUE};

mod behavior;
mod resolver;
mod settings;
mod status;
mod template;

use std::sync::{Arc, Mutex};

use tracing::debug;
use trellis_core::event::Listener;
use trellis_core::extension::{Extension, ExtensionError, Host};
use trellis_core::ui::{ClickAction, StatusBar};
use trellis_core::vault::{FileOpened, MetadataIndex, MetadataRecord};

/// The relations extension. Holds its settings and, while loaded, the slot
/// map and the event-listener registration.
///
/// State has explicit boundaries: the slot map and listener are built in
/// `on_load` and dropped in `on_unload`. Dropping the listener handle
/// deregisters the callback.
pub struct RelationsExtension {
    settings: Arc<Mutex<RelationsSettings>>,
    status: Arc<Mutex<Option<RelationStatus>>>,
    listener: Mutex<Option<Listener<FileOpened>>>,
}

impl RelationsExtension {
    pub fn new(settings: RelationsSettings) -> Self {
        RelationsExtension {
            settings: Arc::new(Mutex::new(settings)),
            status: Arc::new(Mutex::new(None)),
            listener: Mutex::new(None),
        }
    }

    /// A snapshot of the current settings.
    pub fn settings(&self) -> RelationsSettings {
        self.settings.lock().expect("relations settings poisoned").clone()
    }

    /// Replaces the settings and, when loaded, rebuilds the slot map so the
    /// bar reflects the new relation list and order. Persisting the blob is
    /// the host's job.
    pub fn apply_settings(&self, new_settings: RelationsSettings, status_bar: &dyn StatusBar) {
        let relation_count = new_settings.relations.len();
        *self.settings.lock().expect("relations settings poisoned") = new_settings;

        let mut status = self.status.lock().expect("relations status poisoned");
        if status.is_some() {
            *status = Some(RelationStatus::new(status_bar, relation_count));
        }
    }
}

impl Extension for RelationsExtension {
    fn uri(&self) -> &str {
        "trellis:relations"
    }

    fn name(&self) -> &str {
        "Relations"
    }

    fn description(&self) -> &str {
        "Shows the nearest ancestor document matching each configured relation in the status bar."
    }

    fn on_load(&self, host: &Host) -> Result<(), ExtensionError> {
        let relation_count = self
            .settings
            .lock()
            .expect("relations settings poisoned")
            .relations
            .len();

        *self.status.lock().expect("relations status poisoned") =
            Some(RelationStatus::new(host.status_bar().as_ref(), relation_count));

        let settings = self.settings.clone();
        let status = self.status.clone();
        let index = host.index().clone();
        let listener = Listener::new(&host.vault().on.file_opened, move |event: &FileOpened| {
            handle_file_opened(event, &settings, &status, &index);
        });
        *self.listener.lock().expect("relations listener poisoned") = Some(listener);

        debug!("Relations extension loaded with {} relations", relation_count);
        Ok(())
    }

    fn on_unload(&self) {
        // Dropping the listener handle deregisters the callback; dropping
        // the slot map releases the status items.
        self.listener.lock().expect("relations listener poisoned").take();
        self.status.lock().expect("relations status poisoned").take();
        debug!("Relations extension unloaded");
    }
}

/// One document-open pass: resolve every relation, then update the bar.
fn handle_file_opened(
    event: &FileOpened,
    settings: &Mutex<RelationsSettings>,
    status: &Mutex<Option<RelationStatus>>,
    index: &MetadataIndex,
) {
    let outcomes = {
        let settings = settings.lock().expect("relations settings poisoned");
        if settings.relations.is_empty() {
            return;
        }

        let start_path = event.document.parent_path();
        let matches = resolve_all(&settings.relations, start_path, index.documents(), index);

        settings
            .relations
            .iter()
            .zip(matches)
            .map(|(relation, found)| {
                found.map(|found| build_slot_content(relation, found.document.path(), found.metadata))
            })
            .collect()
    };

    if let Some(status) = status.lock().expect("relations status poisoned").as_mut() {
        status.apply(outcomes);
    }
}

/// Renders the slot content for one matched relation: template output,
/// optional icon prefix, and the click action implied by the behavior.
fn build_slot_content(
    relation: &RelationSettings,
    matched_path: &str,
    metadata: &MetadataRecord,
) -> SlotContent {
    let rendered = template::render(&relation.status_format, metadata);
    let text = if relation.status_icon.is_empty() {
        rendered
    } else {
        format!("{} {}", relation.status_icon, rendered)
    };

    let click = match relation.status_behavior {
        StatusBehavior::None => None,
        StatusBehavior::OpenFile => Some(ClickAction::OpenDocument(matched_path.to_string())),
        StatusBehavior::HighlightFile => Some(ClickAction::RevealInTree(matched_path.to_string())),
    };

    SlotContent { text, click }
}
