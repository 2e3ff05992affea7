//! Host UI abstractions.
//!
//! The host application owns the actual status bar and file tree; the core
//! only talks to them through these object-safe traits. A status bar hands
//! out [`StatusItem`]s; each item is an independently shown, hidden, and
//! ordered slot. Click behavior is expressed as a [`ClickAction`] that the
//! host delegates verbatim to its [`Shell`] capabilities.

/// What clicking a status slot should do. Paths are vault-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Open the document in the host's editor surface.
    OpenDocument(String),
    /// Reveal and highlight the document in the host's tree panel.
    RevealInTree(String),
}

impl ClickAction {
    /// Delegates the action to the host shell.
    pub fn invoke(&self, shell: &dyn Shell) {
        match self {
            ClickAction::OpenDocument(path) => shell.open_document(path),
            ClickAction::RevealInTree(path) => shell.reveal_in_tree(path),
        }
    }
}

/// CSS class applied to slots that carry a click action.
pub const CLICKABLE_CLASS: &str = "mod-clickable";

/// A persistent status-bar region that hands out display slots.
pub trait StatusBar: Send + Sync {
    /// Creates a new, initially hidden slot attached at the end of the bar.
    fn create_item(&self) -> Box<dyn StatusItem>;
}

/// A single status-bar slot.
///
/// Detach/attach exists so that callers can re-apply a canonical ordering:
/// detaching all slots and reattaching them in definition order.
pub trait StatusItem: Send {
    fn set_text(&mut self, text: &str);
    fn show(&mut self);
    fn hide(&mut self);
    fn set_click(&mut self, action: Option<ClickAction>);
    fn add_class(&mut self, class: &str);
    fn detach(&mut self);
    fn attach(&mut self);
}

/// Host-provided shell capabilities, invoked by reference and never
/// reimplemented by the core.
pub trait Shell: Send + Sync {
    fn open_document(&self, path: &str);
    fn reveal_in_tree(&self, path: &str);
}
