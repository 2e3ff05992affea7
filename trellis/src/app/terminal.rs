use std::sync::{Arc, Mutex};

use console::style;
use tracing::info;
use trellis_core::ui::{ClickAction, Shell, StatusBar, StatusItem, CLICKABLE_CLASS};

#[derive(Debug, Default)]
struct SlotState {
    text: String,
    visible: bool,
    classes: Vec<String>,
    click: Option<ClickAction>,
}

#[derive(Debug, Default)]
struct BarState {
    slots: Vec<SlotState>,
    // Attachment order; rebuilt by detach/attach cycles
    attached: Vec<usize>,
}

/// Terminal stand-in for the host status bar: slots render as one line of
/// styled segments in attachment order.
#[derive(Debug, Default)]
pub struct TerminalStatusBar {
    state: Arc<Mutex<BarState>>,
}

impl TerminalStatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the visible slots, left to right, as a single line.
    /// Clickable slots are underlined.
    pub fn render(&self) -> String {
        let state = self.state.lock().expect("status bar state poisoned");
        let segments: Vec<String> = state
            .attached
            .iter()
            .map(|&idx| &state.slots[idx])
            .filter(|slot| slot.visible)
            .map(|slot| {
                if slot.classes.iter().any(|c| c == CLICKABLE_CLASS) {
                    style(&slot.text).cyan().underlined().to_string()
                } else {
                    slot.text.clone()
                }
            })
            .collect();
        segments.join(&style(" │ ").dim().to_string())
    }

    /// Returns the click action of the n-th visible slot.
    ///
    /// `None` when there is no such visible slot; `Some(None)` when the slot
    /// exists but carries no action.
    pub fn click(&self, visible_index: usize) -> Option<Option<ClickAction>> {
        let state = self.state.lock().expect("status bar state poisoned");
        state
            .attached
            .iter()
            .map(|&idx| &state.slots[idx])
            .filter(|slot| slot.visible)
            .nth(visible_index)
            .map(|slot| slot.click.clone())
    }
}

impl StatusBar for TerminalStatusBar {
    fn create_item(&self) -> Box<dyn StatusItem> {
        let mut state = self.state.lock().expect("status bar state poisoned");
        let index = state.slots.len();
        state.slots.push(SlotState::default());
        state.attached.push(index);
        Box::new(TerminalItem { index, state: self.state.clone() })
    }
}

struct TerminalItem {
    index: usize,
    state: Arc<Mutex<BarState>>,
}

impl TerminalItem {
    fn with_slot(&mut self, f: impl FnOnce(&mut SlotState)) {
        let mut state = self.state.lock().expect("status bar state poisoned");
        f(&mut state.slots[self.index]);
    }
}

impl StatusItem for TerminalItem {
    fn set_text(&mut self, text: &str) {
        self.with_slot(|slot| slot.text = text.to_string());
    }

    fn show(&mut self) {
        self.with_slot(|slot| slot.visible = true);
    }

    fn hide(&mut self) {
        self.with_slot(|slot| slot.visible = false);
    }

    fn set_click(&mut self, action: Option<ClickAction>) {
        self.with_slot(|slot| slot.click = action);
    }

    fn add_class(&mut self, class: &str) {
        self.with_slot(|slot| {
            if !slot.classes.iter().any(|c| c == class) {
                slot.classes.push(class.to_string());
            }
        });
    }

    fn detach(&mut self) {
        let mut state = self.state.lock().expect("status bar state poisoned");
        let index = self.index;
        state.attached.retain(|&idx| idx != index);
    }

    fn attach(&mut self) {
        let mut state = self.state.lock().expect("status bar state poisoned");
        state.attached.push(self.index);
    }
}

/// Terminal stand-in for the host shell capabilities. The real host would
/// open the document in its editor or manipulate its tree panel; here both
/// are reported on stdout.
#[derive(Debug, Default)]
pub struct TerminalShell;

impl Shell for TerminalShell {
    fn open_document(&self, path: &str) {
        info!("Shell open requested for '{}'", path);
        println!("{} {}", style("Opening").green().bold(), path);
    }

    fn reveal_in_tree(&self, path: &str) {
        info!("Shell reveal requested for '{}'", path);
        println!("{} {}", style("Revealing in tree").green().bold(), path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_follows_attachment_order_and_visibility() {
        let bar = TerminalStatusBar::new();
        let mut first = bar.create_item();
        let mut second = bar.create_item();

        first.set_text("one");
        second.set_text("two");
        second.show();

        // Only the visible slot renders
        assert_eq!(console::strip_ansi_codes(&bar.render()), "two");

        first.show();
        // Reorder: second before first
        first.detach();
        second.detach();
        second.attach();
        first.attach();
        assert_eq!(console::strip_ansi_codes(&bar.render()), "two │ one");
    }

    #[test]
    fn click_indexes_visible_slots_only() {
        let bar = TerminalStatusBar::new();
        let mut hidden = bar.create_item();
        let mut shown = bar.create_item();

        hidden.set_click(Some(ClickAction::OpenDocument("h.md".into())));
        shown.set_click(Some(ClickAction::OpenDocument("s.md".into())));
        shown.show();

        assert_eq!(
            bar.click(0),
            Some(Some(ClickAction::OpenDocument("s.md".into())))
        );
        assert_eq!(bar.click(1), None);
    }
}
