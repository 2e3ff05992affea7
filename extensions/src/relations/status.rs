use std::collections::HashMap;

use tracing::debug;
use trellis_core::ui::{ClickAction, StatusBar, StatusItem, CLICKABLE_CLASS};

/// Identifies one configured relation within a settings generation. Ids are
/// positions in the relation list at the time the slot map was built; a
/// settings change rebuilds the map and invalidates old ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RelationId(pub usize);

/// What a matched relation's slot should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotContent {
    pub text: String,
    pub click: Option<ClickAction>,
}

/// Owns one status slot per configured relation and keeps the visible slots
/// in definition order.
///
/// This is the explicit relation-id to slot mapping: built once per
/// settings load, dropped on unload, never held in ambient state.
pub struct RelationStatus {
    // Definition order, fixed at build time
    order: Vec<RelationId>,
    slots: HashMap<RelationId, Box<dyn StatusItem>>,
}

impl RelationStatus {
    /// Creates one hidden slot per relation, attached in definition order.
    pub fn new(status_bar: &dyn StatusBar, relation_count: usize) -> Self {
        let order: Vec<RelationId> = (0..relation_count).map(RelationId).collect();
        let mut slots = HashMap::new();
        for id in &order {
            let mut item = status_bar.create_item();
            item.hide();
            slots.insert(*id, item);
        }
        debug!("Built {} relation status slots", relation_count);
        RelationStatus { order, slots }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Applies one resolution pass.
    ///
    /// `outcomes` is parallel to the definition order: `Some` repopulates
    /// and shows that relation's slot, `None` leaves it hidden. Afterwards
    /// every slot is detached and reattached in definition order, so the
    /// visible left-to-right order always matches the configured order no
    /// matter in which order results arrived.
    pub fn apply(&mut self, outcomes: Vec<Option<SlotContent>>) {
        for id in &self.order {
            if let Some(slot) = self.slots.get_mut(id) {
                slot.hide();
            }
        }

        for (position, outcome) in outcomes.into_iter().enumerate() {
            let id = RelationId(position);
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };
            let Some(content) = outcome else {
                continue;
            };

            slot.set_text(&content.text);
            let clickable = content.click.is_some();
            slot.set_click(content.click);
            if clickable {
                slot.add_class(CLICKABLE_CLASS);
            }
            slot.show();
        }

        // Re-apply canonical ordering
        for id in &self.order {
            if let Some(slot) = self.slots.get_mut(id) {
                slot.detach();
            }
        }
        for id in &self.order {
            if let Some(slot) = self.slots.get_mut(id) {
                slot.attach();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    // A status bar double that records the bar's visible line-up.
    #[derive(Debug, Default)]
    struct BarState {
        // (slot id, text, visible, classes, click) per created slot
        slots: Vec<SlotState>,
        // Attachment order, rebuilt by detach/attach cycles
        attached: Vec<usize>,
    }

    #[derive(Debug, Default)]
    struct SlotState {
        text: String,
        visible: bool,
        classes: Vec<String>,
        click: Option<ClickAction>,
    }

    #[derive(Clone, Default)]
    struct MockStatusBar {
        state: Arc<Mutex<BarState>>,
    }

    impl MockStatusBar {
        fn visible_texts(&self) -> Vec<String> {
            let state = self.state.lock().unwrap();
            state
                .attached
                .iter()
                .filter(|&&idx| state.slots[idx].visible)
                .map(|&idx| state.slots[idx].text.clone())
                .collect()
        }
    }

    struct MockItem {
        index: usize,
        state: Arc<Mutex<BarState>>,
    }

    impl StatusBar for MockStatusBar {
        fn create_item(&self) -> Box<dyn StatusItem> {
            let mut state = self.state.lock().unwrap();
            let index = state.slots.len();
            state.slots.push(SlotState::default());
            state.attached.push(index);
            Box::new(MockItem { index, state: self.state.clone() })
        }
    }

    impl StatusItem for MockItem {
        fn set_text(&mut self, text: &str) {
            self.state.lock().unwrap().slots[self.index].text = text.to_string();
        }
        fn show(&mut self) {
            self.state.lock().unwrap().slots[self.index].visible = true;
        }
        fn hide(&mut self) {
            self.state.lock().unwrap().slots[self.index].visible = false;
        }
        fn set_click(&mut self, action: Option<ClickAction>) {
            self.state.lock().unwrap().slots[self.index].click = action;
        }
        fn add_class(&mut self, class: &str) {
            self.state.lock().unwrap().slots[self.index].classes.push(class.to_string());
        }
        fn detach(&mut self) {
            let mut state = self.state.lock().unwrap();
            state.attached.retain(|&idx| idx != self.index);
        }
        fn attach(&mut self) {
            let mut state = self.state.lock().unwrap();
            state.attached.push(self.index);
        }
    }

    fn content(text: &str) -> Option<SlotContent> {
        Some(SlotContent { text: text.to_string(), click: None })
    }

    #[test]
    fn visible_slots_preserve_definition_order() {
        let bar = MockStatusBar::default();
        let mut status = RelationStatus::new(&bar, 3);

        // Only R1 and R3 match; visible order must still be [R1, R3]
        status.apply(vec![content("R1"), None, content("R3")]);
        assert_eq!(bar.visible_texts(), vec!["R1", "R3"]);

        // A later pass where results "arrive" differently still reorders
        status.apply(vec![None, content("R2"), content("R3")]);
        assert_eq!(bar.visible_texts(), vec!["R2", "R3"]);
    }

    #[test]
    fn unmatched_slots_stay_hidden_across_passes() {
        let bar = MockStatusBar::default();
        let mut status = RelationStatus::new(&bar, 2);

        status.apply(vec![content("A"), content("B")]);
        assert_eq!(bar.visible_texts(), vec!["A", "B"]);

        // Second event: first relation no longer matches
        status.apply(vec![None, content("B2")]);
        assert_eq!(bar.visible_texts(), vec!["B2"]);
    }

    #[test]
    fn clickable_slots_get_the_clickable_class() {
        let bar = MockStatusBar::default();
        let mut status = RelationStatus::new(&bar, 1);

        status.apply(vec![Some(SlotContent {
            text: "Proj".to_string(),
            click: Some(ClickAction::OpenDocument("a/p.md".to_string())),
        })]);

        let state = bar.state.lock().unwrap();
        assert!(state.slots[0].classes.contains(&CLICKABLE_CLASS.to_string()));
        assert_eq!(
            state.slots[0].click,
            Some(ClickAction::OpenDocument("a/p.md".to_string()))
        );
    }

    #[test]
    fn empty_relation_list_builds_no_slots() {
        let bar = MockStatusBar::default();
        let status = RelationStatus::new(&bar, 0);
        assert!(status.is_empty());
        assert!(bar.visible_texts().is_empty());
    }
}
