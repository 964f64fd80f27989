// Position selection on the full pitch: the current formation and at most
// one selected slot.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::formation::{self, DEFAULT_FORMATION};
use crate::notify::Notifier;
use crate::pitch::{PitchMapper, PixelPoint};

/// What listeners see after every selection mutation. There is no partial
/// state: either a concrete slot or an explicit clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(String),
    Cleared,
}

#[derive(Debug)]
pub struct SelectionState {
    formation: &'static str,
    selected: Option<&'static str>,
    notifier: Notifier<SelectionChange>,
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState {
            formation: DEFAULT_FORMATION,
            selected: None,
            notifier: Notifier::new(),
        }
    }
}

impl SelectionState {
    /// Start with `formation`, falling back to the default for unknown names.
    pub fn new(formation: &str) -> Self {
        let mut state = Self::default();
        state.set_formation(formation);
        state
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SelectionChange> {
        self.notifier.subscribe()
    }

    pub fn formation(&self) -> &'static str {
        self.formation
    }

    pub fn selected(&self) -> Option<&'static str> {
        self.selected
    }

    /// Select `slot_name`, replacing any previous selection. Names that are
    /// not part of the current formation are rejected.
    pub fn select(&mut self, slot_name: &str) -> bool {
        let Some(slot) = formation::slots_for(self.formation)
            .iter()
            .find(|s| s.name == slot_name)
        else {
            debug!("slot {slot_name} not in {}", self.formation);
            return false;
        };
        self.selected = Some(slot.name);
        info!("selected {}", slot.name);
        self.notifier.emit(SelectionChange::Selected(slot.name.to_string()));
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.notifier.emit(SelectionChange::Cleared);
    }

    /// Switch formation. Unknown names are rejected. A successful switch
    /// always clears the selection, even when the formation is unchanged.
    pub fn set_formation(&mut self, name: &str) -> bool {
        let Some(known) = formation::formation_names().find(|f| *f == name) else {
            debug!("unknown formation {name}");
            return false;
        };
        self.formation = known;
        info!("formation set to {known}");
        self.deselect();
        true
    }

    /// Advance to the next formation in the catalog.
    pub fn cycle_formation(&mut self) -> &'static str {
        let next = formation::next_formation(self.formation);
        self.set_formation(next);
        self.formation
    }

    /// Full-pitch pointer-down: select the nearest slot within `threshold`
    /// pixels of `at`. Presses off the pitch or away from every slot leave
    /// the selection alone.
    pub fn select_at(
        &mut self,
        mapper: &PitchMapper,
        at: PixelPoint,
        threshold: f64,
    ) -> Option<&'static str> {
        let rel = mapper.to_relative(at)?;
        let name = formation::nearest_slot(self.formation, rel, threshold, mapper)?;
        self.select(name);
        Some(name)
    }

    /// Role labels for the current selection; empty when nothing is selected.
    pub fn role_options(&self) -> &'static [&'static str] {
        self.selected.map(formation::role_options).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
