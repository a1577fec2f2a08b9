// 🃏 Selectable collection
// Current selection plus a set of toggled (flipped / expanded) entries
//
// Card grids, FAQ accordions and the asset picker all need the same state:
// which card is focused and which ones are turned over.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    len: usize,
    selected: Option<usize>,
    toggled: BTreeSet<usize>,
}

impl Selection {
    /// Selects the first entry when the collection is not empty
    pub fn new(len: usize) -> Self {
        Selection {
            len,
            selected: if len > 0 { Some(0) } else { None },
            toggled: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Out-of-range indices are ignored
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.selected = Some(index);
        }
    }

    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }
        let i = match self.selected {
            Some(i) if i + 1 < self.len => i + 1,
            _ => 0,
        };
        self.selected = Some(i);
    }

    pub fn previous(&mut self) {
        if self.len == 0 {
            return;
        }
        let i = match self.selected {
            Some(0) | None => self.len - 1,
            Some(i) => i - 1,
        };
        self.selected = Some(i);
    }

    /// Flip an entry; returns its new state
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        if !self.toggled.remove(&index) {
            self.toggled.insert(index);
            return true;
        }
        false
    }

    /// Flip the selected entry
    pub fn toggle_selected(&mut self) -> bool {
        match self.selected {
            Some(i) => self.toggle(i),
            None => false,
        }
    }

    pub fn is_toggled(&self, index: usize) -> bool {
        self.toggled.contains(&index)
    }

    pub fn toggled(&self) -> impl Iterator<Item = usize> + '_ {
        self.toggled.iter().copied()
    }

    /// Reset toggles and go back to the first entry
    pub fn clear(&mut self) {
        self.toggled.clear();
        self.selected = if self.len > 0 { Some(0) } else { None };
    }
}
