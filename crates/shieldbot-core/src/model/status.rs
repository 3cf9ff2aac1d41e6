// ── Composite status ──
//
// Several independently read settings rendered as one view. Insertion
// order is display order.

use indexmap::IndexMap;

use super::setting::{SettingName, SettingValue};

/// What is known about one setting in a composite view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusField {
    Known(SettingValue),
    /// The read failed; carries the rendered failure.
    Unavailable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositeStatus {
    fields: IndexMap<SettingName, StatusField>,
    /// Every field was re-read after a no-op edit.
    unchanged: bool,
}

impl CompositeStatus {
    pub fn new(unchanged: bool) -> Self {
        Self {
            fields: IndexMap::new(),
            unchanged,
        }
    }

    pub fn push(&mut self, name: SettingName, field: StatusField) {
        self.fields.insert(name, field);
    }

    pub fn get(&self, name: SettingName) -> Option<&StatusField> {
        self.fields.get(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SettingName, &StatusField)> {
        self.fields.iter()
    }

    pub fn names(&self) -> Vec<SettingName> {
        self.fields.keys().copied().collect()
    }

    pub fn is_unchanged(&self) -> bool {
        self.unchanged
    }

    /// Force the "unchanged" heading regardless of how the fields were read.
    pub fn mark_unchanged(&mut self) {
        self.unchanged = true;
    }
}
