//! Display state of the watchface

use crate::label::Label;

/// One independently updatable text region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    Bluetooth,
    Battery,
    Time,
    Quote,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Bluetooth, Field::Battery, Field::Time, Field::Quote];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Set of fields that need redrawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FieldSet(u8);

impl FieldSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Field::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Add all fields of `other`.
    pub fn extend_from(&mut self, other: FieldSet) {
        self.0 |= other.0;
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(|field| self.contains(*field))
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = Self::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

/// New text for one field. An empty text clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub field: Field,
    pub text: Label,
}

impl FieldUpdate {
    pub fn set(field: Field, text: Label) -> Self {
        Self { field, text }
    }

    pub fn clear(field: Field) -> Self {
        Self {
            field,
            text: Label::new(),
        }
    }
}

/// Text currently shown in each field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub bluetooth: Label,
    pub battery: Label,
    pub time: Label,
    pub quote: Label,
}

impl DisplayState {
    pub fn field(&self, field: Field) -> &str {
        self.slot(field).as_str()
    }

    /// Apply an update, returns whether the text changed.
    pub fn apply(&mut self, update: FieldUpdate) -> bool {
        let slot = self.slot_mut(update.field);
        if *slot == update.text {
            return false;
        }
        *slot = update.text;
        true
    }

    fn slot(&self, field: Field) -> &Label {
        match field {
            Field::Bluetooth => &self.bluetooth,
            Field::Battery => &self.battery,
            Field::Time => &self.time,
            Field::Quote => &self.quote,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Label {
        match field {
            Field::Bluetooth => &mut self.bluetooth,
            Field::Battery => &mut self.battery,
            Field::Time => &mut self.time,
            Field::Quote => &mut self.quote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label;

    fn set(field: Field, text: &str) -> FieldUpdate {
        FieldUpdate::set(field, label::text(text))
    }

    #[test]
    fn apply_reports_changes_only() {
        let mut state = DisplayState::default();
        assert!(state.apply(set(Field::Quote, "Hello")));
        assert!(!state.apply(set(Field::Quote, "Hello")));
        assert_eq!(state.field(Field::Quote), "Hello");

        assert!(state.apply(FieldUpdate::clear(Field::Quote)));
        assert_eq!(state.field(Field::Quote), "");
        assert!(!state.apply(FieldUpdate::clear(Field::Quote)));
    }

    #[test]
    fn fields_are_independent() {
        let mut state = DisplayState::default();
        state.apply(set(Field::Bluetooth, "BT ON"));
        state.apply(set(Field::Battery, "50%"));
        state.apply(FieldUpdate::clear(Field::Battery));
        assert_eq!(state.field(Field::Bluetooth), "BT ON");
        assert_eq!(state.field(Field::Battery), "");
        assert_eq!(state.field(Field::Time), "");
    }

    #[test]
    fn field_set_membership() {
        let mut set = FieldSet::empty();
        assert!(set.is_empty());
        set.insert(Field::Time);
        set.insert(Field::Quote);
        set.insert(Field::Time);
        assert!(set.contains(Field::Time));
        assert!(!set.contains(Field::Battery));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Field::Time, Field::Quote]);

        let mut other = FieldSet::empty();
        other.insert(Field::Bluetooth);
        set.extend_from(other);
        assert_eq!(set.iter().count(), 3);
        assert_eq!(FieldSet::all().iter().count(), 4);
    }
}
