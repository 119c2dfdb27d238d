//! Primary category to sub-specialty resolution.

use tracing::debug;

use crate::domain::{Specialization, SpecializationCatalog};
use crate::errors::OptionError;

/// Maximum number of primary categories a therapist may hold at once.
pub const MAX_CATEGORY_SLOTS: usize = 3;

/// Union of the sub-specialties of `categories`, de-duplicated by label.
///
/// Categories are matched by key or label; unknown ones contribute nothing.
/// Order follows `categories`, then each category's catalog order.
pub fn resolve_subspecialties(catalog: &SpecializationCatalog, categories: &[&str]) -> Vec<String> {
    let mut union: Vec<String> = Vec::new();
    for category in categories {
        let Some(entry) = catalog.find(category) else {
            debug!(category = *category, "unknown category ignored");
            continue;
        };
        for sub in entry.subs {
            if !union.iter().any(|existing| existing == sub) {
                union.push((*sub).to_string());
            }
        }
    }
    union
}

/// Fixed slots of selected primary categories.
#[derive(Debug, Clone, Copy)]
pub struct CategorySlots {
    catalog: SpecializationCatalog,
    slots: [Option<&'static Specialization>; MAX_CATEGORY_SLOTS],
}

impl CategorySlots {
    pub fn new(catalog: SpecializationCatalog) -> Self {
        Self {
            catalog,
            slots: [None; MAX_CATEGORY_SLOTS],
        }
    }

    /// Rebuilds slots from persisted labels, skipping unknown and duplicate ones.
    pub fn from_labels<S: AsRef<str>>(catalog: SpecializationCatalog, labels: &[S]) -> Self {
        let mut slots = Self::new(catalog);
        for label in labels {
            if let Err(err) = slots.add(label.as_ref()) {
                debug!(label = label.as_ref(), %err, "persisted category dropped");
            }
        }
        slots
    }

    fn lookup(&self, category: &str) -> Result<&'static Specialization, OptionError> {
        self.catalog
            .find(category)
            .ok_or_else(|| OptionError::UnknownCategory(category.to_string()))
    }

    fn position(&self, entry: &Specialization) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.map_or(false, |held| held.key == entry.key))
    }

    /// Places `category` into `slot`, replacing whatever the slot held.
    ///
    /// Re-selecting the category a slot already holds is accepted.
    pub fn select(&mut self, slot: usize, category: &str) -> Result<(), OptionError> {
        if slot >= MAX_CATEGORY_SLOTS {
            return Err(OptionError::SlotOutOfRange {
                slot,
                max: MAX_CATEGORY_SLOTS,
            });
        }
        let entry = self.lookup(category)?;
        match self.position(entry) {
            Some(held) if held != slot => Err(OptionError::AlreadySelected {
                category: entry.label.to_string(),
                slot: held,
            }),
            _ => {
                self.slots[slot] = Some(entry);
                Ok(())
            }
        }
    }

    /// Empties `slot`. Returns the category it held.
    pub fn clear_slot(&mut self, slot: usize) -> Result<Option<&'static Specialization>, OptionError> {
        let held = self
            .slots
            .get_mut(slot)
            .ok_or(OptionError::SlotOutOfRange {
                slot,
                max: MAX_CATEGORY_SLOTS,
            })?;
        Ok(held.take())
    }

    /// Places `category` into the first free slot. Returns the slot used.
    pub fn add(&mut self, category: &str) -> Result<usize, OptionError> {
        let entry = self.lookup(category)?;
        if let Some(held) = self.position(entry) {
            return Err(OptionError::AlreadySelected {
                category: entry.label.to_string(),
                slot: held,
            });
        }
        let free = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(OptionError::LimitReached {
                max: MAX_CATEGORY_SLOTS,
            })?;
        self.slots[free] = Some(entry);
        Ok(free)
    }

    /// Frees the slot holding `category`. Returns whether anything was removed.
    pub fn remove(&mut self, category: &str) -> bool {
        let Ok(entry) = self.lookup(category) else {
            return false;
        };
        match self.position(entry) {
            Some(held) => {
                self.slots[held] = None;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; MAX_CATEGORY_SLOTS];
    }

    pub fn contains(&self, category: &str) -> bool {
        self.lookup(category)
            .map(|entry| self.position(entry).is_some())
            .unwrap_or(false)
    }

    /// Selected categories in slot order.
    pub fn selected(&self) -> impl Iterator<Item = &'static Specialization> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn selected_labels(&self) -> Vec<String> {
        self.selected().map(|entry| entry.label.to_string()).collect()
    }

    /// Sub-specialties currently offered for the selected categories.
    pub fn options(&self) -> Vec<String> {
        let keys: Vec<&str> = self.selected().map(|entry| entry.key).collect();
        resolve_subspecialties(&self.catalog, &keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERLAPPING: &[Specialization] = &[
        Specialization {
            key: "a",
            label: "Alpha",
            subs: &["shared", "alpha-only"],
        },
        Specialization {
            key: "b",
            label: "Beta",
            subs: &["beta-only", "shared"],
        },
    ];

    #[test]
    fn union_is_deduplicated_in_selection_order() {
        let catalog = SpecializationCatalog::new(OVERLAPPING);
        assert_eq!(
            resolve_subspecialties(&catalog, &["b", "a"]),
            vec!["beta-only", "shared", "alpha-only"]
        );
        assert_eq!(
            resolve_subspecialties(&catalog, &["Alpha", "missing"]),
            vec!["shared", "alpha-only"]
        );
        assert!(resolve_subspecialties(&catalog, &[]).is_empty());
    }

    #[test]
    fn single_category_matches_catalog_order() {
        let catalog = SpecializationCatalog::standard();
        let speech = catalog.find("speech").expect("speech");
        let resolved = resolve_subspecialties(&catalog, &[speech.label]);
        assert_eq!(resolved.len(), speech.subs.len());
        assert_eq!(resolved[0], speech.subs[0]);
    }

    #[test]
    fn same_category_cannot_take_two_slots() {
        let mut slots = CategorySlots::new(SpecializationCatalog::standard());
        slots.select(0, "speech").expect("slot 0");
        let err = slots.select(1, "speech").unwrap_err();
        assert!(matches!(err, OptionError::AlreadySelected { slot: 0, .. }));
        assert!(slots.select(0, "speech").is_ok());
        assert_eq!(
            slots.select(3, "ot"),
            Err(OptionError::SlotOutOfRange { slot: 3, max: 3 })
        );
    }

    #[test]
    fn clearing_a_slot_frees_it_for_another_category() {
        let mut slots = CategorySlots::new(SpecializationCatalog::standard());
        slots.select(1, "speech").expect("slot 1");
        let cleared = slots.clear_slot(1).expect("in range");
        assert_eq!(cleared.map(|entry| entry.key), Some("speech"));
        assert_eq!(slots.clear_slot(1), Ok(None));
        assert!(!slots.contains("speech"));
        assert!(slots.select(2, "speech").is_ok());
        assert_eq!(
            slots.clear_slot(3),
            Err(OptionError::SlotOutOfRange { slot: 3, max: 3 })
        );
    }

    #[test]
    fn add_is_limited_to_three_categories() {
        let mut slots = CategorySlots::new(SpecializationCatalog::standard());
        assert_eq!(slots.add("speech"), Ok(0));
        assert_eq!(slots.add("ot"), Ok(1));
        assert_eq!(slots.add("physio"), Ok(2));
        assert_eq!(slots.add("psychology"), Err(OptionError::LimitReached { max: 3 }));
        assert!(slots.remove("ot"));
        assert_eq!(slots.add("psychology"), Ok(1));
        assert_eq!(slots.selected().count(), 3);
        assert!(matches!(
            slots.add("astrology"),
            Err(OptionError::UnknownCategory(_))
        ));
    }

    #[test]
    fn options_shrink_when_a_category_is_removed() {
        let catalog = SpecializationCatalog::standard();
        let mut slots = CategorySlots::from_labels(catalog, &["speech", "ot"]);
        let both = slots.options();
        slots.remove("speech");
        let ot_only = slots.options();
        assert!(ot_only.len() < both.len());
        assert_eq!(ot_only, resolve_subspecialties(&catalog, &["ot"]));
        slots.clear();
        assert!(slots.options().is_empty());
    }
}
