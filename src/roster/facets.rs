use std::collections::BTreeSet;

use serde::Serialize;

use crate::data::record::UnitModelRecord;

/// Substrings that mark a faction as a "renegade" (non-official) list.
pub const RENEGADE_KEYWORDS: &[&str] = &[
    "chaos dwarf",
    "daemon",
    "demon",
    "chaos",
    "dark elf",
    "lizard",
    "ogre",
    "skaven",
    "vampire",
];

pub fn is_renegade(faction: &str) -> bool {
    let lower = faction.to_lowercase();
    RENEGADE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Distinct values available for filtering, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub factions: Vec<String>,
    pub org_slots: Vec<String>,
    pub troop_types: Vec<String>,
    /// Every rule name and optional upgrade name.
    pub search_terms: Vec<String>,
}

impl Facets {
    pub fn from_records(records: &[UnitModelRecord]) -> Self {
        let mut factions = BTreeSet::new();
        let mut org_slots = BTreeSet::new();
        let mut troop_types = BTreeSet::new();
        let mut search_terms = BTreeSet::new();
        for record in records {
            factions.insert(record.faction.clone());
            org_slots.insert(record.org_slot.clone());
            troop_types.insert(record.troop_type.clone());
            search_terms.extend(record.rules.iter().cloned());
            search_terms.extend(record.optional_upgrades.iter().cloned());
        }
        Self {
            factions: factions.into_iter().collect(),
            org_slots: org_slots.into_iter().collect(),
            troop_types: troop_types.into_iter().collect(),
            search_terms: search_terms.into_iter().collect(),
        }
    }

    pub fn official_factions(&self) -> Vec<String> {
        self.factions
            .iter()
            .filter(|f| !is_renegade(f))
            .cloned()
            .collect()
    }

    pub fn renegade_factions(&self) -> Vec<String> {
        self.factions
            .iter()
            .filter(|f| is_renegade(f))
            .cloned()
            .collect()
    }
}
