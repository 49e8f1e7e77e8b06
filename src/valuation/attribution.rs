//! Reverse cost attribution: price a record's default equipment and innate rules by
//! looking for each price-table item name inside the record's text.
//!
//! Matching is plain substring membership over the lowercase `", "`-joined list. Each
//! table item counts once per record no matter how often it occurs. Short names that
//! also appear inside longer ones ("bow" in "crossbow") are handled by an
//! [`ExclusionTable`]: if the text contains any of an item's disqualifying substrings the
//! item is not counted.
//!
//! Known limitation: keys are not resolved longest-match-first. A record carrying both a
//! bow and a crossbow only has the crossbow priced, and any ambiguous pair that is not in
//! the exclusion table is counted twice.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::data::price_table::{PriceTable, ROLE_CHARACTER, ROLE_RANK_AND_FILE};
use crate::data::record::UnitModelRecord;

/// Base item name -> substrings that mean the text names a different item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionTable {
    guards: HashMap<String, Vec<String>>,
}

impl Default for ExclusionTable {
    fn default() -> Self {
        Self::none()
            .with_guard("bow", ["crossbow", "longbow", "shortbow", "elbow"])
            .with_guard("spear", ["throwing spear", "cavalry spear"])
    }
}

impl ExclusionTable {
    /// No guards at all.
    pub fn none() -> Self {
        Self {
            guards: HashMap::new(),
        }
    }

    /// Add disqualifiers for `item`, keeping any already registered.
    pub fn with_guard<I, S>(mut self, item: &str, disqualifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.guards
            .entry(item.to_lowercase())
            .or_default()
            .extend(disqualifiers.into_iter().map(|s| s.into().to_lowercase()));
        self
    }

    /// `text` must already be lowercase.
    pub fn excludes(&self, item: &str, text: &str) -> bool {
        self.guards
            .get(item)
            .is_some_and(|subs| subs.iter().any(|sub| text.contains(sub.as_str())))
    }

    pub fn guarded_items(&self) -> impl Iterator<Item = &str> {
        self.guards.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttributionResult {
    pub gear_value: f64,
    pub rules_value: f64,
}

impl AttributionResult {
    pub fn total(&self) -> f64 {
        self.gear_value + self.rules_value
    }

    /// Cost left for the model itself, never below 1.
    pub fn naked_points(&self, points: f64) -> f64 {
        (points - self.gear_value - self.rules_value).max(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedItem {
    pub item: String,
    pub price: f64,
}

/// What each side of an [`AttributionResult`] was made of.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributionBreakdown {
    pub role: &'static str,
    pub equipment: Vec<MatchedItem>,
    pub rules: Vec<MatchedItem>,
}

impl AttributionBreakdown {
    pub fn result(&self) -> AttributionResult {
        AttributionResult {
            gear_value: self.equipment.iter().map(|m| m.price).sum(),
            rules_value: self.rules.iter().map(|m| m.price).sum(),
        }
    }
}

/// Characters are priced from the character table, everyone else as rank and file.
pub fn role_key(record: &UnitModelRecord) -> &'static str {
    if record.is_character() {
        ROLE_CHARACTER
    } else {
        ROLE_RANK_AND_FILE
    }
}

pub fn compute_attribution(
    record: &UnitModelRecord,
    equipment: &PriceTable,
    rules: &PriceTable,
) -> AttributionResult {
    compute_attribution_with(record, equipment, rules, &ExclusionTable::default())
}

pub fn compute_attribution_with(
    record: &UnitModelRecord,
    equipment: &PriceTable,
    rules: &PriceTable,
    exclusions: &ExclusionTable,
) -> AttributionResult {
    explain_attribution(record, equipment, rules, exclusions).result()
}

pub fn explain_attribution(
    record: &UnitModelRecord,
    equipment: &PriceTable,
    rules: &PriceTable,
    exclusions: &ExclusionTable,
) -> AttributionBreakdown {
    let role = role_key(record);
    let gear_text = record.equipment_text().to_lowercase();
    let rules_text = record.rules_text().to_lowercase();
    let no_guards = ExclusionTable::none();

    AttributionBreakdown {
        role,
        equipment: scan(&gear_text, equipment.for_role(role), exclusions),
        rules: scan(&rules_text, rules.for_role(role), &no_guards),
    }
}

/// Items of `prices` whose name occurs in `text` and is not excluded, in key order.
fn scan(text: &str, prices: &BTreeMap<String, f64>, exclusions: &ExclusionTable) -> Vec<MatchedItem> {
    if text.is_empty() {
        return Vec::new();
    }
    prices
        .iter()
        .filter(|(item, _)| !item.is_empty() && text.contains(item.as_str()))
        .filter(|(item, _)| !exclusions.excludes(item, text))
        .map(|(item, price)| MatchedItem {
            item: item.clone(),
            price: *price,
        })
        .collect()
}
