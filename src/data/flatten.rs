//! Faction document -> unit-model rows.
//!
//! Each model entry of each unit becomes one [`UnitModelRecord`]. Unit rules and default
//! upgrades are merged into every model of the unit; optional upgrades are shared as-is.

use std::collections::BTreeSet;

use crate::data::faction::{FactionDocument, ModelEntry, UnitEntry};
use crate::data::record::{
    coerce_count, is_truthy, StatLine, UnitModelRecord, DEFAULT_FACTION, DEFAULT_MODEL_NAME,
    DEFAULT_ORG_SLOT, DEFAULT_ROLE, DEFAULT_TROOP_TYPE, ROLE_CHAMPION,
};

const CHAMPION_LABEL: &str = "Champion";

/// Flatten one document. Names are left as they appear in the source.
pub fn flatten_document(doc: &FactionDocument) -> Vec<UnitModelRecord> {
    let faction = doc.faction_name.as_deref().unwrap_or(DEFAULT_FACTION);
    doc.units
        .iter()
        .flat_map(|unit| flatten_unit(faction, unit))
        .collect()
}

/// Flatten documents in order and apply display names.
pub fn flatten_documents<'a, I>(docs: I) -> Vec<UnitModelRecord>
where
    I: IntoIterator<Item = &'a FactionDocument>,
{
    docs.into_iter()
        .flat_map(flatten_document)
        .map(apply_display_name)
        .collect()
}

fn flatten_unit(faction: &str, unit: &UnitEntry) -> Vec<UnitModelRecord> {
    let org_slot = unit.category.as_deref().unwrap_or(DEFAULT_ORG_SLOT);
    let base_points = coerce_count(unit.base_points.as_ref());
    let optional_upgrades: BTreeSet<String> =
        unit.optional_upgrade_names().map(str::to_string).collect();

    unit.models
        .iter()
        .map(|model| UnitModelRecord {
            faction: faction.to_string(),
            name: model
                .name
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            role: model.role.clone().unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            org_slot: org_slot.to_string(),
            points: resolve_points(model, base_points),
            troop_type: troop_type(model),
            rules: unit
                .rules
                .iter()
                .chain(model.rules.iter())
                .cloned()
                .collect(),
            default_equipment: model
                .default_weapons
                .iter()
                .map(String::as_str)
                .chain(unit.default_upgrade_names())
                .map(str::to_string)
                .collect(),
            optional_upgrades: optional_upgrades.clone(),
            stats: stat_line(model),
        })
        .collect()
}

/// Model cost when present and nonzero, else the unit's base cost.
fn resolve_points(model: &ModelEntry, base_points: u32) -> u32 {
    match coerce_count(model.cost.as_ref()) {
        0 => base_points,
        cost => cost,
    }
}

fn troop_type(model: &ModelEntry) -> String {
    match model.stats.get("Type") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_TROOP_TYPE.to_string(),
    }
}

fn stat_line(model: &ModelEntry) -> StatLine {
    let stat = |key: &str| coerce_count(model.stats.get(key));
    let ld = model
        .stats
        .get("LD")
        .filter(|v| is_truthy(v))
        .or_else(|| model.stats.get("Ld"));
    StatLine {
        m: stat("M"),
        ws: stat("WS"),
        bs: stat("BS"),
        s: stat("S"),
        t: stat("T"),
        w: stat("W"),
        i: stat("I"),
        a: stat("A"),
        ld: coerce_count(ld),
    }
}

/// Champions are shown as `"Champion - {name}"`, or just `"Champion"` when that is already
/// the model's name. Other roles keep their name.
pub fn apply_display_name(record: UnitModelRecord) -> UnitModelRecord {
    if record.role != ROLE_CHAMPION {
        return record;
    }
    let name = if record.name.eq_ignore_ascii_case(CHAMPION_LABEL) {
        CHAMPION_LABEL.to_string()
    } else {
        format!("{CHAMPION_LABEL} - {}", record.name)
    };
    UnitModelRecord { name, ..record }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: serde_json::Value) -> FactionDocument {
        serde_json::from_value(value).expect("fixture should deserialize")
    }

    #[test]
    fn single_model_without_upgrades_keeps_weapons_sorted() {
        let records = flatten_document(&doc(json!({
            "faction_name": "Empire",
            "units": [{
                "category": "Core",
                "base_points": 6,
                "models": [{"name": "State Troops", "default_weapons": ["Shield", "Halberd", "Hand weapon"]}]
            }]
        })));

        assert_eq!(records.len(), 1);
        let eq: Vec<&str> = records[0].default_equipment.iter().map(String::as_str).collect();
        assert_eq!(eq, vec!["Halberd", "Hand weapon", "Shield"]);
        assert!(records[0].optional_upgrades.is_empty());
    }

    #[test]
    fn unit_and_model_rules_are_merged() {
        let records = flatten_document(&doc(json!({
            "faction_name": "Vampire Counts",
            "units": [{
                "rules": ["Stubborn"],
                "models": [{"name": "Bat", "rules": ["Fly", "Stubborn"]}]
            }]
        })));

        let rules: Vec<&str> = records[0].rules.iter().map(String::as_str).collect();
        assert_eq!(rules, vec!["Fly", "Stubborn"]);
    }

    #[test]
    fn default_upgrades_join_equipment_and_optional_are_shared() {
        let records = flatten_document(&doc(json!({
            "units": [{
                "upgrades": [
                    {"name": "Full plate armour", "is_default": true},
                    {"name": "Lance", "is_default": false},
                    {"name": "Standard bearer"},
                    {"is_default": true}
                ],
                "models": [
                    {"name": "Knight", "default_weapons": ["Hand weapon"]},
                    {"name": "Preceptor", "role": "champion", "default_weapons": ["Hand weapon"]}
                ]
            }]
        })));

        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.default_equipment.contains("Full plate armour"));
            assert!(record.default_equipment.contains("Hand weapon"));
            assert_eq!(record.optional_upgrades.len(), 2);
            assert!(record.optional_upgrades.contains("Lance"));
            assert!(record.optional_upgrades.contains("Standard bearer"));
        }
    }

    #[test]
    fn missing_faction_and_defaults_are_filled() {
        let records = flatten_document(&doc(json!({
            "units": [{"models": [{"name": "Skink"}]}]
        })));

        let record = &records[0];
        assert_eq!(record.faction, "Unknown");
        assert_eq!(record.role, "rank_and_file");
        assert_eq!(record.org_slot, "Special");
        assert_eq!(record.troop_type, "Unknown");
        assert_eq!(record.points, 0);
        assert_eq!(record.stats, StatLine::default());
    }

    #[test]
    fn cost_falls_back_to_base_points() {
        let records = flatten_document(&doc(json!({
            "units": [{
                "base_points": "12 per model",
                "models": [
                    {"name": "A", "cost": 0},
                    {"name": "B"},
                    {"name": "C", "cost": 20},
                    {"name": "D", "cost": "-"}
                ]
            }]
        })));

        let points: Vec<u32> = records.iter().map(|r| r.points).collect();
        assert_eq!(points, vec![12, 12, 20, 12]);
    }

    #[test]
    fn stats_are_coerced_and_ld_prefers_uppercase_key() {
        let records = flatten_document(&doc(json!({
            "units": [{"models": [
                {"name": "A", "stats": {"M": 4, "WS": "3", "S": "4+", "T": "-", "LD": 8, "Ld": 7, "Type": "Infantry"}},
                {"name": "B", "stats": {"LD": 0, "Ld": 6}},
                {"name": "C", "stats": {"Ld": "9"}}
            ]}]
        })));

        let a = &records[0];
        assert_eq!(a.stats.m, 4);
        assert_eq!(a.stats.ws, 3);
        assert_eq!(a.stats.s, 4);
        assert_eq!(a.stats.t, 0);
        assert_eq!(a.stats.ld, 8);
        assert_eq!(a.troop_type, "Infantry");
        assert_eq!(records[1].stats.ld, 6);
        assert_eq!(records[2].stats.ld, 9);
    }

    #[test]
    fn display_name_prefixes_champions_once() {
        let records = flatten_documents([&doc(json!({
            "units": [{"models": [
                {"name": "Sergeant", "role": "champion"},
                {"name": "champion", "role": "champion"},
                {"name": "Spearman"}
            ]}]
        }))]);

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Champion - Sergeant", "Champion", "Spearman"]);
    }

    #[test]
    fn malformed_entries_cost_only_themselves() {
        let records = flatten_document(&doc(json!({
            "faction_name": "Empire",
            "units": [
                5,
                {"models": ["oops", {"name": "Spearmen"}]},
                {
                    "base_points": 20,
                    "upgrades": [{"name": "Barding", "is_default": 1}, "junk"],
                    "models": [{"name": "Pistolier", "default_weapons": ["Pistol", 7]}]
                }
            ]
        })));

        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Spearmen", "Pistolier"]);
        let equipment: Vec<&str> = records[1].default_equipment.iter().map(String::as_str).collect();
        assert_eq!(equipment, vec!["Barding", "Pistol"]);
    }
}
