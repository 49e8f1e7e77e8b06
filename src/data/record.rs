//! Flattened unit-model row and the numeric coercion rules used to build it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_FACTION: &str = "Unknown";
pub const DEFAULT_ROLE: &str = "rank_and_file";
pub const DEFAULT_ORG_SLOT: &str = "Special";
pub const DEFAULT_TROOP_TYPE: &str = "Unknown";
pub const DEFAULT_MODEL_NAME: &str = "Unknown";
pub const ROLE_CHAMPION: &str = "champion";
pub const CHARACTERS_SLOT: &str = "Characters";

/// Characteristic profile. Missing or unreadable values are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    #[serde(rename = "M")]
    pub m: u32,
    #[serde(rename = "WS")]
    pub ws: u32,
    #[serde(rename = "BS")]
    pub bs: u32,
    #[serde(rename = "S")]
    pub s: u32,
    #[serde(rename = "T")]
    pub t: u32,
    #[serde(rename = "W")]
    pub w: u32,
    #[serde(rename = "I")]
    pub i: u32,
    #[serde(rename = "A")]
    pub a: u32,
    #[serde(rename = "Ld")]
    pub ld: u32,
}

/// One physical model entry of a unit, with unit-level attributes merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitModelRecord {
    pub faction: String,
    pub name: String,
    pub role: String,
    pub org_slot: String,
    pub points: u32,
    pub troop_type: String,
    /// Unit rules plus model rules, sorted and duplicate-free.
    pub rules: BTreeSet<String>,
    /// Model weapons plus the unit's default upgrades, sorted and duplicate-free.
    pub default_equipment: BTreeSet<String>,
    pub optional_upgrades: BTreeSet<String>,
    pub stats: StatLine,
}

impl UnitModelRecord {
    pub fn is_champion(&self) -> bool {
        self.role == ROLE_CHAMPION
    }

    pub fn is_character(&self) -> bool {
        self.org_slot == CHARACTERS_SLOT
    }

    pub fn rules_text(&self) -> String {
        join_list(&self.rules)
    }

    pub fn equipment_text(&self) -> String {
        join_list(&self.default_equipment)
    }

    pub fn upgrades_text(&self) -> String {
        join_list(&self.optional_upgrades)
    }
}

/// Comma-separated rendering used for text matching and tabular export.
pub fn join_list(items: &BTreeSet<String>) -> String {
    items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Coerce a raw JSON value to a non-negative integer.
///
/// Numbers are truncated (negatives become 0). Strings yield their first run of ASCII
/// digits, so `"4+"` is 4 and `"-"` is 0. Everything else is 0.
pub fn coerce_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).unwrap_or(u32::MAX)
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f > 0.0 => f.trunc().min(u32::MAX as f64) as u32,
                    _ => 0,
                }
            }
        }
        Some(Value::String(s)) => first_digit_run(s),
        _ => 0,
    }
}

fn first_digit_run(s: &str) -> u32 {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Whether a raw value counts as "set" for key-precedence purposes (`LD` over `Ld`).
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
