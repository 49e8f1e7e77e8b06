//! Equipment and rule price tables: `{role: {item_name: price}}`.
//!
//! A missing or unreadable table is replaced by an empty one and reported as a notice, so
//! analysis still runs and every attribution comes out as 0.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const ROLE_CHARACTER: &str = "character";
pub const ROLE_RANK_AND_FILE: &str = "rank_and_file";
pub const DEFAULT_EQUIPMENT_PRICES_FILE: &str = "equipment_prices.json";
pub const DEFAULT_RULE_PRICES_FILE: &str = "rule_prices.json";

static EMPTY_ROLE: BTreeMap<String, f64> = BTreeMap::new();

#[derive(Debug, Error)]
pub enum PriceTableError {
    #[error("unable to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected an object of roles, found {0}")]
    Shape(&'static str),
}

/// Role -> lowercase item name -> price. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    roles: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl PriceTable {
    /// Both known roles present, no items.
    pub fn empty() -> Self {
        let roles = [ROLE_RANK_AND_FILE, ROLE_CHARACTER]
            .into_iter()
            .map(|role| (role.to_string(), BTreeMap::new()))
            .collect();
        Self { roles }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, PriceTableError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    /// Item keys are lowercased; prices that are not finite non-negative numbers are dropped.
    pub fn from_value(value: &Value) -> Result<Self, PriceTableError> {
        let Some(object) = value.as_object() else {
            return Err(PriceTableError::Shape(json_kind(value)));
        };

        let mut roles = BTreeMap::new();
        for (role, items) in object {
            let Some(items) = items.as_object() else {
                debug!(role = %role, "ignoring price table role that is not an object");
                continue;
            };
            let prices: BTreeMap<String, f64> = items
                .iter()
                .filter_map(|(name, price)| match price.as_f64() {
                    Some(p) if p.is_finite() && p >= 0.0 => Some((name.to_lowercase(), p)),
                    _ => {
                        debug!(role = %role, item = %name, "ignoring non-numeric price");
                        None
                    }
                })
                .collect();
            roles.insert(role.clone(), prices);
        }
        Ok(Self { roles })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PriceTableError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| PriceTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Prices for `role`, falling back to the rank-and-file table, then to nothing.
    pub fn for_role(&self, role: &str) -> &BTreeMap<String, f64> {
        self.roles
            .get(role)
            .or_else(|| self.roles.get(ROLE_RANK_AND_FILE))
            .unwrap_or(&EMPTY_ROLE)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.roles.values().all(BTreeMap::is_empty)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Load a table, substituting an empty one on any failure. The second value is a notice
/// for the caller when that happened.
pub fn load_price_table(path: impl AsRef<Path>, label: &str) -> (PriceTable, Option<String>) {
    let path = path.as_ref();
    if !path.exists() {
        let notice = format!(
            "{label} price table not found at '{}'; {label} values will be 0",
            path.display()
        );
        warn!("{notice}");
        return (PriceTable::empty(), Some(notice));
    }
    match PriceTable::from_path(path) {
        Ok(table) => (table, None),
        Err(err) => {
            let notice = format!(
                "{label} price table at '{}' is unusable ({err}); {label} values will be 0",
                path.display()
            );
            warn!("{notice}");
            (PriceTable::empty(), Some(notice))
        }
    }
}

/// Equipment and rule tables loaded together.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceTables {
    pub equipment: PriceTable,
    pub rules: PriceTable,
    pub notices: Vec<String>,
}

impl PriceTables {
    pub fn new(equipment: PriceTable, rules: PriceTable) -> Self {
        Self {
            equipment,
            rules,
            notices: Vec::new(),
        }
    }

    pub fn load(equipment_path: impl AsRef<Path>, rules_path: impl AsRef<Path>) -> Self {
        let (equipment, equipment_notice) = load_price_table(equipment_path, "equipment");
        let (rules, rules_notice) = load_price_table(rules_path, "rules");
        Self {
            equipment,
            rules,
            notices: equipment_notice.into_iter().chain(rules_notice).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_lowercased_and_bad_prices_dropped() {
        let table = PriceTable::from_json_str(
            r#"{"rank_and_file": {"Bow": 5, "Crossbow": 10, "Broken": "x", "Debt": -3}}"#,
        )
        .expect("table should parse");
        let prices = table.for_role(ROLE_RANK_AND_FILE);
        assert_eq!(prices.get("bow"), Some(&5.0));
        assert_eq!(prices.get("crossbow"), Some(&10.0));
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn missing_role_falls_back_to_rank_and_file() {
        let table = PriceTable::from_json_str(r#"{"rank_and_file": {"shield": 1}}"#)
            .expect("table should parse");
        assert_eq!(table.for_role(ROLE_CHARACTER).get("shield"), Some(&1.0));
    }

    #[test]
    fn no_roles_at_all_yields_empty_lookup() {
        let table = PriceTable::from_json_str("{}").expect("table should parse");
        assert!(table.for_role(ROLE_CHARACTER).is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn non_object_table_is_rejected() {
        let err = PriceTable::from_json_str("[1]").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn missing_file_gives_empty_table_and_notice() {
        let (table, notice) = load_price_table("no/such/equipment.json", "equipment");
        assert_eq!(table, PriceTable::empty());
        assert!(notice.expect("notice expected").contains("not found"));
    }
}
