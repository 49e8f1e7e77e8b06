//! Faction document schema (one JSON file per faction).
//!
//! Structural fields (`units`, `models`, rule lists) are typed; anything numeric is kept as
//! raw JSON so that `"4+"`, `"-"` or `null` coerce later instead of rejecting the file.
//! List elements that do not fit their entry type are dropped one by one, so a stray value
//! only costs its own entry.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::data::record::is_truthy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactionDocument {
    #[serde(default)]
    pub faction_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub units: Vec<UnitEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitEntry {
    /// Org slot, e.g. "Characters", "Core", "Special".
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub base_points: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub rules: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub upgrades: Vec<UpgradeEntry>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub models: Vec<ModelEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpgradeEntry {
    #[serde(default)]
    pub name: Option<String>,
    /// Any truthy value marks the upgrade as included; `1` and `"yes"` occur in the wild.
    #[serde(default)]
    pub is_default: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub cost: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub rules: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub default_weapons: Vec<String>,
    /// Profile keyed by characteristic: M, WS, BS, S, T, W, I, A, Ld/LD, plus `Type`.
    #[serde(default)]
    pub stats: HashMap<String, Value>,
}

impl UpgradeEntry {
    pub fn is_default(&self) -> bool {
        self.is_default.as_ref().is_some_and(is_truthy)
    }
}

impl UnitEntry {
    /// Names of upgrades the unit comes with.
    pub fn default_upgrade_names(&self) -> impl Iterator<Item = &str> {
        self.upgrades
            .iter()
            .filter(|u| u.is_default())
            .filter_map(|u| u.name.as_deref())
    }

    /// Names of upgrades that cost extra.
    pub fn optional_upgrade_names(&self) -> impl Iterator<Item = &str> {
        self.upgrades
            .iter()
            .filter(|u| !u.is_default())
            .filter_map(|u| u.name.as_deref())
    }
}

/// A JSON array whose elements are kept only when they deserialize as `T`. `null` reads as
/// an empty list; any other non-array value is still a schema error.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "dropping malformed list entry");
                None
            }
        })
        .collect())
}
