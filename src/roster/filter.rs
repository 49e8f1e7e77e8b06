use serde::{Deserialize, Serialize};

use crate::data::record::UnitModelRecord;

/// Selection over the roster. Groups combine with AND; values inside a group with OR; an
/// empty group does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterFilter {
    pub factions: Vec<String>,
    pub org_slots: Vec<String>,
    pub troop_types: Vec<String>,
    /// Rule or gear names; a record matches when any term occurs in its rules, default
    /// equipment or optional upgrades.
    pub search_terms: Vec<String>,
    pub show_champions: bool,
}

impl RosterFilter {
    pub fn matches(&self, record: &UnitModelRecord) -> bool {
        if !self.show_champions && record.is_champion() {
            return false;
        }
        if !in_group(&self.factions, &record.faction)
            || !in_group(&self.org_slots, &record.org_slot)
            || !in_group(&self.troop_types, &record.troop_type)
        {
            return false;
        }
        if self.search_terms.is_empty() {
            return true;
        }
        let texts = [
            record.rules_text(),
            record.equipment_text(),
            record.upgrades_text(),
        ];
        self.search_terms
            .iter()
            .any(|term| texts.iter().any(|text| text.contains(term.as_str())))
    }

    /// Matching records sorted by faction, org slot, then name.
    pub fn apply<'a>(&self, records: &'a [UnitModelRecord]) -> Vec<&'a UnitModelRecord> {
        let mut selected: Vec<&UnitModelRecord> =
            records.iter().filter(|r| self.matches(r)).collect();
        selected.sort_by(|a, b| {
            a.faction
                .cmp(&b.faction)
                .then_with(|| a.org_slot.cmp(&b.org_slot))
                .then_with(|| a.name.cmp(&b.name))
        });
        selected
    }
}

fn in_group(group: &[String], value: &str) -> bool {
    group.is_empty() || group.iter().any(|g| g == value)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::data::record::StatLine;

    use super::*;

    fn record(faction: &str, name: &str, slot: &str, role: &str, rules: &[&str]) -> UnitModelRecord {
        UnitModelRecord {
            faction: faction.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            org_slot: slot.to_string(),
            points: 10,
            troop_type: "Infantry".to_string(),
            rules: rules.iter().map(|s| s.to_string()).collect(),
            default_equipment: BTreeSet::from(["Hand weapon".to_string()]),
            optional_upgrades: BTreeSet::from(["Lance".to_string()]),
            stats: StatLine::default(),
        }
    }

    fn roster() -> Vec<UnitModelRecord> {
        vec![
            record("Tomb Kings", "Skeleton Warriors", "Core", "rank_and_file", &["Nehekharan Undead"]),
            record("Empire", "Knights", "Special", "rank_and_file", &["Fly"]),
            record("Empire", "Champion - Knights", "Special", "champion", &[]),
            record("Empire", "Archers", "Core", "rank_and_file", &[]),
        ]
    }

    #[test]
    fn default_filter_hides_champions_and_sorts() {
        let records = roster();
        let names: Vec<&str> = RosterFilter::default()
            .apply(&records)
            .into_iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Archers", "Knights", "Skeleton Warriors"]);
    }

    #[test]
    fn groups_combine() {
        let records = roster();
        let filter = RosterFilter {
            factions: vec!["Empire".to_string()],
            org_slots: vec!["Special".to_string()],
            show_champions: true,
            ..RosterFilter::default()
        };
        assert_eq!(filter.apply(&records).len(), 2);
    }

    #[test]
    fn search_terms_match_rules_or_gear() {
        let records = roster();
        let by_rule = RosterFilter {
            search_terms: vec!["Fly".to_string(), "Nehekharan".to_string()],
            ..RosterFilter::default()
        };
        assert_eq!(by_rule.apply(&records).len(), 2);

        let by_upgrade = RosterFilter {
            search_terms: vec!["Lance".to_string()],
            ..RosterFilter::default()
        };
        assert_eq!(by_upgrade.apply(&records).len(), 3);
    }
}
