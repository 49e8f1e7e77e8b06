use crate::valuation::metrics::ValuedRecord;

/// Best value first: true efficiency, then raw efficiency, then name.
pub fn rank_by_true_efficiency(mut valued: Vec<ValuedRecord>) -> Vec<ValuedRecord> {
    valued.sort_by(|left, right| {
        right
            .metrics
            .true_efficiency
            .total_cmp(&left.metrics.true_efficiency)
            .then_with(|| right.metrics.efficiency.total_cmp(&left.metrics.efficiency))
            .then_with(|| left.record.name.cmp(&right.record.name))
    });
    valued
}

/// Ranked and cut to `top` entries when given.
pub fn top_by_true_efficiency(valued: Vec<ValuedRecord>, top: Option<usize>) -> Vec<ValuedRecord> {
    let mut ranked = rank_by_true_efficiency(valued);
    if let Some(limit) = top {
        ranked.truncate(limit);
    }
    ranked
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::data::record::{StatLine, UnitModelRecord};
    use crate::valuation::metrics::DerivedMetrics;

    use super::*;

    fn valued(name: &str, true_efficiency: f64, efficiency: f64) -> ValuedRecord {
        ValuedRecord {
            record: UnitModelRecord {
                faction: "Orc & Goblin Tribes".to_string(),
                name: name.to_string(),
                role: "rank_and_file".to_string(),
                org_slot: "Core".to_string(),
                points: 5,
                troop_type: "Infantry".to_string(),
                rules: BTreeSet::new(),
                default_equipment: BTreeSet::new(),
                optional_upgrades: BTreeSet::new(),
                stats: StatLine::default(),
            },
            metrics: DerivedMetrics {
                true_efficiency,
                efficiency,
                ..DerivedMetrics::default()
            },
        }
    }

    #[test]
    fn ranks_descending_with_tie_breaks() {
        let ranked = rank_by_true_efficiency(vec![
            valued("Night Goblins", 2.0, 1.0),
            valued("Orc Boyz", 3.0, 1.0),
            valued("Snotlings", 2.0, 1.5),
            valued("Goblins", 2.0, 1.0),
        ]);
        let names: Vec<&str> = ranked.iter().map(|v| v.record.name.as_str()).collect();
        assert_eq!(names, vec!["Orc Boyz", "Snotlings", "Goblins", "Night Goblins"]);
    }

    #[test]
    fn top_truncates() {
        let ranked = top_by_true_efficiency(
            vec![valued("A", 1.0, 1.0), valued("B", 2.0, 1.0), valued("C", 3.0, 1.0)],
            Some(2),
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].record.name, "C");
    }
}
