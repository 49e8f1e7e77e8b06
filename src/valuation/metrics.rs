//! Combat value and efficiency scores. All pure functions of a record, its attribution and
//! the current weights; callers recompute them whenever weights or tables change.

use serde::Serialize;

use crate::config::StatWeights;
use crate::data::price_table::PriceTables;
use crate::data::record::{StatLine, UnitModelRecord};
use crate::valuation::attribution::{compute_attribution_with, AttributionResult, ExclusionTable};

const ATTACK_WEIGHT: f64 = 2.0;
const DISPLAY_SCORE_CAP: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub gear_value: f64,
    pub rules_value: f64,
    pub naked_points: f64,
    pub combat_value: f64,
    /// Combat value per listed point; 0 when the model is free.
    pub efficiency: f64,
    /// Combat value per naked point.
    pub true_efficiency: f64,
    pub offense_score: f64,
    pub defense_score: f64,
    /// Offense plus defense, floored and capped at 100. Display only.
    pub display_score: u32,
}

/// A record with its metrics for the current weights and tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuedRecord {
    #[serde(flatten)]
    pub record: UnitModelRecord,
    pub metrics: DerivedMetrics,
}

pub fn combat_value(stats: &StatLine, weights: &StatWeights) -> f64 {
    f64::from(stats.ws) * weights.w_ws
        + f64::from(stats.s) * weights.w_s
        + f64::from(stats.t) * weights.w_t
        + f64::from(stats.w) * weights.w_w
        + f64::from(stats.a) * ATTACK_WEIGHT
}

/// `naked_points` is at least 1 by construction, so this is always finite.
pub fn true_efficiency(combat_value: f64, naked_points: f64) -> f64 {
    combat_value / naked_points
}

pub fn raw_efficiency(combat_value: f64, points: u32) -> f64 {
    let ratio = combat_value / f64::from(points);
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

pub fn offense_score(stats: &StatLine) -> f64 {
    f64::from(stats.a) * f64::from(stats.ws) + f64::from(stats.s) * 1.5
}

pub fn defense_score(stats: &StatLine) -> f64 {
    f64::from(stats.t) * 1.5 + f64::from(stats.w) * 2.0
}

pub fn display_score(stats: &StatLine) -> u32 {
    let total = (offense_score(stats) + defense_score(stats)).floor();
    if total >= f64::from(DISPLAY_SCORE_CAP) {
        DISPLAY_SCORE_CAP
    } else {
        total as u32
    }
}

pub fn derive_metrics(
    record: &UnitModelRecord,
    attribution: AttributionResult,
    weights: &StatWeights,
) -> DerivedMetrics {
    let naked_points = attribution.naked_points(f64::from(record.points));
    let combat_value = combat_value(&record.stats, weights);
    DerivedMetrics {
        gear_value: attribution.gear_value,
        rules_value: attribution.rules_value,
        naked_points,
        combat_value,
        efficiency: raw_efficiency(combat_value, record.points),
        true_efficiency: true_efficiency(combat_value, naked_points),
        offense_score: offense_score(&record.stats),
        defense_score: defense_score(&record.stats),
        display_score: display_score(&record.stats),
    }
}

pub fn value_record(
    record: &UnitModelRecord,
    tables: &PriceTables,
    exclusions: &ExclusionTable,
    weights: &StatWeights,
) -> ValuedRecord {
    let attribution = compute_attribution_with(record, &tables.equipment, &tables.rules, exclusions);
    ValuedRecord {
        record: record.clone(),
        metrics: derive_metrics(record, attribution, weights),
    }
}

/// Fresh valued copies of `records`, in the same order. Nothing is mutated.
pub fn enrich(
    records: &[UnitModelRecord],
    tables: &PriceTables,
    weights: &StatWeights,
) -> Vec<ValuedRecord> {
    let exclusions = ExclusionTable::default();
    records
        .iter()
        .map(|record| value_record(record, tables, &exclusions, weights))
        .collect()
}
