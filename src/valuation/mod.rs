pub mod attribution;
pub mod metrics;
pub mod ranking;

pub use attribution::{
    compute_attribution, compute_attribution_with, explain_attribution, role_key,
    AttributionBreakdown, AttributionResult, ExclusionTable, MatchedItem,
};
pub use metrics::{
    combat_value, defense_score, derive_metrics, display_score, enrich, offense_score,
    raw_efficiency, true_efficiency, value_record, DerivedMetrics, ValuedRecord,
};
pub use ranking::{rank_by_true_efficiency, top_by_true_efficiency};
