use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AppConfig, ConfigError, StatWeights};
use crate::data::cache::DatasetCache;
use crate::data::loader::LoadError;
use crate::data::price_table::PriceTables;
use crate::data::record::UnitModelRecord;
use crate::roster::{Facets, RosterFilter};
use crate::valuation::{top_by_true_efficiency, value_record, ExclusionTable, ValuedRecord};

const MAX_TOP: usize = 1_000;

/// Everything a request handler needs. Price tables and default weights are fixed at
/// startup; the dataset is re-read through the cache when the folder changes.
#[derive(Debug)]
pub struct ApiState {
    pub cache: DatasetCache,
    pub tables: PriceTables,
    pub exclusions: ExclusionTable,
    pub weights: StatWeights,
}

impl ApiState {
    pub fn new(cache: DatasetCache, tables: PriceTables, weights: StatWeights) -> Self {
        Self {
            cache,
            tables,
            exclusions: ExclusionTable::default(),
            weights,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            DatasetCache::new(&config.data_dir),
            PriceTables::load(&config.equipment_prices, &config.rule_prices),
            config.weights()?,
        ))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Load(#[from] LoadError),
    #[error("invalid request body: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("{0}")]
    Validation(String),
    #[error("unable to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ValuationRequest {
    pub weights: Option<StatWeights>,
    pub filter: Option<RosterFilter>,
    pub top: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValuationResponse {
    pub status: &'static str,
    pub weights: StatWeights,
    pub count: usize,
    pub notices: Vec<String>,
    pub results: Vec<ValuedRecord>,
}

#[derive(Debug, Clone, Serialize)]
struct UnitsResponse<'a> {
    count: usize,
    columns: &'static [&'static str],
    units: Vec<&'a UnitModelRecord>,
}

pub fn health_payload() -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "warvalue-api",
        "version": env!("CARGO_PKG_VERSION")
    }))?)
}

pub fn dataset_payload(state: &ApiState) -> Result<String, ApiError> {
    let dataset = state.cache.get_or_load()?;
    Ok(serde_json::to_string_pretty(&dataset.summary())?)
}

pub fn units_payload(state: &ApiState, path: &str) -> Result<String, ApiError> {
    let dataset = state.cache.get_or_load()?;
    let filter = filter_from_query(path);
    let units = filter.apply(dataset.records());
    Ok(serde_json::to_string_pretty(&UnitsResponse {
        count: units.len(),
        columns: dataset.columns(),
        units,
    })?)
}

pub fn facets_payload(state: &ApiState) -> Result<String, ApiError> {
    let dataset = state.cache.get_or_load()?;
    let facets = Facets::from_records(dataset.records());
    let official_factions = facets.official_factions();
    let renegade_factions = facets.renegade_factions();
    Ok(serde_json::to_string_pretty(&serde_json::json!({
        "factions": facets.factions,
        "official_factions": official_factions,
        "renegade_factions": renegade_factions,
        "org_slots": facets.org_slots,
        "troop_types": facets.troop_types,
        "search_terms": facets.search_terms,
    }))?)
}

pub fn price_tables_payload(state: &ApiState) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(&state.tables)?)
}

pub fn valuation_payload(state: &ApiState, body: &str) -> Result<String, ApiError> {
    let request: ValuationRequest = if body.trim().is_empty() {
        ValuationRequest::default()
    } else {
        serde_json::from_str(body).map_err(ApiError::Parse)?
    };
    let weights = request.weights.unwrap_or(state.weights);
    weights.validate()?;
    if request.top.is_some_and(|top| top == 0 || top > MAX_TOP) {
        return Err(ApiError::Validation(format!(
            "top must be between 1 and {MAX_TOP}"
        )));
    }

    let dataset = state.cache.get_or_load()?;
    let filter = request.filter.unwrap_or_default();
    let valued: Vec<ValuedRecord> = filter
        .apply(dataset.records())
        .into_iter()
        .map(|record| value_record(record, &state.tables, &state.exclusions, &weights))
        .collect();
    let results = top_by_true_efficiency(valued, request.top);

    Ok(serde_json::to_string_pretty(&ValuationResponse {
        status: "ok",
        weights,
        count: results.len(),
        notices: state.tables.notices.clone(),
        results,
    })?)
}

/// `?faction=Empire&faction=Skaven&slot=Core&type=Infantry&search=Fly&champions=true`
pub fn filter_from_query(path: &str) -> RosterFilter {
    let query = path.split_once('?').map(|(_, q)| q).unwrap_or("");
    let mut filter = RosterFilter::default();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = percent_decode(value);
        match key {
            "faction" => filter.factions.push(value),
            "slot" => filter.org_slots.push(value),
            "type" => filter.troop_types.push(value),
            "search" => filter.search_terms.push(value),
            "champions" => {
                filter.show_champions = value == "1" || value.eq_ignore_ascii_case("true")
            }
            _ => {}
        }
    }
    filter
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi * 16 + lo);
                        i += 2;
                    }
                    _ => out.push(b'%'),
                }
            }
            byte => out.push(byte),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
