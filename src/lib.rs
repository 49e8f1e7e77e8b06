//! Unit valuation for tabletop-wargame rosters.
//!
//! Faction documents are flattened into [`data::UnitModelRecord`]s, priced against
//! equipment and rule tables by [`valuation::compute_attribution`], and scored by
//! [`valuation::derive_metrics`]. The CLI and JSON API are thin consumers of these.

pub mod cli;
pub mod config;
pub mod data;
pub mod roster;
pub mod server;
pub mod valuation;
