//! Queries the presentation layer runs over a loaded dataset.

pub mod facets;
pub mod filter;

pub use facets::{is_renegade, Facets, RENEGADE_KEYWORDS};
pub use filter::RosterFilter;
