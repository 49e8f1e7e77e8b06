pub mod cache;
pub mod dataset;
pub mod export;
pub mod faction;
pub mod flatten;
pub mod loader;
pub mod price_table;
pub mod record;
pub mod validate;

pub use cache::{DatasetCache, FileStamp, Fingerprint};
pub use dataset::{Dataset, DatasetSummary, LoadReport, SkippedDocument, COLUMNS};
pub use faction::{FactionDocument, ModelEntry, UnitEntry, UpgradeEntry};
pub use flatten::{apply_display_name, flatten_document, flatten_documents};
pub use loader::{
    list_faction_files, load_faction_dir, load_faction_files, parse_faction_document,
    DocumentError, LoadError,
};
pub use price_table::{load_price_table, PriceTable, PriceTableError, PriceTables};
pub use record::{StatLine, UnitModelRecord};
