//! Classification, filtering and tagging for FarmSeva sheet records.
//!
//! Rows from government scheme and disease outbreak sheets are turned into
//! derived views: category tags, a domain filter, location relevance flags and
//! item lists parsed from free-text fields. Every operation is a pure
//! text-in/structured-out transform.

pub mod classify;
pub mod config;
pub mod contacts;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod lists;
pub mod location;
pub mod processor;
pub mod search;
pub mod selectors;
pub mod store;
pub mod types;

pub use classify::KeywordClassifier;
pub use config::{CardRule, Config, ConfigBuilder, KeywordGroup, RuleScope};
pub use contacts::{ContactFilters, ContactQuery, ContactTab, Rating, VetContact};
pub use error::{Error, Result};
pub use filter::{DomainFilter, FilterAlias, FilterManager, FilterResult, RecordFilter};
pub use lists::{parse_list, parse_measures};
pub use location::{is_relevant, LocationSet};
pub use processor::Processor;
pub use search::{AlertTab, OutbreakQuery, SchemeQuery};
pub use store::{ApplicationStatus, Bookmarks, JsonFileStore, KeyValueStore, MemoryStore};
pub use types::{
    CategoryTag, OutbreakRecord, OutbreakView, Record, SchemeRecord, SchemeView, Severity,
};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::classify::KeywordClassifier;
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{FilterAlias, FilterResult, RecordFilter};
    pub use crate::processor::Processor;
    pub use crate::search::{AlertTab, OutbreakQuery, SchemeQuery};
    pub use crate::types::{CategoryTag, OutbreakView, Record, SchemeView, Severity};
}
