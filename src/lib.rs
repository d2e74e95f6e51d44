// Vendor Directory - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod metadata;
pub mod records;
pub mod search;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use config::{AppConfig, StoreConfig};
pub use error::{DirectoryError, Result};
pub use export::{export_vendors_csv, write_vendors_csv};
pub use import::{normalize_source_url, FetchedPage, PageFetcher, VendorDraft};
pub use metadata::{extract_metadata, PageMetadata};
pub use records::{
    FacultyForm, FacultyRecord, ManualVendorForm, VendorForm, VendorRecord, SOURCE_MANUAL,
};
pub use search::{filter_records, search, SearchFilters, SearchPage};
pub use store::{Record, RecordIter, RecordKind, RecordStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
