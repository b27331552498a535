mod repository;

pub use repository::*;

/// Ledger file used when no path is configured
pub const DEFAULT_DATA_FILE: &str = "data.json";
