// Warehouse Inventory - Core Library
// Record store + CSV persistence, reports, PDF export and fake data for the CLI and tests

pub mod error;
pub mod record;
pub mod store;
pub mod csv_codec;
pub mod report;
pub mod pdf;
pub mod faker;
pub mod config;
pub mod logging;
pub mod shell;

// Re-export commonly used types
pub use error::{InventoryError, Result};
pub use record::{
    Record, RecordUpdate,
    parse_name, parse_quantity, parse_date, parse_price,
    DATE_FORMAT, MAX_PRICE,
};
pub use store::{Inventory, DuplicatePolicy};
pub use csv_codec::{LoadReport, SkippedRow, load, load_or_empty, save};
pub use report::{Summary, full_report, expired_report, search_report, render_table};
pub use config::Config;
pub use shell::{Session, Shell, MenuChoice};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
