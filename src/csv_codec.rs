// 📄 CSV Codec - warehouse_inventory.csv <-> Inventory
// Whole-file save (truncate + rewrite) and a forgiving load that skips bad rows.

use crate::error::{InventoryError, Result};
use crate::record::Record;
use crate::store::{DuplicatePolicy, Inventory};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{info, warn};

/// Column order written by `save`
pub const HEADER: [&str; 4] = ["name", "quantity", "expiration_date", "price"];

/// Older exports named the key column `item`
const NAME_ALIAS: &str = "item";

// ============================================================================
// ROW + REPORT TYPES
// ============================================================================

/// Text form of one CSV row. Parsing into a `Record` happens separately so a
/// bad field only costs that row.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(alias = "item")]
    name: String,
    quantity: String,
    expiration_date: String,
    price: String,
}

impl From<&Record> for CsvRow {
    fn from(record: &Record) -> Self {
        CsvRow {
            name: record.name.clone(),
            quantity: record.quantity.to_string(),
            expiration_date: record.date_text(),
            price: record.price_text(),
        }
    }
}

/// A row that `load` dropped
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Outcome of a load: how many rows made it in and which were skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

// ============================================================================
// SAVE
// ============================================================================

/// Write header + one row per record; replaces whatever was at `path`
pub fn save(inventory: &Inventory, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| InventoryError::io(path, e))?;
    write_to(inventory, file).map_err(|e| attach_path(e, path))?;
    info!(path = %path.display(), records = inventory.len(), "saved inventory");
    Ok(())
}

/// Serialize to any writer (the file is one case)
pub fn write_to<W: Write>(inventory: &Inventory, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    // Header written explicitly so an empty inventory still gets one
    wtr.write_record(HEADER)?;
    for record in inventory {
        wtr.serialize(CsvRow::from(record))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

// ============================================================================
// LOAD
// ============================================================================

/// Read `path` into a new store. Missing columns abort; bad rows are skipped.
pub fn load(path: &Path, policy: DuplicatePolicy) -> Result<(Inventory, LoadReport)> {
    let file = File::open(path).map_err(|e| InventoryError::io(path, e))?;
    let (inventory, report) = read_from(file, policy).map_err(|e| attach_path(e, path))?;

    info!(
        path = %path.display(),
        policy = policy.as_str(),
        loaded = report.loaded,
        skipped = report.skipped.len(),
        "loaded inventory"
    );
    Ok((inventory, report))
}

/// Like `load`, but a file that does not exist yet gives an empty store
pub fn load_or_empty(path: &Path, policy: DuplicatePolicy) -> Result<(Inventory, LoadReport)> {
    match load(path, policy) {
        Err(InventoryError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no inventory file yet, starting empty");
            Ok((Inventory::with_policy(policy), LoadReport::default()))
        }
        other => other,
    }
}

/// Parse CSV from any reader
pub fn read_from<R: Read>(reader: R, policy: DuplicatePolicy) -> Result<(Inventory, LoadReport)> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut inventory = Inventory::with_policy(policy);
    let mut report = LoadReport::default();

    // Zero-byte file: nothing saved yet
    if headers.is_empty() {
        return Ok((inventory, report));
    }
    check_header(&headers)?;

    for result in rdr.records() {
        let (line, outcome) = match result {
            Ok(row) => {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                let outcome = parse_row(&row, &headers).and_then(|record| inventory.add(record));
                (line, outcome.map_err(|e| e.to_string()))
            }
            // A failing reader is a file-level problem, not a bad row
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => (
                e.position().map(|p| p.line()).unwrap_or_default(),
                Err(e.to_string()),
            ),
        };

        match outcome {
            Ok(()) => report.loaded += 1,
            Err(reason) => {
                warn!(line, %reason, "skipping malformed inventory row");
                report.skipped.push(SkippedRow { line, reason });
            }
        }
    }

    Ok((inventory, report))
}

fn parse_row(row: &csv::StringRecord, headers: &csv::StringRecord) -> Result<Record> {
    let row: CsvRow = row.deserialize(Some(headers))?;
    Record::parse(&row.name, &row.quantity, &row.expiration_date, &row.price)
}

fn check_header(headers: &csv::StringRecord) -> Result<()> {
    let has = |column: &str| headers.iter().any(|h| h == column);

    for column in HEADER {
        let present = has(column) || (column == "name" && has(NAME_ALIAS));
        if !present {
            return Err(InventoryError::MissingColumn(column));
        }
    }
    Ok(())
}

// csv reports file failures as its own error type; surface them as Io with the path
fn attach_path(err: InventoryError, path: &Path) -> InventoryError {
    match err {
        InventoryError::Csv(e) if e.is_io_error() => {
            InventoryError::io(path, io::Error::new(io::ErrorKind::Other, e))
        }
        other => other,
    }
}
