// 📊 Text reports - fixed-width tables over a snapshot of records

use crate::record::Record;
use chrono::NaiveDate;
use std::fmt::Write;

const NAME_WIDTH: usize = 20;
const QUANTITY_WIDTH: usize = 10;
const DATE_WIDTH: usize = 20;
const PRICE_WIDTH: usize = 10;

/// Total table width: "|" + columns + " | " separators + "|"
pub const TABLE_WIDTH: usize = 1 + NAME_WIDTH + 3 + QUANTITY_WIDTH + 3 + DATE_WIDTH + 3 + PRICE_WIDTH + 1;

pub const EMPTY_INVENTORY: &str = "No items in the inventory.";
pub const NO_EXPIRED: &str = "No expired items found.";

// ============================================================================
// SUMMARY
// ============================================================================

/// Aggregate figures shown under the full report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub items: usize,
    pub units: u64,
    pub total_value: f64,
    pub expired: usize,
}

impl Summary {
    pub fn of(records: &[Record], as_of: NaiveDate) -> Self {
        records.iter().fold(Summary::default(), |mut s, r| {
            s.items += 1;
            s.units += u64::from(r.quantity);
            s.total_value += r.stock_value();
            if r.is_expired(as_of) {
                s.expired += 1;
            }
            s
        })
    }

    pub fn render(&self) -> String {
        format!(
            "Items: {}  Units: {}  Stock value: {:.2}  Expired: {}",
            self.items, self.units, self.total_value, self.expired
        )
    }
}

// ============================================================================
// TABLES
// ============================================================================

/// Title line, then a bordered table with one row per record
pub fn render_table(title: &str, records: &[Record]) -> String {
    let rule = "-".repeat(TABLE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", title);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "|{:<nw$} | {:<qw$} | {:<dw$} | {:<pw$}|",
        "Item",
        "Quantity",
        "Expiration Date",
        "Price",
        nw = NAME_WIDTH,
        qw = QUANTITY_WIDTH,
        dw = DATE_WIDTH,
        pw = PRICE_WIDTH,
    );
    let _ = writeln!(out, "{}", rule);
    for record in records {
        let _ = writeln!(
            out,
            "|{:<nw$} | {:<qw$} | {:<dw$} | {:<pw$}|",
            truncate(&record.name, NAME_WIDTH),
            record.quantity,
            record.date_text(),
            record.price_text(),
            nw = NAME_WIDTH,
            qw = QUANTITY_WIDTH,
            dw = DATE_WIDTH,
            pw = PRICE_WIDTH,
        );
    }
    let _ = write!(out, "{}", rule);
    out
}

/// Everything, soonest expiration first, followed by the summary line
pub fn full_report(records: &[Record], as_of: NaiveDate) -> String {
    if records.is_empty() {
        return EMPTY_INVENTORY.to_string();
    }
    let mut out = render_table("Full Inventory Report", &sorted_by_expiration(records));
    let _ = write!(out, "\n{}", Summary::of(records, as_of).render());
    out
}

/// Records expired strictly before `as_of`, soonest expiration first
pub fn expired_report(records: &[Record], as_of: NaiveDate) -> String {
    let expired: Vec<Record> = records
        .iter()
        .filter(|r| r.is_expired(as_of))
        .cloned()
        .collect();
    if expired.is_empty() {
        return NO_EXPIRED.to_string();
    }
    render_table("Expired Items", &sorted_by_expiration(&expired))
}

pub fn search_report(query: &str, matches: &[Record]) -> String {
    if matches.is_empty() {
        return format!("No items matching '{}'.", query);
    }
    render_table(&format!("Search Results for '{}'", query), matches)
}

fn sorted_by_expiration(records: &[Record]) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| r.expiration_date);
    sorted
}

/// Char-safe truncation with a trailing "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
