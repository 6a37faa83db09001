// 🎲 Fake inventory generator - synthetic records for demos and load testing
// Written through the same CSV codec as real data.

use crate::csv_codec;
use crate::error::Result;
use crate::record::{round_cents, Record};
use crate::store::{DuplicatePolicy, Inventory};
use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

pub const DEFAULT_RECORDS: usize = 100;

/// Expiration dates land within this many days either side of today
const EXPIRY_SPREAD_DAYS: i64 = 365;

const WORDS: &[&str] = &[
    "anchor", "apron", "basket", "battery", "beacon", "blanket", "bolt", "bottle", "bracket",
    "bucket", "cable", "candle", "canvas", "carton", "chisel", "clamp", "coffee", "compass",
    "crate", "cushion", "drill", "filter", "flask", "gasket", "glove", "hammer", "helmet",
    "hinge", "hose", "jacket", "kettle", "ladder", "lantern", "lens", "marker", "mallet",
    "napkin", "needle", "notebook", "oil", "paint", "pallet", "pencil", "pliers", "pump",
    "rope", "ruler", "sanitizer", "scissors", "sealant", "sensor", "shovel", "soap", "sponge",
    "stapler", "switch", "tape", "thermos", "tissue", "toner", "towel", "trowel", "valve",
    "vinegar", "washer", "whistle", "wrench", "yarn", "yeast", "zipper",
];

/// `count` records with unique capitalized names, random stock, dates and prices
pub fn generate<R: Rng + ?Sized>(count: usize, rng: &mut R, today: NaiveDate) -> Vec<Record> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(count);

    while records.len() < count {
        let word = WORDS.choose(rng).copied().unwrap_or("item");
        let name = unique_name(&capitalize(word), &mut seen);

        let quantity = rng.gen_range(1..=100);
        let offset = rng.gen_range(-EXPIRY_SPREAD_DAYS..=EXPIRY_SPREAD_DAYS);
        let expiration_date = today + Duration::days(offset);
        let price = round_cents(rng.gen_range(1.0..100.0));

        // Values above are in range by construction; skip anything that slips through
        if let Ok(record) = Record::new(&name, quantity, expiration_date, price) {
            records.push(record);
        }
    }

    records
}

/// Generate and save `count` records to `path`, replacing the file
pub fn write_fake_inventory(count: usize, path: &Path, today: NaiveDate) -> Result<Inventory> {
    let records = generate(count, &mut rand::thread_rng(), today);
    let inventory = Inventory::from_records(records, DuplicatePolicy::Reject)?;
    csv_codec::save(&inventory, path)?;
    info!(path = %path.display(), count, "generated fake inventory");
    Ok(inventory)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// "Hammer", "Hammer 2", "Hammer 3", ...
fn unique_name(base: &str, seen: &mut HashSet<String>) -> String {
    let mut candidate = base.to_string();
    let mut n = 1;
    while !seen.insert(candidate.clone()) {
        n += 1;
        candidate = format!("{} {}", base, n);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_generated_fields_are_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let records = generate(500, &mut rng, today());

        assert_eq!(records.len(), 500);
        for r in &records {
            assert!((1..=100).contains(&r.quantity));
            assert!((1.0..=100.0).contains(&r.price));
            assert_eq!(r.price, round_cents(r.price));
            let days = (r.expiration_date - today()).num_days();
            assert!((-365..=365).contains(&days));
            assert!(r.name.chars().next().unwrap().is_uppercase());
        }
    }

    #[test]
    fn test_generated_names_are_unique() {
        let mut rng = StdRng::seed_from_u64(42);
        let records = generate(300, &mut rng, today());

        let names: HashSet<_> = records.iter().map(|r| r.name.clone()).collect();
        assert_eq!(names.len(), 300);
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(20, &mut StdRng::seed_from_u64(1), today());
        let b = generate(20, &mut StdRng::seed_from_u64(1), today());
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_fake_inventory_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("warehouse_inventory.csv");

        let written = write_fake_inventory(DEFAULT_RECORDS, &path, today()).unwrap();
        let (loaded, report) = csv_codec::load(&path, DuplicatePolicy::Reject).unwrap();

        assert!(report.is_clean());
        assert_eq!(loaded.len(), DEFAULT_RECORDS);
        assert_eq!(loaded.list_all(), written.list_all());
    }

    #[test]
    fn test_unique_name_suffixes() {
        let mut seen = HashSet::new();
        assert_eq!(unique_name("Tape", &mut seen), "Tape");
        assert_eq!(unique_name("Tape", &mut seen), "Tape 2");
        assert_eq!(unique_name("Tape", &mut seen), "Tape 3");
        assert_eq!(capitalize("hammer"), "Hammer");
    }
}
