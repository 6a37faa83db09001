// 🗃️ Inventory Store - ordered in-memory collection of records
// Linear scan everywhere; insertion order is preserved unless a sorted copy is asked for.

use crate::error::{InventoryError, Result};
use crate::record::{Record, RecordUpdate};
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// DUPLICATE POLICY
// ============================================================================

/// What `add` does when a record with the same name is already present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with `InventoryError::Duplicate`
    #[default]
    Reject,
    /// Overwrite the existing record in place (keeps its position)
    Replace,
    /// Append anyway; lookups return the first match
    Allow,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::Reject => "reject",
            DuplicatePolicy::Replace => "replace",
            DuplicatePolicy::Allow => "allow",
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(DuplicatePolicy::Reject),
            "replace" => Ok(DuplicatePolicy::Replace),
            "allow" => Ok(DuplicatePolicy::Allow),
            other => Err(InventoryError::Config(format!(
                "unknown duplicate policy '{}' (expected reject, replace or allow)",
                other
            ))),
        }
    }
}

// ============================================================================
// INVENTORY
// ============================================================================

/// The store. Owns its records exclusively; callers get copies or borrows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    records: Vec<Record>,
    policy: DuplicatePolicy,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Inventory {
            records: Vec::new(),
            policy,
        }
    }

    /// Build a store by adding each record in order (same checks as `add`)
    pub fn from_records(records: Vec<Record>, policy: DuplicatePolicy) -> Result<Self> {
        let mut inventory = Inventory::with_policy(policy);
        for record in records {
            inventory.add(record)?;
        }
        Ok(inventory)
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }

    /// Append a record, subject to validation and the duplicate policy.
    /// The stored copy is normalized (trimmed name, price in whole cents).
    pub fn add(&mut self, record: Record) -> Result<()> {
        let record = record.normalized()?;

        match (self.position(&record.name), self.policy) {
            (Some(_), DuplicatePolicy::Reject) => {
                return Err(InventoryError::Duplicate(record.name));
            }
            (Some(index), DuplicatePolicy::Replace) => {
                debug!(item = %record.name, index, "replacing existing record");
                self.records[index] = record;
                return Ok(());
            }
            (Some(_), DuplicatePolicy::Allow) | (None, _) => {}
        }

        debug!(item = %record.name, "adding record");
        self.records.push(record);
        Ok(())
    }

    /// Delete the first record whose name matches exactly (case-sensitive)
    pub fn remove(&mut self, name: &str) -> Result<Record> {
        let index = self
            .position(name)
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))?;
        debug!(item = name, index, "removing record");
        Ok(self.records.remove(index))
    }

    /// Overwrite the supplied subset of fields on the first matching record
    pub fn update(&mut self, name: &str, fields: &RecordUpdate) -> Result<&Record> {
        let index = self
            .position(name)
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))?;

        // Apply on a copy so a rejected price leaves the record untouched
        let mut updated = self.records[index].clone();
        updated.apply(fields)?;
        debug!(item = name, ?fields, "updating record");
        self.records[index] = updated;
        Ok(&self.records[index])
    }

    /// First record with this exact name
    pub fn find(&self, name: &str) -> Result<&Record> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))
    }

    /// Case-insensitive substring match on names
    pub fn search(&self, query: &str) -> Vec<Record> {
        let needle = query.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Snapshot of the full collection in current order
    pub fn list_all(&self) -> Vec<Record> {
        self.records.clone()
    }

    /// Copy sorted ascending by expiration date; ties keep insertion order
    pub fn sort_by_expiration(&self) -> Vec<Record> {
        let mut sorted = self.records.clone();
        // slice::sort_by_key is stable
        sorted.sort_by_key(|r| r.expiration_date);
        sorted
    }

    /// Records whose expiration date is strictly before `as_of`
    pub fn expired(&self, as_of: NaiveDate) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| r.is_expired(as_of))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Inventory {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(name: &str, quantity: u32, exp: NaiveDate, price: f64) -> Record {
        Record::new(name, quantity, exp, price).unwrap()
    }

    fn laptop() -> Record {
        record("Laptop", 10, date(2024, 12, 31), 999.99)
    }

    fn mouse() -> Record {
        record("Mouse", 50, date(2025, 1, 15), 19.99)
    }

    #[test]
    fn test_add_then_find_round_trip() {
        let mut inv = Inventory::new();
        inv.add(laptop()).unwrap();

        assert_eq!(inv.find("Laptop").unwrap(), &laptop());
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn test_laptop_mouse_scenario() {
        let mut inv = Inventory::new();
        inv.add(laptop()).unwrap();
        inv.add(mouse()).unwrap();

        let sorted: Vec<_> = inv
            .sort_by_expiration()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(sorted, vec!["Laptop", "Mouse"]);

        let expired = inv.expired(date(2025, 6, 1));
        assert_eq!(expired.len(), 2);

        inv.remove("Laptop").unwrap();
        assert!(matches!(
            inv.find("Laptop"),
            Err(InventoryError::NotFound(name)) if name == "Laptop"
        ));

        println!("✅ Laptop/Mouse scenario PASSED");
    }

    #[test]
    fn test_add_rejects_invalid_record() {
        let mut inv = Inventory::new();
        let mut bad = laptop();
        bad.price = -1.0;
        assert!(inv.add(bad).unwrap_err().is_validation());

        let mut blank = mouse();
        blank.name = "   ".to_string();
        assert!(inv.add(blank).unwrap_err().is_validation());
        assert!(inv.is_empty());
    }

    #[test]
    fn test_add_stores_normalized_record() {
        let mut inv = Inventory::new();
        inv.add(Record {
            name: " Gum ".to_string(),
            quantity: 1,
            expiration_date: date(2025, 1, 1),
            price: 1.234,
        })
        .unwrap();

        let gum = inv.find("Gum").unwrap();
        assert_eq!(gum.price, 1.23);

        let mut untrimmed = laptop();
        inv.add(laptop()).unwrap();
        untrimmed.name = "Laptop  ".to_string();
        assert!(matches!(
            inv.add(untrimmed),
            Err(InventoryError::Duplicate(name)) if name == "Laptop"
        ));
    }

    #[test]
    fn test_duplicate_policies() {
        let newer = record("Laptop", 3, date(2026, 1, 1), 799.0);

        let mut reject = Inventory::with_policy(DuplicatePolicy::Reject);
        reject.add(laptop()).unwrap();
        assert!(matches!(
            reject.add(newer.clone()),
            Err(InventoryError::Duplicate(_))
        ));
        assert_eq!(reject.find("Laptop").unwrap().quantity, 10);

        let mut replace = Inventory::with_policy(DuplicatePolicy::Replace);
        replace.add(laptop()).unwrap();
        replace.add(mouse()).unwrap();
        replace.add(newer.clone()).unwrap();
        assert_eq!(replace.len(), 2);
        assert_eq!(replace.list_all()[0], newer);

        let mut allow = Inventory::with_policy(DuplicatePolicy::Allow);
        allow.add(laptop()).unwrap();
        allow.add(newer.clone()).unwrap();
        assert_eq!(allow.len(), 2);
        assert_eq!(allow.find("Laptop").unwrap().quantity, 10);
        allow.remove("Laptop").unwrap();
        assert_eq!(allow.find("Laptop").unwrap(), &newer);
    }

    #[test]
    fn test_remove_is_case_sensitive() {
        let mut inv = Inventory::new();
        inv.add(laptop()).unwrap();

        assert!(matches!(
            inv.remove("laptop"),
            Err(InventoryError::NotFound(_))
        ));
        assert_eq!(inv.remove("Laptop").unwrap(), laptop());
        assert!(inv.is_empty());
    }

    #[test]
    fn test_update_partial_fields() {
        let mut inv = Inventory::new();
        inv.add(laptop()).unwrap();

        let updated = inv
            .update("Laptop", &RecordUpdate::default().with_quantity(7))
            .unwrap()
            .clone();
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.price, 999.99);
        assert_eq!(updated.expiration_date, date(2024, 12, 31));

        assert!(matches!(
            inv.update("Tablet", &RecordUpdate::default().with_quantity(1)),
            Err(InventoryError::NotFound(_))
        ));

        let err = inv
            .update(
                "Laptop",
                &RecordUpdate::default().with_quantity(1).with_price(-5.0),
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(inv.find("Laptop").unwrap().quantity, 7);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut inv = Inventory::new();
        inv.add(laptop()).unwrap();
        inv.add(mouse()).unwrap();
        inv.add(record("Mousepad", 5, date(2027, 1, 1), 4.5)).unwrap();

        let names: Vec<_> = inv.search("MOUSE").into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Mouse", "Mousepad"]);
        assert!(inv.search("tablet").is_empty());
    }

    #[test]
    fn test_list_all_is_a_snapshot() {
        let mut inv = Inventory::new();
        inv.add(laptop()).unwrap();
        let snapshot = inv.list_all();
        inv.remove("Laptop").unwrap();
        assert_eq!(snapshot, vec![laptop()]);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Replace".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Replace);
        assert_eq!(" allow ".parse::<DuplicatePolicy>().unwrap(), DuplicatePolicy::Allow);
        assert!(matches!(
            "merge".parse::<DuplicatePolicy>(),
            Err(InventoryError::Config(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_sort_by_expiration_is_stable(days in proptest::collection::vec(0i64..10, 0..40)) {
            let base = date(2025, 1, 1);
            let records: Vec<Record> = days
                .iter()
                .enumerate()
                .map(|(i, d)| record(&format!("item-{}", i), 1, base + chrono::Duration::days(*d), 1.0))
                .collect();
            let inv = Inventory::from_records(records, DuplicatePolicy::Reject).unwrap();

            let sorted = inv.sort_by_expiration();
            prop_assert_eq!(sorted.len(), inv.len());
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].expiration_date <= pair[1].expiration_date);
                if pair[0].expiration_date == pair[1].expiration_date {
                    let a: usize = pair[0].name[5..].parse().unwrap();
                    let b: usize = pair[1].name[5..].parse().unwrap();
                    prop_assert!(a < b, "tie order broken: {} before {}", a, b);
                }
            }
        }

        #[test]
        fn prop_expired_is_exact_subset(
            days in proptest::collection::vec(-50i64..50, 0..40),
            cutoff in -60i64..60,
        ) {
            let base = date(2025, 6, 1);
            let records: Vec<Record> = days
                .iter()
                .enumerate()
                .map(|(i, d)| record(&format!("item-{}", i), 1, base + chrono::Duration::days(*d), 1.0))
                .collect();
            let inv = Inventory::from_records(records.clone(), DuplicatePolicy::Reject).unwrap();
            let as_of = base + chrono::Duration::days(cutoff);

            let expected: Vec<Record> = records
                .into_iter()
                .filter(|r| r.expiration_date < as_of)
                .collect();
            prop_assert_eq!(inv.expired(as_of), expected);
        }
    }
}
