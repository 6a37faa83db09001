// ⚙️ Configuration - file locations and store policy
// Defaults match the classic layout: warehouse_inventory.csv + inventory_report.pdf in the cwd.

use crate::error::{InventoryError, Result};
use crate::faker::DEFAULT_RECORDS;
use crate::store::DuplicatePolicy;
use std::path::PathBuf;

pub const DEFAULT_DATA_FILE: &str = "warehouse_inventory.csv";
pub const DEFAULT_PDF_FILE: &str = "inventory_report.pdf";

pub const ENV_DATA_FILE: &str = "INVENTORY_FILE";
pub const ENV_PDF_FILE: &str = "INVENTORY_PDF";
pub const ENV_DUPLICATES: &str = "INVENTORY_DUPLICATES";
pub const ENV_FAKE_RECORDS: &str = "INVENTORY_FAKE_RECORDS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// CSV file the shell loads on start and saves after each change
    pub data_file: PathBuf,
    /// Target of "Export Full Report to PDF"
    pub pdf_file: PathBuf,
    pub duplicate_policy: DuplicatePolicy,
    /// Default record count for `generate`
    pub fake_records: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            pdf_file: PathBuf::from(DEFAULT_PDF_FILE),
            duplicate_policy: DuplicatePolicy::default(),
            fake_records: DEFAULT_RECORDS,
        }
    }
}

impl Config {
    /// Defaults overridden by `INVENTORY_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but with an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DATA_FILE) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(path) = get(ENV_PDF_FILE) {
            config.pdf_file = PathBuf::from(path);
        }
        if let Some(policy) = get(ENV_DUPLICATES) {
            config.duplicate_policy = policy.parse()?;
        }
        if let Some(count) = get(ENV_FAKE_RECORDS) {
            config.fake_records = count.trim().parse().map_err(|_| {
                InventoryError::Config(format!(
                    "{} must be a non-negative whole number, got '{}'",
                    ENV_FAKE_RECORDS, count
                ))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.data_file, PathBuf::from("warehouse_inventory.csv"));
        assert_eq!(config.pdf_file, PathBuf::from("inventory_report.pdf"));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.fake_records, 100);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("INVENTORY_FILE", "/tmp/stock.csv"),
            ("INVENTORY_PDF", "out.pdf"),
            ("INVENTORY_DUPLICATES", "replace"),
            ("INVENTORY_FAKE_RECORDS", "25"),
        ]))
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/stock.csv"));
        assert_eq!(config.pdf_file, PathBuf::from("out.pdf"));
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
        assert_eq!(config.fake_records, 25);
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[("INVENTORY_FILE", "  ")])).unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("INVENTORY_DUPLICATES", "merge")])),
            Err(InventoryError::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("INVENTORY_FAKE_RECORDS", "-1")])),
            Err(InventoryError::Config(_))
        ));
    }
}
