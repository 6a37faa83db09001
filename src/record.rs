// 📦 Record - one inventory item
// Typed parse-and-validate for every field; a Record is never built from loose text.

use crate::error::{InventoryError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Date format used in the CSV file and at the prompt
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest accepted price; keeps cent rounding exact in an f64
pub const MAX_PRICE: f64 = 1_000_000_000.0;

// ============================================================================
// RECORD
// ============================================================================

/// One inventory item.
///
/// `name` is the lookup key. `price` is kept rounded to cents so that its
/// two-decimal text form reads back to the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub name: String,
    pub quantity: u32,
    pub expiration_date: NaiveDate,
    pub price: f64,
}

impl Record {
    /// Build a validated record from typed values
    pub fn new(
        name: &str,
        quantity: u32,
        expiration_date: NaiveDate,
        price: f64,
    ) -> Result<Self> {
        Ok(Record {
            name: parse_name(name)?,
            quantity,
            expiration_date,
            price: validate_price(price)?,
        })
    }

    /// Build a validated record from raw text fields (prompt input or a CSV row)
    pub fn parse(name: &str, quantity: &str, expiration_date: &str, price: &str) -> Result<Self> {
        Ok(Record {
            name: parse_name(name)?,
            quantity: parse_quantity(quantity)?,
            expiration_date: parse_date(expiration_date)?,
            price: parse_price(price)?,
        })
    }

    /// Re-run the field checks and return the canonical form: trimmed name,
    /// price rounded to cents. Fields are public, so a struct literal can skip `new`.
    pub fn normalized(mut self) -> Result<Self> {
        self.name = parse_name(&self.name)?;
        self.price = validate_price(self.price)?;
        Ok(self)
    }

    /// Expiration strictly before `as_of`
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        self.expiration_date < as_of
    }

    /// quantity × price
    pub fn stock_value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    /// Price as it is written to CSV and reports
    pub fn price_text(&self) -> String {
        format!("{:.2}", self.price)
    }

    /// Expiration date as `YYYY-MM-DD`
    pub fn date_text(&self) -> String {
        self.expiration_date.format(DATE_FORMAT).to_string()
    }

    /// Overwrite the supplied subset of fields
    pub fn apply(&mut self, update: &RecordUpdate) -> Result<()> {
        if let Some(price) = update.price {
            self.price = validate_price(price)?;
        }
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(date) = update.expiration_date {
            self.expiration_date = date;
        }
        Ok(())
    }
}

// ============================================================================
// PARTIAL UPDATE
// ============================================================================

/// Subset of {quantity, expiration_date, price} to overwrite.
/// `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordUpdate {
    pub quantity: Option<u32>,
    pub expiration_date: Option<NaiveDate>,
    pub price: Option<f64>,
}

impl RecordUpdate {
    /// Parse raw text fields; blank input means "keep current"
    pub fn parse(quantity: &str, expiration_date: &str, price: &str) -> Result<Self> {
        Ok(RecordUpdate {
            quantity: parse_optional(quantity, parse_quantity)?,
            expiration_date: parse_optional(expiration_date, parse_date)?,
            price: parse_optional(price, parse_price)?,
        })
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.quantity.is_none() && self.expiration_date.is_none() && self.price.is_none()
    }
}

// ============================================================================
// FIELD PARSERS
// ============================================================================

/// Non-empty, trimmed
pub fn parse_name(input: &str) -> Result<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(InventoryError::validation("name", "must not be empty"));
    }
    Ok(name.to_string())
}

/// Non-negative whole number
pub fn parse_quantity(input: &str) -> Result<u32> {
    let text = input.trim();
    if text.is_empty() {
        return Err(InventoryError::validation("quantity", "is required"));
    }
    let value: i64 = text.parse().map_err(|_| {
        InventoryError::validation("quantity", format!("'{}' is not a whole number", text))
    })?;
    if value < 0 {
        return Err(InventoryError::validation(
            "quantity",
            format!("must be non-negative, got {}", value),
        ));
    }
    u32::try_from(value).map_err(|_| {
        InventoryError::validation("quantity", format!("{} is too large", value))
    })
}

/// Calendar date in `YYYY-MM-DD`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let text = input.trim();
    if text.is_empty() {
        return Err(InventoryError::validation("expiration_date", "is required"));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| {
        InventoryError::validation(
            "expiration_date",
            format!("'{}' is not a date in YYYY-MM-DD format", text),
        )
    })
}

/// Non-negative decimal, rounded to cents
pub fn parse_price(input: &str) -> Result<f64> {
    let text = input.trim();
    if text.is_empty() {
        return Err(InventoryError::validation("price", "is required"));
    }
    let value: f64 = text.parse().map_err(|_| {
        InventoryError::validation("price", format!("'{}' is not a number", text))
    })?;
    validate_price(value)
}

fn validate_price(value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(InventoryError::validation("price", "must be a finite number"));
    }
    if value < 0.0 {
        return Err(InventoryError::validation(
            "price",
            format!("must be non-negative, got {}", value),
        ));
    }
    if value > MAX_PRICE {
        return Err(InventoryError::validation(
            "price",
            format!("must be at most {}, got {}", MAX_PRICE, value),
        ));
    }
    Ok(round_cents(value))
}

/// Round to two fractional digits
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_optional<T>(input: &str, parse: fn(&str) -> Result<T>) -> Result<Option<T>> {
    if input.trim().is_empty() {
        Ok(None)
    } else {
        parse(input).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_valid_record() {
        let record = Record::parse("  Laptop ", "10", "2024-12-31", "999.99").unwrap();

        assert_eq!(record.name, "Laptop");
        assert_eq!(record.quantity, 10);
        assert_eq!(record.expiration_date, date(2024, 12, 31));
        assert_eq!(record.price, 999.99);
        assert_eq!(record.price_text(), "999.99");
        assert_eq!(record.date_text(), "2024-12-31");
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        let cases = [
            ("", "1", "2024-01-01", "1.00", "name"),
            ("Pen", "-3", "2024-01-01", "1.00", "quantity"),
            ("Pen", "three", "2024-01-01", "1.00", "quantity"),
            ("Pen", "1", "2024-13-01", "1.00", "expiration_date"),
            ("Pen", "1", "31/12/2024", "1.00", "expiration_date"),
            ("Pen", "1", "2024-01-01", "-0.50", "price"),
            ("Pen", "1", "2024-01-01", "NaN", "price"),
            ("Pen", "1", "2024-01-01", "", "price"),
            ("Pen", "1", "2024-01-01", "1e307", "price"),
            ("Pen", "1", "2024-01-01", "1000000000.01", "price"),
        ];

        for (name, qty, exp, price, expected_field) in cases {
            match Record::parse(name, qty, exp, price) {
                Err(InventoryError::Validation { field, .. }) => {
                    assert_eq!(field, expected_field, "input {:?}", (name, qty, exp, price))
                }
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_price_is_rounded_to_cents() {
        let record = Record::parse("Gum", "1", "2025-01-01", "1.239").unwrap();
        assert_eq!(record.price, 1.24);
        assert_eq!(record.price_text(), "1.24");
    }

    #[test]
    fn test_price_bounds() {
        assert_eq!(parse_price("1000000000").unwrap(), MAX_PRICE);
        assert!(parse_price("1e307").is_err());
        assert!(parse_price("inf").is_err());
        assert!(RecordUpdate::parse("", "", "1e307").is_err());
    }

    #[test]
    fn test_normalized_trims_and_rounds_literal_records() {
        let literal = Record {
            name: "  Gum ".to_string(),
            quantity: 1,
            expiration_date: date(2025, 1, 1),
            price: 1.234,
        };
        let record = literal.normalized().unwrap();
        assert_eq!(record.name, "Gum");
        assert_eq!(record.price, 1.23);

        let blank = Record {
            name: "   ".to_string(),
            quantity: 1,
            expiration_date: date(2025, 1, 1),
            price: 1.0,
        };
        assert!(blank.normalized().is_err());

        let huge = Record {
            name: "Gold".to_string(),
            quantity: 1,
            expiration_date: date(2025, 1, 1),
            price: 1e307,
        };
        assert!(huge.normalized().is_err());
    }

    #[test]
    fn test_update_parse_blank_keeps_current() {
        let update = RecordUpdate::parse("", "  ", "").unwrap();
        assert!(update.is_empty());

        let update = RecordUpdate::parse("5", "", "2.50").unwrap();
        assert_eq!(update.quantity, Some(5));
        assert_eq!(update.expiration_date, None);
        assert_eq!(update.price, Some(2.5));
    }

    #[test]
    fn test_apply_update_only_touches_supplied_fields() {
        let mut record = Record::new("Mouse", 50, date(2025, 1, 15), 19.99).unwrap();
        record
            .apply(&RecordUpdate::default().with_price(17.5))
            .unwrap();

        assert_eq!(record.quantity, 50);
        assert_eq!(record.expiration_date, date(2025, 1, 15));
        assert_eq!(record.price, 17.5);

        assert!(record
            .apply(&RecordUpdate::default().with_price(-1.0))
            .is_err());
        assert_eq!(record.price, 17.5);
    }

    #[test]
    fn test_is_expired_is_strict() {
        let record = Record::new("Milk", 2, date(2025, 3, 1), 1.2).unwrap();
        assert!(!record.is_expired(date(2025, 3, 1)));
        assert!(record.is_expired(date(2025, 3, 2)));
        assert!((record.stock_value() - 2.4).abs() < 1e-9);
    }
}
