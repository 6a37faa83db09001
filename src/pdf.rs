// 🖨️ PDF export - one A4 report, bordered table, rows flow across pages
// Built directly with lopdf: Helvetica (WinAnsi), no embedded fonts.

use crate::error::{InventoryError, Result};
use crate::record::Record;
use crate::report::truncate;
use chrono::NaiveDateTime;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::ops::Range;
use std::path::Path;
use tracing::info;

pub const TITLE: &str = "Warehouse Inventory Report";
pub const SUBTITLE: &str = "Full Inventory Report";

// A4 in points
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;

// Space taken by title, subtitle and date on the first page
const FIRST_PAGE_HEADER: f32 = 80.0;

const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 20.0;
const COLUMN_WIDTH: f32 = (PAGE_WIDTH - 2.0 * MARGIN) / 4.0;
const CELL_PADDING: f32 = 4.0;
const CELL_CHARS: usize = 22;

const COLUMNS: [&str; 4] = ["Item", "Quantity", "Expiration Date", "Price"];

/// Write the report to `path`; returns the number of pages
pub fn export(records: &[Record], path: &Path, generated_at: NaiveDateTime) -> Result<usize> {
    let mut doc = build_document(records, generated_at)?;
    let pages = doc.get_pages().len();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| InventoryError::io(path, e))?;
    std::fs::write(path, bytes).map_err(|e| InventoryError::io(path, e))?;

    info!(path = %path.display(), records = records.len(), pages, "exported PDF report");
    Ok(pages)
}

/// Assemble the document in memory
pub fn build_document(records: &[Record], generated_at: NaiveDateTime) -> Result<Document> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let date_line = format!("Date: {}", generated_at.format("%Y-%m-%d %H:%M:%S"));
    let mut kids: Vec<Object> = Vec::new();

    for (index, range) in paginate(records.len()).into_iter().enumerate() {
        let first = index == 0;
        let mut ops = Vec::new();

        if first {
            let title_x = (PAGE_WIDTH - approx_text_width(TITLE, TITLE_SIZE)) / 2.0;
            text(&mut ops, title_x, PAGE_HEIGHT - MARGIN - TITLE_SIZE, TITLE_SIZE, TITLE);
            text(&mut ops, MARGIN, PAGE_HEIGHT - MARGIN - 40.0, BODY_SIZE, SUBTITLE);
            text(&mut ops, MARGIN, PAGE_HEIGHT - MARGIN - 58.0, BODY_SIZE, &date_line);
        }

        ops.push(Operation::new("w", vec![0.5_f32.into()]));
        let mut y = table_top(first);
        row(&mut ops, y, &COLUMNS.map(str::to_string));
        y -= ROW_HEIGHT;

        for record in &records[range] {
            row(
                &mut ops,
                y,
                &[
                    record.name.clone(),
                    record.quantity.to_string(),
                    record.date_text(),
                    record.price_text(),
                ],
            );
            y -= ROW_HEIGHT;
        }

        let content = Content { operations: ops };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id: ObjectId = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

// ============================================================================
// LAYOUT
// ============================================================================

fn table_top(first_page: bool) -> f32 {
    if first_page {
        PAGE_HEIGHT - MARGIN - FIRST_PAGE_HEADER
    } else {
        PAGE_HEIGHT - MARGIN
    }
}

/// Data rows that fit under the column-header row
fn rows_per_page(first_page: bool) -> usize {
    let rows = ((table_top(first_page) - MARGIN) / ROW_HEIGHT).floor() as usize;
    rows.saturating_sub(1).max(1)
}

/// Record index ranges per page; always at least one page
fn paginate(count: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    let mut capacity = rows_per_page(true);
    loop {
        let end = (start + capacity).min(count);
        pages.push(start..end);
        if end >= count {
            return pages;
        }
        start = end;
        capacity = rows_per_page(false);
    }
}

fn row(ops: &mut Vec<Operation>, top: f32, cells: &[String; 4]) {
    for (i, cell) in cells.iter().enumerate() {
        let x = MARGIN + i as f32 * COLUMN_WIDTH;
        ops.push(Operation::new(
            "re",
            vec![x.into(), (top - ROW_HEIGHT).into(), COLUMN_WIDTH.into(), ROW_HEIGHT.into()],
        ));
        ops.push(Operation::new("S", vec![]));
        text(
            ops,
            x + CELL_PADDING,
            top - ROW_HEIGHT + 6.0,
            BODY_SIZE,
            &truncate(cell, CELL_CHARS),
        );
    }
}

fn text(ops: &mut Vec<Operation>, x: f32, y: f32, size: f32, s: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![Object::string_literal(pdf_text(s))]));
    ops.push(Operation::new("ET", vec![]));
}

// Helvetica averages about half an em per glyph
fn approx_text_width(s: &str, size: f32) -> f32 {
    s.chars().count() as f32 * size * 0.5
}

/// Standard fonts only cover Latin-1 reliably; keep it to printable ASCII
fn pdf_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn records(n: usize) -> Vec<Record> {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        (0..n)
            .map(|i| {
                Record::new(
                    &format!("Item {}", i),
                    i as u32,
                    base + chrono::Duration::days(i as i64),
                    1.5,
                )
                .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_pagination() {
        assert_eq!(rows_per_page(true), 32);
        assert_eq!(rows_per_page(false), 36);

        assert_eq!(paginate(0), vec![0..0]);
        assert_eq!(paginate(32), vec![0..32]);
        assert_eq!(paginate(33), vec![0..32, 32..33]);
        assert_eq!(paginate(100), vec![0..32, 32..68, 68..100]);
    }

    #[test]
    fn test_export_writes_loadable_pdf() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory_report.pdf");

        let pages = export(&records(100), &path, generated_at()).unwrap();
        assert_eq!(pages, 3);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load(&path).unwrap();
        assert_eq!(doc.get_pages().len(), 3);

        println!("✅ PDF export test PASSED");
    }

    #[test]
    fn test_first_page_has_title_and_rows() {
        let doc = build_document(&records(2), generated_at()).unwrap();
        let pages = doc.get_pages();
        let first = *pages.get(&1).unwrap();
        let content = doc.get_page_content(first).unwrap();
        let text = String::from_utf8_lossy(&content);

        assert!(text.contains("(Warehouse Inventory Report)"));
        assert!(text.contains("(Full Inventory Report)"));
        assert!(text.contains("(Date: 2025-03-01 09:30:00)"));
        assert!(text.contains("(Expiration Date)"));
        assert!(text.contains("(Item 1)"));
        assert!(text.contains("(2025-01-02)"));
        assert!(text.contains("(1.50)"));
    }

    #[test]
    fn test_empty_inventory_still_exports_one_page() {
        let doc = build_document(&[], generated_at()).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_non_ascii_is_replaced() {
        assert_eq!(pdf_text("Crème (x2)"), "Cr?me (x2)");
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        assert!(matches!(
            export(&records(1), &path, generated_at()),
            Err(InventoryError::Io { .. })
        ));
    }
}
