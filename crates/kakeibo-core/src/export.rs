//! CSV export of transactions
//!
//! Output is spreadsheet-friendly: UTF-8 with a byte-order mark, Japanese
//! column headers and `YYYY/MM/DD` dates.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Selection, Transaction};

const BOM: &str = "\u{FEFF}";

/// Column headers, in output order
pub const CSV_HEADERS: [&str; 7] = ["日付", "内容", "金額", "大項目", "中項目", "金融機関", "メモ"];

/// Write records as CSV rows (headers included, no BOM)
pub fn write_transactions_csv<W: Write>(writer: W, records: &[Transaction]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(CSV_HEADERS)?;
    for t in records {
        let date = t.date.format("%Y/%m/%d").to_string();
        let amount = t.amount.to_string();
        csv.write_record([
            date.as_str(),
            t.description.as_str(),
            amount.as_str(),
            t.category.as_str(),
            t.subcategory.as_str(),
            t.institution.as_str(),
            t.memo.as_str(),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Records as a CSV document with a leading BOM
pub fn transactions_to_csv(records: &[Transaction]) -> Result<String> {
    let mut buf = BOM.as_bytes().to_vec();
    write_transactions_csv(&mut buf, records)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(format!("CSV is not UTF-8: {}", e)))
}

/// Write the CSV document to `path`
pub fn export_to_file(path: &Path, records: &[Transaction]) -> Result<()> {
    let csv = transactions_to_csv(records)?;
    fs::write(path, csv)?;
    tracing::info!(
        path = %path.display(),
        count = records.len(),
        "Exported transactions"
    );
    Ok(())
}

/// Suggested file name for an export of `year` / `month`
pub fn export_filename(year: i32, month: &Selection<u32>) -> String {
    match month {
        Selection::All => format!("家計簿_{}年全期間.csv", year),
        Selection::Only(m) => format!("家計簿_{}年{}月.csv", year, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TransactionBuilder;

    #[test]
    fn test_csv_layout() {
        let records = vec![TransactionBuilder::new("1")
            .date(2025, 3, 5)
            .description("スーパー")
            .amount(-2480)
            .institution("楽天カード")
            .memo("週末")
            .build()];

        let csv = transactions_to_csv(&records).unwrap();
        assert!(csv.starts_with('\u{FEFF}'));

        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines[0], "日付,内容,金額,大項目,中項目,金融機関,メモ");
        assert_eq!(lines[1], "2025/03/05,スーパー,-2480,食費,食料品,楽天カード,週末");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let records = vec![TransactionBuilder::new("1")
            .description("Coffee, \"large\"")
            .memo("line one\nline two")
            .build()];

        let csv = transactions_to_csv(&records).unwrap();
        assert!(csv.contains("\"Coffee, \"\"large\"\"\""));
        assert!(csv.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_empty_export_has_headers() {
        let csv = transactions_to_csv(&[]).unwrap();
        assert_eq!(csv, "\u{FEFF}日付,内容,金額,大項目,中項目,金融機関,メモ\n");
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        export_to_file(&path, &[TransactionBuilder::new("1").build()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(2025, &Selection::Only(3)), "家計簿_2025年3月.csv");
        assert_eq!(export_filename(2024, &Selection::All), "家計簿_2024年全期間.csv");
    }
}
